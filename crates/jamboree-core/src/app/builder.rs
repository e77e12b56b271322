//! TrackerBuilder - tracker の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - `build()` 時に config を検証し、不正なら `TrackerError::InvalidConfig`
//! - 指定されなかった port は既定の実装で埋める

use std::sync::Arc;

use crate::config::TrackerConfig;
use crate::domain::TrackerError;
use crate::impls::{InMemoryFlagStore, TracingNotifier};
use crate::ports::{Clock, FlagStore, IdGenerator, Notifier, SystemClock, UlidGenerator};
use crate::tracker::SkillRollTracker;

/// # 使用例
/// ```ignore
/// let tracker = TrackerBuilder::new(TrackerConfig::from_env()?)
///     .flags(Arc::new(JsonFileFlagStore::new("flags.json")))
///     .build()?;
/// ```
///
/// # 既定値
/// - clock: `SystemClock`
/// - ids: `UlidGenerator`（同じ clock を使う）
/// - flags: `InMemoryFlagStore`
/// - notifier: `TracingNotifier`
pub struct TrackerBuilder {
    config: TrackerConfig,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    flags: Option<Arc<dyn FlagStore>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl TrackerBuilder {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            clock: None,
            ids: None,
            flags: None,
            notifier: None,
        }
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn flags(mut self, flags: Arc<dyn FlagStore>) -> Self {
        self.flags = Some(flags);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn build(self) -> Result<SkillRollTracker, TrackerError> {
        self.config.validate()?;

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(clock.clone())));
        let flags = self
            .flags
            .unwrap_or_else(|| Arc::new(InMemoryFlagStore::new()));
        let notifier = self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier));

        Ok(SkillRollTracker::new(self.config, clock, ids, flags, notifier))
    }
}

impl Default for TrackerBuilder {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RollTopic;

    #[tokio::test]
    async fn test_build_with_defaults() {
        let tracker = TrackerBuilder::default().build();
        assert!(tracker.is_ok());
    }

    #[test]
    fn test_build_rejects_invalid_timeout() {
        let config = TrackerConfig {
            roll_timeout_secs: 5,
            ..TrackerConfig::default()
        };
        let result = TrackerBuilder::new(config).build();
        assert!(matches!(result, Err(TrackerError::InvalidConfig(msg)) if msg.contains("roll_timeout_secs")));
    }

    #[test]
    fn test_build_rejects_window_shorter_than_timeout() {
        let config = TrackerConfig {
            roll_timeout_secs: 120,
            gc_interval_secs: 1,
            stale_after_secs: 1,
            ..TrackerConfig::default()
        };
        let result = TrackerBuilder::new(config).build();
        assert!(matches!(result, Err(TrackerError::InvalidConfig(msg)) if msg.contains("stale_after_secs")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_build_uses_given_flag_store() {
        let flags = Arc::new(InMemoryFlagStore::new());
        let tracker = TrackerBuilder::default()
            .flags(flags.clone())
            .build()
            .unwrap();

        tracker
            .queue_roll("actor123", "bushcraft", RollTopic::Gather, Box::new(|_| {}), true)
            .await;

        tracker.flush_flags().await;
        let entries = flags.entries("journeys-and-jamborees").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].0.starts_with("pendingRolls.roll-"));
    }
}
