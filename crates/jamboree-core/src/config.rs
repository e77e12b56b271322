//! Tracker configuration.

use std::env;
use std::time::Duration;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::domain::TrackerError;

pub const MIN_ROLL_TIMEOUT_SECS: u64 = 10;
pub const MAX_ROLL_TIMEOUT_SECS: u64 = 120;
pub const MAX_GC_INTERVAL_SECS: u64 = 60 * 60;
pub const MAX_STALE_AFTER_SECS: u64 = 7 * 24 * 60 * 60;

/// Texts the correlator looks for in roll markup.
///
/// Raw translation keys and their localized forms are both accepted, since
/// the ruleset sometimes renders one and sometimes the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupLabels {
    /// Success and critical-success markers.
    pub success_markers: Vec<String>,

    /// CSS class of the retry ("push") control.
    pub retry_control_class: String,

    /// Label text on the retry control.
    pub retry_labels: Vec<String>,
}

impl Default for MarkupLabels {
    fn default() -> Self {
        Self {
            success_markers: vec!["DoD.roll.success".to_string(), "DoD.roll.dragon".to_string()],
            retry_control_class: "push-roll".to_string(),
            retry_labels: vec!["DoD.roll.pushButtonLabel".to_string()],
        }
    }
}

impl MarkupLabels {
    /// Add localized forms next to the raw keys.
    pub fn with_localized(mut self, success: &[&str], retry_label: &str) -> Self {
        self.success_markers
            .extend(success.iter().map(|s| s.to_string()));
        self.retry_labels.push(retry_label.to_string());
        self
    }
}

/// Fallback travel speeds for rulesets that don't keep speed on the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementDefaults {
    pub on_foot: u32,
    pub mounted: u32,
}

impl Default for MovementDefaults {
    fn default() -> Self {
        Self {
            on_foot: 15,
            mounted: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Seconds to wait for a correlating chat message before failing the roll.
    pub roll_timeout_secs: u64,

    /// How often the stale sweep runs.
    pub gc_interval_secs: u64,

    /// Age after which a roll is dropped whether it resolved or not.
    /// Must exceed `roll_timeout_secs` so the timeout always gets there first.
    pub stale_after_secs: u64,

    /// Flag namespace the metadata mirror writes under.
    pub flag_namespace: String,

    /// Only exact id equality correlates an event with a roll.
    pub strict_subject_match: bool,

    pub labels: MarkupLabels,
    pub movement: MovementDefaults,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            roll_timeout_secs: 30,
            gc_interval_secs: 60,
            stale_after_secs: 5 * 60,
            flag_namespace: "journeys-and-jamborees".to_string(),
            strict_subject_match: false,
            labels: MarkupLabels::default(),
            movement: MovementDefaults::default(),
        }
    }
}

impl TrackerConfig {
    /// Defaults overlaid with `JAMBOREE_*` environment variables.
    pub fn from_env() -> Result<Self, TrackerError> {
        let mut config = Self::default();
        if let Some(v) = env_u64("JAMBOREE_ROLL_TIMEOUT_SECS")? {
            config.roll_timeout_secs = v;
        }
        if let Some(v) = env_u64("JAMBOREE_GC_INTERVAL_SECS")? {
            config.gc_interval_secs = v;
        }
        if let Some(v) = env_u64("JAMBOREE_STALE_AFTER_SECS")? {
            config.stale_after_secs = v;
        }
        if let Ok(v) = env::var("JAMBOREE_STRICT_MATCH") {
            config.strict_subject_match = matches!(v.as_str(), "1" | "true" | "yes");
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TrackerError> {
        if !(MIN_ROLL_TIMEOUT_SECS..=MAX_ROLL_TIMEOUT_SECS).contains(&self.roll_timeout_secs) {
            return Err(TrackerError::InvalidConfig(format!(
                "roll_timeout_secs must be between {MIN_ROLL_TIMEOUT_SECS} and {MAX_ROLL_TIMEOUT_SECS}, got {}",
                self.roll_timeout_secs
            )));
        }
        if !(1..=MAX_GC_INTERVAL_SECS).contains(&self.gc_interval_secs) {
            return Err(TrackerError::InvalidConfig(format!(
                "gc_interval_secs must be between 1 and {MAX_GC_INTERVAL_SECS}, got {}",
                self.gc_interval_secs
            )));
        }
        if self.stale_after_secs <= self.roll_timeout_secs
            || self.stale_after_secs > MAX_STALE_AFTER_SECS
        {
            return Err(TrackerError::InvalidConfig(format!(
                "stale_after_secs must be above roll_timeout_secs ({}) and at most {MAX_STALE_AFTER_SECS}, got {}",
                self.roll_timeout_secs, self.stale_after_secs
            )));
        }
        if self.flag_namespace.is_empty() {
            return Err(TrackerError::InvalidConfig(
                "flag_namespace must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn roll_timeout(&self) -> Duration {
        Duration::from_secs(self.roll_timeout_secs)
    }

    pub fn gc_interval(&self) -> Duration {
        Duration::from_secs(self.gc_interval_secs)
    }

    /// `None` when the value doesn't fit a `TimeDelta` (only possible unvalidated).
    pub fn stale_after(&self) -> Option<TimeDelta> {
        i64::try_from(self.stale_after_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
    }
}

fn env_u64(name: &str) -> Result<Option<u64>, TrackerError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| TrackerError::InvalidConfig(format!("{name} must be an integer, got {raw:?}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_are_valid() {
        let config = TrackerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.roll_timeout(), Duration::from_secs(30));
        assert_eq!(config.gc_interval(), Duration::from_secs(60));
        assert_eq!(config.stale_after(), Some(TimeDelta::minutes(5)));
    }

    #[rstest]
    #[case(9, false)]
    #[case(10, true)]
    #[case(120, true)]
    #[case(121, false)]
    fn roll_timeout_range_is_enforced(#[case] secs: u64, #[case] ok: bool) {
        let config = TrackerConfig {
            roll_timeout_secs: secs,
            ..TrackerConfig::default()
        };
        assert_eq!(config.validate().is_ok(), ok);
    }

    #[rstest]
    #[case::below_timeout(30, 10, false)]
    #[case::equal_to_timeout(30, 30, false)]
    #[case::just_above_timeout(30, 31, true)]
    #[case::week(120, MAX_STALE_AFTER_SECS, true)]
    #[case::beyond_week(120, MAX_STALE_AFTER_SECS + 1, false)]
    #[case::overflows_chrono(30, 100_000_000_000_000_000, false)]
    #[case::wraps_i64(30, u64::MAX, false)]
    fn stale_window_must_outlast_timeout(
        #[case] timeout: u64,
        #[case] stale: u64,
        #[case] ok: bool,
    ) {
        let config = TrackerConfig {
            roll_timeout_secs: timeout,
            stale_after_secs: stale,
            ..TrackerConfig::default()
        };
        assert_eq!(config.validate().is_ok(), ok);
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(MAX_GC_INTERVAL_SECS, true)]
    #[case(MAX_GC_INTERVAL_SECS + 1, false)]
    fn gc_interval_range_is_enforced(#[case] secs: u64, #[case] ok: bool) {
        let config = TrackerConfig {
            gc_interval_secs: secs,
            ..TrackerConfig::default()
        };
        assert_eq!(config.validate().is_ok(), ok);
    }

    #[test]
    fn oversized_staleness_window_has_no_delta() {
        let config = TrackerConfig {
            stale_after_secs: u64::MAX,
            ..TrackerConfig::default()
        };
        assert_eq!(config.stale_after(), None);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: TrackerConfig =
            serde_json::from_str(r#"{"roll_timeout_secs": 45, "labels": {"retry_control_class": "retry"}}"#)
                .unwrap();
        assert_eq!(config.roll_timeout_secs, 45);
        assert_eq!(config.gc_interval_secs, 60);
        assert_eq!(config.labels.retry_control_class, "retry");
        assert_eq!(config.labels.retry_labels, vec!["DoD.roll.pushButtonLabel"]);
    }

    #[test]
    fn with_localized_appends() {
        let labels = MarkupLabels::default().with_localized(&["Success", "Dragon!"], "Push");
        assert!(labels.success_markers.contains(&"Dragon!".to_string()));
        assert_eq!(labels.retry_labels.len(), 2);
    }
}
