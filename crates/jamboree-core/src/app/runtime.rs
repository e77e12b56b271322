//! TrackerRuntime - tracker + GcLoop のライフサイクル
//!
//! # 起動と停止
//! - `start()` で GcLoop を起動
//! - `shutdown()` で GcLoop を止め、tracker を閉じる（pending roll は破棄）

use tracing::info;

use crate::app::GcLoop;
use crate::tracker::SkillRollTracker;

pub struct TrackerRuntime {
    tracker: SkillRollTracker,
    gc: GcLoop,
}

impl TrackerRuntime {
    /// tokio runtime の中で呼ぶこと。
    pub fn start(tracker: SkillRollTracker) -> Self {
        let every = tracker.config().gc_interval();
        let gc = GcLoop::spawn(tracker.clone(), every);
        info!(
            roll_timeout_secs = tracker.config().roll_timeout_secs,
            gc_interval_secs = tracker.config().gc_interval_secs,
            "skill roll tracker started"
        );
        Self { tracker, gc }
    }

    pub fn tracker(&self) -> &SkillRollTracker {
        &self.tracker
    }

    pub async fn shutdown(self) {
        self.gc.shutdown_and_join().await;
        self.tracker.shutdown().await;
        info!("skill roll tracker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::TrackerBuilder;
    use crate::domain::RollTopic;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn shutdown_drops_pending_rolls_unfired() {
        let runtime = TrackerRuntime::start(TrackerBuilder::default().build().unwrap());
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        runtime
            .tracker()
            .queue_roll(
                "actor123",
                "bushcraft",
                RollTopic::Process,
                Box::new(move |_| flag.store(true, Ordering::SeqCst)),
                true,
            )
            .await;

        let tracker = runtime.tracker().clone();
        runtime.shutdown().await;

        assert!(!tracker.is_active().await);
        assert_eq!(tracker.pending_count().await, 0);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }
}
