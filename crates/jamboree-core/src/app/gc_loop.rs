//! GcLoop - 古い pending roll の定期掃除
//!
//! # フロー
//! 1. `gc_interval` ごとに `SkillRollTracker::sweep_stale()` を呼ぶ
//! 2. shutdown 要求が来たら次の tick を待たずに抜ける

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

use crate::tracker::SkillRollTracker;

/// 掃除 task のハンドル
/// - `request_shutdown()` で止める
/// - `shutdown_and_join()` で終了まで待てる
pub struct GcLoop {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl GcLoop {
    /// 最初の掃除は起動から `every` 後
    pub fn spawn(tracker: SkillRollTracker, every: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(async move {
            gc_loop(tracker, every, &mut shutdown_rx).await;
        });
        Self { shutdown_tx, join }
    }

    pub fn request_shutdown(&self) {
        // loop が既に終わっていれば送信エラーは無視
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        let _ = self.join.await;
    }
}

async fn gc_loop(
    tracker: SkillRollTracker,
    every: Duration,
    shutdown_rx: &mut watch::Receiver<bool>,
) {
    let mut ticker = interval_at(Instant::now() + every, every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if *shutdown_rx.borrow() {
            break;
        }

        tokio::select! {
            changed = shutdown_rx.changed() => {
                // sender dropped も停止扱い
                if changed.is_err() {
                    break;
                }
                continue;
            }
            _ = ticker.tick() => {}
        }

        if !tracker.is_active().await {
            break;
        }
        let removed = tracker.sweep_stale().await;
        debug!(removed, "gc tick");
    }
    debug!("gc loop stopped");
}
