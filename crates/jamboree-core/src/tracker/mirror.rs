//! FlagMirror - persisted flag area への書き込みを 1 本の task に寄せる
//!
//! # 設計
//! - tracker のロック内では channel に送るだけ（I/O しない、await しない）
//! - 書き込み task が順番に `FlagStore` へ反映する（set → unset の順序は保たれる）
//! - 失敗は warn ログにして捨てる
//! - `flush()` でそれまでに送った書き込みの完了を待てる

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::ports::FlagStore;

enum FlagOp {
    Set { key: String, value: Value },
    Unset { key: String },
    Flush(oneshot::Sender<()>),
}

/// 書き込み task への送信口。clone は同じ task を共有する。
#[derive(Clone)]
pub struct FlagMirror {
    tx: mpsc::UnboundedSender<FlagOp>,
}

impl FlagMirror {
    /// 書き込み task を起動する。tokio runtime の中で呼ぶこと。
    ///
    /// 全ての `FlagMirror` が drop されると task も終わる。
    pub fn spawn(flags: Arc<dyn FlagStore>, namespace: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(writer_loop(flags, namespace.into(), rx));
        Self { tx }
    }

    pub fn set(&self, key: String, value: Value) {
        self.send(FlagOp::Set { key, value });
    }

    pub fn unset(&self, key: String) {
        self.send(FlagOp::Unset { key });
    }

    /// ここまでに送った書き込みが全て反映されるまで待つ
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        self.send(FlagOp::Flush(done_tx));
        // task が既に無ければ待つものも無い
        let _ = done_rx.await;
    }

    fn send(&self, op: FlagOp) {
        if self.tx.send(op).is_err() {
            warn!("flag writer is gone, dropping write");
        }
    }
}

async fn writer_loop(
    flags: Arc<dyn FlagStore>,
    namespace: String,
    mut rx: mpsc::UnboundedReceiver<FlagOp>,
) {
    while let Some(op) = rx.recv().await {
        match op {
            FlagOp::Set { key, value } => {
                if let Err(err) = flags.set(&namespace, &key, value).await {
                    warn!(key, error = %err, "failed to persist pending roll");
                }
            }
            FlagOp::Unset { key } => {
                if let Err(err) = flags.unset(&namespace, &key).await {
                    warn!(key, error = %err, "failed to remove pending roll flag");
                }
            }
            FlagOp::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("flag writer stopped");
}
