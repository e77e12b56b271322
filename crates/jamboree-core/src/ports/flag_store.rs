//! FlagStore port - ユーザーごとの永続 flag 領域
//!
//! host はユーザーごとに小さな key-value 領域を持つ。tracker は roll の
//! metadata を診断用にここへミラーするだけで、読み戻して roll を再開することはない。
//!
//! # 設計原則
//! - async API（実装は tokio::fs などで event loop を塞がない）
//! - tracker からの書き込みは `tracker::mirror::FlagMirror` 経由の fire-and-forget
//! - 失敗は呼び出し側で warn ログにして握りつぶす

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::TrackerError;

#[async_trait]
pub trait FlagStore: Send + Sync {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, TrackerError>;

    async fn set(&self, namespace: &str, key: &str, value: Value) -> Result<(), TrackerError>;

    /// 存在しない key の削除はエラーにしない
    async fn unset(&self, namespace: &str, key: &str) -> Result<(), TrackerError>;

    /// `namespace` 配下の全 entry（順序は不定）。1 回の読み込みで返す。
    async fn entries(&self, namespace: &str) -> Result<Vec<(String, Value)>, TrackerError>;
}
