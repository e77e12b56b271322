//! JsonFileFlagStore - flag 領域をディスク上の JSON ファイルに保存
//!
//! # 実装詳細
//! - tokio::fs で読み書き（event loop を塞がない）
//! - 変更のたびにファイル全体を書き直す（tmp に書いて rename）
//! - pending roll が数件の想定。大きなデータ向けではない

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;

use crate::domain::TrackerError;
use crate::ports::FlagStore;

type Namespaces = BTreeMap<String, BTreeMap<String, Value>>;

pub struct JsonFileFlagStore {
    path: PathBuf,
    /// プロセス内の read-modify-write を直列化
    guard: Mutex<()>,
}

impl JsonFileFlagStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Namespaces, TrackerError> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Namespaces::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Namespaces::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, data: &Namespaces) -> Result<(), TrackerError> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(data)?).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn modify(&self, f: impl FnOnce(&mut Namespaces) + Send) -> Result<(), TrackerError> {
        let _lock = self.guard.lock().await;
        let mut data = self.load().await?;
        f(&mut data);
        self.save(&data).await
    }
}

#[async_trait]
impl FlagStore for JsonFileFlagStore {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, TrackerError> {
        let _lock = self.guard.lock().await;
        Ok(self
            .load()
            .await?
            .get(namespace)
            .and_then(|ns| ns.get(key))
            .cloned())
    }

    async fn set(&self, namespace: &str, key: &str, value: Value) -> Result<(), TrackerError> {
        self.modify(|data| {
            data.entry(namespace.to_string())
                .or_default()
                .insert(key.to_string(), value);
        })
        .await
    }

    async fn unset(&self, namespace: &str, key: &str) -> Result<(), TrackerError> {
        self.modify(|data| {
            if let Some(ns) = data.get_mut(namespace) {
                ns.remove(key);
                if ns.is_empty() {
                    data.remove(namespace);
                }
            }
        })
        .await
    }

    async fn entries(&self, namespace: &str) -> Result<Vec<(String, Value)>, TrackerError> {
        let _lock = self.guard.lock().await;
        Ok(self
            .load()
            .await?
            .remove(namespace)
            .map(|ns| ns.into_iter().collect())
            .unwrap_or_default())
    }
}
