//! InMemoryFlagStore - 開発用・テスト用の flag store
//!
//! # 実装詳細
//! - HashMap<String, HashMap<String, Value>> で namespace ごとに管理
//! - std の Mutex で排他制御（ロック中に await しないので十分）

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::TrackerError;
use crate::ports::FlagStore;

#[derive(Default)]
pub struct InMemoryFlagStore {
    /// namespace ごとの key-value
    flags: Mutex<HashMap<String, HashMap<String, Value>>>,
}

impl InMemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, HashMap<String, Value>>> {
        self.flags.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl FlagStore for InMemoryFlagStore {
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, TrackerError> {
        Ok(self
            .lock()
            .get(namespace)
            .and_then(|ns| ns.get(key))
            .cloned())
    }

    async fn set(&self, namespace: &str, key: &str, value: Value) -> Result<(), TrackerError> {
        self.lock()
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn unset(&self, namespace: &str, key: &str) -> Result<(), TrackerError> {
        if let Some(ns) = self.lock().get_mut(namespace) {
            ns.remove(key);
        }
        Ok(())
    }

    async fn entries(&self, namespace: &str) -> Result<Vec<(String, Value)>, TrackerError> {
        Ok(self
            .lock()
            .get(namespace)
            .map(|ns| ns.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn set_get_unset() {
        let store = InMemoryFlagStore::new();
        store.set("ns", "k", json!({"a": 1})).await.unwrap();
        assert_eq!(store.get("ns", "k").await.unwrap(), Some(json!({"a": 1})));

        store.unset("ns", "k").await.unwrap();
        assert_eq!(store.get("ns", "k").await.unwrap(), None);
        // 存在しない key / namespace でも OK
        store.unset("ns", "k").await.unwrap();
        store.unset("other", "k").await.unwrap();
    }

    #[tokio::test]
    async fn namespaces_are_isolated() {
        let store = InMemoryFlagStore::new();
        store.set("ns1", "k", json!(1)).await.unwrap();
        store.set("ns2", "k", json!(2)).await.unwrap();

        assert_eq!(store.get("ns1", "k").await.unwrap(), Some(json!(1)));
        assert_eq!(
            store.entries("ns2").await.unwrap(),
            vec![("k".to_string(), json!(2))]
        );
        assert!(store.entries("ns3").await.unwrap().is_empty());
    }
}
