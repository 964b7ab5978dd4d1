//! In-memory key/value store adapter.
//!
//! Backs development servers and tests. A single `RwLock` over the map
//! gives the snapshot semantics the port demands: scans and reads observe
//! every `set` the caller itself completed, and compare-and-set is atomic
//! with respect to all other writers.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::domain::ports::{CasOutcome, KeyValueStore, KvStoreError};

/// Process-local [`KeyValueStore`] implementation.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryKvStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry directly, bypassing the port. Test and bootstrap use.
    pub async fn seed(&self, key: impl Into<String>, value: Value) {
        self.entries.write().await.insert(key.into(), value);
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, KvStoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), KvStoreError> {
        self.entries.write().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Value)>, KvStoreError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    async fn compare_and_set<'a>(
        &self,
        key: &str,
        expected: Option<&'a Value>,
        value: Value,
    ) -> Result<CasOutcome, KvStoreError> {
        // The write guard is held across the compare and the store, which
        // is what makes this conditional write atomic.
        let mut entries = self.entries.write().await;
        if entries.get(key) == expected {
            entries.insert(key.to_owned(), value);
            Ok(CasOutcome::Applied)
        } else {
            Ok(CasOutcome::Conflict)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = MemoryKvStore::new();
        store.set("user_a", json!({ "canLogin": true })).await.expect("set");
        let value = store.get("user_a").await.expect("get");
        assert_eq!(value, Some(json!({ "canLogin": true })));
    }

    #[rstest]
    #[tokio::test]
    async fn prefix_scan_returns_keys_with_values() {
        let store = MemoryKvStore::new();
        store.set("deposit_a_1", json!(1)).await.expect("set");
        store.set("deposit_a_2", json!(2)).await.expect("set");
        store.set("deposit_b_1", json!(3)).await.expect("set");

        let mut entries = store.get_by_prefix("deposit_a_").await.expect("scan");
        entries.sort_by(|left, right| left.0.cmp(&right.0));
        assert_eq!(
            entries,
            vec![
                ("deposit_a_1".to_owned(), json!(1)),
                ("deposit_a_2".to_owned(), json!(2)),
            ]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn cas_applies_only_on_matching_prior_value() {
        let store = MemoryKvStore::new();
        let outcome = store
            .compare_and_set("user_a", None, json!({ "v": 1 }))
            .await
            .expect("cas");
        assert_eq!(outcome, CasOutcome::Applied);

        // Stale expectation: another writer already moved the value on.
        let stale = store
            .compare_and_set("user_a", None, json!({ "v": 2 }))
            .await
            .expect("cas");
        assert_eq!(stale, CasOutcome::Conflict);

        let fresh = store
            .compare_and_set("user_a", Some(&json!({ "v": 1 })), json!({ "v": 2 }))
            .await
            .expect("cas");
        assert_eq!(fresh, CasOutcome::Applied);
        assert_eq!(store.get("user_a").await.expect("get"), Some(json!({ "v": 2 })));
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_cas_writers_cannot_both_apply_from_same_snapshot() {
        let store = std::sync::Arc::new(MemoryKvStore::new());
        store.set("user_a", json!({ "v": 0 })).await.expect("set");

        let left = {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .compare_and_set("user_a", Some(&json!({ "v": 0 })), json!({ "v": "left" }))
                    .await
                    .expect("cas")
            })
        };
        let right = {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .compare_and_set("user_a", Some(&json!({ "v": 0 })), json!({ "v": "right" }))
                    .await
                    .expect("cas")
            })
        };

        let (left, right) = (left.await.expect("join"), right.await.expect("join"));
        let applied = [left, right]
            .iter()
            .filter(|outcome| **outcome == CasOutcome::Applied)
            .count();
        assert_eq!(applied, 1, "exactly one writer may win the race");
    }
}
