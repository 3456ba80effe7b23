// SPDX-FileCopyrightText: 2026 Santalink Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementation of the TokenStore trait.
//!
//! Used by tests and for ephemeral deployments where durability does not
//! matter. Conditional writes go through the dashmap entry lock, so the
//! at-most-once guarantee holds here exactly as it does for SQLite.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use santalink_core::{HealthStatus, SantalinkError, TokenRecord, TokenStatus, TokenStore};

/// Token store backed by a concurrent in-process map.
#[derive(Default)]
pub struct MemoryTokenStore {
    records: DashMap<String, TokenRecord>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held. Test helper.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn initialize(&self) -> Result<(), SantalinkError> {
        Ok(())
    }

    async fn health_check(&self) -> Result<HealthStatus, SantalinkError> {
        Ok(HealthStatus::Healthy)
    }

    async fn close(&self) -> Result<(), SantalinkError> {
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<TokenRecord>, SantalinkError> {
        Ok(self.records.get(token).map(|r| r.clone()))
    }

    async fn put(&self, record: &TokenRecord) -> Result<(), SantalinkError> {
        self.records.insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn put_if_status(
        &self,
        record: &TokenRecord,
        expected: TokenStatus,
    ) -> Result<(), SantalinkError> {
        // The entry holds the shard lock, making check-and-swap atomic.
        match self.records.entry(record.token.clone()) {
            Entry::Occupied(mut entry) if entry.get().status == expected => {
                entry.insert(record.clone());
                Ok(())
            }
            _ => Err(SantalinkError::PreconditionFailed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemoryTokenStore::new();
        let record = TokenRecord::new("tok-1", "alice", "bob");

        store.put(&record).await.unwrap();
        assert_eq!(store.get("tok-1").await.unwrap().unwrap(), record);
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = MemoryTokenStore::new();
        assert!(store.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_if_status_rejects_mismatched_status() {
        let store = MemoryTokenStore::new();
        let record = TokenRecord::new("tok-1", "alice", "bob");
        store.put(&record).await.unwrap();

        store
            .put_if_status(&record.used(), TokenStatus::Unused)
            .await
            .unwrap();
        let err = store
            .put_if_status(&record.used(), TokenStatus::Unused)
            .await
            .unwrap_err();
        assert!(matches!(err, SantalinkError::PreconditionFailed));
    }

    #[tokio::test]
    async fn put_if_status_rejects_missing_record() {
        let store = MemoryTokenStore::new();
        let record = TokenRecord::new("ghost", "alice", "bob");
        let err = store
            .put_if_status(&record.used(), TokenStatus::Unused)
            .await
            .unwrap_err();
        assert!(matches!(err, SantalinkError::PreconditionFailed));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_transitions_allow_exactly_one_winner() {
        let store = Arc::new(MemoryTokenStore::new());
        let record = TokenRecord::new("tok-race", "alice", "bob");
        store.put(&record).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..32 {
            let store = Arc::clone(&store);
            let used = record.used();
            handles.push(tokio::spawn(async move {
                store.put_if_status(&used, TokenStatus::Unused).await
            }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1, "exactly one transition may win");
    }
}
