//! In-memory record store.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::StoreError;
use crate::record::EmailRecord;

use super::RecordStore;

/// Thread-safe in-memory store. Scan order is insertion order.
///
/// Records live as long as the process. Can be told to fail inserts or
/// reads, for exercising the pipeline's error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<EmailRecord>>,
    fail_inserts: RwLock<Option<String>>,
    fail_reads: RwLock<Option<String>>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store wrapped in an Arc for sharing.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Make every subsequent `insert` fail with `message`.
    pub fn fail_inserts(&self, message: impl Into<String>) {
        *self.fail_inserts.write() = Some(message.into());
    }

    /// Make every subsequent `find_all` fail with `message`.
    pub fn fail_reads(&self, message: impl Into<String>) {
        *self.fail_reads.write() = Some(message.into());
    }

    /// Clear any configured failures.
    pub fn clear_failures(&self) {
        *self.fail_inserts.write() = None;
        *self.fail_reads.write() = None;
    }

    /// Get the count of stored records.
    pub fn count(&self) -> usize {
        self.records.read().len()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, record: &EmailRecord) -> Result<String, StoreError> {
        if let Some(ref message) = *self.fail_inserts.read() {
            return Err(StoreError::Query(message.clone()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        self.records.write().push(record.clone().with_id(id.clone()));
        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<EmailRecord>, StoreError> {
        if let Some(ref message) = *self.fail_reads.read() {
            return Err(StoreError::Query(message.clone()));
        }

        Ok(self.records.read().clone())
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NewEmail;
    use chrono::Utc;

    fn record(subject: &str) -> EmailRecord {
        EmailRecord::unsaved(NewEmail::new("a@x.com", subject, "Body"), Utc::now())
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.find_all().await.unwrap().is_empty());

        let id1 = store.insert(&record("First")).await.unwrap();
        let id2 = store.insert(&record("Second")).await.unwrap();
        assert_ne!(id1, id2);
        assert_eq!(store.count(), 2);

        // Scan order is insertion order
        let all = store.find_all().await.unwrap();
        assert_eq!(all[0].id.as_deref(), Some(id1.as_str()));
        assert_eq!(all[0].subject, "First");
        assert_eq!(all[1].id.as_deref(), Some(id2.as_str()));
    }

    #[tokio::test]
    async fn test_insert_ignores_caller_id() {
        let store = MemoryStore::new();
        let id = store.insert(&record("Hi").with_id("forged")).await.unwrap();

        assert_ne!(id, "forged");
        assert_eq!(store.find_all().await.unwrap()[0].id.as_deref(), Some(id.as_str()));
    }

    #[tokio::test]
    async fn test_failures() {
        let store = MemoryStore::new();
        store.fail_inserts("disk full");

        let err = store.insert(&record("Hi")).await.unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert_eq!(store.count(), 0);

        store.fail_reads("connection reset");
        assert!(store.find_all().await.is_err());

        store.clear_failures();
        store.insert(&record("Hi")).await.unwrap();
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }
}
