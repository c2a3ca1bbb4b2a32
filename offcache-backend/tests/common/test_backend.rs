//! Simple in-memory test backend implementation using DashMap.

use async_trait::async_trait;
use dashmap::DashMap;
use offcache_backend::format::{Format, JsonFormat};
use offcache_backend::{Backend, BackendResult, DeleteStatus};
use offcache_core::{CacheName, Raw, RequestKey};
use std::sync::Arc;

type Store = DashMap<RequestKey, Raw>;

/// Simple in-memory backend for testing using DashMap.
///
/// This backend is thread-safe and can be cloned cheaply (Arc internally).
#[derive(Clone, Default)]
pub struct TestBackend {
    stores: Arc<DashMap<CacheName, Arc<Store>>>,
}

impl TestBackend {
    /// Create a new empty test backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the raw stored bytes for inspection.
    pub fn get_raw(&self, store: &CacheName, key: &RequestKey) -> Option<Raw> {
        let entries = self.stores.get(store)?;
        let value = entries.get(key).map(|v| v.value().clone());
        value
    }
}

#[async_trait]
impl Backend for TestBackend {
    async fn open_store(&self, store: &CacheName) -> BackendResult<()> {
        self.stores.entry(store.clone()).or_default();
        Ok(())
    }

    async fn has_store(&self, store: &CacheName) -> BackendResult<bool> {
        Ok(self.stores.contains_key(store))
    }

    async fn store_names(&self) -> BackendResult<Vec<CacheName>> {
        let mut names: Vec<_> = self.stores.iter().map(|e| e.key().clone()).collect();
        names.sort();
        Ok(names)
    }

    async fn delete_store(&self, store: &CacheName) -> BackendResult<DeleteStatus> {
        Ok(match self.stores.remove(store) {
            Some(_) => DeleteStatus::Deleted(1),
            None => DeleteStatus::Missing,
        })
    }

    async fn read(&self, store: &CacheName, key: &RequestKey) -> BackendResult<Option<Raw>> {
        Ok(self.get_raw(store, key))
    }

    async fn write(&self, store: &CacheName, key: &RequestKey, value: Raw) -> BackendResult<()> {
        let entries = self.stores.entry(store.clone()).or_default().clone();
        entries.insert(key.clone(), value);
        Ok(())
    }

    async fn remove(&self, store: &CacheName, key: &RequestKey) -> BackendResult<DeleteStatus> {
        let existed = self
            .stores
            .get(store)
            .is_some_and(|entries| entries.remove(key).is_some());
        Ok(if existed {
            DeleteStatus::Deleted(1)
        } else {
            DeleteStatus::Missing
        })
    }

    fn name(&self) -> &str {
        "test"
    }

    fn value_format(&self) -> &dyn Format {
        &JsonFormat
    }
}
