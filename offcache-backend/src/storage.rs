//! Scoped access to named stores.

use offcache_core::{CacheName, CapturedResponse, RequestKey};
use tracing::trace;

use crate::{Backend, BackendResult, DeleteStatus};

/// Owner of a backend, handing out one [`CacheStore`] per operation.
///
/// Opening a store borrows the backend for as long as the returned handle
/// lives; dropping the handle releases it. Nothing about a store is held
/// between operations.
#[derive(Debug, Clone)]
pub struct CacheStorage<B> {
    backend: B,
}

impl<B> CacheStorage<B>
where
    B: Backend,
{
    pub fn new(backend: B) -> Self {
        CacheStorage { backend }
    }

    /// Opens (creating if needed) the store called `name`.
    pub async fn open(&self, name: &CacheName) -> BackendResult<CacheStore<'_, B>> {
        self.backend.open_store(name).await?;
        trace!(backend = self.backend.name(), store = %name, "store opened");
        Ok(CacheStore {
            backend: &self.backend,
            name: name.clone(),
        })
    }

    pub async fn has(&self, name: &CacheName) -> BackendResult<bool> {
        self.backend.has_store(name).await
    }

    /// Names of every store, in backend order.
    pub async fn keys(&self) -> BackendResult<Vec<CacheName>> {
        self.backend.store_names().await
    }

    pub async fn delete(&self, name: &CacheName) -> BackendResult<DeleteStatus> {
        self.backend.delete_store(name).await
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// Handle to a single open store.
#[derive(Debug)]
pub struct CacheStore<'a, B> {
    backend: &'a B,
    name: CacheName,
}

impl<B> CacheStore<'_, B>
where
    B: Backend,
{
    pub fn name(&self) -> &CacheName {
        &self.name
    }

    /// Looks up the response stored under `key`.
    pub async fn get(&self, key: &RequestKey) -> BackendResult<Option<CapturedResponse>> {
        match self.backend.read(&self.name, key).await? {
            Some(raw) => {
                let response = self.backend.value_format().deserialize(&raw)?;
                Ok(Some(response))
            }
            None => Ok(None),
        }
    }

    /// Stores `response` under `key`, replacing any previous entry.
    pub async fn put(&self, key: &RequestKey, response: &CapturedResponse) -> BackendResult<()> {
        let raw = self.backend.value_format().serialize(response)?;
        let size = raw.len();
        self.backend.write(&self.name, key, raw).await?;
        trace!(store = %self.name, %key, size, "entry written");
        Ok(())
    }

    /// Stores `response` under `key` so that eviction never drops it.
    pub async fn pin(&self, key: &RequestKey, response: &CapturedResponse) -> BackendResult<()> {
        let raw = self.backend.value_format().serialize(response)?;
        let size = raw.len();
        self.backend.write_pinned(&self.name, key, raw).await?;
        trace!(store = %self.name, %key, size, "entry pinned");
        Ok(())
    }

    pub async fn delete(&self, key: &RequestKey) -> BackendResult<DeleteStatus> {
        self.backend.remove(&self.name, key).await
    }
}
