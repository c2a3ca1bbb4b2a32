use std::sync::Arc;

use async_trait::async_trait;
use offcache_core::{CacheName, Raw, RequestKey};

use crate::{
    BackendError, DeleteStatus,
    format::{Format, JsonFormat},
};

pub type BackendResult<T> = Result<T, BackendError>;

/// Storage of named cache stores holding serialized responses.
///
/// Writing into a store that was never opened creates it. Reading from a
/// missing store is a miss, not an error.
#[async_trait]
pub trait Backend: Sync + Send {
    /// Creates `store` if it does not exist yet.
    async fn open_store(&self, store: &CacheName) -> BackendResult<()>;

    async fn has_store(&self, store: &CacheName) -> BackendResult<bool>;

    /// Names of every store currently held by the backend.
    async fn store_names(&self) -> BackendResult<Vec<CacheName>>;

    /// Drops `store` with all of its entries.
    async fn delete_store(&self, store: &CacheName) -> BackendResult<DeleteStatus>;

    async fn read(&self, store: &CacheName, key: &RequestKey) -> BackendResult<Option<Raw>>;

    /// Replaces the entry under `key` as a whole.
    async fn write(&self, store: &CacheName, key: &RequestKey, value: Raw) -> BackendResult<()>;

    /// Writes an entry that capacity-based eviction must never drop.
    ///
    /// A pinned entry lives until it is removed or its store is deleted.
    /// Later [`write`](Backend::write) calls for the same key replace it
    /// and keep it pinned. Backends that never evict can rely on the
    /// default, which is a plain write.
    async fn write_pinned(
        &self,
        store: &CacheName,
        key: &RequestKey,
        value: Raw,
    ) -> BackendResult<()> {
        self.write(store, key, value).await
    }

    async fn remove(&self, store: &CacheName, key: &RequestKey) -> BackendResult<DeleteStatus>;

    /// Returns the name of this backend for log output.
    fn name(&self) -> &str {
        "backend"
    }

    fn value_format(&self) -> &dyn Format {
        &JsonFormat
    }
}

#[async_trait]
impl Backend for &dyn Backend {
    async fn open_store(&self, store: &CacheName) -> BackendResult<()> {
        (*self).open_store(store).await
    }

    async fn has_store(&self, store: &CacheName) -> BackendResult<bool> {
        (*self).has_store(store).await
    }

    async fn store_names(&self) -> BackendResult<Vec<CacheName>> {
        (*self).store_names().await
    }

    async fn delete_store(&self, store: &CacheName) -> BackendResult<DeleteStatus> {
        (*self).delete_store(store).await
    }

    async fn read(&self, store: &CacheName, key: &RequestKey) -> BackendResult<Option<Raw>> {
        (*self).read(store, key).await
    }

    async fn write(&self, store: &CacheName, key: &RequestKey, value: Raw) -> BackendResult<()> {
        (*self).write(store, key, value).await
    }

    async fn write_pinned(
        &self,
        store: &CacheName,
        key: &RequestKey,
        value: Raw,
    ) -> BackendResult<()> {
        (*self).write_pinned(store, key, value).await
    }

    async fn remove(&self, store: &CacheName, key: &RequestKey) -> BackendResult<DeleteStatus> {
        (*self).remove(store, key).await
    }

    fn name(&self) -> &str {
        (*self).name()
    }

    fn value_format(&self) -> &dyn Format {
        (*self).value_format()
    }
}

#[async_trait]
impl Backend for Box<dyn Backend> {
    async fn open_store(&self, store: &CacheName) -> BackendResult<()> {
        (**self).open_store(store).await
    }

    async fn has_store(&self, store: &CacheName) -> BackendResult<bool> {
        (**self).has_store(store).await
    }

    async fn store_names(&self) -> BackendResult<Vec<CacheName>> {
        (**self).store_names().await
    }

    async fn delete_store(&self, store: &CacheName) -> BackendResult<DeleteStatus> {
        (**self).delete_store(store).await
    }

    async fn read(&self, store: &CacheName, key: &RequestKey) -> BackendResult<Option<Raw>> {
        (**self).read(store, key).await
    }

    async fn write(&self, store: &CacheName, key: &RequestKey, value: Raw) -> BackendResult<()> {
        (**self).write(store, key, value).await
    }

    async fn write_pinned(
        &self,
        store: &CacheName,
        key: &RequestKey,
        value: Raw,
    ) -> BackendResult<()> {
        (**self).write_pinned(store, key, value).await
    }

    async fn remove(&self, store: &CacheName, key: &RequestKey) -> BackendResult<DeleteStatus> {
        (**self).remove(store, key).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn value_format(&self) -> &dyn Format {
        (**self).value_format()
    }
}

#[async_trait]
impl Backend for Arc<dyn Backend + Send + 'static> {
    async fn open_store(&self, store: &CacheName) -> BackendResult<()> {
        (**self).open_store(store).await
    }

    async fn has_store(&self, store: &CacheName) -> BackendResult<bool> {
        (**self).has_store(store).await
    }

    async fn store_names(&self) -> BackendResult<Vec<CacheName>> {
        (**self).store_names().await
    }

    async fn delete_store(&self, store: &CacheName) -> BackendResult<DeleteStatus> {
        (**self).delete_store(store).await
    }

    async fn read(&self, store: &CacheName, key: &RequestKey) -> BackendResult<Option<Raw>> {
        (**self).read(store, key).await
    }

    async fn write(&self, store: &CacheName, key: &RequestKey, value: Raw) -> BackendResult<()> {
        (**self).write(store, key, value).await
    }

    async fn write_pinned(
        &self,
        store: &CacheName,
        key: &RequestKey,
        value: Raw,
    ) -> BackendResult<()> {
        (**self).write_pinned(store, key, value).await
    }

    async fn remove(&self, store: &CacheName, key: &RequestKey) -> BackendResult<DeleteStatus> {
        (**self).remove(store, key).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn value_format(&self) -> &dyn Format {
        (**self).value_format()
    }
}
