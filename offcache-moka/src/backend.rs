//! Moka backend implementation.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use moka::future::Cache;
use offcache_backend::format::{Format, JsonFormat};
use offcache_backend::{Backend, BackendResult, DeleteStatus};
use offcache_core::{CacheName, Raw, RequestKey};
use smol_str::SmolStr;
use tracing::debug;

pub(crate) type StoreCache = Cache<RequestKey, Raw>;

/// One named store: pinned entries plus a bounded cache for everything else.
#[derive(Clone)]
pub(crate) struct MokaStore {
    pinned: Arc<DashMap<RequestKey, Raw>>,
    cache: StoreCache,
}

impl MokaStore {
    fn new(max_entries: u64) -> Self {
        MokaStore {
            pinned: Arc::new(DashMap::new()),
            cache: Cache::builder().max_capacity(max_entries).build(),
        }
    }
}

/// In-memory cache backend powered by Moka.
///
/// `MokaBackend` keeps one Moka async cache per store name. Cloning the
/// backend is cheap and every clone sees the same stores.
///
/// # Type Parameters
///
/// * `S` - Serialization format for stored responses. Implements [`Format`].
///   Default: [`JsonFormat`].
///
/// # Caveats
///
/// - Data is **not persisted**: every store is lost on process restart
/// - Capacity is **per store** and only bounds unpinned entries. Once a store
///   holds more than `max_entries` of them, Moka's TinyLFU admission and
///   eviction policy decides which ones go
/// - Pinned entries ([`Backend::write_pinned`]) are never evicted; they leave
///   only through [`Backend::remove`] or [`Backend::delete_store`]
#[derive(Clone)]
pub struct MokaBackend<S = JsonFormat>
where
    S: Format,
{
    pub(crate) stores: Arc<DashMap<CacheName, MokaStore>>,
    pub(crate) max_entries: u64,
    pub(crate) serializer: S,
    pub(crate) label: SmolStr,
}

impl<S> std::fmt::Debug for MokaBackend<S>
where
    S: Format,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaBackend")
            .field("label", &self.label)
            .field("stores", &self.stores.len())
            .field("max_entries", &self.max_entries)
            .field("serializer", &self.serializer)
            .finish()
    }
}

impl MokaBackend<JsonFormat> {
    /// Creates a new builder for `MokaBackend`.
    pub fn builder() -> crate::builder::MokaBackendBuilder<JsonFormat> {
        crate::builder::MokaBackendBuilder::default()
    }
}

impl<S> MokaBackend<S>
where
    S: Format,
{
    /// Returns the bounded Moka cache behind `store`, if the store exists.
    ///
    /// Pinned entries are not part of this cache.
    pub fn store(&self, store: &CacheName) -> Option<Cache<RequestKey, Raw>> {
        self.stores.get(store).map(|entry| entry.value().cache.clone())
    }

    /// Number of pinned entries in `store`.
    pub fn pinned_count(&self, store: &CacheName) -> usize {
        self.stores
            .get(store)
            .map_or(0, |entry| entry.value().pinned.len())
    }

    fn get_store(&self, store: &CacheName) -> Option<MokaStore> {
        self.stores.get(store).map(|entry| entry.value().clone())
    }

    fn open(&self, store: &CacheName) -> MokaStore {
        self.stores
            .entry(store.clone())
            .or_insert_with(|| MokaStore::new(self.max_entries))
            .value()
            .clone()
    }
}

#[async_trait]
impl<S> Backend for MokaBackend<S>
where
    S: Format,
{
    async fn open_store(&self, store: &CacheName) -> BackendResult<()> {
        self.open(store);
        Ok(())
    }

    async fn has_store(&self, store: &CacheName) -> BackendResult<bool> {
        Ok(self.stores.contains_key(store))
    }

    async fn store_names(&self) -> BackendResult<Vec<CacheName>> {
        let mut names: Vec<_> = self.stores.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        Ok(names)
    }

    async fn delete_store(&self, store: &CacheName) -> BackendResult<DeleteStatus> {
        match self.stores.remove(store) {
            Some((name, entries)) => {
                entries.cache.invalidate_all();
                debug!(backend = %self.label, store = %name, "store deleted");
                Ok(DeleteStatus::Deleted(1))
            }
            None => Ok(DeleteStatus::Missing),
        }
    }

    async fn read(&self, store: &CacheName, key: &RequestKey) -> BackendResult<Option<Raw>> {
        let Some(entries) = self.get_store(store) else {
            return Ok(None);
        };
        let pinned = entries.pinned.get(key).map(|value| value.value().clone());
        match pinned {
            Some(value) => Ok(Some(value)),
            None => Ok(entries.cache.get(key).await),
        }
    }

    async fn write(&self, store: &CacheName, key: &RequestKey, value: Raw) -> BackendResult<()> {
        let entries = self.open(store);
        if let Some(mut pinned) = entries.pinned.get_mut(key) {
            *pinned = value;
            return Ok(());
        }
        entries.cache.insert(key.clone(), value).await;
        Ok(())
    }

    async fn write_pinned(
        &self,
        store: &CacheName,
        key: &RequestKey,
        value: Raw,
    ) -> BackendResult<()> {
        let entries = self.open(store);
        entries.cache.invalidate(key).await;
        entries.pinned.insert(key.clone(), value);
        Ok(())
    }

    async fn remove(&self, store: &CacheName, key: &RequestKey) -> BackendResult<DeleteStatus> {
        let Some(entries) = self.get_store(store) else {
            return Ok(DeleteStatus::Missing);
        };
        let unpinned = entries.pinned.remove(key).is_some();
        let evicted = entries.cache.remove(key).await.is_some();
        if unpinned || evicted {
            Ok(DeleteStatus::Deleted(1))
        } else {
            Ok(DeleteStatus::Missing)
        }
    }

    fn name(&self) -> &str {
        &self.label
    }

    fn value_format(&self) -> &dyn Format {
        &self.serializer
    }
}
