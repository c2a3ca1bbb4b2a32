//! Fetch interception for an active proxy.

use http::Method;
use offcache_backend::{Backend, BackendResult, CacheStorage, DeleteStatus};
use offcache_core::{
    CacheName, CacheStatus, CapturedResponse, FetchRequest, RequestKey, Upstream, UpstreamResult,
};
use tracing::{debug, info, warn};

use crate::{LifecycleState, TrustedOrigin};

/// Response handed back to the dispatcher together with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    response: CapturedResponse,
    status: CacheStatus,
}

impl FetchOutcome {
    fn new(response: CapturedResponse, status: CacheStatus) -> Self {
        FetchOutcome { response, status }
    }

    /// The response for the caller.
    pub fn response(&self) -> &CapturedResponse {
        &self.response
    }

    /// Whether the response came from the store.
    pub fn status(&self) -> CacheStatus {
        self.status
    }

    /// Takes the response out of the outcome.
    pub fn into_response(self) -> CapturedResponse {
        self.response
    }
}

/// An installed, active proxy version.
///
/// The proxy owns its store and its upstream; concurrent fetches only share
/// the store, where the last writer for a request identity wins.
pub struct CacheProxy<B, U> {
    storage: CacheStorage<B>,
    upstream: U,
    cache_name: CacheName,
    trusted_origin: Option<TrustedOrigin>,
}

impl<B, U> CacheProxy<B, U>
where
    B: Backend,
    U: Upstream<FetchRequest, Response = UpstreamResult<CapturedResponse>>,
{
    pub(crate) fn new(
        storage: CacheStorage<B>,
        upstream: U,
        cache_name: CacheName,
        trusted_origin: Option<TrustedOrigin>,
    ) -> Self {
        CacheProxy {
            storage,
            upstream,
            cache_name,
            trusted_origin,
        }
    }

    /// Always [`LifecycleState::Active`].
    pub fn state(&self) -> LifecycleState {
        LifecycleState::Active
    }

    /// Name of the store this version reads and writes.
    pub fn cache_name(&self) -> &CacheName {
        &self.cache_name
    }

    /// The external origin treated as cors without credentials, if any.
    pub fn trusted_origin(&self) -> Option<&TrustedOrigin> {
        self.trusted_origin.as_ref()
    }

    /// The store owner, for inspection.
    pub fn storage(&self) -> &CacheStorage<B> {
        &self.storage
    }

    /// Answers `request` from the store or, on a miss, from the network.
    ///
    /// A successful network response is stored under the request identity
    /// before it is returned. Non-success responses and network errors reach
    /// the caller unchanged and leave the store alone.
    pub async fn fetch(&self, request: FetchRequest) -> UpstreamResult<FetchOutcome> {
        let request = match &self.trusted_origin {
            Some(origin) => origin.apply(request),
            None => request,
        };
        let cacheable = is_cacheable(request.method());
        let key = request.key();

        if cacheable && let Some(response) = self.lookup(&key).await {
            debug!(%key, "cache hit");
            return Ok(FetchOutcome::new(response, CacheStatus::Hit));
        }

        debug!(%key, mode = request.mode().as_str(), "cache miss, fetching from network");
        let response = self.upstream.call(request).await?;

        if cacheable && response.is_success() {
            self.store(&key, &response).await;
        } else {
            debug!(%key, status = %response.status(), "response not stored");
        }
        Ok(FetchOutcome::new(response, CacheStatus::Miss))
    }

    /// Looks `key` up in the current store. Backend failures count as a miss.
    pub async fn lookup(&self, key: &RequestKey) -> Option<CapturedResponse> {
        match self.read_entry(key).await {
            Ok(found) => found,
            Err(error) => {
                warn!(%key, %error, "cache lookup failed");
                None
            }
        }
    }

    /// Deletes every store whose name is not the current one.
    ///
    /// Returns the names that were actually deleted.
    pub async fn purge_stale(&self) -> BackendResult<Vec<CacheName>> {
        let mut purged = Vec::new();
        for name in self.storage.keys().await? {
            if name == self.cache_name {
                continue;
            }
            if let DeleteStatus::Deleted(_) = self.storage.delete(&name).await? {
                info!(store = %name, "stale store deleted");
                purged.push(name);
            }
        }
        Ok(purged)
    }

    async fn store(&self, key: &RequestKey, response: &CapturedResponse) {
        match self.write_entry(key, response).await {
            Ok(()) => debug!(%key, "response stored"),
            Err(error) => warn!(%key, %error, "failed to store response"),
        }
    }
}

impl<B, U> CacheProxy<B, U>
where
    B: Backend,
{
    async fn read_entry(&self, key: &RequestKey) -> BackendResult<Option<CapturedResponse>> {
        let store = self.storage.open(&self.cache_name).await?;
        store.get(key).await
    }

    async fn write_entry(&self, key: &RequestKey, response: &CapturedResponse) -> BackendResult<()> {
        let store = self.storage.open(&self.cache_name).await?;
        store.put(key, response).await
    }
}

// Only GET responses are kept: other methods are not safe to replay.
fn is_cacheable(method: &Method) -> bool {
    method == Method::GET
}
