//! Shared fixtures: a scripted upstream that records every call.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::{HeaderMap, StatusCode};
use offcache::{
    Backend, CacheName, CapturedResponse, FetchRequest, RequestKey, Upstream, UpstreamError,
    UpstreamResult,
};
use offcache_backend::format::Format;
use offcache_backend::{BackendError, BackendResult, DeleteStatus};
use offcache_core::Raw;
use offcache_moka::MokaBackend;
use url::Url;

pub const SCOPE: &str = "https://example.com/";

pub fn scope() -> Url {
    Url::parse(SCOPE).unwrap()
}

pub fn url(path: &str) -> Url {
    scope().join(path).unwrap()
}

#[derive(Debug, Clone)]
enum Reply {
    Respond(StatusCode, &'static str),
    Fail,
}

/// Upstream answering from a route table; unknown URLs get `404`.
#[derive(Debug, Clone, Default)]
pub struct MockUpstream {
    routes: Arc<Mutex<HashMap<String, Reply>>>,
    calls: Arc<Mutex<Vec<FetchRequest>>>,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, url: &Url, status: StatusCode, body: &'static str) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Reply::Respond(status, body));
        self
    }

    pub fn fail(self, url: &Url) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Reply::Fail);
        self
    }

    pub fn calls(&self) -> Vec<FetchRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, url: &Url) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|req| req.url() == url)
            .count()
    }
}

impl Upstream<FetchRequest> for MockUpstream {
    type Response = UpstreamResult<CapturedResponse>;
    type Future = std::future::Ready<Self::Response>;

    fn call(&self, req: FetchRequest) -> Self::Future {
        let reply = self
            .routes
            .lock()
            .unwrap()
            .get(req.url().as_str())
            .cloned()
            .unwrap_or(Reply::Respond(StatusCode::NOT_FOUND, "not found"));
        let url = req.url().to_string();
        self.calls.lock().unwrap().push(req);

        std::future::ready(match reply {
            Reply::Respond(status, body) => Ok(CapturedResponse::new(status, HeaderMap::new(), body)),
            Reply::Fail => Err(UpstreamError::Network {
                url,
                source: "connection refused".into(),
            }),
        })
    }
}

/// Moka backend whose writes start failing once a write budget is spent.
#[derive(Clone)]
pub struct FlakyBackend {
    inner: MokaBackend,
    writes_left: Arc<AtomicUsize>,
}

impl FlakyBackend {
    pub fn new(writes_allowed: usize) -> Self {
        FlakyBackend {
            inner: MokaBackend::builder().build(),
            writes_left: Arc::new(AtomicUsize::new(writes_allowed)),
        }
    }

    pub fn inner(&self) -> &MokaBackend {
        &self.inner
    }

    fn take_write(&self) -> BackendResult<()> {
        self.writes_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .map(|_| ())
            .map_err(|_| BackendError::ConnectionError("store is read-only".into()))
    }
}

#[async_trait]
impl Backend for FlakyBackend {
    async fn open_store(&self, store: &CacheName) -> BackendResult<()> {
        self.inner.open_store(store).await
    }

    async fn has_store(&self, store: &CacheName) -> BackendResult<bool> {
        self.inner.has_store(store).await
    }

    async fn store_names(&self) -> BackendResult<Vec<CacheName>> {
        self.inner.store_names().await
    }

    async fn delete_store(&self, store: &CacheName) -> BackendResult<DeleteStatus> {
        self.inner.delete_store(store).await
    }

    async fn read(&self, store: &CacheName, key: &RequestKey) -> BackendResult<Option<Raw>> {
        self.inner.read(store, key).await
    }

    async fn write(&self, store: &CacheName, key: &RequestKey, value: Raw) -> BackendResult<()> {
        self.take_write()?;
        self.inner.write(store, key, value).await
    }

    async fn write_pinned(
        &self,
        store: &CacheName,
        key: &RequestKey,
        value: Raw,
    ) -> BackendResult<()> {
        self.take_write()?;
        self.inner.write_pinned(store, key, value).await
    }

    async fn remove(&self, store: &CacheName, key: &RequestKey) -> BackendResult<DeleteStatus> {
        self.inner.remove(store, key).await
    }

    fn name(&self) -> &str {
        "flaky"
    }

    fn value_format(&self) -> &dyn Format {
        self.inner.value_format()
    }
}
