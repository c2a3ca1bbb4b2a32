//! Request identity used as the cache key.
//!
//! A cached entry is identified by the request method and the absolute URL
//! the client asked for. Fragments never reach the server, so they are
//! dropped before the key is built:
//!
//! ```
//! use http::Method;
//! use offcache_core::RequestKey;
//! use url::Url;
//!
//! let url = Url::parse("https://example.com/index.html#about").unwrap();
//! let key = RequestKey::new(&Method::GET, &url);
//! assert_eq!(format!("{}", key), "GET https://example.com/index.html");
//! ```
//!
//! [`RequestKey`] wraps its data in an `Arc`, so cloning a key only bumps a
//! reference count.

use http::Method;
use smol_str::SmolStr;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
struct RequestKeyInner {
    method: SmolStr,
    url: String,
}

/// Identity of a request inside a cache store: method + URL.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(from = "RequestKeyInner", into = "RequestKeyInner")]
pub struct RequestKey {
    inner: Arc<RequestKeyInner>,
}

impl PartialEq for RequestKey {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner == other.inner
    }
}

impl Eq for RequestKey {}

impl Hash for RequestKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl From<RequestKeyInner> for RequestKey {
    fn from(inner: RequestKeyInner) -> Self {
        RequestKey {
            inner: Arc::new(inner),
        }
    }
}

impl From<RequestKey> for RequestKeyInner {
    fn from(key: RequestKey) -> Self {
        Arc::try_unwrap(key.inner).unwrap_or_else(|arc| (*arc).clone())
    }
}

impl RequestKey {
    /// Builds the key for `method` on `url`, ignoring any fragment.
    pub fn new(method: &Method, url: &Url) -> Self {
        let mut url = url.clone();
        url.set_fragment(None);
        RequestKeyInner {
            method: SmolStr::new(method.as_str()),
            url: url.into(),
        }
        .into()
    }

    /// Request method part of the key.
    #[inline]
    pub fn method(&self) -> &str {
        &self.inner.method
    }

    /// Absolute URL part of the key.
    #[inline]
    pub fn url(&self) -> &str {
        &self.inner.url
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.inner.method, self.inner.url)
    }
}
