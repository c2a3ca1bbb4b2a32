//! Outgoing fetch requests.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use url::Url;

use crate::RequestKey;

/// How the request may cross origins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    /// Top-level navigation by the client.
    Navigate,
    /// Only same-origin targets are allowed.
    SameOrigin,
    /// Cross-origin request whose response may not be inspected.
    #[default]
    NoCors,
    /// Cross-origin request announced with an `Origin` header.
    Cors,
}

impl RequestMode {
    /// Parses a `Sec-Fetch-Mode` header value.
    pub fn from_fetch_mode(value: &str) -> Option<Self> {
        match value {
            "navigate" => Some(RequestMode::Navigate),
            "same-origin" => Some(RequestMode::SameOrigin),
            "no-cors" => Some(RequestMode::NoCors),
            "cors" => Some(RequestMode::Cors),
            _ => None,
        }
    }

    /// Returns the mode as a `Sec-Fetch-Mode` header value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RequestMode::Navigate => "navigate",
            RequestMode::SameOrigin => "same-origin",
            RequestMode::NoCors => "no-cors",
            RequestMode::Cors => "cors",
        }
    }
}

/// Whether cookies and authorization travel with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Credentials {
    /// Never send credentials.
    Omit,
    /// Send credentials only to the client's own origin.
    #[default]
    SameOrigin,
    /// Always send credentials.
    Include,
}

/// An immutable description of a resource the client wants.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Bytes,
    mode: RequestMode,
    credentials: Credentials,
}

impl FetchRequest {
    /// Creates a request with default mode and credentials.
    pub fn new(method: Method, url: Url) -> Self {
        FetchRequest {
            method,
            url,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            mode: RequestMode::default(),
            credentials: Credentials::default(),
        }
    }

    /// Shorthand for a `GET` request.
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Replaces all request headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Appends a single header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the request mode.
    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the credentials policy.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Request method.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Absolute target URL.
    #[inline]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Request headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Request body, empty for most fetches.
    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Cross-origin mode.
    #[inline]
    pub fn mode(&self) -> RequestMode {
        self.mode
    }

    /// Credentials policy.
    #[inline]
    pub fn credentials(&self) -> Credentials {
        self.credentials
    }

    /// Identity of this request inside a cache store.
    pub fn key(&self) -> RequestKey {
        RequestKey::new(&self.method, &self.url)
    }

    /// Splits the request into its owned parts.
    pub fn into_parts(self) -> (Method, Url, HeaderMap, Bytes) {
        (self.method, self.url, self.headers, self.body)
    }
}
