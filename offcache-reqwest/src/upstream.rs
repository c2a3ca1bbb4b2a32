//! Upstream that sends fetch requests with a reqwest client.

use std::future::Future;
use std::pin::Pin;

use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use offcache_core::{
    CapturedResponse, Credentials, FetchRequest, RequestMode, Upstream, UpstreamError,
    UpstreamResult,
};
use tracing::{debug, trace};
use url::Url;

const SEC_FETCH_MODE: HeaderName = HeaderName::from_static("sec-fetch-mode");

const CREDENTIAL_HEADERS: [HeaderName; 3] = [
    header::COOKIE,
    header::AUTHORIZATION,
    header::PROXY_AUTHORIZATION,
];

/// Upstream that performs real network calls.
///
/// Cloning is cheap: the inner [`reqwest::Client`] is reference counted and
/// its connection pool is shared between clones.
#[derive(Debug, Clone)]
pub struct ReqwestUpstream {
    client: reqwest::Client,
    client_origin: Option<Url>,
}

impl ReqwestUpstream {
    /// Creates an upstream without a client origin.
    ///
    /// Without an origin every target counts as same-origin, so
    /// [`Credentials::SameOrigin`] never strips anything and cors requests
    /// carry no `Origin` header.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            client_origin: None,
        }
    }

    /// Sets the origin the proxied client lives on.
    pub fn client_origin(mut self, origin: Url) -> Self {
        self.client_origin = Some(origin);
        self
    }

    fn is_same_origin(&self, url: &Url) -> bool {
        match &self.client_origin {
            Some(origin) => origin.origin() == url.origin(),
            None => true,
        }
    }

    /// Adjusts outgoing headers to the request and credentials modes.
    fn outgoing_headers(&self, request: &FetchRequest) -> HeaderMap {
        let mut headers = request.headers().clone();

        let send_credentials = match request.credentials() {
            Credentials::Omit => false,
            Credentials::SameOrigin => self.is_same_origin(request.url()),
            Credentials::Include => true,
        };
        if !send_credentials {
            for name in &CREDENTIAL_HEADERS {
                headers.remove(name);
            }
        }

        if request.mode() == RequestMode::Cors
            && let Some(origin) = &self.client_origin
            && let Ok(value) = HeaderValue::from_str(&origin.origin().ascii_serialization())
        {
            headers.insert(header::ORIGIN, value);
        }
        headers.insert(
            SEC_FETCH_MODE,
            HeaderValue::from_static(request.mode().as_str()),
        );
        headers
    }
}

impl Upstream<FetchRequest> for ReqwestUpstream {
    type Response = UpstreamResult<CapturedResponse>;
    type Future = Pin<Box<dyn Future<Output = Self::Response> + Send + 'static>>;

    fn call(&self, req: FetchRequest) -> Self::Future {
        let headers = self.outgoing_headers(&req);
        let client = self.client.clone();

        Box::pin(async move {
            let (method, url, _, body) = req.into_parts();
            let target = url.to_string();
            trace!(%method, url = %target, "sending request");

            let response = client
                .request(method, url)
                .headers(headers)
                .body(body)
                .send()
                .await
                .map_err(|source| network_error(&target, source))?;

            let status = response.status();
            let headers = response.headers().clone();
            let body = response
                .bytes()
                .await
                .map_err(|source| network_error(&target, source))?;

            debug!(url = %target, %status, size = body.len(), "response received");
            Ok(CapturedResponse::new(status, headers, body))
        })
    }
}

fn network_error(url: &str, source: reqwest::Error) -> UpstreamError {
    UpstreamError::Network {
        url: url.to_owned(),
        source: Box::new(source),
    }
}
