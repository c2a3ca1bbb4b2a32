//! Translation between hyper messages and proxy fetches.

use std::fmt::Display;

use bytes::Bytes;
use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::{Request, Response, StatusCode};
use http_body::Body;
use http_body_util::{BodyExt, Full};
use offcache::{
    Backend, CACHE_STATUS_HEADER, CacheProxy, CapturedResponse, FetchOutcome, FetchRequest,
    RequestMode, TrustedOrigin, Upstream, UpstreamResult,
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

const SEC_FETCH_MODE: &str = "sec-fetch-mode";

// Connection-scoped headers never cross the proxy.
const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::PROXY_AUTHENTICATE,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("cannot resolve request target {target:?}: {source}")]
    InvalidTarget {
        target: String,
        #[source]
        source: url::ParseError,
    },
    #[error("target {0} is outside the proxied origins")]
    ForeignTarget(Url),
    #[error("failed to read request body: {0}")]
    Body(String),
}

impl DispatchError {
    fn status(&self) -> StatusCode {
        match self {
            DispatchError::ForeignTarget(_) => StatusCode::FORBIDDEN,
            DispatchError::InvalidTarget { .. } | DispatchError::Body(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Serves one client request through `proxy`.
///
/// Upstream failures become `502 Bad Gateway`; requests whose target cannot
/// be resolved become `400 Bad Request`, and absolute targets outside the
/// scope origin and the trusted origin become `403 Forbidden`.
pub async fn dispatch<B, U, ReqBody>(
    proxy: &CacheProxy<B, U>,
    scope: &Url,
    request: Request<ReqBody>,
) -> Response<Full<Bytes>>
where
    B: Backend,
    U: Upstream<FetchRequest, Response = UpstreamResult<CapturedResponse>>,
    ReqBody: Body<Data = Bytes>,
    ReqBody::Error: Display,
{
    let fetch = match into_fetch_request(request, scope, proxy.trusted_origin()).await {
        Ok(fetch) => fetch,
        Err(error) => {
            warn!(%error, "rejected request");
            return error_response(error.status(), &error);
        }
    };

    match proxy.fetch(fetch).await {
        Ok(outcome) => into_response(outcome),
        Err(error) => {
            warn!(%error, "upstream failed");
            error_response(StatusCode::BAD_GATEWAY, &error)
        }
    }
}

/// Turns an incoming request into a fetch against the absolute target URL.
///
/// Origin-form targets resolve against `scope`. Absolute-form targets are
/// used as they are, but only on the scope origin or under `trusted`.
pub async fn into_fetch_request<ReqBody>(
    request: Request<ReqBody>,
    scope: &Url,
    trusted: Option<&TrustedOrigin>,
) -> Result<FetchRequest, DispatchError>
where
    ReqBody: Body<Data = Bytes>,
    ReqBody::Error: Display,
{
    let (parts, body) = request.into_parts();
    let url = resolve_target(&parts.uri, scope, trusted)?;
    let body = body
        .collect()
        .await
        .map_err(|e| DispatchError::Body(e.to_string()))?
        .to_bytes();

    let mode = parts
        .headers
        .get(SEC_FETCH_MODE)
        .and_then(|value| value.to_str().ok())
        .and_then(RequestMode::from_fetch_mode)
        .unwrap_or_default();

    let mut headers = parts.headers;
    strip_hop_by_hop(&mut headers);
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);
    headers.remove(SEC_FETCH_MODE);

    debug!(method = %parts.method, %url, mode = mode.as_str(), "dispatching");
    Ok(FetchRequest::new(parts.method, url)
        .with_headers(headers)
        .with_body(body)
        .with_mode(mode))
}

fn resolve_target(
    uri: &http::Uri,
    scope: &Url,
    trusted: Option<&TrustedOrigin>,
) -> Result<Url, DispatchError> {
    let target = if uri.scheme().is_some() && uri.authority().is_some() {
        uri.to_string()
    } else {
        uri.path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/")
            .to_owned()
    };
    let url = scope
        .join(&target)
        .map_err(|source| DispatchError::InvalidTarget { target, source })?;

    let allowed =
        url.origin() == scope.origin() || trusted.is_some_and(|origin| origin.matches(&url));
    if !allowed {
        return Err(DispatchError::ForeignTarget(url));
    }
    Ok(url)
}

/// Builds the client response, tagged with its cache status.
pub fn into_response(outcome: FetchOutcome) -> Response<Full<Bytes>> {
    let status = outcome.status();
    let (code, mut headers, body) = outcome.into_response().into_parts();
    strip_hop_by_hop(&mut headers);
    headers.remove(header::CONTENT_LENGTH);
    headers.insert(
        HeaderName::from_static(CACHE_STATUS_HEADER),
        HeaderValue::from_static(status.as_str()),
    );

    let mut response = Response::new(Full::new(body));
    *response.status_mut() = code;
    *response.headers_mut() = headers;
    response
}

fn error_response(status: StatusCode, error: &dyn Display) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(error.to_string())));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in &HOP_BY_HOP {
        headers.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use std::future::Ready;

    use offcache::{CacheName, Installer, SeedManifest, UpstreamError};
    use offcache_moka::MokaBackend;

    use super::*;

    struct EchoUpstream;

    impl Upstream<FetchRequest> for EchoUpstream {
        type Response = UpstreamResult<CapturedResponse>;
        type Future = Ready<Self::Response>;

        fn call(&self, req: FetchRequest) -> Self::Future {
            if req.url().path() == "/down" {
                return std::future::ready(Err(UpstreamError::Network {
                    url: req.url().to_string(),
                    source: "connection reset".into(),
                }));
            }
            let mut headers = HeaderMap::new();
            headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
            headers.insert("x-path", HeaderValue::from_str(req.url().path()).unwrap());
            std::future::ready(Ok(CapturedResponse::new(
                StatusCode::OK,
                headers,
                req.url().to_string(),
            )))
        }
    }

    fn scope() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    async fn proxy() -> CacheProxy<MokaBackend, EchoUpstream> {
        Installer::builder(CacheName::versioned("site", "v1"), scope())
            .backend(MokaBackend::builder().build())
            .upstream(EchoUpstream)
            .manifest(SeedManifest::new(["/"]))
            .build()
            .install()
            .await
            .unwrap()
            .activate()
            .await
    }

    fn get(uri: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .uri(uri)
            .header(header::HOST, "localhost:8080")
            .header(header::CONNECTION, "keep-alive")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_origin_form_resolves_against_scope() {
        let fetch = into_fetch_request(get("/docs/a.html?x=1"), &scope(), None)
            .await
            .unwrap();

        assert_eq!(fetch.url().as_str(), "https://example.com/docs/a.html?x=1");
        assert!(fetch.headers().get(header::HOST).is_none());
        assert!(fetch.headers().get(header::CONNECTION).is_none());
        assert_eq!(fetch.mode(), RequestMode::NoCors);
    }

    #[tokio::test]
    async fn test_absolute_form_passes_through() {
        let own = into_fetch_request(get("https://example.com/app.js"), &scope(), None)
            .await
            .unwrap();
        assert_eq!(own.url().as_str(), "https://example.com/app.js");

        let cdn = TrustedOrigin::new("https://cdn.example.net/");
        let fetch =
            into_fetch_request(get("https://cdn.example.net/lib.js"), &scope(), Some(&cdn))
                .await
                .unwrap();
        assert_eq!(fetch.url().as_str(), "https://cdn.example.net/lib.js");
    }

    #[tokio::test]
    async fn test_foreign_absolute_target_is_refused() {
        let cdn = TrustedOrigin::new("https://cdn.example.net/");
        for target in ["https://internal.example.org/admin", "http://example.com/"] {
            let error = into_fetch_request(get(target), &scope(), Some(&cdn))
                .await
                .unwrap_err();
            assert!(matches!(error, DispatchError::ForeignTarget(_)), "{target}");
        }
    }

    #[tokio::test]
    async fn test_foreign_target_is_forbidden() {
        let proxy = proxy().await;
        let response = dispatch(&proxy, &scope(), get("https://169.254.169.254/latest")).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get(CACHE_STATUS_HEADER).is_none());
    }

    #[tokio::test]
    async fn test_fetch_mode_header_is_honoured() {
        let request = Request::builder()
            .uri("/")
            .header(SEC_FETCH_MODE, "navigate")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let fetch = into_fetch_request(request, &scope(), None).await.unwrap();
        assert_eq!(fetch.mode(), RequestMode::Navigate);
    }

    #[tokio::test]
    async fn test_cache_status_header_on_miss_then_hit() {
        let proxy = proxy().await;

        let first = dispatch(&proxy, &scope(), get("/page")).await;
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(first.headers().get(CACHE_STATUS_HEADER).unwrap(), "MISS");
        assert!(first.headers().get(header::TRANSFER_ENCODING).is_none());
        assert_eq!(first.headers().get("x-path").unwrap(), "/page");

        let second = dispatch(&proxy, &scope(), get("/page")).await;
        assert_eq!(second.headers().get(CACHE_STATUS_HEADER).unwrap(), "HIT");
        let body = second.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), b"https://example.com/page");
    }

    #[tokio::test]
    async fn test_seeded_root_is_a_hit() {
        let proxy = proxy().await;
        let response = dispatch(&proxy, &scope(), get("/")).await;
        assert_eq!(response.headers().get(CACHE_STATUS_HEADER).unwrap(), "HIT");
    }

    #[tokio::test]
    async fn test_upstream_error_is_bad_gateway() {
        let proxy = proxy().await;
        let response = dispatch(&proxy, &scope(), get("/down")).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(response.headers().get(CACHE_STATUS_HEADER).is_none());
    }
}
