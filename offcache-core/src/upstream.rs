use std::future::Future;

use thiserror::Error;

/// Error returned when the network could not produce a response at all.
///
/// A reply with a non-success status is still a response, not an error.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection, TLS or protocol failure.
    #[error("network request to {url} failed: {source}")]
    Network {
        /// Target of the failed request.
        url: String,
        /// Underlying transport error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The request could not be turned into a network call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Result of a single upstream call.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Trait for calling the network with fetch requests.
///
/// Implementations are shared between concurrent fetches, so `call` takes
/// `&self` and the returned future owns everything it needs.
///
/// # Examples
///
/// ```rust,ignore
/// use offcache_core::{CapturedResponse, FetchRequest, Upstream, UpstreamResult};
/// use std::future::Ready;
///
/// struct FixedUpstream {
///     response: CapturedResponse,
/// }
///
/// impl Upstream<FetchRequest> for FixedUpstream {
///     type Response = UpstreamResult<CapturedResponse>;
///     type Future = Ready<Self::Response>;
///
///     fn call(&self, _req: FetchRequest) -> Self::Future {
///         std::future::ready(Ok(self.response.clone()))
///     }
/// }
/// ```
pub trait Upstream<Req> {
    /// The response type returned by the upstream service
    type Response;

    /// The future that resolves to the response
    type Future: Future<Output = Self::Response> + Send;

    /// Call the upstream service with the given request
    fn call(&self, req: Req) -> Self::Future;
}
