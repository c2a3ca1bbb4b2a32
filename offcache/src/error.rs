use http::StatusCode;
use offcache_backend::BackendError;
use offcache_core::UpstreamError;
use thiserror::Error;

/// Reasons an installation does not reach the active state.
#[derive(Debug, Error)]
pub enum InstallError {
    /// A manifest entry could not be resolved against the scope.
    #[error("invalid seed path {path:?}: {source}")]
    InvalidSeed {
        /// Manifest entry as written.
        path: String,
        /// Resolution failure.
        #[source]
        source: url::ParseError,
    },
    /// The network failed while fetching a seed.
    #[error("failed to fetch seed {url}")]
    Seed {
        /// Seed URL.
        url: String,
        /// Network failure.
        #[source]
        source: UpstreamError,
    },
    /// A seed answered with a non-success status.
    #[error("seed {url} answered with status {status}")]
    Status {
        /// Seed URL.
        url: String,
        /// Status returned by the server.
        status: StatusCode,
    },
    /// The cache store rejected the seeded entries.
    #[error(transparent)]
    Backend(#[from] BackendError),
}
