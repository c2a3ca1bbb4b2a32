use thiserror::Error;

/// Errors raised while loading or applying a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(String),
    #[error("invalid url for {field}: {value:?}: {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid listen address {0:?}")]
    InvalidListen(String),
    #[error("backend not available: {0}")]
    BackendNotAvailable(String),
}
