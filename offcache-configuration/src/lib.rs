//! YAML configuration for the offcache proxy.
//!
//! A [`ProxyConfig`] names the store version, the scope, the seed manifest
//! and the backend. It validates every URL before anything is built.
//!
//! ```
//! use offcache_configuration::ProxyConfig;
//!
//! let config = ProxyConfig::from_yaml(r#"
//! cache:
//!   product: portfolio
//!   version: v1
//! scope: https://example.com
//! manifest: [/, /index.html]
//! "#).unwrap();
//!
//! assert_eq!(config.cache_name().as_str(), "portfolio-v1");
//! ```

pub mod backend;
mod error;
mod proxy;

pub use backend::{Backend, Moka, ValueSerialization};
pub use error::ConfigError;
pub use proxy::{Activation, CacheVersion, ProxyConfig, ServerConfig};
