//! Top-level proxy configuration.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use offcache::{
    CacheName, CapturedResponse, FetchRequest, Installer, SeedManifest, TrustedOrigin, Upstream,
    UpstreamResult,
};
use offcache_backend::Backend as BackendTrait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::backend::Backend;
use crate::error::ConfigError;

/// Product and version that make up the store name.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct CacheVersion {
    pub product: String,
    pub version: String,
}

/// What happens when a freshly installed version takes over.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Activation {
    /// Delete stores left behind by other versions.
    #[serde(default = "default_purge_stale")]
    pub purge_stale: bool,
}

fn default_purge_stale() -> bool {
    true
}

impl Default for Activation {
    fn default() -> Self {
        Activation {
            purge_stale: default_purge_stale(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket the front listens on. The proxy only forwards to the scope
    /// origin and the trusted origin, but it performs no client
    /// authentication, so keep it on a loopback or private address.
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen: default_listen(),
        }
    }
}

impl ServerConfig {
    /// Parses the listen address.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen
            .parse()
            .map_err(|_| ConfigError::InvalidListen(self.listen.clone()))
    }
}

/// The whole proxy configuration document.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProxyConfig {
    pub cache: CacheVersion,
    /// Origin of the proxied client. Seed paths resolve against it.
    pub scope: String,
    #[serde(default)]
    pub trusted_origin: Option<String>,
    #[serde(default)]
    pub manifest: Vec<String>,
    #[serde(default)]
    pub activation: Activation,
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub server: ServerConfig,
}

impl ProxyConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: ProxyConfig =
            serde_saphyr::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&yaml)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let scope = self.scope_url()?;
        for path in &self.manifest {
            scope.join(path).map_err(|source| ConfigError::InvalidUrl {
                field: "manifest",
                value: path.clone(),
                source,
            })?;
        }
        if let Some(origin) = &self.trusted_origin {
            Url::parse(origin).map_err(|source| ConfigError::InvalidUrl {
                field: "trusted_origin",
                value: origin.clone(),
                source,
            })?;
        }
        self.server.listen_addr()?;
        Ok(())
    }

    /// The scope as a URL.
    pub fn scope_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.scope).map_err(|source| ConfigError::InvalidUrl {
            field: "scope",
            value: self.scope.clone(),
            source,
        })
    }

    /// `{product}-{version}`.
    pub fn cache_name(&self) -> CacheName {
        CacheName::versioned(&self.cache.product, &self.cache.version)
    }

    /// Builds the configured backend.
    pub fn into_backend(self) -> Result<Arc<dyn BackendTrait + Send + 'static>, ConfigError> {
        self.backend.into_backend()
    }

    /// Builds an installer for this version around `upstream`.
    pub fn into_installer<U>(
        self,
        upstream: U,
    ) -> Result<Installer<Arc<dyn BackendTrait + Send + 'static>, U>, ConfigError>
    where
        U: Upstream<FetchRequest, Response = UpstreamResult<CapturedResponse>>,
    {
        let cache_name = self.cache_name();
        let scope = self.scope_url()?;
        let mut builder = Installer::builder(cache_name, scope)
            .backend(self.backend.into_backend()?)
            .upstream(upstream)
            .manifest(SeedManifest::new(self.manifest))
            .purge_stale(self.activation.purge_stale);

        if let Some(origin) = self.trusted_origin {
            builder = builder.trusted_origin(TrustedOrigin::new(origin));
        }
        Ok(builder.build())
    }
}
