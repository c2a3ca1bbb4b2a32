use std::sync::Arc;

use offcache_backend::Backend as BackendTrait;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::ValueSerialization;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Moka {
    /// Entry limit per store.
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
    #[serde(default)]
    pub format: ValueSerialization,
    /// Optional label for this backend (used in tracing).
    #[serde(default)]
    pub label: Option<String>,
}

fn default_max_entries() -> u64 {
    10_000
}

impl Default for Moka {
    fn default() -> Self {
        Moka {
            max_entries: default_max_entries(),
            format: ValueSerialization::default(),
            label: None,
        }
    }
}

impl Moka {
    #[cfg(feature = "moka")]
    pub fn into_backend(self) -> Result<Arc<dyn BackendTrait + Send + 'static>, ConfigError> {
        use offcache_moka::MokaBackend;

        let mut builder = MokaBackend::builder()
            .max_entries(self.max_entries)
            .value_format(self.format.to_serializer());

        if let Some(label) = self.label {
            builder = builder.label(label);
        }

        Ok(Arc::new(builder.build()))
    }

    #[cfg(not(feature = "moka"))]
    pub fn into_backend(self) -> Result<Arc<dyn BackendTrait + Send + 'static>, ConfigError> {
        Err(ConfigError::BackendNotAvailable("Moka".to_string()))
    }
}
