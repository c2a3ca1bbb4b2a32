//! Store backend selection.

use std::sync::Arc;

use offcache_backend::Backend as BackendTrait;
use offcache_backend::format::{BincodeFormat, Format, JsonFormat};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

mod moka;

pub use moka::Moka;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Backend {
    Moka(Moka),
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Moka(Moka::default())
    }
}

impl Backend {
    pub fn into_backend(self) -> Result<Arc<dyn BackendTrait + Send + 'static>, ConfigError> {
        match self {
            Backend::Moka(config) => config.into_backend(),
        }
    }
}

/// Serialization of stored responses.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
pub enum ValueSerialization {
    #[default]
    Json,
    Bincode,
}

impl ValueSerialization {
    pub fn to_serializer(&self) -> Box<dyn Format> {
        match self {
            ValueSerialization::Json => Box::new(JsonFormat),
            ValueSerialization::Bincode => Box::new(BincodeFormat),
        }
    }
}
