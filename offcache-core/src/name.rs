//! Versioned cache store names.
//!
//! A store name combines a product identifier with a version string,
//! `{product}-{version}`. Changing the version yields a different name, so
//! lookups stop seeing entries written under the old one.
//!
//! ```
//! use offcache_core::CacheName;
//!
//! let name = CacheName::versioned("portfolio", "v2");
//! assert_eq!(name.as_str(), "portfolio-v2");
//! assert_ne!(name, CacheName::versioned("portfolio", "v1"));
//! ```

use smol_str::{SmolStr, format_smolstr};
use std::fmt;

/// Name of a cache store.
///
/// Names enumerated back from a backend may belong to any product or version,
/// so [`CacheName::new`] accepts an arbitrary string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CacheName(SmolStr);

impl CacheName {
    /// Wraps an existing store name.
    pub fn new(name: impl AsRef<str>) -> Self {
        CacheName(SmolStr::new(name))
    }

    /// Builds the name of `product` at `version`.
    pub fn versioned(product: &str, version: &str) -> Self {
        CacheName(format_smolstr!("{product}-{version}"))
    }

    /// Returns the name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheName {
    fn from(value: &str) -> Self {
        CacheName::new(value)
    }
}
