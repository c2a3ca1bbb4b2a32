//! Builder for configuring [`MokaBackend`].

use std::sync::Arc;

use dashmap::DashMap;
use offcache_backend::format::{Format, JsonFormat};
use smol_str::SmolStr;

use crate::backend::MokaBackend;

const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Builder for creating and configuring a [`MokaBackend`].
///
/// Use [`MokaBackend::builder`] to create a new builder instance.
///
/// # Examples
///
/// ```
/// use offcache_backend::format::BincodeFormat;
/// use offcache_moka::MokaBackend;
///
/// let backend = MokaBackend::builder()
///     .max_entries(500)
///     .value_format(BincodeFormat)
///     .label("assets")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct MokaBackendBuilder<S = JsonFormat>
where
    S: Format,
{
    max_entries: u64,
    serializer: S,
    label: SmolStr,
}

impl Default for MokaBackendBuilder<JsonFormat> {
    fn default() -> Self {
        MokaBackendBuilder {
            max_entries: DEFAULT_MAX_ENTRIES,
            serializer: JsonFormat,
            label: SmolStr::new_static("moka"),
        }
    }
}

impl<S> MokaBackendBuilder<S>
where
    S: Format,
{
    /// Limits every store to `max_entries` entries.
    pub fn max_entries(mut self, max_entries: u64) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Sets the serialization format for stored responses.
    pub fn value_format<NewS>(self, serializer: NewS) -> MokaBackendBuilder<NewS>
    where
        NewS: Format,
    {
        MokaBackendBuilder {
            max_entries: self.max_entries,
            serializer,
            label: self.label,
        }
    }

    /// Sets the label used in log output.
    pub fn label(mut self, label: impl Into<SmolStr>) -> Self {
        self.label = label.into();
        self
    }

    /// Builds the backend with no stores.
    pub fn build(self) -> MokaBackend<S> {
        MokaBackend {
            stores: Arc::new(DashMap::new()),
            max_entries: self.max_entries,
            serializer: self.serializer,
            label: self.label,
        }
    }
}
