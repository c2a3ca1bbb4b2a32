//! Cache status reporting.

/// Header the dispatcher attaches to every proxied response.
pub const CACHE_STATUS_HEADER: &str = "x-cache-status";

/// Whether a response came from the cache store or from the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheStatus {
    /// A stored response was returned without network access.
    Hit,
    /// No stored response existed and the network was consulted.
    #[default]
    Miss,
}

impl CacheStatus {
    /// Returns the status as a string slice.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}
