//! In-memory store backend for offcache powered by Moka.
//!
//! Every named store is its own Moka cache, so deleting a store drops all of
//! its entries at once and the capacity limit applies per store.
//!
//! ```
//! use offcache_moka::MokaBackend;
//!
//! let backend = MokaBackend::builder().max_entries(1_000).build();
//! ```
#![warn(missing_docs)]

mod backend;
mod builder;

pub use backend::MokaBackend;
pub use builder::MokaBackendBuilder;
