//! Traits and structs for offcache backend interaction.
//!
//! A backend keeps any number of named stores. Each store maps a
//! [`RequestKey`](offcache_core::RequestKey) to the serialized bytes of a
//! [`CapturedResponse`](offcache_core::CapturedResponse). The proxy never
//! talks to a backend directly: it goes through [`CacheStorage`], which
//! hands out a scoped [`CacheStore`] per operation.
//!
//! If you want to implement your own backend, implement [`Backend`].
mod backend;
pub mod error;
pub mod format;
mod storage;

pub use backend::{Backend, BackendResult};
pub use error::BackendError;
pub use storage::{CacheStorage, CacheStore};

/// Status of deleting result.
#[derive(Debug, PartialEq, Eq)]
pub enum DeleteStatus {
    /// Record successfully deleted.
    Deleted(u32),
    /// Record already missing.
    Missing,
}
