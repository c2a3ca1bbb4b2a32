#![warn(missing_docs)]
//! # offcache-core
//!
//! Core types shared by every offcache crate.
//!
//! The offline cache proxy sits between a web client and the network. It
//! answers requests from a versioned cache store when it can and populates
//! that store from live responses when it cannot. This crate holds the
//! vocabulary the rest of the workspace speaks:
//!
//! - **Identify** a cached entry ([`RequestKey`])
//! - **Name** a versioned store ([`CacheName`])
//! - **Describe** what the client asked for ([`FetchRequest`])
//! - **Capture** what the server answered ([`CapturedResponse`])
//! - **Call** the network ([`Upstream`])
//! - **Report** where a response came from ([`CacheStatus`])

pub mod key;
pub mod name;
pub mod request;
pub mod response;
pub mod status;
pub mod upstream;

pub use key::RequestKey;
pub use name::CacheName;
pub use request::{Credentials, FetchRequest, RequestMode};
pub use response::CapturedResponse;
#[doc(hidden)]
pub use smol_str::SmolStr;
pub use status::{CACHE_STATUS_HEADER, CacheStatus};
pub use upstream::{Upstream, UpstreamError, UpstreamResult};

/// Raw byte data type used for serialized cache values.
/// Using `Bytes` provides efficient zero-copy cloning via reference counting.
pub type Raw = bytes::Bytes;
