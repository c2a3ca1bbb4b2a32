#![warn(missing_docs)]
//! # offcache
//!
//! An offline cache proxy for web clients.
//!
//! The proxy has two lifecycle states:
//!
//! - **Installing** ([`Installer`]): every URL of a fixed seed manifest is
//!   fetched and stored in a cache store named after the current version.
//!   If any seed fails, installation fails and no proxy is produced.
//! - **Active** ([`CacheProxy`], from [`Installed::activate`]): every
//!   request is answered from the store when possible. On a miss the network
//!   is consulted and successful responses are stored under the request
//!   identity.
//!
//! On activation, stores left behind by earlier versions are deleted.
//!
//! ```ignore
//! use offcache::{Installer, SeedManifest};
//! use offcache_core::{CacheName, FetchRequest};
//!
//! let proxy = Installer::builder(CacheName::versioned("portfolio", "v1"), scope)
//!     .backend(backend)
//!     .upstream(upstream)
//!     .manifest(SeedManifest::new(["/", "/index.html"]))
//!     .build()
//!     .install()
//!     .await?
//!     .activate()
//!     .await;
//!
//! let outcome = proxy.fetch(FetchRequest::get(url)).await?;
//! println!("{} ({})", outcome.response().status(), outcome.status().as_str());
//! ```

mod error;
mod lifecycle;
mod manifest;
mod origin;
mod proxy;

pub use error::InstallError;
pub use lifecycle::{Installed, Installer, InstallerBuilder, LifecycleState, NotSet};
pub use manifest::SeedManifest;
pub use origin::TrustedOrigin;
pub use proxy::{CacheProxy, FetchOutcome};

pub use offcache_backend::{Backend, CacheStorage};
pub use offcache_core::{
    CACHE_STATUS_HEADER, CacheName, CacheStatus, CapturedResponse, Credentials, FetchRequest,
    RequestKey, RequestMode, Upstream, UpstreamError, UpstreamResult,
};
