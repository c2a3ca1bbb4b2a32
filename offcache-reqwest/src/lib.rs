//! Network upstream for offcache backed by [`reqwest`].
//!
//! [`ReqwestUpstream`] turns a [`FetchRequest`](offcache_core::FetchRequest)
//! into a real HTTP call. The request mode and credentials mode decide which
//! headers leave the process; the response body is buffered in full so it can
//! be stored and replayed.
//!
//! ```no_run
//! use offcache_reqwest::ReqwestUpstream;
//! use url::Url;
//!
//! let origin = Url::parse("https://example.com/").unwrap();
//! let upstream = ReqwestUpstream::new(reqwest::Client::new()).client_origin(origin);
//! ```

mod upstream;

pub use upstream::ReqwestUpstream;

/// Re-export of the client type for convenience in type annotations.
pub use reqwest::Client as ReqwestClient;
