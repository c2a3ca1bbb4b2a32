use offcache_core::{Credentials, FetchRequest, RequestMode};
use url::Url;

/// External origin whose requests always go out in cors mode without
/// credentials.
///
/// Matching is a plain prefix test on the serialized URL, so the prefix
/// should end with `/` to avoid matching sibling hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedOrigin {
    prefix: String,
}

impl TrustedOrigin {
    /// Creates a matcher for URLs starting with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        TrustedOrigin {
            prefix: prefix.into(),
        }
    }

    /// The configured URL prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether `url` belongs to this origin.
    pub fn matches(&self, url: &Url) -> bool {
        url.as_str().starts_with(&self.prefix)
    }

    /// Forces cors mode and omitted credentials on matching requests and
    /// leaves every other request untouched.
    pub fn apply(&self, request: FetchRequest) -> FetchRequest {
        if self.matches(request.url()) {
            request
                .with_mode(RequestMode::Cors)
                .with_credentials(Credentials::Omit)
        } else {
            request
        }
    }
}
