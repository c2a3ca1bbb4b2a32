//! Captured server replies.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};

/// An immutable snapshot of a server reply.
///
/// The body is fully buffered, so a clone shares the same bytes. The proxy
/// returns one copy to the caller and persists the other.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CapturedResponse {
    #[serde(with = "http_serde::status_code")]
    status: StatusCode,
    #[serde(with = "header_pairs")]
    headers: HeaderMap,
    body: Bytes,
}

impl CapturedResponse {
    /// Creates a response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        CapturedResponse {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Response status.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Buffered response body.
    #[inline]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Whether the status is in the 200-299 range.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Splits the response into its owned parts.
    pub fn into_parts(self) -> (StatusCode, HeaderMap, Bytes) {
        (self.status, self.headers, self.body)
    }
}

// Headers travel as ordered (name, value) pairs so that non self-describing
// formats such as bincode can read them back.
mod header_pairs {
    use http::header::{HeaderMap, HeaderName, HeaderValue};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(headers: &HeaderMap, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let pairs: Vec<(&str, &[u8])> = headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_bytes()))
            .collect();
        pairs.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<HeaderMap, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pairs = Vec::<(String, Vec<u8>)>::deserialize(deserializer)?;
        let mut headers = HeaderMap::with_capacity(pairs.len());
        for (name, value) in pairs {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(serde::de::Error::custom)?;
            let value = HeaderValue::from_bytes(&value).map_err(serde::de::Error::custom)?;
            headers.append(name, value);
        }
        Ok(headers)
    }
}
