//! Value formats for stored responses.
//!
//! A backend stores opaque bytes. The [`Format`] it reports decides how a
//! [`CapturedResponse`] becomes those bytes and back.

use offcache_core::{CapturedResponse, Raw};
use thiserror::Error;

mod bincode;
mod json;

pub use bincode::BincodeFormat;
pub use json::JsonFormat;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error(transparent)]
    Serialize(Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Deserialize(Box<dyn std::error::Error + Send + Sync>),
}

/// Unique identifier for format types, used to compare format equality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTypeId {
    Json,
    Bincode,
    /// For user-defined custom formats. The string should be a unique identifier.
    Custom(&'static str),
}

/// Serialization strategy for stored responses.
pub trait Format: std::fmt::Debug + Send + Sync {
    /// Encodes a response into the bytes a backend stores.
    fn serialize(&self, value: &CapturedResponse) -> Result<Raw, FormatError>;

    /// Decodes stored bytes back into a response.
    fn deserialize(&self, data: &[u8]) -> Result<CapturedResponse, FormatError>;

    fn clone_box(&self) -> Box<dyn Format>;

    fn format_type_id(&self) -> FormatTypeId;
}

impl Format for Box<dyn Format> {
    fn serialize(&self, value: &CapturedResponse) -> Result<Raw, FormatError> {
        (**self).serialize(value)
    }

    fn deserialize(&self, data: &[u8]) -> Result<CapturedResponse, FormatError> {
        (**self).deserialize(data)
    }

    fn clone_box(&self) -> Box<dyn Format> {
        (**self).clone_box()
    }

    fn format_type_id(&self) -> FormatTypeId {
        (**self).format_type_id()
    }
}

impl Clone for Box<dyn Format> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
