use bytes::Bytes;
use offcache_core::{CapturedResponse, Raw};

use super::{Format, FormatError, FormatTypeId};

/// Bincode format
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeFormat;

impl Format for BincodeFormat {
    fn serialize(&self, value: &CapturedResponse) -> Result<Raw, FormatError> {
        ::bincode::serde::encode_to_vec(value, ::bincode::config::standard())
            .map(Bytes::from)
            .map_err(|e| FormatError::Serialize(Box::new(e)))
    }

    fn deserialize(&self, data: &[u8]) -> Result<CapturedResponse, FormatError> {
        ::bincode::serde::decode_from_slice(data, ::bincode::config::standard())
            .map(|(value, _read)| value)
            .map_err(|e| FormatError::Deserialize(Box::new(e)))
    }

    fn clone_box(&self) -> Box<dyn Format> {
        Box::new(*self)
    }

    fn format_type_id(&self) -> FormatTypeId {
        FormatTypeId::Bincode
    }
}
