use bytes::Bytes;
use offcache_core::{CapturedResponse, Raw};

use super::{Format, FormatError, FormatTypeId};

/// JSON format (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl Format for JsonFormat {
    fn serialize(&self, value: &CapturedResponse) -> Result<Raw, FormatError> {
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|e| FormatError::Serialize(Box::new(e)))
    }

    fn deserialize(&self, data: &[u8]) -> Result<CapturedResponse, FormatError> {
        serde_json::from_slice(data).map_err(|e| FormatError::Deserialize(Box::new(e)))
    }

    fn clone_box(&self) -> Box<dyn Format> {
        Box::new(*self)
    }

    fn format_type_id(&self) -> FormatTypeId {
        FormatTypeId::Json
    }
}
