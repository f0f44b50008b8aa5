// ── Device element mapping documents ──

use tracing::trace;

use super::DocumentConverter;
use crate::document::Document;
use crate::error::DecodeError;
use crate::model::DeviceElementMapping;

/// Keys of an element-mapping sub-document.
pub mod keys {
    pub const SCHEMA_PATH: &str = "sp";
    pub const HARDWARE_ID: &str = "hw";

    pub const ALL: &[&str] = &[SCHEMA_PATH, HARDWARE_ID];
}

/// Converts a [`DeviceElementMapping`] to and from its sub-document.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementMappingMapper;

impl DocumentConverter for ElementMappingMapper {
    type Entity = DeviceElementMapping;

    fn to_document(&self, source: &DeviceElementMapping) -> Document {
        let mut doc = Document::new();
        doc.append(keys::SCHEMA_PATH, source.device_element_schema_path.clone())
            .append(keys::HARDWARE_ID, source.hardware_id.clone());
        doc
    }

    fn from_document(&self, source: &Document) -> Result<DeviceElementMapping, DecodeError> {
        let mapping = DeviceElementMapping {
            device_element_schema_path: source.get_str(keys::SCHEMA_PATH)?.map(str::to_owned),
            hardware_id: source.get_str(keys::HARDWARE_ID)?.map(str::to_owned),
        };
        trace!(path = ?mapping.device_element_schema_path, "decoded element mapping");
        Ok(mapping)
    }
}
