// ── Device documents ──
//
// Device fields are stored under short reserved keys. The key strings are
// the storage contract with existing documents and must not change without
// a migration.

use tracing::{Level, debug, trace};

use super::{
    DocumentConverter, ElementMappingMapper, EntityFieldMapper, FieldMapper, MetadataFieldMapper,
};
use crate::document::{Document, Value, ValueKind};
use crate::error::DecodeError;
use crate::model::{Device, DeviceElementMapping};

/// Top-level keys owned by [`DeviceRecordMapper`] itself.
pub mod keys {
    pub const ID: &str = "id";
    pub const HARDWARE_ID: &str = "hw";
    pub const SITE_ID: &str = "si";
    pub const DEVICE_TYPE_ID: &str = "ty";
    pub const PARENT_DEVICE_ID: &str = "pd";
    pub const ELEMENT_MAPPINGS: &str = "em";
    pub const COMMENTS: &str = "cm";
    pub const ASSIGNMENT_ID: &str = "an";

    pub const ALL: &[&str] = &[
        ID,
        HARDWARE_ID,
        SITE_ID,
        DEVICE_TYPE_ID,
        PARENT_DEVICE_ID,
        ELEMENT_MAPPINGS,
        COMMENTS,
        ASSIGNMENT_ID,
    ];
}

/// Converts a [`Device`] to and from its stored document.
///
/// Composes the element-mapping converter for the nested `em` list and the
/// shared audit and metadata field mappers, which append their keys into
/// the same document.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceRecordMapper {
    elements: ElementMappingMapper,
    entity: EntityFieldMapper,
    metadata: MetadataFieldMapper,
}

impl DeviceRecordMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every top-level key written for a device, including those of the
    /// composed field mappers.
    pub fn reserved_keys(&self) -> Vec<&'static str> {
        let mut all = keys::ALL.to_vec();
        all.extend_from_slice(FieldMapper::<Device>::keys(&self.entity));
        all.extend_from_slice(FieldMapper::<Device>::keys(&self.metadata));
        all
    }

    /// Append the device's fields into an existing document.
    pub fn write_into(&self, source: &Device, target: &mut Document) {
        let mappings: Vec<Value> = source
            .device_element_mappings
            .iter()
            .map(|m| Value::Document(self.elements.to_document(m)))
            .collect();

        target
            .append(keys::ID, source.id)
            .append(keys::HARDWARE_ID, source.hardware_id.clone())
            .append(keys::SITE_ID, source.site_id)
            .append(keys::DEVICE_TYPE_ID, source.device_type_id)
            .append(keys::PARENT_DEVICE_ID, source.parent_device_id)
            .append(keys::COMMENTS, source.comments.clone())
            .append(keys::ASSIGNMENT_ID, source.device_assignment_id)
            .append(keys::ELEMENT_MAPPINGS, mappings);

        self.entity.write(source, target);
        self.metadata.write(source, target);
    }

    /// Decode `source` and replace `target` with the result.
    ///
    /// `target` is only overwritten once the whole document has decoded.
    pub fn read_into(&self, source: &Document, target: &mut Device) -> Result<(), DecodeError> {
        *target = self.from_document(source)?;
        Ok(())
    }

    fn read_element_mappings(
        &self,
        source: &Document,
    ) -> Result<Vec<DeviceElementMapping>, DecodeError> {
        let Some(items) = source.get_array(keys::ELEMENT_MAPPINGS)? else {
            return Ok(Vec::new());
        };

        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let sub = item.as_document().ok_or_else(|| {
                    DecodeError::element(
                        keys::ELEMENT_MAPPINGS,
                        index,
                        DecodeError::unexpected(
                            keys::ELEMENT_MAPPINGS,
                            ValueKind::Document,
                            item.kind(),
                        ),
                    )
                })?;
                self.elements
                    .from_document(sub)
                    .map_err(|e| DecodeError::element(keys::ELEMENT_MAPPINGS, index, e))
            })
            .collect()
    }

    fn log_unknown_keys(&self, source: &Document) {
        if !tracing::enabled!(Level::DEBUG) {
            return;
        }
        let reserved = self.reserved_keys();
        let unknown: Vec<&str> = source
            .keys()
            .filter(|k| !reserved.iter().any(|r| r == k))
            .collect();
        if !unknown.is_empty() {
            debug!(?unknown, "ignoring unrecognised device document keys");
        }
    }
}

impl DocumentConverter for DeviceRecordMapper {
    type Entity = Device;

    fn to_document(&self, source: &Device) -> Document {
        let mut doc = Document::new();
        self.write_into(source, &mut doc);
        doc
    }

    fn from_document(&self, source: &Document) -> Result<Device, DecodeError> {
        let mut device = Device {
            id: source.get_uuid(keys::ID)?,
            hardware_id: source.get_str(keys::HARDWARE_ID)?.map(str::to_owned),
            site_id: source.get_uuid(keys::SITE_ID)?,
            device_type_id: source.get_uuid(keys::DEVICE_TYPE_ID)?,
            parent_device_id: source.get_uuid(keys::PARENT_DEVICE_ID)?,
            comments: source.get_str(keys::COMMENTS)?.map(str::to_owned),
            device_assignment_id: source.get_uuid(keys::ASSIGNMENT_ID)?,
            device_element_mappings: self.read_element_mappings(source)?,
            ..Device::default()
        };

        self.entity.read(source, &mut device)?;
        self.metadata.read(source, &mut device)?;

        trace!(
            id = ?device.id,
            hardware_id = ?device.hardware_id,
            mappings = device.device_element_mappings.len(),
            "decoded device document"
        );
        self.log_unknown_keys(source);
        Ok(device)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::convert::element_mapping;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn sample_device() -> Device {
        Device {
            id: Some(Uuid::new_v4()),
            hardware_id: Some("HW-100".into()),
            site_id: Some(Uuid::new_v4()),
            device_type_id: Some(Uuid::new_v4()),
            parent_device_id: None,
            comments: Some("test unit".into()),
            device_assignment_id: None,
            device_element_mappings: vec![DeviceElementMapping::new("slot-1", "HW-200")],
            ..Device::default()
        }
    }

    #[test]
    fn writes_reserved_keys_in_order() {
        let doc = DeviceRecordMapper::new().to_document(&sample_device());
        let top: Vec<&str> = doc.keys().take(keys::ALL.len()).collect();
        assert_eq!(top, vec!["id", "hw", "si", "ty", "pd", "cm", "an", "em"]);
    }

    #[test]
    fn scenario_device_round_trips() {
        let mapper = DeviceRecordMapper::new();
        let device = sample_device();
        let doc = mapper.to_document(&device);

        assert_eq!(doc.get_uuid(keys::ID).unwrap(), device.id);
        assert_eq!(doc.get(keys::PARENT_DEVICE_ID), Some(&Value::Null));
        assert_eq!(doc.get(keys::ASSIGNMENT_ID), Some(&Value::Null));
        let em = doc.get_array(keys::ELEMENT_MAPPINGS).unwrap().unwrap();
        assert_eq!(em.len(), 1);
        let slot = em[0].as_document().unwrap();
        assert_eq!(slot.get_str(element_mapping::keys::SCHEMA_PATH).unwrap(), Some("slot-1"));
        assert_eq!(slot.get_str(element_mapping::keys::HARDWARE_ID).unwrap(), Some("HW-200"));

        assert_eq!(mapper.from_document(&doc).unwrap(), device);
    }

    #[test]
    fn encoding_is_deterministic_and_leaves_input_alone() {
        let mapper = DeviceRecordMapper::new();
        let mut device = sample_device();
        device.audit = crate::model::EntityAudit::created("admin", Utc::now());
        device.metadata.insert("zone".into(), "north".into());
        device.metadata.insert("asset".into(), "A-1".into());
        let snapshot = device.clone();

        let first = mapper.to_document(&device);
        let second = mapper.to_document(&device);

        assert_eq!(device, snapshot);
        assert_eq!(first, second);
        assert_eq!(
            first.keys().collect::<Vec<_>>(),
            second.keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn missing_mapping_list_decodes_to_empty() {
        let mut doc = Document::new();
        doc.append(keys::HARDWARE_ID, "HW-1");
        let device = DeviceRecordMapper::new().from_document(&doc).unwrap();
        assert!(device.device_element_mappings.is_empty());
        assert_eq!(device.id, None);
        assert_eq!(device.comments, None);
    }

    #[test]
    fn scalar_mapping_list_is_a_decoding_error() {
        let mut doc = Document::new();
        doc.append(keys::ELEMENT_MAPPINGS, "slot-1");
        let err = DeviceRecordMapper::new().from_document(&doc).unwrap_err();
        assert_eq!(
            err,
            DecodeError::unexpected(keys::ELEMENT_MAPPINGS, ValueKind::Array, ValueKind::String)
        );
    }

    #[test]
    fn bad_list_entry_reports_index() {
        let good = ElementMappingMapper.to_document(&DeviceElementMapping::new("a", "HW-1"));
        let mut doc = Document::new();
        doc.append(
            keys::ELEMENT_MAPPINGS,
            vec![Value::Document(good), Value::Int64(7)],
        );

        let err = DeviceRecordMapper::new().from_document(&doc).unwrap_err();
        match err {
            DecodeError::Element { key, index, source } => {
                assert_eq!(key, keys::ELEMENT_MAPPINGS);
                assert_eq!(index, 1);
                assert_eq!(
                    *source,
                    DecodeError::unexpected(
                        keys::ELEMENT_MAPPINGS,
                        ValueKind::Document,
                        ValueKind::Int64
                    )
                );
            }
            other @ DecodeError::UnexpectedType { .. } => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn identifier_with_wrong_kind_fails() {
        let mut doc = Document::new();
        doc.append(keys::SITE_ID, "7c1f0c7e-0000-0000-0000-000000000000");
        let err = DeviceRecordMapper::new().from_document(&doc).unwrap_err();
        assert_eq!(err.key(), keys::SITE_ID);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mapper = DeviceRecordMapper::new();
        let device = sample_device();
        let mut doc = mapper.to_document(&device);
        doc.append("schemaVersion", 3).append("zz", Value::Array(vec![]));
        assert_eq!(mapper.from_document(&doc).unwrap(), device);
    }

    #[test]
    fn read_into_keeps_target_on_failure() {
        let mapper = DeviceRecordMapper::new();
        let mut target = sample_device();
        let before = target.clone();

        let mut doc = Document::new();
        doc.append(keys::HARDWARE_ID, "HW-NEW").append(keys::COMMENTS, 12);
        assert!(mapper.read_into(&doc, &mut target).is_err());
        assert_eq!(target, before);

        doc.append(keys::COMMENTS, "fixed");
        mapper.read_into(&doc, &mut target).unwrap();
        assert_eq!(target.hardware_id.as_deref(), Some("HW-NEW"));
    }

    #[test]
    fn write_into_preserves_existing_entries() {
        let mut doc = Document::new();
        doc.append("_id", "store-assigned");
        DeviceRecordMapper::new().write_into(&sample_device(), &mut doc);
        assert_eq!(doc.keys().next(), Some("_id"));
        assert!(doc.contains_key(keys::HARDWARE_ID));
    }

    #[test]
    fn reserved_keys_do_not_collide() {
        let reserved = DeviceRecordMapper::new().reserved_keys();
        let unique: HashSet<&str> = reserved.iter().copied().collect();
        assert_eq!(unique.len(), reserved.len(), "duplicate key in {reserved:?}");
    }
}
