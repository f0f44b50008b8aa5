// ── Metadata field ──
//
// The metadata map is stored as one nested sub-document of string values
// under a single reserved top-level key, so arbitrary metadata names can
// never shadow another mapper's keys.

use super::FieldMapper;
use crate::document::{Document, Value, ValueKind};
use crate::error::DecodeError;
use crate::model::{Metadata, MetadataProvider};

/// Top-level keys owned by [`MetadataFieldMapper`].
pub mod keys {
    pub const METADATA: &str = "metadata";

    pub const ALL: &[&str] = &[METADATA];
}

/// Appends and extracts the [`Metadata`] of any metadata-bearing entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataFieldMapper;

impl<T: MetadataProvider + ?Sized> FieldMapper<T> for MetadataFieldMapper {
    fn keys(&self) -> &'static [&'static str] {
        keys::ALL
    }

    fn write(&self, source: &T, target: &mut Document) {
        let entries: Document = source
            .metadata()
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        target.append(keys::METADATA, entries);
    }

    fn read(&self, source: &Document, target: &mut T) -> Result<(), DecodeError> {
        let Some(entries) = source.get_document(keys::METADATA)? else {
            target.metadata_mut().clear();
            return Ok(());
        };

        let metadata = entries
            .iter()
            .map(|(name, value)| match value {
                Value::String(s) => Ok((name.clone(), s.clone())),
                other => Err(DecodeError::unexpected(
                    format!("{}.{name}", keys::METADATA),
                    ValueKind::String,
                    other.kind(),
                )),
            })
            .collect::<Result<Metadata, _>>()?;

        *target.metadata_mut() = metadata;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Device;
    use pretty_assertions::assert_eq;

    fn device_with_metadata() -> Device {
        let mut device = Device::default();
        device.metadata.insert("firmware".into(), "1.4.2".into());
        device.metadata.insert("rack".into(), "B7".into());
        device
    }

    #[test]
    fn writes_nested_sub_document() {
        let mut doc = Document::new();
        MetadataFieldMapper.write(&device_with_metadata(), &mut doc);

        let nested = doc.get_document(keys::METADATA).unwrap().unwrap();
        assert_eq!(nested.keys().collect::<Vec<_>>(), vec!["firmware", "rack"]);
        assert_eq!(nested.get_str("rack").unwrap(), Some("B7"));
    }

    #[test]
    fn round_trips() {
        let device = device_with_metadata();
        let mut doc = Document::new();
        MetadataFieldMapper.write(&device, &mut doc);

        let mut decoded = Device::default();
        MetadataFieldMapper.read(&doc, &mut decoded).unwrap();
        assert_eq!(decoded.metadata, device.metadata);
    }

    #[test]
    fn missing_key_yields_empty_map() {
        let mut decoded = device_with_metadata();
        MetadataFieldMapper.read(&Document::new(), &mut decoded).unwrap();
        assert!(decoded.metadata.is_empty());
    }

    #[test]
    fn non_string_entry_fails_with_qualified_key() {
        let mut nested = Document::new();
        nested.append("ok", "yes").append("count", 3);
        let mut doc = Document::new();
        doc.append(keys::METADATA, nested);

        let mut decoded = device_with_metadata();
        let err = MetadataFieldMapper.read(&doc, &mut decoded).unwrap_err();
        assert_eq!(
            err,
            DecodeError::unexpected("metadata.count", ValueKind::String, ValueKind::Int64)
        );
        assert_eq!(decoded.metadata, device_with_metadata().metadata);
    }
}
