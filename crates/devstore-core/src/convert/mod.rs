// ── Entity <-> document conversion ──
//
// Each persisted entity has a converter that owns its reserved document
// keys. Fields shared across entities (audit, metadata) are handled by
// `FieldMapper`s that an entity converter composes: every mapper appends
// its own keys into the same target document and reads them back out of
// the same source document.

pub mod device;
pub mod element_mapping;
pub mod entity;
pub mod metadata;

use crate::document::Document;
use crate::error::DecodeError;

pub use device::DeviceRecordMapper;
pub use element_mapping::ElementMappingMapper;
pub use entity::EntityFieldMapper;
pub use metadata::MetadataFieldMapper;

/// Two-way conversion between an entity and its stored document.
pub trait DocumentConverter {
    type Entity;

    /// Encode `source` into a newly allocated document.
    fn to_document(&self, source: &Self::Entity) -> Document;

    /// Decode a document into a newly allocated entity.
    ///
    /// Missing keys leave the corresponding field at its zero value and
    /// unknown keys are ignored. A present value of the wrong kind fails.
    fn from_document(&self, source: &Document) -> Result<Self::Entity, DecodeError>;
}

/// A reusable group of fields appended into another entity's document.
pub trait FieldMapper<T: ?Sized> {
    /// Top-level keys this mapper writes.
    fn keys(&self) -> &'static [&'static str];

    fn write(&self, source: &T, target: &mut Document);

    /// Populate `target` from `source`. Leaves `target` untouched on error.
    fn read(&self, source: &Document, target: &mut T) -> Result<(), DecodeError>;
}
