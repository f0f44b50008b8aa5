// ── Domain model ──
//
// Devices, their composite-slot element mappings, and the capabilities
// shared by every persisted entity (audit fields and metadata).

pub mod device;
pub mod entity;

pub use device::{Device, DeviceElementMapping};
pub use entity::{EntityAudit, Metadata, MetadataProvider, PersistentEntity};
