// devstore-core: device document mapping and remote API availability gating.
//
// Two independent halves. `convert` turns `Device` records into schemaless
// `Document`s under short reserved keys and back. `channel` lets callers
// wait, bounded and cancellable, for a remote API channel to report ready.

pub mod channel;
pub mod convert;
pub mod document;
pub mod error;
pub mod model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use channel::{
    ApiChannel, ApiChannelExt, AvailabilityGate, Readiness, ReadinessSignal, SignalChannel,
    TcpProbeChannel, TimeUnit,
};
pub use convert::{
    DeviceRecordMapper, DocumentConverter, ElementMappingMapper, EntityFieldMapper, FieldMapper,
    MetadataFieldMapper,
};
pub use document::{Document, Value, ValueKind};
pub use error::{ChannelError, DecodeError};
pub use model::{
    Device, DeviceElementMapping, EntityAudit, Metadata, MetadataProvider, PersistentEntity,
};
