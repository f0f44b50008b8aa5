// ── Device domain types ──

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entity::{EntityAudit, Metadata, MetadataProvider, PersistentEntity};

/// Assignment of a child device into a named slot of a composite parent.
///
/// Has no identity of its own; it lives and dies with the parent's list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceElementMapping {
    /// Slot path within the parent's device-type element schema.
    pub device_element_schema_path: Option<String>,
    /// Hardware id of the child device placed in the slot.
    pub hardware_id: Option<String>,
}

impl DeviceElementMapping {
    pub fn new(path: impl Into<String>, hardware_id: impl Into<String>) -> Self {
        Self {
            device_element_schema_path: Some(path.into()),
            hardware_id: Some(hardware_id.into()),
        }
    }
}

/// A physical device as tracked by device management.
///
/// Every field is optional so partially populated documents can be read
/// back; a fully valid device has at least `id` and `hardware_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: Option<Uuid>,
    pub hardware_id: Option<String>,
    pub site_id: Option<Uuid>,
    pub device_type_id: Option<Uuid>,
    /// Set when this device occupies a slot of a composite parent.
    pub parent_device_id: Option<Uuid>,
    pub comments: Option<String>,
    /// Current assignment, `None` while unassigned.
    pub device_assignment_id: Option<Uuid>,
    #[serde(default)]
    pub device_element_mappings: Vec<DeviceElementMapping>,

    #[serde(default)]
    pub audit: EntityAudit,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Device {
    pub fn new(id: Uuid, hardware_id: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            hardware_id: Some(hardware_id.into()),
            ..Self::default()
        }
    }

    pub fn is_nested(&self) -> bool {
        self.parent_device_id.is_some()
    }

    pub fn is_assigned(&self) -> bool {
        self.device_assignment_id.is_some()
    }

    /// Hardware ids of every child mapped into this device's slots.
    pub fn child_hardware_ids(&self) -> impl Iterator<Item = &str> {
        self.device_element_mappings
            .iter()
            .filter_map(|m| m.hardware_id.as_deref())
    }
}

impl PersistentEntity for Device {
    fn audit(&self) -> &EntityAudit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut EntityAudit {
        &mut self.audit
    }
}

impl MetadataProvider for Device {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}
