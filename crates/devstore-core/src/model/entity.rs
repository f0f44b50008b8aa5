// ── Shared entity capabilities ──
//
// Audit fields and free-form metadata are owned by every persisted entity,
// not just devices. Entities expose them through these traits so the
// shared field mappers can be composed into any entity mapper.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-form string annotations attached to an entity.
///
/// Ordered by key so that encoding the same entity twice yields identical
/// documents.
pub type Metadata = BTreeMap<String, String>;

/// Creation/modification actor and timestamp, plus the soft-delete marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityAudit {
    pub created_date: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub updated_date: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

impl EntityAudit {
    pub fn created(by: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            created_date: Some(at),
            created_by: Some(by.into()),
            ..Self::default()
        }
    }

    /// Record a modification.
    pub fn touch(&mut self, by: impl Into<String>, at: DateTime<Utc>) {
        self.updated_date = Some(at);
        self.updated_by = Some(by.into());
    }
}

/// An entity carrying [`EntityAudit`] fields.
pub trait PersistentEntity {
    fn audit(&self) -> &EntityAudit;
    fn audit_mut(&mut self) -> &mut EntityAudit;
}

/// An entity carrying [`Metadata`].
pub trait MetadataProvider {
    fn metadata(&self) -> &Metadata;
    fn metadata_mut(&mut self) -> &mut Metadata;
}
