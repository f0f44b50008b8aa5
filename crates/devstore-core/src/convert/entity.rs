// ── Shared audit fields ──

use super::FieldMapper;
use crate::document::Document;
use crate::error::DecodeError;
use crate::model::{EntityAudit, PersistentEntity};

/// Top-level keys owned by [`EntityFieldMapper`].
pub mod keys {
    pub const CREATED_DATE: &str = "cd";
    pub const CREATED_BY: &str = "cb";
    pub const UPDATED_DATE: &str = "ud";
    pub const UPDATED_BY: &str = "ub";
    pub const DELETED: &str = "dl";

    pub const ALL: &[&str] = &[CREATED_DATE, CREATED_BY, UPDATED_DATE, UPDATED_BY, DELETED];
}

/// Appends and extracts the [`EntityAudit`] fields of any persisted entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityFieldMapper;

impl<T: PersistentEntity + ?Sized> FieldMapper<T> for EntityFieldMapper {
    fn keys(&self) -> &'static [&'static str] {
        keys::ALL
    }

    fn write(&self, source: &T, target: &mut Document) {
        let audit = source.audit();
        target
            .append(keys::CREATED_DATE, audit.created_date)
            .append(keys::CREATED_BY, audit.created_by.clone())
            .append(keys::UPDATED_DATE, audit.updated_date)
            .append(keys::UPDATED_BY, audit.updated_by.clone())
            .append(keys::DELETED, audit.deleted);
    }

    fn read(&self, source: &Document, target: &mut T) -> Result<(), DecodeError> {
        let audit = EntityAudit {
            created_date: source.get_datetime(keys::CREATED_DATE)?,
            created_by: source.get_str(keys::CREATED_BY)?.map(str::to_owned),
            updated_date: source.get_datetime(keys::UPDATED_DATE)?,
            updated_by: source.get_str(keys::UPDATED_BY)?.map(str::to_owned),
            deleted: source.get_bool(keys::DELETED)?.unwrap_or(false),
        };
        *target.audit_mut() = audit;
        Ok(())
    }
}
