//! OrgUnitHierarchy trait: read-only access to materialized paths.
//!
//! The hierarchy is owned by an external component. The engine only reads
//! a snapshot of paths at request construction time and never caches it.

use serde::{Deserialize, Serialize};

use crate::errors::StorageError;
use crate::types::OrgUnitUid;

/// One organisation unit as reported by the hierarchy provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgUnitRecord {
    pub uid: OrgUnitUid,
    /// Materialized ancestry path, e.g. `/root/regionA/districtB`.
    pub path: String,
    /// Depth in the hierarchy; the root is level 1.
    pub level: u32,
}

/// Read-only lookup of organisation units by identifier.
pub trait OrgUnitHierarchy: Send + Sync {
    /// Returns `Ok(None)` when the unit does not exist.
    fn org_unit(&self, uid: &OrgUnitUid) -> Result<Option<OrgUnitRecord>, StorageError>;
}

impl<T: OrgUnitHierarchy + ?Sized> OrgUnitHierarchy for &T {
    fn org_unit(&self, uid: &OrgUnitUid) -> Result<Option<OrgUnitRecord>, StorageError> {
        (**self).org_unit(uid)
    }
}

impl<T: OrgUnitHierarchy + ?Sized> OrgUnitHierarchy for std::sync::Arc<T> {
    fn org_unit(&self, uid: &OrgUnitUid) -> Result<Option<OrgUnitRecord>, StorageError> {
        (**self).org_unit(uid)
    }
}
