//! InMemoryHierarchy: a map-backed hierarchy provider.

use std::collections::BTreeMap;

use outlier_core::errors::StorageError;
use outlier_core::traits::{OrgUnitHierarchy, OrgUnitRecord};
use outlier_core::types::OrgUnitUid;

/// Hierarchy snapshot held in memory. Useful for callers that already hold
/// the paths they need, and for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHierarchy {
    units: BTreeMap<OrgUnitUid, OrgUnitRecord>,
}

impl InMemoryHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit by path. The level is the path depth.
    pub fn insert(&mut self, uid: impl Into<OrgUnitUid>, path: impl Into<String>) {
        let uid = uid.into();
        let path = path.into();
        let level = path.split('/').filter(|s| !s.is_empty()).count() as u32;
        self.units.insert(
            uid.clone(),
            OrgUnitRecord { uid, path, level },
        );
    }

    pub fn with_unit(mut self, uid: impl Into<OrgUnitUid>, path: impl Into<String>) -> Self {
        self.insert(uid, path);
        self
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl OrgUnitHierarchy for InMemoryHierarchy {
    fn org_unit(&self, uid: &OrgUnitUid) -> Result<Option<OrgUnitRecord>, StorageError> {
        Ok(self.units.get(uid).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_level() {
        let hierarchy = InMemoryHierarchy::new()
            .with_unit("root", "/root")
            .with_unit("ouA", "/root/regionA/ouA");
        let record = hierarchy
            .org_unit(&OrgUnitUid::new("ouA"))
            .unwrap()
            .unwrap();
        assert_eq!(record.level, 3);
        assert_eq!(record.path, "/root/regionA/ouA");
        assert!(hierarchy.org_unit(&OrgUnitUid::new("missing")).unwrap().is_none());
        assert_eq!(hierarchy.len(), 2);
    }
}
