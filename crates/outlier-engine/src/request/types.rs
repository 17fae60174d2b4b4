//! Data items and organisation units as captured by a request.

use std::sync::OnceLock;

use outlier_core::errors::RequestError;
use outlier_core::traits::OrgUnitRecord;
use outlier_core::types::{AggregationType, DataItemUid, OrgUnitUid, ValueType};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A data item selected for detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataItem {
    pub uid: DataItemUid,
    pub value_type: ValueType,
    pub aggregation_type: AggregationType,
}

impl DataItem {
    pub fn new(
        uid: impl Into<DataItemUid>,
        value_type: ValueType,
        aggregation_type: AggregationType,
    ) -> Self {
        Self {
            uid: uid.into(),
            value_type,
            aggregation_type,
        }
    }

    /// A `NUMBER` item aggregated by `SUM`, the most common shape.
    pub fn number(uid: impl Into<DataItemUid>) -> Self {
        Self::new(uid, ValueType::Number, AggregationType::Sum)
    }
}

/// An organisation unit with its materialized path.
///
/// Field order matters: the derived ordering sorts by path first, which
/// keeps predicate rendering independent of insertion order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "OrgUnitFields")]
pub struct OrgUnit {
    path: String,
    uid: OrgUnitUid,
    level: u32,
}

/// Deserialized shape of an [`OrgUnit`]. A serialized `level` is ignored
/// and derived again from the path.
#[derive(Deserialize)]
struct OrgUnitFields {
    uid: OrgUnitUid,
    path: String,
}

impl TryFrom<OrgUnitFields> for OrgUnit {
    type Error = RequestError;

    fn try_from(fields: OrgUnitFields) -> Result<Self, Self::Error> {
        Self::new(fields.uid, fields.path)
    }
}

impl OrgUnit {
    /// Validate `path` and capture the unit. The last path segment must be
    /// the unit's own identifier.
    pub fn new(uid: impl Into<OrgUnitUid>, path: impl Into<String>) -> Result<Self, RequestError> {
        let uid = uid.into();
        let path = path.into();

        let valid = path_regex().is_match(&path)
            && path.rsplit('/').next() == Some(uid.as_str());
        if !valid {
            return Err(RequestError::InvalidOrgUnitPath {
                uid: uid.into_inner(),
                path,
            });
        }

        let level = path.split('/').filter(|s| !s.is_empty()).count() as u32;
        Ok(Self { path, uid, level })
    }

    pub fn from_record(record: OrgUnitRecord) -> Result<Self, RequestError> {
        let unit = Self::new(record.uid, record.path)?;
        if unit.level != record.level {
            tracing::debug!(
                uid = %unit.uid,
                reported = record.level,
                derived = unit.level,
                "hierarchy level differs from path depth, using path depth"
            );
        }
        Ok(unit)
    }

    pub fn uid(&self) -> &OrgUnitUid {
        &self.uid
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn level(&self) -> u32 {
        self.level
    }
}

fn path_regex() -> &'static Regex {
    static PATH: OnceLock<Regex> = OnceLock::new();
    PATH.get_or_init(|| {
        Regex::new(r"^(/[A-Za-z0-9_-]+)+$").expect("path pattern is valid")
    })
}
