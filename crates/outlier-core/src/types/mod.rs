//! Identifier newtypes and the detection enums shared across crates.

pub mod detection;
pub mod identifiers;
pub mod value_type;

pub use detection::{Algorithm, DataSource, DetectionKind, OrderBy, SortOrder};
pub use identifiers::{CategoryComboUid, DataItemUid, OrgUnitUid};
pub use value_type::{AggregationType, ValueType};
