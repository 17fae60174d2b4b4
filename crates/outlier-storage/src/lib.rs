//! outlier-storage: SQLite-backed collaborators of the statement engine.
//!
//! The engine never performs I/O. These adapters are used by callers at
//! request construction time to resolve org unit paths and to maintain the
//! stored min-max bounds the Min-Max statement joins against.

pub mod connection;
pub mod migrations;
pub mod queries;

pub use connection::OutlierStore;
pub use queries::min_max_bounds::{BoundsKey, BoundsRecord, SqliteBoundsStore};
pub use queries::org_units::SqliteOrgUnitHierarchy;
