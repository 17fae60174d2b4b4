//! Collaborator traits implemented outside the engine.

pub mod hierarchy;

pub use hierarchy::{OrgUnitHierarchy, OrgUnitRecord};
