//! Organisation unit containment filters and an in-memory hierarchy.

pub mod memory;
pub mod predicate;

pub use memory::InMemoryHierarchy;
pub use predicate::{OrgUnitPathPredicate, PathPredicateBuilder};
