//! Typed queries over the migrated schema.

pub mod min_max_bounds;
pub mod org_units;
