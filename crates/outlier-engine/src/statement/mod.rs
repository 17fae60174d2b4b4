//! Generated statements: query text with named placeholders plus bindings.

pub mod generated;
pub mod params;

pub use generated::{GeneratedStatement, PositionalStatement};
pub use params::{ParamValue, Placeholder};
