//! outlier-core: shared foundation for the outlier statement engine.
//!
//! - Errors: one `thiserror` enum per subsystem, each with a stable error code
//! - Config: TOML-based, layered resolution (CLI > env > project > user > defaults)
//! - Tracing: `OUTLIER_LOG` driven subscriber setup
//! - Types: identifiers and the detection enums shared by every crate
//! - Traits: the injected organisation unit hierarchy lookup

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod traits;
pub mod types;
