//! Configuration system for the outlier engine.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod detection_config;
pub mod outlier_config;
pub mod tables_config;

pub use detection_config::DetectionConfig;
pub use outlier_config::{CliOverrides, OutlierConfig};
pub use tables_config::TablesConfig;
