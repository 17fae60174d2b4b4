//! Top-level configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{DetectionConfig, TablesConfig};
use crate::errors::ConfigError;
use crate::types::{Algorithm, DataSource};

/// Project-level config file name.
pub const PROJECT_CONFIG_FILE: &str = "outlier.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`OUTLIER_*`)
/// 3. Project config (`outlier.toml` in project root)
/// 4. User config (`~/.outlier/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct OutlierConfig {
    pub detection: DetectionConfig,
    pub tables: TablesConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub threshold: Option<f64>,
    pub max_results: Option<u32>,
    pub algorithm: Option<Algorithm>,
    pub data_source: Option<DataSource>,
}

impl OutlierConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(err @ ConfigError::ParseError { .. }) => return Err(err),
                    Err(err) => {
                        tracing::warn!(
                            path = %user_config_path.display(),
                            error = %err,
                            "ignoring unreadable user config"
                        );
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        tracing::debug!(?config, "resolved outlier config");

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &OutlierConfig) -> Result<(), ConfigError> {
        if let Some(threshold) = config.detection.threshold {
            if !threshold.is_finite() || threshold <= 0.0 {
                return Err(ConfigError::ValidationFailed {
                    field: "detection.threshold".to_string(),
                    message: "must be a finite number greater than 0".to_string(),
                });
            }
        }
        if config.detection.max_results == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "detection.max_results".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.detection.max_results_limit == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "detection.max_results_limit".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        let max_results = config.detection.effective_max_results();
        let limit = config.detection.effective_max_results_limit();
        if max_results > limit {
            return Err(ConfigError::ValidationFailed {
                field: "detection.max_results".to_string(),
                message: format!("must not exceed max_results_limit ({limit})"),
            });
        }
        config.tables.validate()
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// Returns the user config path: `~/.outlier/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".outlier").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored.
    fn merge_toml_file(config: &mut OutlierConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: OutlierConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a value.
    fn merge(base: &mut OutlierConfig, other: &OutlierConfig) {
        let detection = &other.detection;
        if detection.threshold.is_some() {
            base.detection.threshold = detection.threshold;
        }
        if detection.max_results.is_some() {
            base.detection.max_results = detection.max_results;
        }
        if detection.max_results_limit.is_some() {
            base.detection.max_results_limit = detection.max_results_limit;
        }
        if detection.algorithm.is_some() {
            base.detection.algorithm = detection.algorithm;
        }
        if detection.data_source.is_some() {
            base.detection.data_source = detection.data_source;
        }

        let tables = &other.tables;
        let slots = [
            (&mut base.tables.schema, &tables.schema),
            (&mut base.tables.data_value, &tables.data_value),
            (&mut base.tables.period, &tables.period),
            (&mut base.tables.period_type, &tables.period_type),
            (&mut base.tables.org_unit, &tables.org_unit),
            (&mut base.tables.data_element, &tables.data_element),
            (
                &mut base.tables.category_option_combo,
                &tables.category_option_combo,
            ),
            (&mut base.tables.min_max, &tables.min_max),
            (&mut base.tables.analytics, &tables.analytics),
        ];
        for (slot, value) in slots {
            if value.is_some() {
                slot.clone_from(value);
            }
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `OUTLIER_<SECTION>_<KEY>`, e.g. `OUTLIER_DETECTION_THRESHOLD`
    /// or `OUTLIER_TABLES_MIN_MAX`. Unparseable values are ignored.
    fn apply_env_overrides(config: &mut OutlierConfig) {
        if let Ok(val) = std::env::var("OUTLIER_DETECTION_THRESHOLD") {
            if let Ok(v) = val.parse::<f64>() {
                config.detection.threshold = Some(v);
            }
        }
        if let Ok(val) = std::env::var("OUTLIER_DETECTION_MAX_RESULTS") {
            if let Ok(v) = val.parse::<u32>() {
                config.detection.max_results = Some(v);
            }
        }
        if let Ok(val) = std::env::var("OUTLIER_DETECTION_MAX_RESULTS_LIMIT") {
            if let Ok(v) = val.parse::<u32>() {
                config.detection.max_results_limit = Some(v);
            }
        }
        if let Ok(val) = std::env::var("OUTLIER_DETECTION_ALGORITHM") {
            if let Some(v) = Algorithm::from_name(&val) {
                config.detection.algorithm = Some(v);
            }
        }
        if let Ok(val) = std::env::var("OUTLIER_DETECTION_DATA_SOURCE") {
            if let Some(v) = DataSource::from_name(&val) {
                config.detection.data_source = Some(v);
            }
        }

        let tables = &mut config.tables;
        let slots = [
            ("OUTLIER_TABLES_SCHEMA", &mut tables.schema),
            ("OUTLIER_TABLES_DATA_VALUE", &mut tables.data_value),
            ("OUTLIER_TABLES_PERIOD", &mut tables.period),
            ("OUTLIER_TABLES_PERIOD_TYPE", &mut tables.period_type),
            ("OUTLIER_TABLES_ORG_UNIT", &mut tables.org_unit),
            ("OUTLIER_TABLES_DATA_ELEMENT", &mut tables.data_element),
            (
                "OUTLIER_TABLES_CATEGORY_OPTION_COMBO",
                &mut tables.category_option_combo,
            ),
            ("OUTLIER_TABLES_MIN_MAX", &mut tables.min_max),
            ("OUTLIER_TABLES_ANALYTICS", &mut tables.analytics),
        ];
        for (key, slot) in slots {
            if let Ok(val) = std::env::var(key) {
                *slot = Some(val);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut OutlierConfig, cli: &CliOverrides) {
        if let Some(v) = cli.threshold {
            config.detection.threshold = Some(v);
        }
        if let Some(v) = cli.max_results {
            config.detection.max_results = Some(v);
        }
        if let Some(v) = cli.algorithm {
            config.detection.algorithm = Some(v);
        }
        if let Some(v) = cli.data_source {
            config.detection.data_source = Some(v);
        }
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
