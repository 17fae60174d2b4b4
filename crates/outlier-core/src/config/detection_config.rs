//! Detection defaults and limits.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_RESULTS, DEFAULT_MAX_RESULTS_LIMIT, DEFAULT_THRESHOLD};
use crate::types::{Algorithm, DataSource};

/// Defaults applied by the request builder when a field is not set.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DetectionConfig {
    /// Default spread-unit threshold. Default: 3.0.
    pub threshold: Option<f64>,
    /// Default row cap. Default: 500.
    pub max_results: Option<u32>,
    /// Largest row cap a request may ask for. Default: 10000.
    pub max_results_limit: Option<u32>,
    /// Default algorithm. Default: Z_SCORE.
    pub algorithm: Option<Algorithm>,
    /// Default data source. Default: RAW_DATA_VALUES.
    pub data_source: Option<DataSource>,
}

impl DetectionConfig {
    pub fn effective_threshold(&self) -> f64 {
        self.threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    pub fn effective_max_results(&self) -> u32 {
        self.max_results.unwrap_or(DEFAULT_MAX_RESULTS)
    }

    pub fn effective_max_results_limit(&self) -> u32 {
        self.max_results_limit.unwrap_or(DEFAULT_MAX_RESULTS_LIMIT)
    }

    pub fn effective_algorithm(&self) -> Algorithm {
        self.algorithm.unwrap_or_default()
    }

    pub fn effective_data_source(&self) -> DataSource {
        self.data_source.unwrap_or_default()
    }
}
