//! Request construction errors.
//!
//! Raised by the request builder before any processor runs. A missing
//! request is not an error and never produces one of these.

use chrono::NaiveDate;

use super::error_code::{self, OutlierErrorCode};
use super::StorageError;

/// Errors that reject an outlier detection request at construction time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    #[error("At least one data item must be specified")]
    NoDataItems,

    #[error("At least one organisation unit must be specified")]
    NoOrgUnits,

    #[error("Missing {field}")]
    MissingDate { field: &'static str },

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Data start date {start} is after data end date {end}")]
    InvalidDataDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Threshold must be a finite number greater than zero, got {threshold}")]
    InvalidThreshold { threshold: f64 },

    #[error("Max results must be greater than zero")]
    InvalidMaxResults,

    #[error("Max results {max_results} exceeds the limit of {limit}")]
    MaxResultsExceeded { max_results: u32, limit: u32 },

    #[error("Data item {uid} has non-numeric value type {value_type}")]
    NonNumericDataItem { uid: String, value_type: String },

    #[error("Data source {data_source} does not support {detection} detection")]
    UnsupportedDataSource {
        data_source: String,
        detection: String,
    },

    #[error("Data source {data_source} cannot apply a data window to {algorithm}")]
    UnsupportedDataWindow {
        data_source: String,
        algorithm: String,
    },

    #[error("Organisation unit {uid} has an invalid path: '{path}'")]
    InvalidOrgUnitPath { uid: String, path: String },

    #[error("Organisation unit {uid} not found in hierarchy")]
    UnknownOrgUnit { uid: String },

    #[error("Hierarchy lookup failed for {uid}: {message}")]
    HierarchyLookup { uid: String, message: String },
}

impl RequestError {
    /// Wrap a storage failure raised while resolving an org unit.
    pub fn hierarchy_lookup(uid: impl Into<String>, err: &StorageError) -> Self {
        Self::HierarchyLookup {
            uid: uid.into(),
            message: err.to_string(),
        }
    }
}

impl OutlierErrorCode for RequestError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoDataItems => error_code::NO_DATA_ITEMS,
            Self::NoOrgUnits => error_code::NO_ORG_UNITS,
            Self::MissingDate { .. } => error_code::MISSING_DATE,
            Self::InvalidDateRange { .. } => error_code::INVALID_DATE_RANGE,
            Self::InvalidDataDateRange { .. } => error_code::INVALID_DATA_DATE_RANGE,
            Self::InvalidThreshold { .. } => error_code::INVALID_THRESHOLD,
            Self::InvalidMaxResults => error_code::INVALID_MAX_RESULTS,
            Self::MaxResultsExceeded { .. } => error_code::MAX_RESULTS_EXCEEDED,
            Self::NonNumericDataItem { .. } => error_code::NON_NUMERIC_DATA_ITEM,
            Self::UnsupportedDataSource { .. } => error_code::UNSUPPORTED_DATA_SOURCE,
            Self::UnsupportedDataWindow { .. } => error_code::UNSUPPORTED_DATA_WINDOW,
            Self::InvalidOrgUnitPath { .. } => error_code::INVALID_ORG_UNIT_PATH,
            Self::UnknownOrgUnit { .. } => error_code::UNKNOWN_ORG_UNIT,
            Self::HierarchyLookup { .. } => error_code::HIERARCHY_LOOKUP_FAILED,
        }
    }
}
