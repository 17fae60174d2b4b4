//! OutlierErrorCode trait for structured error reporting.

/// Every error enum implements this to expose a stable, machine-readable
/// code alongside its human-readable message.
pub trait OutlierErrorCode {
    /// Returns the error code string (e.g., "NO_DATA_ITEMS").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn display_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const NO_DATA_ITEMS: &str = "NO_DATA_ITEMS";
pub const NO_ORG_UNITS: &str = "NO_ORG_UNITS";
pub const MISSING_DATE: &str = "MISSING_DATE";
pub const INVALID_DATE_RANGE: &str = "INVALID_DATE_RANGE";
pub const INVALID_DATA_DATE_RANGE: &str = "INVALID_DATA_DATE_RANGE";
pub const INVALID_THRESHOLD: &str = "INVALID_THRESHOLD";
pub const INVALID_MAX_RESULTS: &str = "INVALID_MAX_RESULTS";
pub const MAX_RESULTS_EXCEEDED: &str = "MAX_RESULTS_EXCEEDED";
pub const NON_NUMERIC_DATA_ITEM: &str = "NON_NUMERIC_DATA_ITEM";
pub const UNSUPPORTED_DATA_SOURCE: &str = "UNSUPPORTED_DATA_SOURCE";
pub const INVALID_ORG_UNIT_PATH: &str = "INVALID_ORG_UNIT_PATH";
pub const UNKNOWN_ORG_UNIT: &str = "UNKNOWN_ORG_UNIT";
pub const HIERARCHY_LOOKUP_FAILED: &str = "HIERARCHY_LOOKUP_FAILED";
pub const UNBOUND_PLACEHOLDER: &str = "UNBOUND_PLACEHOLDER";
pub const EMPTY_LIST_BINDING: &str = "EMPTY_LIST_BINDING";
pub const UNSUPPORTED_DATA_WINDOW: &str = "UNSUPPORTED_DATA_WINDOW";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CORRUPT_RECORD: &str = "CORRUPT_RECORD";
