//! Tests for the error handling system.

use std::collections::HashSet;

use chrono::NaiveDate;
use outlier_core::errors::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_request_error_codes_are_distinct() {
    let errors = vec![
        RequestError::NoDataItems,
        RequestError::NoOrgUnits,
        RequestError::MissingDate { field: "start date" },
        RequestError::InvalidDateRange {
            start: date(2020, 3, 1),
            end: date(2020, 1, 1),
        },
        RequestError::InvalidDataDateRange {
            start: date(2020, 3, 1),
            end: date(2020, 1, 1),
        },
        RequestError::InvalidThreshold { threshold: -1.0 },
        RequestError::InvalidMaxResults,
        RequestError::MaxResultsExceeded {
            max_results: 20_000,
            limit: 10_000,
        },
        RequestError::NonNumericDataItem {
            uid: "deA".into(),
            value_type: "TEXT".into(),
        },
        RequestError::UnsupportedDataSource {
            data_source: "PRE_AGGREGATED".into(),
            detection: "MIN_MAX".into(),
        },
        RequestError::UnsupportedDataWindow {
            data_source: "PRE_AGGREGATED".into(),
            algorithm: "MODIFIED_Z_SCORE".into(),
        },
        RequestError::InvalidOrgUnitPath {
            uid: "ouA".into(),
            path: "ouA".into(),
        },
        RequestError::UnknownOrgUnit { uid: "ouZ".into() },
        RequestError::HierarchyLookup {
            uid: "ouA".into(),
            message: "busy".into(),
        },
    ];

    let codes: HashSet<&str> = errors.iter().map(|e| e.error_code()).collect();
    assert_eq!(codes.len(), errors.len(), "every variant has its own code");
}

#[test]
fn test_display_string_format() {
    let err = RequestError::InvalidDateRange {
        start: date(2020, 3, 1),
        end: date(2020, 1, 1),
    };
    assert_eq!(
        err.display_string(),
        "[INVALID_DATE_RANGE] Start date 2020-03-01 is after end date 2020-01-01"
    );

    let config = ConfigError::FileNotFound {
        path: "/tmp/outlier.toml".into(),
    };
    assert!(config.display_string().starts_with("[CONFIG_ERROR]"));
}

#[test]
fn test_storage_error_codes() {
    let sqlite = StorageError::SqliteError {
        message: "locked".into(),
    };
    assert_eq!(sqlite.error_code(), "STORAGE_ERROR");

    let migration = StorageError::MigrationFailed {
        version: 1,
        message: "syntax".into(),
    };
    assert_eq!(migration.error_code(), "MIGRATION_FAILED");

    let wrapped = RequestError::hierarchy_lookup("ouA", &sqlite);
    assert_eq!(wrapped.error_code(), "HIERARCHY_LOOKUP_FAILED");
    assert!(wrapped.to_string().contains("locked"));
}

#[test]
fn test_statement_error_codes() {
    let unbound = StatementError::UnboundPlaceholder {
        name: "threshold".into(),
    };
    assert_eq!(unbound.error_code(), "UNBOUND_PLACEHOLDER");
    assert_eq!(unbound.to_string(), "Placeholder :threshold has no bound value");

    let empty = StatementError::EmptyList {
        name: "data_element_ids".into(),
    };
    assert_eq!(empty.error_code(), "EMPTY_LIST_BINDING");
}
