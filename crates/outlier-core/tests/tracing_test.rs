//! Tests for the tracing setup.

use std::sync::Mutex;

use outlier_core::tracing::init_tracing;

/// Serializes tests that touch `OUTLIER_LOG`.
static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_outlier_log_directives_accepted() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("OUTLIER_LOG", "outlier_engine=debug,outlier_storage=warn");
    init_tracing();
    tracing::debug!(target: "outlier_engine", "tracing initialised");
    std::env::remove_var("OUTLIER_LOG");
}

#[test]
fn test_init_tracing_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
    init_tracing();
}
