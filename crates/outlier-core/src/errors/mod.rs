//! Error handling for the outlier engine.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod request_error;
pub mod statement_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::OutlierErrorCode;
pub use request_error::RequestError;
pub use statement_error::StatementError;
pub use storage_error::StorageError;
