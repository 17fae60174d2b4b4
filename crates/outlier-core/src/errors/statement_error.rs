//! Statement rendering errors.

use super::error_code::{self, OutlierErrorCode};

/// Errors raised when rewriting a generated statement for a driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatementError {
    #[error("Placeholder :{name} has no bound value")]
    UnboundPlaceholder { name: String },

    #[error("Placeholder :{name} is bound to an empty list")]
    EmptyList { name: String },
}

impl OutlierErrorCode for StatementError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnboundPlaceholder { .. } => error_code::UNBOUND_PLACEHOLDER,
            Self::EmptyList { .. } => error_code::EMPTY_LIST_BINDING,
        }
    }
}
