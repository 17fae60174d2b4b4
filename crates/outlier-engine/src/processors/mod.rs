//! Statement processors, one per detection family.
//!
//! Every processor turns a request into a [`GeneratedStatement`]. A missing
//! request generates the empty statement in every family.

pub mod analytics_zscore;
pub mod invalid_numeric;
pub mod min_max;
pub(crate) mod sql;
pub mod zscore;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::request::OutlierDetectionRequest;
use crate::statement::GeneratedStatement;

pub use analytics_zscore::AnalyticsZScoreProcessor;
pub use invalid_numeric::InvalidNumericProcessor;
pub use min_max::MinMaxProcessor;
pub use zscore::ZScoreProcessor;

/// Registry key of a processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessorKind {
    /// Z-score family over the raw data value table.
    RawZScore,
    /// Z-score family over the pre-aggregated table.
    PreAggregatedZScore,
    MinMax,
    InvalidNumeric,
}

impl ProcessorKind {
    pub const ALL: [ProcessorKind; 4] = [
        Self::RawZScore,
        Self::PreAggregatedZScore,
        Self::MinMax,
        Self::InvalidNumeric,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::RawZScore => "raw_z_score",
            Self::PreAggregatedZScore => "pre_aggregated_z_score",
            Self::MinMax => "min_max",
            Self::InvalidNumeric => "invalid_numeric",
        }
    }
}

impl fmt::Display for ProcessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Request → statement capability shared by all detection families.
pub trait StatementProcessor: Send + Sync {
    fn kind(&self) -> ProcessorKind;

    /// Render the statement for a validated request.
    fn build(&self, request: &OutlierDetectionRequest) -> GeneratedStatement;

    /// Render the statement, or the empty statement when there is no request.
    fn generate(&self, request: Option<&OutlierDetectionRequest>) -> GeneratedStatement {
        match request {
            Some(request) => self.build(request),
            None => GeneratedStatement::empty(),
        }
    }
}
