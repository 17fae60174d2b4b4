//! Processor Dispatcher: a flat, enum-keyed registry of processors.

use outlier_core::config::{OutlierConfig, TablesConfig};
use outlier_core::errors::ConfigError;
use outlier_core::types::{DataSource, DetectionKind};

use crate::processors::{
    AnalyticsZScoreProcessor, InvalidNumericProcessor, MinMaxProcessor, StatementProcessor,
    ZScoreProcessor,
};
use crate::request::OutlierDetectionRequest;
use crate::statement::GeneratedStatement;

pub use crate::processors::ProcessorKind;

/// Selects and runs the processor for a request.
#[derive(Debug, Clone, Default)]
pub struct StatementDispatcher {
    raw_z_score: ZScoreProcessor,
    pre_aggregated_z_score: AnalyticsZScoreProcessor,
    min_max: MinMaxProcessor,
    invalid_numeric: InvalidNumericProcessor,
}

impl StatementDispatcher {
    /// Fails when a configured table name is not a plain identifier.
    pub fn new(tables: TablesConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            raw_z_score: ZScoreProcessor::new(tables.clone())?,
            pre_aggregated_z_score: AnalyticsZScoreProcessor::new(tables.clone())?,
            min_max: MinMaxProcessor::new(tables.clone())?,
            invalid_numeric: InvalidNumericProcessor::new(tables)?,
        })
    }

    pub fn from_config(config: &OutlierConfig) -> Result<Self, ConfigError> {
        Self::new(config.tables.clone())
    }

    /// Pure mapping from a request to its processor. `None` for no request.
    pub fn processor_kind(request: Option<&OutlierDetectionRequest>) -> Option<ProcessorKind> {
        let request = request?;
        let kind = match (request.detection(), request.data_source()) {
            (DetectionKind::MinMax, _) => ProcessorKind::MinMax,
            (DetectionKind::InvalidNumeric, _) => ProcessorKind::InvalidNumeric,
            (DetectionKind::Statistical, DataSource::RawDataValues) => ProcessorKind::RawZScore,
            (DetectionKind::Statistical, DataSource::PreAggregated) => {
                ProcessorKind::PreAggregatedZScore
            }
        };
        Some(kind)
    }

    pub fn processor(&self, kind: ProcessorKind) -> &dyn StatementProcessor {
        match kind {
            ProcessorKind::RawZScore => &self.raw_z_score,
            ProcessorKind::PreAggregatedZScore => &self.pre_aggregated_z_score,
            ProcessorKind::MinMax => &self.min_max,
            ProcessorKind::InvalidNumeric => &self.invalid_numeric,
        }
    }

    /// Generate the statement for `request`, or the empty statement when
    /// there is no request.
    pub fn generate(&self, request: Option<&OutlierDetectionRequest>) -> GeneratedStatement {
        let Some(kind) = Self::processor_kind(request) else {
            tracing::debug!("no request, generating empty statement");
            return GeneratedStatement::empty();
        };
        let statement = self.processor(kind).generate(request);
        tracing::debug!(
            processor = %kind,
            params = statement.params().len(),
            sql_len = statement.sql().len(),
            "generated outlier statement"
        );
        statement
    }
}
