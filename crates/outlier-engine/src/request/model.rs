//! The immutable detection request.

use chrono::NaiveDate;
use outlier_core::types::{Algorithm, DataSource, DetectionKind, OrderBy, SortOrder};
use serde::Serialize;

use super::types::{DataItem, OrgUnit};

/// One outlier detection request.
///
/// Only [`OutlierRequestBuilder`](super::OutlierRequestBuilder) constructs
/// it, so every instance has passed validation: non-empty data items and
/// org units, `start_date <= end_date`, a positive finite threshold and a
/// row cap within limits. Org units are held sorted by path with duplicates
/// removed, so requests built from the same sets compare equal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlierDetectionRequest {
    pub(crate) data_items: Vec<DataItem>,
    pub(crate) org_units: Vec<OrgUnit>,
    pub(crate) start_date: NaiveDate,
    pub(crate) end_date: NaiveDate,
    pub(crate) data_start_date: Option<NaiveDate>,
    pub(crate) data_end_date: Option<NaiveDate>,
    pub(crate) algorithm: Algorithm,
    pub(crate) detection: DetectionKind,
    pub(crate) threshold: f64,
    pub(crate) max_results: u32,
    pub(crate) data_source: DataSource,
    pub(crate) order_by: OrderBy,
    pub(crate) sort_order: SortOrder,
}

impl OutlierDetectionRequest {
    pub fn data_items(&self) -> &[DataItem] {
        &self.data_items
    }

    /// Data item identifiers in request order.
    pub fn data_item_uids(&self) -> Vec<String> {
        self.data_items
            .iter()
            .map(|item| item.uid.as_str().to_string())
            .collect()
    }

    pub fn org_units(&self) -> &[OrgUnit] {
        &self.org_units
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Lower bound of the statistic population, if restricted.
    pub fn data_start_date(&self) -> Option<NaiveDate> {
        self.data_start_date
    }

    /// Upper bound of the statistic population, if restricted.
    pub fn data_end_date(&self) -> Option<NaiveDate> {
        self.data_end_date
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn detection(&self) -> DetectionKind {
        self.detection
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    pub fn data_source(&self) -> DataSource {
        self.data_source
    }

    pub fn order_by(&self) -> OrderBy {
        self.order_by
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }
}
