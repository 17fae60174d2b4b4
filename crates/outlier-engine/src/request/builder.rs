//! Fail-fast builder for [`OutlierDetectionRequest`].

use std::collections::BTreeSet;

use chrono::NaiveDate;
use outlier_core::config::DetectionConfig;
use outlier_core::constants::{DEFAULT_MAX_RESULTS, DEFAULT_MAX_RESULTS_LIMIT, DEFAULT_THRESHOLD};
use outlier_core::errors::RequestError;
use outlier_core::traits::OrgUnitHierarchy;
use outlier_core::types::{
    Algorithm, DataSource, DetectionKind, OrderBy, OrgUnitUid, SortOrder,
};

use super::model::OutlierDetectionRequest;
use super::types::{DataItem, OrgUnit};

/// Collects request fields and validates them in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct OutlierRequestBuilder {
    data_items: Vec<DataItem>,
    org_units: BTreeSet<OrgUnit>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    data_start_date: Option<NaiveDate>,
    data_end_date: Option<NaiveDate>,
    algorithm: Algorithm,
    detection: DetectionKind,
    threshold: f64,
    max_results: u32,
    max_results_limit: u32,
    data_source: DataSource,
    order_by: OrderBy,
    sort_order: SortOrder,
}

impl Default for OutlierRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OutlierRequestBuilder {
    /// Builder seeded with compiled defaults.
    pub fn new() -> Self {
        Self {
            data_items: Vec::new(),
            org_units: BTreeSet::new(),
            start_date: None,
            end_date: None,
            data_start_date: None,
            data_end_date: None,
            algorithm: Algorithm::default(),
            detection: DetectionKind::default(),
            threshold: DEFAULT_THRESHOLD,
            max_results: DEFAULT_MAX_RESULTS,
            max_results_limit: DEFAULT_MAX_RESULTS_LIMIT,
            data_source: DataSource::default(),
            order_by: OrderBy::default(),
            sort_order: SortOrder::default(),
        }
    }

    /// Builder seeded with configured defaults and limits.
    pub fn with_config(config: &DetectionConfig) -> Self {
        Self {
            algorithm: config.effective_algorithm(),
            threshold: config.effective_threshold(),
            max_results: config.effective_max_results(),
            max_results_limit: config.effective_max_results_limit(),
            data_source: config.effective_data_source(),
            ..Self::new()
        }
    }

    /// Add a data item. A repeated identifier keeps its first position.
    pub fn data_item(mut self, item: DataItem) -> Self {
        if !self.data_items.iter().any(|existing| existing.uid == item.uid) {
            self.data_items.push(item);
        }
        self
    }

    pub fn data_items(self, items: impl IntoIterator<Item = DataItem>) -> Self {
        items.into_iter().fold(self, Self::data_item)
    }

    pub fn org_unit(mut self, org_unit: OrgUnit) -> Self {
        self.org_units.insert(org_unit);
        self
    }

    pub fn org_units(self, org_units: impl IntoIterator<Item = OrgUnit>) -> Self {
        org_units.into_iter().fold(self, Self::org_unit)
    }

    /// Resolve org units by identifier through the hierarchy provider,
    /// capturing their current paths.
    pub fn resolve_org_units<H, I, U>(mut self, hierarchy: &H, uids: I) -> Result<Self, RequestError>
    where
        H: OrgUnitHierarchy + ?Sized,
        I: IntoIterator<Item = U>,
        U: Into<OrgUnitUid>,
    {
        for uid in uids {
            let uid = uid.into();
            let record = hierarchy
                .org_unit(&uid)
                .map_err(|e| RequestError::hierarchy_lookup(uid.as_str(), &e))?
                .ok_or_else(|| RequestError::UnknownOrgUnit {
                    uid: uid.as_str().to_string(),
                })?;
            self.org_units.insert(OrgUnit::from_record(record)?);
        }
        Ok(self)
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Restrict the statistic population to periods starting on or after `date`.
    pub fn data_start_date(mut self, date: NaiveDate) -> Self {
        self.data_start_date = Some(date);
        self
    }

    /// Restrict the statistic population to periods ending on or before `date`.
    pub fn data_end_date(mut self, date: NaiveDate) -> Self {
        self.data_end_date = Some(date);
        self
    }

    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn detection(mut self, detection: DetectionKind) -> Self {
        self.detection = detection;
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn data_source(mut self, data_source: DataSource) -> Self {
        self.data_source = data_source;
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Validate and freeze the request.
    pub fn build(self) -> Result<OutlierDetectionRequest, RequestError> {
        if self.data_items.is_empty() {
            return Err(RequestError::NoDataItems);
        }
        if self.org_units.is_empty() {
            return Err(RequestError::NoOrgUnits);
        }

        let start_date = self.start_date.ok_or(RequestError::MissingDate {
            field: "start date",
        })?;
        let end_date = self.end_date.ok_or(RequestError::MissingDate { field: "end date" })?;
        if start_date > end_date {
            return Err(RequestError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        if let (Some(start), Some(end)) = (self.data_start_date, self.data_end_date) {
            if start > end {
                return Err(RequestError::InvalidDataDateRange { start, end });
            }
        }

        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(RequestError::InvalidThreshold {
                threshold: self.threshold,
            });
        }
        if self.max_results == 0 {
            return Err(RequestError::InvalidMaxResults);
        }
        if self.max_results > self.max_results_limit {
            return Err(RequestError::MaxResultsExceeded {
                max_results: self.max_results,
                limit: self.max_results_limit,
            });
        }

        if let Some(item) = self.data_items.iter().find(|i| !i.value_type.is_numeric()) {
            return Err(RequestError::NonNumericDataItem {
                uid: item.uid.as_str().to_string(),
                value_type: item.value_type.name().to_string(),
            });
        }

        if self.data_source == DataSource::PreAggregated {
            if self.detection != DetectionKind::Statistical {
                return Err(RequestError::UnsupportedDataSource {
                    data_source: self.data_source.name().to_string(),
                    detection: self.detection.name().to_string(),
                });
            }
            let windowed = self.data_start_date.is_some() || self.data_end_date.is_some();
            if windowed && self.algorithm == Algorithm::ModifiedZScore {
                return Err(RequestError::UnsupportedDataWindow {
                    data_source: self.data_source.name().to_string(),
                    algorithm: self.algorithm.name().to_string(),
                });
            }
        }

        Ok(OutlierDetectionRequest {
            data_items: self.data_items,
            org_units: self.org_units.into_iter().collect(),
            start_date,
            end_date,
            data_start_date: self.data_start_date,
            data_end_date: self.data_end_date,
            algorithm: self.algorithm,
            detection: self.detection,
            threshold: self.threshold,
            max_results: self.max_results,
            data_source: self.data_source,
            order_by: self.order_by,
            sort_order: self.sort_order,
        })
    }
}
