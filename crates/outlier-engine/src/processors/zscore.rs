//! Z-score and modified Z-score over the raw data value table.
//!
//! Per-group center and spread are aggregated in a CTE over the org unit
//! scoped population, then joined back onto each value reported inside the
//! requested window.

use outlier_core::config::TablesConfig;
use outlier_core::errors::ConfigError;
use outlier_core::constants::MAD_NORMAL_CONSISTENCY;
use outlier_core::types::{Algorithm, OrderBy};

use super::sql::{self, Bindings};
use super::{ProcessorKind, StatementProcessor};
use crate::orgunit::PathPredicateBuilder;
use crate::request::OutlierDetectionRequest;
use crate::statement::{GeneratedStatement, Placeholder};

/// Score column name for an algorithm.
pub(crate) fn score_column(algorithm: Algorithm) -> &'static str {
    match algorithm {
        Algorithm::ZScore => "z_score",
        Algorithm::ModifiedZScore => "modified_z_score",
    }
}

/// Primary sort column for the Z-score family.
pub(crate) fn order_column(order_by: OrderBy, algorithm: Algorithm) -> &'static str {
    match order_by {
        OrderBy::AbsDev => "middle_value_abs_dev",
        OrderBy::ZScore => score_column(algorithm),
        OrderBy::MiddleValue => "middle_value",
        OrderBy::Spread => "spread",
        OrderBy::Value => "value",
    }
}

#[derive(Debug, Clone, Default)]
pub struct ZScoreProcessor {
    tables: TablesConfig,
}

impl ZScoreProcessor {
    /// Fails when a configured table name is not a plain identifier.
    pub fn new(tables: TablesConfig) -> Result<Self, ConfigError> {
        tables.validate()?;
        Ok(Self { tables })
    }

    /// `ou_stats` for mean and population standard deviation.
    fn mean_stats(history: &str) -> String {
        format!(
            "ou_stats as (\
             select {group}, \
             avg(nv.value) as middle_value, \
             stddev_pop(nv.value) as spread \
             from numeric_values nv \
             {history}\
             group by {group})",
            group = sql::group_columns("nv"),
        )
    }

    /// `ou_median` then `ou_stats` for median and scaled MAD.
    fn median_stats(history: &str) -> String {
        format!(
            "ou_median as (\
             select {group}, \
             percentile_cont(0.5) within group (order by nv.value) as middle_value \
             from numeric_values nv \
             {history}\
             group by {group}), \
             ou_stats as (\
             select {med_group}, med.middle_value, \
             {MAD_NORMAL_CONSISTENCY} * percentile_cont(0.5) within group \
             (order by abs(nv.value - med.middle_value)) as spread \
             from numeric_values nv \
             inner join ou_median med on {join} \
             {history}\
             group by {med_group}, med.middle_value)",
            group = sql::group_columns("nv"),
            med_group = sql::group_columns("med"),
            join = sql::group_join("nv", "med"),
        )
    }
}

impl StatementProcessor for ZScoreProcessor {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::RawZScore
    }

    fn build(&self, request: &OutlierDetectionRequest) -> GeneratedStatement {
        let mut binds = Bindings::default();
        let base = sql::bind_base(request, &mut binds);
        let history = sql::where_clause(&sql::history_conditions(
            request,
            "nv.pe_start_date",
            "nv.pe_end_date",
            &mut binds,
        ));
        let threshold = binds.bind(Placeholder::Threshold, request.threshold());
        let predicate = PathPredicateBuilder::new("ou.path").build(request.org_units());

        let algorithm = request.algorithm();
        let stats = match algorithm {
            Algorithm::ZScore => Self::mean_stats(&history),
            Algorithm::ModifiedZScore => Self::median_stats(&history),
        };
        let score = score_column(algorithm);
        let deviation = "abs(nv.value - stats.middle_value)";

        let text = format!(
            "with {cte}, {stats} \
             select {display}, \
             nv.value, nv.follow_up, \
             stats.middle_value, stats.spread, \
             {deviation} as middle_value_abs_dev, \
             {deviation} / nullif(stats.spread, 0) as {score}, \
             stats.middle_value - (stats.spread * {threshold}) as lower_bound, \
             stats.middle_value + (stats.spread * {threshold}) as upper_bound \
             from numeric_values nv \
             inner join ou_stats stats on {join} \
             {joins}\
             where nv.pe_start_date >= {start} \
             and nv.pe_end_date <= {end} \
             and stats.spread != 0 \
             and {deviation} / nullif(stats.spread, 0) >= {threshold} \
             {order}\
             limit {limit}",
            cte = sql::numeric_values_cte(&self.tables, &base, &predicate, &[]),
            display = sql::DISPLAY_COLUMNS,
            join = sql::group_join("nv", "stats"),
            joins = sql::display_joins(&self.tables),
            start = base.start_date,
            end = base.end_date,
            order = sql::order_clause(order_column(request.order_by(), algorithm), request.sort_order()),
            limit = base.max_results,
        );

        tracing::trace!(
            algorithm = %algorithm,
            units = predicate.unit_count(),
            "rendered raw z-score statement"
        );
        binds.into_statement(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{DataItem, OrgUnit, OutlierRequestBuilder};
    use chrono::NaiveDate;

    fn request(algorithm: Algorithm) -> OutlierDetectionRequest {
        OutlierRequestBuilder::new()
            .data_item(DataItem::number("deA"))
            .org_unit(OrgUnit::new("ouA", "/root/ouA").unwrap())
            .start_date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
            .end_date(NaiveDate::from_ymd_opt(2020, 3, 1).unwrap())
            .algorithm(algorithm)
            .build()
            .unwrap()
    }

    #[test]
    fn test_z_score_uses_population_stddev() {
        let stmt = ZScoreProcessor::default().build(&request(Algorithm::ZScore));
        let sql = stmt.sql();
        assert!(sql.contains("stddev_pop(nv.value) as spread"));
        assert!(sql.contains("avg(nv.value) as middle_value"));
        assert!(sql.contains("inner join ou_stats stats on nv.dataelementid = stats.dataelementid"));
        assert!(sql.contains("and stats.spread != 0"));
        assert!(sql.contains(" as z_score"));
        assert!(!sql.contains("percentile_cont"));
    }

    #[test]
    fn test_modified_uses_median_and_mad() {
        let stmt = ZScoreProcessor::default().build(&request(Algorithm::ModifiedZScore));
        let sql = stmt.sql();
        assert!(sql.contains("percentile_cont(0.5) within group (order by nv.value) as middle_value"));
        assert!(sql.contains("1.4826 * percentile_cont(0.5) within group"));
        assert!(sql.contains(" as modified_z_score"));
        assert!(!sql.contains("avg("));
        assert!(!sql.contains("stddev_pop("));
    }

    #[test]
    fn test_threshold_applied_after_join() {
        let stmt = ZScoreProcessor::default().build(&request(Algorithm::ZScore));
        let sql = stmt.sql();
        let join = sql.find("inner join ou_stats").unwrap();
        let filter = sql.find("/ nullif(stats.spread, 0) >= :threshold").unwrap();
        assert!(join < filter);
    }

    #[test]
    fn test_no_history_window_no_data_dates() {
        let stmt = ZScoreProcessor::default().build(&request(Algorithm::ZScore));
        assert!(stmt.param(Placeholder::DataStartDate).is_none());
        assert!(!stmt.sql().contains(":data_start_date"));
    }

    #[test]
    fn test_order_column_mapping() {
        assert_eq!(order_column(OrderBy::AbsDev, Algorithm::ZScore), "middle_value_abs_dev");
        assert_eq!(
            order_column(OrderBy::ZScore, Algorithm::ModifiedZScore),
            "modified_z_score"
        );
        assert_eq!(order_column(OrderBy::Value, Algorithm::ZScore), "value");
    }
}
