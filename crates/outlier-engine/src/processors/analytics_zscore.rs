//! Z-score and modified Z-score over the pre-aggregated table.
//!
//! Rows already carry display metadata. The statistic is a derived column
//! of the same scan and the outer query filters on the computed score.

use outlier_core::config::TablesConfig;
use outlier_core::errors::ConfigError;
use outlier_core::constants::MAD_NORMAL_CONSISTENCY;
use outlier_core::types::Algorithm;

use super::sql::{self, Bindings};
use super::zscore::{order_column, score_column};
use super::{ProcessorKind, StatementProcessor};
use crate::orgunit::PathPredicateBuilder;
use crate::request::OutlierDetectionRequest;
use crate::statement::{GeneratedStatement, Placeholder};

const DISPLAY_COLUMNS: &str = "ax.dx as de_uid, ax.ou as ou_uid, \
     ax.co as coc_uid, ax.ao as aoc_uid, \
     ax.dxname as de_name, ax.ouname as ou_name, ax.coname as coc_name, ax.aoname as aoc_name, \
     ax.pestartdate as pe_start_date, ax.peenddate as pe_end_date, ax.petype as pt_name, \
     ax.value, ax.ounamehierarchy as ou_name_hierarchy";

#[derive(Debug, Clone, Default)]
pub struct AnalyticsZScoreProcessor {
    tables: TablesConfig,
}

impl AnalyticsZScoreProcessor {
    /// Fails when a configured table name is not a plain identifier.
    pub fn new(tables: TablesConfig) -> Result<Self, ConfigError> {
        tables.validate()?;
        Ok(Self { tables })
    }

    /// Center, spread, deviation and score as window aggregates over the
    /// group, optionally restricted to the history window.
    fn window_stats(request: &OutlierDetectionRequest, binds: &mut Bindings) -> (String, String) {
        let conditions =
            sql::history_conditions(request, "ax.pestartdate", "ax.peenddate", binds);
        let filter = if conditions.is_empty() {
            String::new()
        } else {
            format!(" filter (where {})", conditions.join(" and "))
        };
        let mean = format!("avg(ax.value){filter} over grp");
        let stddev = format!("stddev_pop(ax.value){filter} over grp");
        let columns = format!(
            "{mean} as middle_value, \
             {stddev} as spread, \
             abs(ax.value - {mean}) as middle_value_abs_dev, \
             abs(ax.value - {mean}) / nullif({stddev}, 0) as {score}",
            score = score_column(Algorithm::ZScore),
        );
        (
            columns,
            " window grp as (partition by ax.dx, ax.ou, ax.co, ax.ao)".to_string(),
        )
    }

    /// Center and spread read from the stored per-group median and MAD.
    fn stored_stats() -> String {
        let spread = format!("{MAD_NORMAL_CONSISTENCY} * ax.mad");
        format!(
            "ax.percentile_middle_value as middle_value, \
             {spread} as spread, \
             abs(ax.value - ax.percentile_middle_value) as middle_value_abs_dev, \
             abs(ax.value - ax.percentile_middle_value) / nullif({spread}, 0) as {score}",
            score = score_column(Algorithm::ModifiedZScore),
        )
    }
}

impl StatementProcessor for AnalyticsZScoreProcessor {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::PreAggregatedZScore
    }

    fn build(&self, request: &OutlierDetectionRequest) -> GeneratedStatement {
        let mut binds = Bindings::default();
        let base = sql::bind_base(request, &mut binds);
        let algorithm = request.algorithm();
        let (stats, window) = match algorithm {
            Algorithm::ZScore => Self::window_stats(request, &mut binds),
            Algorithm::ModifiedZScore => (Self::stored_stats(), String::new()),
        };
        let threshold = binds.bind(Placeholder::Threshold, request.threshold());
        let predicate = PathPredicateBuilder::new("ax.path").build(request.org_units());
        let score = score_column(algorithm);

        let text = format!(
            "select t1.*, \
             t1.middle_value - (t1.spread * {threshold}) as lower_bound, \
             t1.middle_value + (t1.spread * {threshold}) as upper_bound \
             from (\
             select {display}, {stats} \
             from {analytics} ax \
             where ax.dx in ({ids}) \
             and {predicate} \
             and ax.value is not null\
             {window}\
             ) as t1 \
             where t1.pe_start_date >= {start} \
             and t1.pe_end_date <= {end} \
             and t1.spread != 0 \
             and t1.{score} >= {threshold} \
             {order}\
             limit {limit}",
            display = DISPLAY_COLUMNS,
            analytics = self.tables.analytics(),
            ids = base.data_element_ids,
            predicate = predicate.fragment(),
            start = base.start_date,
            end = base.end_date,
            order = sql::order_clause(order_column(request.order_by(), algorithm), request.sort_order()),
            limit = base.max_results,
        );

        tracing::trace!(
            algorithm = %algorithm,
            units = predicate.unit_count(),
            "rendered pre-aggregated z-score statement"
        );
        binds.into_statement(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{DataItem, OrgUnit, OutlierRequestBuilder};
    use chrono::NaiveDate;
    use outlier_core::types::DataSource;

    fn builder() -> OutlierRequestBuilder {
        OutlierRequestBuilder::new()
            .data_item(DataItem::number("deA"))
            .org_unit(OrgUnit::new("ouA", "/root/ouA").unwrap())
            .start_date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
            .end_date(NaiveDate::from_ymd_opt(2020, 3, 1).unwrap())
            .data_source(DataSource::PreAggregated)
    }

    #[test]
    fn test_window_statistics() {
        let stmt = AnalyticsZScoreProcessor::default().build(&builder().build().unwrap());
        let sql = stmt.sql();
        assert!(sql.contains("stddev_pop(ax.value) over grp as spread"));
        assert!(sql.contains("window grp as (partition by ax.dx, ax.ou, ax.co, ax.ao)"));
        assert!(sql.contains("and t1.z_score >= :threshold"));
        assert!(sql.contains("and t1.spread != 0"));
        assert!(sql.contains("(ax.path = '/root/ouA' or ax.path like '/root/ouA/%')"));
    }

    #[test]
    fn test_history_window_filters_aggregates() {
        let request = builder()
            .data_start_date(NaiveDate::from_ymd_opt(2018, 1, 1).unwrap())
            .data_end_date(NaiveDate::from_ymd_opt(2019, 12, 31).unwrap())
            .build()
            .unwrap();
        let stmt = AnalyticsZScoreProcessor::default().build(&request);
        assert!(stmt.sql().contains(
            "avg(ax.value) filter (where ax.pestartdate >= :data_start_date \
             and ax.peenddate <= :data_end_date) over grp"
        ));
        assert!(stmt.param(Placeholder::DataStartDate).is_some());
        assert!(stmt.param(Placeholder::DataEndDate).is_some());
    }

    #[test]
    fn test_modified_reads_stored_columns() {
        let request = builder()
            .algorithm(Algorithm::ModifiedZScore)
            .build()
            .unwrap();
        let stmt = AnalyticsZScoreProcessor::default().build(&request);
        let sql = stmt.sql();
        assert!(sql.contains("ax.percentile_middle_value as middle_value"));
        assert!(sql.contains("1.4826 * ax.mad as spread"));
        assert!(sql.contains("and t1.modified_z_score >= :threshold"));
        assert!(!sql.contains("over grp"));
    }
}
