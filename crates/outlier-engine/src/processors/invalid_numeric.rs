//! Structural check of stored value text.

use outlier_core::config::TablesConfig;
use outlier_core::errors::ConfigError;

use super::sql::{self, Bindings, TIE_BREAK_COLUMNS};
use super::{ProcessorKind, StatementProcessor};
use crate::orgunit::PathPredicateBuilder;
use crate::request::OutlierDetectionRequest;
use crate::statement::GeneratedStatement;

/// Values whose text fails the decimal grammar or overflows a double.
///
/// Center, spread, score and bounds are null. Rows are ordered by
/// identifiers only; the order carries no deviation meaning.
#[derive(Debug, Clone, Default)]
pub struct InvalidNumericProcessor {
    tables: TablesConfig,
}

impl InvalidNumericProcessor {
    /// Fails when a configured table name is not a plain identifier.
    pub fn new(tables: TablesConfig) -> Result<Self, ConfigError> {
        tables.validate()?;
        Ok(Self { tables })
    }
}

impl StatementProcessor for InvalidNumericProcessor {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::InvalidNumeric
    }

    fn build(&self, request: &OutlierDetectionRequest) -> GeneratedStatement {
        let mut binds = Bindings::default();
        let base = sql::bind_base(request, &mut binds);
        let predicate = PathPredicateBuilder::new("ou.path").build(request.org_units());
        let tables = &self.tables;

        let text = format!(
            "select de.uid as de_uid, ou.uid as ou_uid, \
             coc.uid as coc_uid, aoc.uid as aoc_uid, \
             de.name as de_name, ou.name as ou_name, coc.name as coc_name, aoc.name as aoc_name, \
             pe.startdate as pe_start_date, pe.enddate as pe_end_date, pt.name as pt_name, \
             dv.value as value, dv.followup as follow_up, \
             null::double precision as middle_value, \
             null::double precision as spread, \
             null::double precision as middle_value_abs_dev, \
             null::double precision as z_score, \
             null::double precision as lower_bound, \
             null::double precision as upper_bound \
             from {data_value} dv \
             inner join {data_element} de on dv.dataelementid = de.dataelementid \
             inner join {coc} coc on dv.categoryoptioncomboid = coc.categoryoptioncomboid \
             inner join {coc} aoc on dv.attributeoptioncomboid = aoc.categoryoptioncomboid \
             inner join {period} pe on dv.periodid = pe.periodid \
             inner join {period_type} pt on pe.periodtypeid = pt.periodtypeid \
             inner join {org_unit} ou on dv.sourceid = ou.organisationunitid \
             where de.uid in ({ids}) \
             and pe.startdate >= {start} \
             and pe.enddate <= {end} \
             and {predicate} \
             and dv.deleted is false \
             and {invalid} \
             order by {TIE_BREAK_COLUMNS} \
             limit {limit}",
            data_value = tables.data_value(),
            data_element = tables.data_element(),
            coc = tables.category_option_combo(),
            period = tables.period(),
            period_type = tables.period_type(),
            org_unit = tables.org_unit(),
            ids = base.data_element_ids,
            start = base.start_date,
            end = base.end_date,
            predicate = predicate.fragment(),
            invalid = sql::invalid_numeric_test("dv.value"),
            limit = base.max_results,
        );

        tracing::trace!(units = predicate.unit_count(), "rendered invalid-numeric statement");
        binds.into_statement(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{DataItem, OrgUnit, OutlierRequestBuilder};
    use crate::statement::Placeholder;
    use chrono::NaiveDate;
    use outlier_core::types::{DetectionKind, OrderBy};

    fn request(order_by: OrderBy) -> OutlierDetectionRequest {
        OutlierRequestBuilder::new()
            .data_item(DataItem::number("deA"))
            .org_unit(OrgUnit::new("ouA", "/root/ouA").unwrap())
            .start_date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
            .end_date(NaiveDate::from_ymd_opt(2020, 3, 1).unwrap())
            .detection(DetectionKind::InvalidNumeric)
            .order_by(order_by)
            .build()
            .unwrap()
    }

    #[test]
    fn test_grammar_rejection_and_identifier_order() {
        let stmt = InvalidNumericProcessor::default().build(&request(OrderBy::AbsDev));
        let sql = stmt.sql();
        assert!(sql.contains(r"dv.value !~ '^[+-]?[0-9]+(\.[0-9]+)?$'"));
        assert!(sql.contains("length(split_part(ltrim(dv.value, '+-'), '.', 1)) > 307"));
        assert!(sql.contains("order by de_uid, ou_uid, coc_uid, aoc_uid, pe_start_date limit :max_results"));
        assert!(!sql.contains("order by middle_value_abs_dev"));
        assert!(!sql.contains("::double precision as value"));
    }

    #[test]
    fn test_order_by_ignored() {
        let processor = InvalidNumericProcessor::default();
        assert_eq!(
            processor.build(&request(OrderBy::AbsDev)).sql(),
            processor.build(&request(OrderBy::Value)).sql()
        );
    }

    #[test]
    fn test_no_threshold_binding() {
        let stmt = InvalidNumericProcessor::default().build(&request(OrderBy::AbsDev));
        assert!(stmt.param(Placeholder::Threshold).is_none());
        assert_eq!(stmt.params().len(), 4);
    }
}
