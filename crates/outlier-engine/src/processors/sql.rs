//! Query fragments shared by the processors.

use std::collections::BTreeMap;

use outlier_core::config::TablesConfig;
use outlier_core::constants::{MAX_INTEGRAL_DIGITS, NUMERIC_VALUE_PATTERN};
use outlier_core::types::SortOrder;

use crate::orgunit::OrgUnitPathPredicate;
use crate::request::OutlierDetectionRequest;
use crate::statement::{GeneratedStatement, ParamValue, Placeholder};

/// Output columns that break ties after the primary sort key.
pub(crate) const TIE_BREAK_COLUMNS: &str = "de_uid, ou_uid, coc_uid, aoc_uid, pe_start_date";

/// Group key of a reported value in the raw table.
pub(crate) const GROUP_KEY: [&str; 4] = [
    "dataelementid",
    "sourceid",
    "categoryoptioncomboid",
    "attributeoptioncomboid",
];

/// Placeholder bindings collected while rendering a statement.
///
/// [`bind`](Self::bind) returns the placeholder text, so a value is only
/// ever bound where the text also references it.
#[derive(Debug, Default)]
pub(crate) struct Bindings {
    params: BTreeMap<String, ParamValue>,
}

impl Bindings {
    pub(crate) fn bind(&mut self, placeholder: Placeholder, value: impl Into<ParamValue>) -> String {
        self.params
            .insert(placeholder.name().to_string(), value.into());
        placeholder.sql()
    }

    pub(crate) fn into_statement(self, sql: String) -> GeneratedStatement {
        let statement = GeneratedStatement::new(sql, self.params);
        debug_assert_eq!(
            statement.placeholders().len(),
            statement.params().len(),
            "placeholders and bindings diverged"
        );
        statement
    }
}

/// Placeholders every processor binds.
pub(crate) struct BaseParams {
    pub data_element_ids: String,
    pub start_date: String,
    pub end_date: String,
    pub max_results: String,
}

pub(crate) fn bind_base(request: &OutlierDetectionRequest, binds: &mut Bindings) -> BaseParams {
    BaseParams {
        data_element_ids: binds.bind(Placeholder::DataElementIds, request.data_item_uids()),
        start_date: binds.bind(Placeholder::StartDate, request.start_date()),
        end_date: binds.bind(Placeholder::EndDate, request.end_date()),
        max_results: binds.bind(
            Placeholder::MaxResults,
            i64::from(request.max_results()),
        ),
    }
}

/// Conditions restricting the statistic population to the history window.
/// Empty when the request carries no window.
pub(crate) fn history_conditions(
    request: &OutlierDetectionRequest,
    start_column: &str,
    end_column: &str,
    binds: &mut Bindings,
) -> Vec<String> {
    let mut conditions = Vec::new();
    if let Some(start) = request.data_start_date() {
        let p = binds.bind(Placeholder::DataStartDate, start);
        conditions.push(format!("{start_column} >= {p}"));
    }
    if let Some(end) = request.data_end_date() {
        let p = binds.bind(Placeholder::DataEndDate, end);
        conditions.push(format!("{end_column} <= {p}"));
    }
    conditions
}

/// `where a and b` or nothing.
pub(crate) fn where_clause(conditions: &[String]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!("where {} ", conditions.join(" and "))
    }
}

/// Value text that parses as a double without overflow.
pub(crate) fn numeric_guard(column: &str) -> String {
    format!(
        "{column} ~ '{NUMERIC_VALUE_PATTERN}' \
         and length(split_part(ltrim({column}, '+-'), '.', 1)) <= {MAX_INTEGRAL_DIGITS}"
    )
}

/// Negation of [`numeric_guard`].
pub(crate) fn invalid_numeric_test(column: &str) -> String {
    format!(
        "({column} !~ '{NUMERIC_VALUE_PATTERN}' \
         or length(split_part(ltrim({column}, '+-'), '.', 1)) > {MAX_INTEGRAL_DIGITS})"
    )
}

/// Join condition over [`GROUP_KEY`] between two aliases.
pub(crate) fn group_join(left: &str, right: &str) -> String {
    GROUP_KEY
        .iter()
        .map(|key| format!("{left}.{key} = {right}.{key}"))
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Comma-separated [`GROUP_KEY`] columns of one alias.
pub(crate) fn group_columns(alias: &str) -> String {
    GROUP_KEY
        .iter()
        .map(|key| format!("{alias}.{key}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `numeric_values` CTE: non-deleted raw values in scope, cast to double.
///
/// Materialized so the cast never runs ahead of the grammar filter.
pub(crate) fn numeric_values_cte(
    tables: &TablesConfig,
    base: &BaseParams,
    predicate: &OrgUnitPathPredicate,
    extra_conditions: &[String],
) -> String {
    let mut conditions = vec![
        format!("de.uid in ({})", base.data_element_ids),
        predicate.fragment().to_string(),
        "dv.deleted is false".to_string(),
        numeric_guard("dv.value"),
    ];
    conditions.extend(extra_conditions.iter().cloned());

    format!(
        "numeric_values as materialized (\
         select dv.dataelementid, dv.sourceid, dv.categoryoptioncomboid, dv.attributeoptioncomboid, \
         pe.periodtypeid, pe.startdate as pe_start_date, pe.enddate as pe_end_date, \
         dv.value::double precision as value, dv.followup as follow_up \
         from {data_value} dv \
         inner join {data_element} de on dv.dataelementid = de.dataelementid \
         inner join {period} pe on dv.periodid = pe.periodid \
         inner join {org_unit} ou on dv.sourceid = ou.organisationunitid \
         {where_clause})",
        data_value = tables.data_value(),
        data_element = tables.data_element(),
        period = tables.period(),
        org_unit = tables.org_unit(),
        where_clause = where_clause(&conditions).trim_end(),
    )
}

/// Identifier and display columns of a `numeric_values` row, in output order.
pub(crate) const DISPLAY_COLUMNS: &str = "de.uid as de_uid, ou.uid as ou_uid, \
     coc.uid as coc_uid, aoc.uid as aoc_uid, \
     de.name as de_name, ou.name as ou_name, coc.name as coc_name, aoc.name as aoc_name, \
     nv.pe_start_date, nv.pe_end_date, pt.name as pt_name";

/// Display joins for a `numeric_values nv` row.
pub(crate) fn display_joins(tables: &TablesConfig) -> String {
    format!(
        "inner join {data_element} de on nv.dataelementid = de.dataelementid \
         inner join {coc} coc on nv.categoryoptioncomboid = coc.categoryoptioncomboid \
         inner join {coc} aoc on nv.attributeoptioncomboid = aoc.categoryoptioncomboid \
         inner join {period_type} pt on nv.periodtypeid = pt.periodtypeid \
         inner join {org_unit} ou on nv.sourceid = ou.organisationunitid ",
        data_element = tables.data_element(),
        coc = tables.category_option_combo(),
        period_type = tables.period_type(),
        org_unit = tables.org_unit(),
    )
}

/// `order by <primary> <dir> nulls last, <tie-break keys>`.
pub(crate) fn order_clause(primary: &str, sort_order: SortOrder) -> String {
    format!(
        "order by {primary} {} nulls last, {TIE_BREAK_COLUMNS} ",
        sort_order.keyword()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_join() {
        assert_eq!(
            group_join("nv", "stats"),
            "nv.dataelementid = stats.dataelementid and nv.sourceid = stats.sourceid \
             and nv.categoryoptioncomboid = stats.categoryoptioncomboid \
             and nv.attributeoptioncomboid = stats.attributeoptioncomboid"
        );
    }

    #[test]
    fn test_order_clause() {
        assert_eq!(
            order_clause("value", SortOrder::Asc),
            "order by value asc nulls last, de_uid, ou_uid, coc_uid, aoc_uid, pe_start_date "
        );
    }

    #[test]
    fn test_guards_are_complementary() {
        let guard = numeric_guard("dv.value");
        let invalid = invalid_numeric_test("dv.value");
        assert!(guard.contains("dv.value ~ '"));
        assert!(invalid.contains("dv.value !~ '"));
        assert!(guard.contains("<= 307"));
        assert!(invalid.contains("> 307"));
    }

    #[test]
    fn test_where_clause() {
        assert_eq!(where_clause(&[]), "");
        assert_eq!(
            where_clause(&["a = 1".to_string(), "b = 2".to_string()]),
            "where a = 1 and b = 2 "
        );
    }
}
