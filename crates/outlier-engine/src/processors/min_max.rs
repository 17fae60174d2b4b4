//! Range check against stored min-max bounds.

use outlier_core::config::TablesConfig;
use outlier_core::errors::ConfigError;
use outlier_core::types::OrderBy;

use super::sql::{self, Bindings};
use super::{ProcessorKind, StatementProcessor};
use crate::orgunit::PathPredicateBuilder;
use crate::request::OutlierDetectionRequest;
use crate::statement::GeneratedStatement;

/// Values outside `[minimumvalue, maximumvalue]` of their stored bound pair.
/// Values without a bound pair never appear.
#[derive(Debug, Clone, Default)]
pub struct MinMaxProcessor {
    tables: TablesConfig,
}

impl MinMaxProcessor {
    /// Fails when a configured table name is not a plain identifier.
    pub fn new(tables: TablesConfig) -> Result<Self, ConfigError> {
        tables.validate()?;
        Ok(Self { tables })
    }
}

fn order_column(order_by: OrderBy) -> &'static str {
    match order_by {
        OrderBy::Value => "value",
        _ => "bound_abs_dev",
    }
}

impl StatementProcessor for MinMaxProcessor {
    fn kind(&self) -> ProcessorKind {
        ProcessorKind::MinMax
    }

    fn build(&self, request: &OutlierDetectionRequest) -> GeneratedStatement {
        let mut binds = Bindings::default();
        let base = sql::bind_base(request, &mut binds);
        let predicate = PathPredicateBuilder::new("ou.path").build(request.org_units());
        let window = [
            format!("pe.startdate >= {}", base.start_date),
            format!("pe.enddate <= {}", base.end_date),
        ];

        let text = format!(
            "with {cte} \
             select {display}, \
             nv.value, nv.follow_up, \
             null::double precision as middle_value, \
             null::double precision as spread, \
             null::double precision as middle_value_abs_dev, \
             null::double precision as z_score, \
             mm.minimumvalue as lower_bound, \
             mm.maximumvalue as upper_bound, \
             least(abs(nv.value - mm.minimumvalue), abs(nv.value - mm.maximumvalue)) as bound_abs_dev \
             from numeric_values nv \
             inner join {min_max} mm on nv.dataelementid = mm.dataelementid \
             and nv.sourceid = mm.sourceid \
             and nv.categoryoptioncomboid = mm.categoryoptioncomboid \
             {joins}\
             where (nv.value < mm.minimumvalue or nv.value > mm.maximumvalue) \
             {order}\
             limit {limit}",
            cte = sql::numeric_values_cte(&self.tables, &base, &predicate, &window),
            display = sql::DISPLAY_COLUMNS,
            min_max = self.tables.min_max(),
            joins = sql::display_joins(&self.tables),
            order = sql::order_clause(order_column(request.order_by()), request.sort_order()),
            limit = base.max_results,
        );

        tracing::trace!(units = predicate.unit_count(), "rendered min-max statement");
        binds.into_statement(text)
    }
}
