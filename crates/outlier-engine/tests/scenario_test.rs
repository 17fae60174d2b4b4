//! End-to-end statement scenarios through the dispatcher.

use chrono::NaiveDate;
use outlier_core::types::{Algorithm, DataSource, DetectionKind};
use outlier_engine::statement::Placeholder;
use outlier_engine::{
    DataItem, OrgUnit, OutlierRequestBuilder, ParamValue, ProcessorKind, StatementDispatcher,
    StatementProcessor,
};
use outlier_engine::processors::{
    AnalyticsZScoreProcessor, InvalidNumericProcessor, MinMaxProcessor, ZScoreProcessor,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn base_request() -> OutlierRequestBuilder {
    OutlierRequestBuilder::new()
        .data_items(["deA", "deB", "deC"].map(DataItem::number))
        .org_unit(OrgUnit::new("ouA", "/root/ouA").unwrap())
        .org_unit(OrgUnit::new("ouB", "/root/ouB").unwrap())
        .start_date(date(2020, 1, 1))
        .end_date(date(2020, 3, 1))
}

const OU_A_TEST: &str = "(ou.path = '/root/ouA' or ou.path like '/root/ouA/%')";
const OU_B_TEST: &str = "(ou.path = '/root/ouB' or ou.path like '/root/ouB/%')";

/// Scenario 1: Z_SCORE over raw values.
#[test]
fn test_scenario_z_score_raw() {
    let request = base_request()
        .algorithm(Algorithm::ZScore)
        .data_source(DataSource::RawDataValues)
        .build()
        .unwrap();
    let statement = StatementDispatcher::default().generate(Some(&request));
    let sql = statement.sql();

    assert!(sql.contains(&format!("{OU_A_TEST} or {OU_B_TEST}")));
    assert!(sql.contains("order by middle_value_abs_dev desc nulls last"));
    assert!(sql.ends_with("limit :max_results"));
    assert_eq!(
        statement.param(Placeholder::MaxResults),
        Some(&ParamValue::Integer(500))
    );
    assert_eq!(
        statement.param(Placeholder::DataElementIds),
        Some(&ParamValue::TextList(vec![
            "deA".into(),
            "deB".into(),
            "deC".into()
        ]))
    );
    assert_eq!(
        statement.param(Placeholder::StartDate),
        Some(&ParamValue::Date(date(2020, 1, 1)))
    );
    assert_eq!(
        statement.param(Placeholder::Threshold),
        Some(&ParamValue::Real(3.0))
    );
}

/// Scenario 2: MODIFIED_Z_SCORE swaps center and spread only.
#[test]
fn test_scenario_modified_z_score_raw() {
    let dispatcher = StatementDispatcher::default();
    let z = dispatcher.generate(Some(&base_request().build().unwrap()));
    let modified = dispatcher.generate(Some(
        &base_request()
            .algorithm(Algorithm::ModifiedZScore)
            .build()
            .unwrap(),
    ));

    let sql = modified.sql();
    assert!(sql.contains("percentile_cont(0.5) within group (order by nv.value)"));
    assert!(sql.contains("1.4826 * percentile_cont(0.5)"));
    assert!(!sql.contains("avg("));
    assert!(z.sql().contains("avg(nv.value)"));

    assert!(sql.contains(&format!("{OU_A_TEST} or {OU_B_TEST}")));
    assert!(sql.contains("where nv.pe_start_date >= :start_date and nv.pe_end_date <= :end_date"));
    assert_eq!(z.params(), modified.params());
}

/// Scenario 3: Min-Max over the same org units.
#[test]
fn test_scenario_min_max() {
    let request = base_request()
        .detection(DetectionKind::MinMax)
        .build()
        .unwrap();
    let statement = StatementDispatcher::default().generate(Some(&request));
    let sql = statement.sql();

    assert!(sql.contains(&format!("({OU_A_TEST} or {OU_B_TEST})")));
    assert_eq!(sql.matches("or ou.path like").count(), 2);
    assert!(sql.contains("inner join minmaxdataelement mm"));
    assert!(sql.contains("nv.value < mm.minimumvalue or nv.value > mm.maximumvalue"));
    assert!(!sql.contains("avg("));
    assert!(!sql.contains("stddev_pop("));
    assert!(!sql.contains("percentile_cont"));
}

/// Scenario 4: Invalid-numeric pattern check.
#[test]
fn test_scenario_invalid_numeric() {
    let request = base_request()
        .detection(DetectionKind::InvalidNumeric)
        .build()
        .unwrap();
    let statement = StatementDispatcher::default().generate(Some(&request));
    let sql = statement.sql();

    assert!(sql.contains("dv.value !~ '^[+-]?[0-9]+(\\.[0-9]+)?$'"));
    for column in ["middle_value", "spread", "lower_bound", "upper_bound", "z_score"] {
        assert!(
            sql.contains(&format!("null::double precision as {column}")),
            "{column} should be null"
        );
    }
    assert!(!sql.contains("order by middle_value_abs_dev"));
    assert!(!sql.contains("order by z_score"));
}

#[test]
fn test_missing_request_is_empty_for_every_processor() {
    let processors: Vec<Box<dyn StatementProcessor>> = vec![
        Box::new(ZScoreProcessor::default()),
        Box::new(AnalyticsZScoreProcessor::default()),
        Box::new(MinMaxProcessor::default()),
        Box::new(InvalidNumericProcessor::default()),
    ];
    for processor in &processors {
        let statement = processor.generate(None);
        assert_eq!(statement.sql(), "", "{} should be empty", processor.kind());
        assert!(statement.params().is_empty());
    }
    assert!(StatementDispatcher::default().generate(None).is_empty());
}

#[test]
fn test_value_equal_requests_generate_identical_statements() {
    let dispatcher = StatementDispatcher::default();
    for detection in [
        DetectionKind::Statistical,
        DetectionKind::MinMax,
        DetectionKind::InvalidNumeric,
    ] {
        let first = base_request().detection(detection).build().unwrap();
        let second = OutlierRequestBuilder::new()
            .data_items(["deA", "deB", "deC"].map(DataItem::number))
            .org_unit(OrgUnit::new("ouB", "/root/ouB").unwrap())
            .org_unit(OrgUnit::new("ouA", "/root/ouA").unwrap())
            .start_date(date(2020, 1, 1))
            .end_date(date(2020, 3, 1))
            .detection(detection)
            .build()
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(
            dispatcher.generate(Some(&first)),
            dispatcher.generate(Some(&second))
        );
    }
}

#[test]
fn test_pre_aggregated_and_raw_share_contract() {
    let dispatcher = StatementDispatcher::default();
    let raw = base_request().build().unwrap();
    let pre = base_request()
        .data_source(DataSource::PreAggregated)
        .build()
        .unwrap();
    assert_eq!(
        StatementDispatcher::processor_kind(Some(&pre)),
        Some(ProcessorKind::PreAggregatedZScore)
    );

    let raw_stmt = dispatcher.generate(Some(&raw));
    let pre_stmt = dispatcher.generate(Some(&pre));
    assert_ne!(raw_stmt.sql(), pre_stmt.sql());
    assert_eq!(raw_stmt.params(), pre_stmt.params());
    assert!(pre_stmt.sql().contains("from analytics ax"));
}
