//! Statement generation benchmarks.
//!
//! Run with: cargo bench -p outlier-engine --bench statement_bench

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use outlier_core::types::{Algorithm, DetectionKind};
use outlier_engine::{
    DataItem, OrgUnit, OutlierDetectionRequest, OutlierRequestBuilder, PathPredicateBuilder,
    StatementDispatcher,
};

fn org_units(count: usize) -> Vec<OrgUnit> {
    (0..count)
        .map(|i| {
            let uid = format!("ou{i:05}");
            OrgUnit::new(uid.as_str(), format!("/root/region{:02}/{uid}", i % 20)).unwrap()
        })
        .collect()
}

fn request(units: usize, algorithm: Algorithm, detection: DetectionKind) -> OutlierDetectionRequest {
    OutlierRequestBuilder::new()
        .data_items((0..20).map(|i| DataItem::number(format!("de{i:03}"))))
        .org_units(org_units(units))
        .start_date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
        .end_date(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap())
        .algorithm(algorithm)
        .detection(detection)
        .build()
        .unwrap()
}

fn predicate_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_predicate");
    let builder = PathPredicateBuilder::new("ou.path");
    for size in [1, 100, 1000] {
        let units = org_units(size);
        group.bench_with_input(BenchmarkId::new("build", size), &units, |b, units| {
            b.iter(|| builder.build(units));
        });
    }
    group.finish();
}

fn statement_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_generate");
    let dispatcher = StatementDispatcher::default();
    let cases = [
        ("z_score", Algorithm::ZScore, DetectionKind::Statistical),
        ("modified_z_score", Algorithm::ModifiedZScore, DetectionKind::Statistical),
        ("min_max", Algorithm::ZScore, DetectionKind::MinMax),
        ("invalid_numeric", Algorithm::ZScore, DetectionKind::InvalidNumeric),
    ];
    for (name, algorithm, detection) in cases {
        let request = request(100, algorithm, detection);
        group.bench_function(name, |b| {
            b.iter(|| dispatcher.generate(Some(&request)));
        });
    }
    group.finish();
}

criterion_group!(benches, predicate_build, statement_generate);
criterion_main!(benches);
