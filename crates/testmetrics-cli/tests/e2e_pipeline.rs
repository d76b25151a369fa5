//! End-to-end pipeline tests over the sample spreadsheet export.
//!
//! These run source → normalize → compute → report on the real fixture and
//! check the properties the dashboard relies on.

use std::path::PathBuf;

use testmetrics_core::engine::{Metric, OverallField};
use testmetrics_core::source::read_csv_file;
use testmetrics_core::{compute, normalize, MarkingScheme, MetricsTable};
use testmetrics_report::table::generate_csv;

fn sample_metrics() -> MetricsTable {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/sample-tests.csv");
    let raw = read_csv_file(&path).unwrap();
    let table = normalize(&raw).unwrap();
    compute(&table, &MarkingScheme::default())
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn e2e_subjects_exclude_reserved_blocks() {
    let metrics = sample_metrics();
    assert_eq!(metrics.subjects(), ["math", "verbal"]);
    assert!(metrics.value(0, "test_rank").is_some());
    assert!(metrics.value(0, "total_accuracy").is_none());
    assert!(metrics.value(0, "test_accuracy").is_none());
}

#[test]
fn e2e_rows_keep_input_order() {
    let metrics = sample_metrics();
    assert_eq!(metrics.test_numbers(), vec![1.0, 2.0, 4.0]);
    assert_eq!(metrics.latest().unwrap().test_number(), 4.0);
}

#[test]
fn e2e_overall_matches_summed_counters() {
    let metrics = sample_metrics();
    for row in 0..metrics.len() {
        let attempted: f64 = metrics
            .subjects()
            .iter()
            .map(|s| metrics.value(row, &format!("{s}_attempted")).unwrap())
            .sum();
        let wrong: f64 = metrics
            .subjects()
            .iter()
            .map(|s| metrics.value(row, &format!("{s}_wrong")).unwrap())
            .sum();
        assert_eq!(metrics.value(row, "total_attempted"), Some(attempted));
        assert_eq!(metrics.value(row, "total_correct"), Some(attempted - wrong));
    }
}

#[test]
fn e2e_zero_attempt_subject_scores_zero() {
    let metrics = sample_metrics();
    for metric in [
        Metric::Accuracy,
        Metric::AttemptRatio,
        Metric::NetScore,
        Metric::NormalizedScore,
    ] {
        assert_eq!(metrics.value(2, &metric.column_for("math")), Some(0.0));
    }
    assert_eq!(metrics.value(2, "math_total"), Some(10.0));
}

#[test]
fn e2e_overall_scores() {
    let metrics = sample_metrics();
    let series = |f: OverallField| metrics.series(f.as_str()).unwrap();

    let net = series(OverallField::NetScore);
    assert!(close(net[0], 10.5));
    assert!(close(net[1], 10.0));
    assert!(close(net[2], 5.75));

    let normalized = series(OverallField::NormalizedScore);
    assert!(close(normalized[0], 0.525));
    assert!(close(normalized[2], 0.2875));
}

#[test]
fn e2e_derived_totals_replace_sheet_totals_in_place() {
    let metrics = sample_metrics();
    let columns = metrics.columns();
    let position = |name: &str| columns.iter().position(|c| *c == name).unwrap();

    // The sheet's own Total block sits before the derived columns.
    assert!(position("total_attempted") < position("math_total"));
    assert!(position("total_correct") > position("verbal_normalized_score"));
    assert_eq!(
        columns.iter().filter(|c| **c == "total_wrong").count(),
        1
    );
}

#[test]
fn e2e_csv_is_reproducible() {
    let a = generate_csv(&sample_metrics()).unwrap();
    let b = generate_csv(&sample_metrics()).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.lines().count(), 4);
}
