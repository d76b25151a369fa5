//! The `testmetrics summary` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use testmetrics_core::compute;
use testmetrics_core::summary::{summarize, MetricTrend, ScoreTrends};

use super::{load_table, resolve_scheme};
use crate::MarkArgs;

pub fn execute(input: PathBuf, marks: MarkArgs) -> Result<()> {
    let (_, scheme) = resolve_scheme(&marks)?;
    let table = load_table(&input)?;
    let metrics = compute(&table, &scheme);

    let Some(summary) = summarize(&metrics) else {
        println!("No tests recorded in {}.", input.display());
        return Ok(());
    };

    println!(
        "Test {} ({} tests, +{} / -{} per question)",
        summary.latest_test_number,
        summary.tests,
        scheme.positive_mark(),
        scheme.negative_mark()
    );

    let mut out = Table::new();
    out.set_header(vec![
        "Subject",
        "Accuracy",
        "Attempt ratio",
        "Net score",
        "Normalized",
    ]);
    for (subject, trends) in &summary.per_subject {
        out.add_row(trend_row(subject, trends));
    }
    out.add_row(trend_row("overall", &summary.overall));

    println!("{out}");
    Ok(())
}

fn trend_row(label: &str, trends: &ScoreTrends) -> Vec<Cell> {
    vec![
        Cell::new(label),
        Cell::new(percent(&trends.accuracy)),
        Cell::new(percent(&trends.attempt_ratio)),
        Cell::new(score(&trends.net_score)),
        Cell::new(score(&trends.normalized_score)),
    ]
}

fn percent(trend: &MetricTrend) -> String {
    match trend.change {
        Some(delta) => format!("{:.1}% ({:+.1})", trend.latest * 100.0, delta * 100.0),
        None => format!("{:.1}%", trend.latest * 100.0),
    }
}

fn score(trend: &MetricTrend) -> String {
    match trend.change {
        Some(delta) => format!("{:.2} ({:+.2})", trend.latest, delta),
        None => format!("{:.2}", trend.latest),
    }
}
