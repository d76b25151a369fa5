//! Latest-value summaries over the supplied test sequence.
//!
//! Gives the "latest value with change since the previous test" view that a
//! dashboard shows next to each chart, plus the mean over all tests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::engine::{Metric, MetricsTable, OverallField};

/// Latest value of one metric series, with context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricTrend {
    /// Value in the last row.
    pub latest: f64,
    /// `latest` minus the value in the previous row; `None` with a single row.
    pub change: Option<f64>,
    /// Mean over every row.
    pub mean: f64,
}

impl MetricTrend {
    /// Summarize a series. Returns `None` for an empty series.
    pub fn from_series(values: &[f64]) -> Option<Self> {
        let latest = *values.last()?;
        let change = values
            .len()
            .checked_sub(2)
            .map(|prev| latest - values[prev]);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Some(Self {
            latest,
            change,
            mean,
        })
    }
}

/// Trends of the headline metrics for one subject or for the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreTrends {
    pub accuracy: MetricTrend,
    pub attempt_ratio: MetricTrend,
    pub net_score: MetricTrend,
    pub normalized_score: MetricTrend,
}

/// Summary of a whole metrics table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    /// Number of tests summarized.
    pub tests: usize,
    /// Test number of the last row.
    pub latest_test_number: f64,
    /// Per-subject trends, keyed by subject.
    pub per_subject: BTreeMap<String, ScoreTrends>,
    /// Trends of the overall metrics.
    pub overall: ScoreTrends,
}

/// Summarize a metrics table. Returns `None` when the table has no rows.
pub fn summarize(table: &MetricsTable) -> Option<MetricsSummary> {
    let latest = table.latest()?;

    let mut per_subject = BTreeMap::new();
    for subject in table.subjects() {
        let trend = |metric: Metric| -> Option<MetricTrend> {
            MetricTrend::from_series(&table.series(&metric.column_for(subject))?)
        };
        per_subject.insert(
            subject.clone(),
            ScoreTrends {
                accuracy: trend(Metric::Accuracy)?,
                attempt_ratio: trend(Metric::AttemptRatio)?,
                net_score: trend(Metric::NetScore)?,
                normalized_score: trend(Metric::NormalizedScore)?,
            },
        );
    }

    let trend = |field: OverallField| -> Option<MetricTrend> {
        MetricTrend::from_series(&table.series(field.as_str())?)
    };
    let overall = ScoreTrends {
        accuracy: trend(OverallField::Accuracy)?,
        attempt_ratio: trend(OverallField::AttemptRatio)?,
        net_score: trend(OverallField::NetScore)?,
        normalized_score: trend(OverallField::NormalizedScore)?,
    };

    Some(MetricsSummary {
        tests: table.len(),
        latest_test_number: latest.test_number(),
        per_subject,
        overall,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute;
    use crate::model::{MarkingScheme, NormalizedTable};
    use crate::normalizer::{normalize, RawTable};

    fn metrics(rows: &[&[&str]]) -> MetricsTable {
        let header = vec![
            vec!["date", "math", "math", "math", "verbal", "verbal", "verbal"],
            vec!["", "attempted", "wrong", "unattempt", "attempted", "wrong", "unattempt"],
        ];
        let raw = RawTable::new(
            header
                .into_iter()
                .map(|l| l.into_iter().map(String::from).collect())
                .collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        );
        let table: NormalizedTable = normalize(&raw).unwrap();
        compute(&table, &MarkingScheme::default())
    }

    #[test]
    fn trend_of_series() {
        let t = MetricTrend::from_series(&[0.5, 0.75, 1.0]).unwrap();
        assert_eq!(t.latest, 1.0);
        assert_eq!(t.change, Some(0.25));
        assert_eq!(t.mean, 0.75);

        let single = MetricTrend::from_series(&[0.4]).unwrap();
        assert_eq!(single.change, None);
        assert_eq!(single.mean, 0.4);

        assert!(MetricTrend::from_series(&[]).is_none());
    }

    #[test]
    fn summarizes_latest_row_with_change() {
        let table = metrics(&[
            &["1", "8", "2", "2", "5", "0", "5"],
            &["3", "10", "0", "0", "4", "2", "6"],
        ]);
        let summary = summarize(&table).unwrap();
        assert_eq!(summary.tests, 2);
        assert_eq!(summary.latest_test_number, 3.0);

        let math = &summary.per_subject["math"];
        assert_eq!(math.accuracy.latest, 1.0);
        assert_eq!(math.accuracy.change, Some(0.25));
        assert_eq!(math.net_score.latest, 10.0);

        // 14 attempted, 2 wrong, 6 unattempted in the second test.
        let overall = &summary.overall;
        assert!((overall.attempt_ratio.latest - 0.7).abs() < 1e-9);
        assert!((overall.net_score.latest - 11.5).abs() < 1e-9);
        assert!((overall.net_score.change.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_table_has_no_summary() {
        let table = metrics(&[]);
        assert!(summarize(&table).is_none());
    }
}
