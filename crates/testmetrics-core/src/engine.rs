//! Metrics engine.
//!
//! Derives per-subject and overall metrics for every test row. The
//! computation is row-wise with no cross-row dependency and no state: the
//! same table and marking scheme always produce the same output.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::{Column, MarkingScheme, NormalizedTable, SubjectCounters, TestRecord};

/// Divide, substituting 1 for a zero denominator.
///
/// A zero numerator over a zero denominator therefore yields 0, never NaN.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    let denominator = if denominator == 0.0 { 1.0 } else { denominator };
    numerator / denominator
}

/// A derived per-subject metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Total,
    Correct,
    Accuracy,
    AttemptRatio,
    NetScore,
    NormalizedScore,
}

impl Metric {
    /// All metrics, in output column order.
    pub const ALL: [Metric; 6] = [
        Metric::Total,
        Metric::Correct,
        Metric::Accuracy,
        Metric::AttemptRatio,
        Metric::NetScore,
        Metric::NormalizedScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Total => "total",
            Metric::Correct => "correct",
            Metric::Accuracy => "accuracy",
            Metric::AttemptRatio => "attempt_ratio",
            Metric::NetScore => "net_score",
            Metric::NormalizedScore => "normalized_score",
        }
    }

    /// Column name of this metric for `subject`.
    pub fn column_for(&self, subject: &str) -> String {
        format!("{subject}_{}", self.as_str())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .iter()
            .find(|m| m.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown metric: {s}"))
    }
}

/// Metrics derived from one set of counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub total: f64,
    pub correct: f64,
    pub accuracy: f64,
    pub attempt_ratio: f64,
    pub net_score: f64,
    pub normalized_score: f64,
}

impl DerivedMetrics {
    /// Derive metrics from raw counters.
    ///
    /// `correct` is not clamped: `wrong > attempted` yields a negative value
    /// that flows into the scores.
    pub fn from_counters(counters: &SubjectCounters, scheme: &MarkingScheme) -> Self {
        let total = counters.attempted + counters.unattempt;
        let correct = counters.attempted - counters.wrong;
        let net_score = scheme.net_score(correct, counters.wrong);
        Self {
            total,
            correct,
            accuracy: safe_div(correct, counters.attempted),
            attempt_ratio: safe_div(counters.attempted, total),
            net_score,
            normalized_score: safe_div(net_score, total),
        }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Total => self.total,
            Metric::Correct => self.correct,
            Metric::Accuracy => self.accuracy,
            Metric::AttemptRatio => self.attempt_ratio,
            Metric::NetScore => self.net_score,
            Metric::NormalizedScore => self.normalized_score,
        }
    }
}

/// An aggregate column computed across all subjects of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallField {
    TotalAttempted,
    TotalUnattempt,
    TotalWrong,
    TotalCorrect,
    TotalQuestions,
    Accuracy,
    AttemptRatio,
    NetScore,
    NormalizedScore,
}

impl OverallField {
    /// All aggregate columns, in output column order.
    pub const ALL: [OverallField; 9] = [
        OverallField::TotalAttempted,
        OverallField::TotalUnattempt,
        OverallField::TotalWrong,
        OverallField::TotalCorrect,
        OverallField::TotalQuestions,
        OverallField::Accuracy,
        OverallField::AttemptRatio,
        OverallField::NetScore,
        OverallField::NormalizedScore,
    ];

    /// Output column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallField::TotalAttempted => "total_attempted",
            OverallField::TotalUnattempt => "total_unattempt",
            OverallField::TotalWrong => "total_wrong",
            OverallField::TotalCorrect => "total_correct",
            OverallField::TotalQuestions => "total_questions",
            OverallField::Accuracy => "overall_accuracy",
            OverallField::AttemptRatio => "overall_attempt_ratio",
            OverallField::NetScore => "overall_net_score",
            OverallField::NormalizedScore => "overall_normalized_score",
        }
    }
}

/// Aggregate metrics for one row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallMetrics {
    pub total_attempted: f64,
    pub total_unattempt: f64,
    pub total_wrong: f64,
    pub total_correct: f64,
    pub total_questions: f64,
    pub accuracy: f64,
    pub attempt_ratio: f64,
    pub net_score: f64,
    pub normalized_score: f64,
}

impl OverallMetrics {
    /// Sum counters across subjects, then derive exactly as for one subject.
    pub fn from_record(record: &TestRecord, scheme: &MarkingScheme) -> Self {
        let summed = record
            .subjects
            .values()
            .fold(SubjectCounters::default(), |acc, c| {
                SubjectCounters::new(
                    acc.attempted + c.attempted,
                    acc.wrong + c.wrong,
                    acc.unattempt + c.unattempt,
                )
            });
        let derived = DerivedMetrics::from_counters(&summed, scheme);
        Self {
            total_attempted: summed.attempted,
            total_unattempt: summed.unattempt,
            total_wrong: summed.wrong,
            total_correct: derived.correct,
            total_questions: derived.total,
            accuracy: derived.accuracy,
            attempt_ratio: derived.attempt_ratio,
            net_score: derived.net_score,
            normalized_score: derived.normalized_score,
        }
    }

    pub fn get(&self, field: OverallField) -> f64 {
        match field {
            OverallField::TotalAttempted => self.total_attempted,
            OverallField::TotalUnattempt => self.total_unattempt,
            OverallField::TotalWrong => self.total_wrong,
            OverallField::TotalCorrect => self.total_correct,
            OverallField::TotalQuestions => self.total_questions,
            OverallField::Accuracy => self.accuracy,
            OverallField::AttemptRatio => self.attempt_ratio,
            OverallField::NetScore => self.net_score,
            OverallField::NormalizedScore => self.normalized_score,
        }
    }
}

/// One input row with its derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRow {
    pub record: TestRecord,
    /// Derived metrics keyed by subject.
    pub subjects: BTreeMap<String, DerivedMetrics>,
    pub overall: OverallMetrics,
}

impl MetricsRow {
    pub fn test_number(&self) -> f64 {
        self.record.test_number
    }

    fn value(&self, source: &ColumnSource) -> Option<f64> {
        match source {
            ColumnSource::Input(column) => self.record.value(column),
            ColumnSource::Subject { subject, metric } => {
                self.subjects.get(subject).map(|m| m.get(*metric))
            }
            ColumnSource::Overall(field) => Some(self.overall.get(*field)),
        }
    }
}

/// Where an output column's values come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSource {
    Input(Column),
    Subject { subject: String, metric: Metric },
    Overall(OverallField),
}

/// A named output column.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputColumn {
    pub name: String,
    pub source: ColumnSource,
}

/// The input table augmented with every derived column.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsTable {
    subjects: Vec<String>,
    scheme: MarkingScheme,
    columns: Vec<OutputColumn>,
    index: HashMap<String, usize>,
    rows: Vec<MetricsRow>,
}

impl MetricsTable {
    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn scheme(&self) -> &MarkingScheme {
        &self.scheme
    }

    pub fn rows(&self) -> &[MetricsRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Output columns in order.
    pub fn output_columns(&self) -> &[OutputColumn] {
        &self.columns
    }

    /// Output column names in order.
    pub fn columns(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// The value of a named column in a given row.
    pub fn value(&self, row: usize, column: &str) -> Option<f64> {
        let col = &self.columns[*self.index.get(column)?];
        self.rows.get(row)?.value(&col.source)
    }

    /// All values of a named column, in row order.
    pub fn series(&self, column: &str) -> Option<Vec<f64>> {
        let col = &self.columns[*self.index.get(column)?];
        self.rows.iter().map(|r| r.value(&col.source)).collect()
    }

    /// Values of every output column for one row, in column order.
    pub fn row_values(&self, row: usize) -> Option<Vec<f64>> {
        let row = self.rows.get(row)?;
        self.columns.iter().map(|c| row.value(&c.source)).collect()
    }

    pub fn test_numbers(&self) -> Vec<f64> {
        self.rows.iter().map(MetricsRow::test_number).collect()
    }

    /// The most recent test (the last row in input order).
    pub fn latest(&self) -> Option<&MetricsRow> {
        self.rows.last()
    }
}

/// Derive all metrics for every row of `table`.
///
/// Rows keep their input order. The input table is not modified.
pub fn compute(table: &NormalizedTable, scheme: &MarkingScheme) -> MetricsTable {
    let columns = output_layout(table);
    let index = columns
        .iter()
        .enumerate()
        .map(|(i, c)| (c.name.clone(), i))
        .collect();

    let rows: Vec<MetricsRow> = table
        .records
        .iter()
        .map(|record| {
            // `normalize` gives every record a counter set for every subject.
            debug_assert!(
                table.subjects.iter().all(|s| record.subjects.contains_key(s)),
                "test {} is missing counters for a subject",
                record.test_number
            );
            MetricsRow {
                subjects: table
                    .subjects
                    .iter()
                    .filter_map(|s| {
                        record
                            .subjects
                            .get(s)
                            .map(|c| (s.clone(), DerivedMetrics::from_counters(c, scheme)))
                    })
                    .collect(),
                overall: OverallMetrics::from_record(record, scheme),
                record: record.clone(),
            }
        })
        .collect();

    tracing::debug!(
        rows = rows.len(),
        subjects = table.subjects.len(),
        positive_mark = scheme.positive_mark(),
        negative_mark = scheme.negative_mark(),
        "computed metrics"
    );

    MetricsTable {
        subjects: table.subjects.clone(),
        scheme: *scheme,
        columns,
        index,
        rows,
    }
}

/// Input columns first, then derived columns. A derived column whose name is
/// already taken by an input column replaces that column's values in place.
/// Derived names never collide with each other: the normalizer rejects
/// `overall` as a subject and keeps `total` out of the subject set.
fn output_layout(table: &NormalizedTable) -> Vec<OutputColumn> {
    let mut columns: Vec<OutputColumn> = table
        .columns
        .iter()
        .map(|c| OutputColumn {
            name: c.name(),
            source: ColumnSource::Input(c.clone()),
        })
        .collect();

    let derived = table
        .subjects
        .iter()
        .flat_map(|s| {
            Metric::ALL.iter().map(move |m| OutputColumn {
                name: m.column_for(s),
                source: ColumnSource::Subject {
                    subject: s.clone(),
                    metric: *m,
                },
            })
        })
        .chain(OverallField::ALL.iter().map(|f| OutputColumn {
            name: f.as_str().to_string(),
            source: ColumnSource::Overall(*f),
        }))
        .collect::<Vec<_>>();

    for column in derived {
        match columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => {
                debug_assert!(
                    matches!(existing.source, ColumnSource::Input(_)),
                    "derived column {} defined twice",
                    column.name
                );
                tracing::debug!(column = %column.name, "derived column replaces input column");
                existing.source = column.source;
            }
            None => columns.push(column),
        }
    }

    columns
}
