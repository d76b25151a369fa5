//! Core data model types for testmetrics.
//!
//! These are the typed records the normalizer builds and the engine consumes:
//! one [`TestRecord`] per administered test, with a fixed set of raw counters
//! per subject.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MarkingError;

/// First-level header label that marks the test ordinal column.
pub const DATE_LABEL: &str = "date";

/// Flat name of the test ordinal column.
pub const TEST_NUMBER_COLUMN: &str = "test_number";

/// First-level labels that are never subjects.
pub const RESERVED_PREFIXES: [&str; 2] = ["test", "total"];

/// Prefix of the aggregate metric columns; cannot name a subject.
pub const OVERALL_PREFIX: &str = "overall";

/// One of the three raw counters every subject carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterField {
    Attempted,
    Wrong,
    Unattempt,
}

impl CounterField {
    /// All counters, in canonical order.
    pub const ALL: [CounterField; 3] = [
        CounterField::Attempted,
        CounterField::Wrong,
        CounterField::Unattempt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CounterField::Attempted => "attempted",
            CounterField::Wrong => "wrong",
            CounterField::Unattempt => "unattempt",
        }
    }
}

impl fmt::Display for CounterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CounterField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "attempted" => Ok(CounterField::Attempted),
            "wrong" => Ok(CounterField::Wrong),
            "unattempt" => Ok(CounterField::Unattempt),
            other => Err(format!("unknown counter field: {other}")),
        }
    }
}

/// Raw counters for one subject in one test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectCounters {
    pub attempted: f64,
    pub wrong: f64,
    pub unattempt: f64,
}

impl SubjectCounters {
    pub fn new(attempted: f64, wrong: f64, unattempt: f64) -> Self {
        Self {
            attempted,
            wrong,
            unattempt,
        }
    }

    pub fn get(&self, field: CounterField) -> f64 {
        match field {
            CounterField::Attempted => self.attempted,
            CounterField::Wrong => self.wrong,
            CounterField::Unattempt => self.unattempt,
        }
    }

    pub(crate) fn set(&mut self, field: CounterField, value: f64) {
        match field {
            CounterField::Attempted => self.attempted = value,
            CounterField::Wrong => self.wrong = value,
            CounterField::Unattempt => self.unattempt = value,
        }
    }
}

/// One administered test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecord {
    /// Ordinal of the test (increasing, not necessarily contiguous).
    pub test_number: f64,
    /// Raw counters keyed by subject name.
    pub subjects: BTreeMap<String, SubjectCounters>,
    /// Passthrough numeric columns keyed by flat column name.
    #[serde(default)]
    pub extra: BTreeMap<String, f64>,
}

impl TestRecord {
    /// Look up the raw value for a normalized column.
    pub fn value(&self, column: &Column) -> Option<f64> {
        match column {
            Column::TestNumber => Some(self.test_number),
            Column::Counter { subject, field } => {
                self.subjects.get(subject).map(|c| c.get(*field))
            }
            Column::Extra(name) => self.extra.get(name).copied(),
        }
    }
}

/// Typed descriptor of a flat input column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    TestNumber,
    Counter { subject: String, field: CounterField },
    Extra(String),
}

impl Column {
    /// Flat column name, e.g. `math_attempted`.
    pub fn name(&self) -> String {
        match self {
            Column::TestNumber => TEST_NUMBER_COLUMN.to_string(),
            Column::Counter { subject, field } => format!("{subject}_{field}"),
            Column::Extra(name) => name.clone(),
        }
    }
}

/// Output of the normalizer: typed columns, subject set, and records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTable {
    /// Input columns, in input order.
    pub columns: Vec<Column>,
    /// Discovered subjects, sorted.
    pub subjects: Vec<String>,
    /// One record per data row, in input order.
    pub records: Vec<TestRecord>,
}

impl NormalizedTable {
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Credit per correct answer and penalty per wrong answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkingScheme {
    positive_mark: f64,
    negative_mark: f64,
}

impl MarkingScheme {
    pub const DEFAULT_POSITIVE_MARK: f64 = 1.0;
    pub const DEFAULT_NEGATIVE_MARK: f64 = 0.25;

    /// Build a scheme. Both marks must be finite and non-negative; the
    /// negative mark is the magnitude subtracted per wrong answer.
    pub fn new(positive_mark: f64, negative_mark: f64) -> Result<Self, MarkingError> {
        check_mark("positive_mark", positive_mark)?;
        check_mark("negative_mark", negative_mark)?;
        Ok(Self {
            positive_mark,
            negative_mark,
        })
    }

    pub fn positive_mark(&self) -> f64 {
        self.positive_mark
    }

    pub fn negative_mark(&self) -> f64 {
        self.negative_mark
    }

    /// `correct * positive_mark - wrong * negative_mark`
    pub fn net_score(&self, correct: f64, wrong: f64) -> f64 {
        correct * self.positive_mark - wrong * self.negative_mark
    }
}

impl Default for MarkingScheme {
    fn default() -> Self {
        Self {
            positive_mark: Self::DEFAULT_POSITIVE_MARK,
            negative_mark: Self::DEFAULT_NEGATIVE_MARK,
        }
    }
}

fn check_mark(name: &'static str, value: f64) -> Result<(), MarkingError> {
    if !value.is_finite() {
        return Err(MarkingError::NotFinite { name, value });
    }
    if value < 0.0 {
        return Err(MarkingError::Negative { name, value });
    }
    Ok(())
}
