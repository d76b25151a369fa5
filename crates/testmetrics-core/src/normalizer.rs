//! Schema normalizer.
//!
//! Turns a raw table with a two-level `subject / field` header into typed
//! [`TestRecord`]s, validating the header layout and coercing every cell to a
//! number. The first fatal condition aborts the load.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::NormalizeError;
use crate::model::{
    Column, CounterField, NormalizedTable, SubjectCounters, TestRecord, DATE_LABEL,
    OVERALL_PREFIX, RESERVED_PREFIXES, TEST_NUMBER_COLUMN,
};

/// Number of header levels the input must carry.
pub const HEADER_LEVELS: usize = 2;

/// Untyped tabular input as it arrives from a data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    /// Header levels, outermost first. Each level holds one label per column.
    pub header: Vec<Vec<String>>,
    /// Data rows, in chronological order.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(header: Vec<Vec<String>>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }
}

/// Column layout resolved from the header.
#[derive(Debug)]
struct Layout {
    columns: Vec<Column>,
    subjects: Vec<String>,
}

/// Normalize a raw table into typed records plus the sorted subject set.
pub fn normalize(raw: &RawTable) -> Result<NormalizedTable, NormalizeError> {
    let layout = parse_header(&raw.header)?;
    let width = layout.columns.len();

    // Blank rows after the last test are export padding. Any other blank
    // row fails the numeric check below.
    let body = raw
        .rows
        .iter()
        .rposition(|cells| !is_blank(cells))
        .map_or(0, |last| last + 1);
    if body < raw.rows.len() {
        tracing::warn!(
            first_row = body + 1,
            count = raw.rows.len() - body,
            "ignoring trailing blank rows"
        );
    }

    let mut records = Vec::with_capacity(body);
    for (idx, cells) in raw.rows[..body].iter().enumerate() {
        let row = idx + 1;
        if cells.len() != width {
            return Err(NormalizeError::RowWidth {
                row,
                expected: width,
                found: cells.len(),
            });
        }
        records.push(parse_row(row, cells, &layout)?);
    }

    tracing::debug!(
        subjects = ?layout.subjects,
        columns = width,
        rows = records.len(),
        "normalized input table"
    );

    Ok(NormalizedTable {
        columns: layout.columns,
        subjects: layout.subjects,
        records,
    })
}

/// Resolve the two header levels into typed columns.
fn parse_header(header: &[Vec<String>]) -> Result<Layout, NormalizeError> {
    if header.len() != HEADER_LEVELS {
        return Err(NormalizeError::Header(format!(
            "expected {HEADER_LEVELS} header levels, found {}",
            header.len()
        )));
    }
    let (top, bottom) = (&header[0], &header[1]);
    if top.len() != bottom.len() {
        return Err(NormalizeError::Header(format!(
            "header levels differ in width ({} vs {})",
            top.len(),
            bottom.len()
        )));
    }
    if top.is_empty() {
        return Err(NormalizeError::Header("header has no columns".into()));
    }

    let mut columns = Vec::with_capacity(top.len());
    let mut seen_names: HashSet<String> = HashSet::new();
    let mut date_column: Option<usize> = None;
    let mut subject_fields: BTreeMap<String, BTreeSet<CounterField>> = BTreeMap::new();
    let mut previous: Option<String> = None;

    for (idx, (top_label, field_label)) in top.iter().zip(bottom).enumerate() {
        let position = idx + 1;
        let mut label = top_label.trim().to_lowercase();

        // Merged header cells export as a label followed by blanks.
        if label.is_empty() {
            match &previous {
                Some(prev) if prev != DATE_LABEL => label = prev.clone(),
                _ => {
                    return Err(NormalizeError::BlankLabel {
                        level: "first",
                        column: position,
                    })
                }
            }
        }
        previous = Some(label.clone());

        if label == DATE_LABEL {
            if let Some(first) = date_column {
                return Err(NormalizeError::MultipleDateColumns {
                    first,
                    second: position,
                });
            }
            date_column = Some(position);
            insert_name(&mut seen_names, TEST_NUMBER_COLUMN)?;
            columns.push(Column::TestNumber);
            continue;
        }

        let field = field_label.trim().to_lowercase();
        if field.is_empty() {
            return Err(NormalizeError::BlankLabel {
                level: "second",
                column: position,
            });
        }
        let name = format!("{label}_{field}");
        insert_name(&mut seen_names, &name)?;

        if RESERVED_PREFIXES.contains(&label.as_str()) {
            columns.push(Column::Extra(name));
            continue;
        }
        if label == OVERALL_PREFIX {
            return Err(NormalizeError::ReservedSubject(label));
        }

        let fields = subject_fields.entry(label.clone()).or_default();
        match field.parse::<CounterField>() {
            Ok(counter) => {
                fields.insert(counter);
                columns.push(Column::Counter {
                    subject: label,
                    field: counter,
                });
            }
            Err(_) => columns.push(Column::Extra(name)),
        }
    }

    if date_column.is_none() {
        return Err(NormalizeError::MissingDateColumn);
    }

    for (subject, fields) in &subject_fields {
        if let Some(missing) = CounterField::ALL.iter().find(|f| !fields.contains(f)) {
            return Err(NormalizeError::MissingField {
                subject: subject.clone(),
                field: missing.as_str(),
            });
        }
    }

    Ok(Layout {
        columns,
        subjects: subject_fields.into_keys().collect(),
    })
}

fn is_blank(cells: &[String]) -> bool {
    cells.iter().all(|c| c.trim().is_empty())
}

fn insert_name(seen: &mut HashSet<String>, name: &str) -> Result<(), NormalizeError> {
    if !seen.insert(name.to_string()) {
        return Err(NormalizeError::DuplicateColumn(name.to_string()));
    }
    Ok(())
}

fn parse_row(row: usize, cells: &[String], layout: &Layout) -> Result<TestRecord, NormalizeError> {
    let mut test_number = 0.0;
    let mut subjects: BTreeMap<String, SubjectCounters> = BTreeMap::new();
    let mut extra = BTreeMap::new();

    for (column, cell) in layout.columns.iter().zip(cells) {
        let value = parse_number(row, column, cell)?;
        match column {
            Column::TestNumber => test_number = value,
            Column::Counter { subject, field } => {
                if value < 0.0 {
                    return Err(NormalizeError::NegativeCount {
                        row,
                        column: column.name(),
                        value,
                    });
                }
                subjects
                    .entry(subject.clone())
                    .or_default()
                    .set(*field, value);
            }
            Column::Extra(name) => {
                extra.insert(name.clone(), value);
            }
        }
    }

    Ok(TestRecord {
        test_number,
        subjects,
        extra,
    })
}

fn parse_number(row: usize, column: &Column, cell: &str) -> Result<f64, NormalizeError> {
    let trimmed = cell.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(NormalizeError::NotNumeric {
            row,
            column: column.name(),
            value: trimmed.to_string(),
        }),
    }
}
