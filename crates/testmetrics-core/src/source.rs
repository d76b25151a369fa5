//! CSV source adapter.
//!
//! Reads a spreadsheet export with a two-row header into a [`RawTable`].
//! Layout checks are left to the normalizer so that header and width problems
//! surface as typed schema errors.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;

use crate::normalizer::{RawTable, HEADER_LEVELS};

/// Read a raw table from a CSV file.
pub fn read_csv_file(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open input file: {}", path.display()))?;
    read_csv(file).with_context(|| format!("failed to read CSV: {}", path.display()))
}

/// Read a raw table from any CSV reader. The first two records are the header
/// levels; the rest are data rows.
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut header = Vec::with_capacity(HEADER_LEVELS);
    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("failed to read CSV record {}", idx + 1))?;
        let cells: Vec<String> = record.iter().map(str::to_string).collect();
        if header.len() < HEADER_LEVELS {
            header.push(cells);
        } else {
            rows.push(cells);
        }
    }

    tracing::debug!(
        header_levels = header.len(),
        rows = rows.len(),
        "read CSV input"
    );

    Ok(RawTable::new(header, rows))
}
