//! Flat CSV output of the augmented table.
//!
//! One header row of column names (`test_number`, raw counters,
//! `{subject}_{metric}`, `total_*`, `overall_{metric}`), then one row per test.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use testmetrics_core::MetricsTable;

/// Format a value with the shortest representation that round-trips.
/// Whole numbers print without a fractional part.
pub fn format_value(value: f64) -> String {
    // Avoid printing "-0" for a zero that picked up a sign.
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value}")
}

/// Write the table as CSV to any writer.
pub fn write_metrics_csv<W: Write>(table: &MetricsTable, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.columns())
        .context("failed to write CSV header")?;

    for row in 0..table.len() {
        let values = table
            .row_values(row)
            .with_context(|| format!("row {} is missing values", row + 1))?;
        wtr.write_record(values.into_iter().map(format_value))
            .with_context(|| format!("failed to write CSV row {}", row + 1))?;
    }

    wtr.flush().context("failed to flush CSV output")?;
    Ok(())
}

/// Render the table as a CSV string.
pub fn generate_csv(table: &MetricsTable) -> Result<String> {
    let mut buf = Vec::new();
    write_metrics_csv(table, &mut buf)?;
    String::from_utf8(buf).context("CSV output is not UTF-8")
}

/// Write the table as CSV to a file, creating parent directories.
pub fn write_csv_report(table: &MetricsTable, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_metrics_csv(table, file)
        .with_context(|| format!("failed to write CSV report to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_table;

    #[test]
    fn format_values() {
        assert_eq!(format_value(10.0), "10");
        assert_eq!(format_value(0.55), "0.55");
        assert_eq!(format_value(-0.0), "0");
        assert_eq!(format_value(-4.25), "-4.25");
    }

    #[test]
    fn csv_has_header_and_one_line_per_test() {
        let table = sample_table();
        let csv = generate_csv(&table).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);

        let header: Vec<&str> = lines[0].split(',').collect();
        assert_eq!(header, table.columns());
        assert_eq!(header[0], "test_number");
        assert!(header.contains(&"math_normalized_score"));
        assert!(header.contains(&"overall_net_score"));
    }

    #[test]
    fn csv_values_follow_columns() {
        let table = sample_table();
        let csv = generate_csv(&table).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        let header: Vec<&str> = lines[0].split(',').collect();
        let first: Vec<&str> = lines[1].split(',').collect();
        let second: Vec<&str> = lines[2].split(',').collect();

        let col = |name: &str| header.iter().position(|h| *h == name).unwrap();
        assert_eq!(first[col("math_net_score")], "5.5");
        assert_eq!(first[col("math_normalized_score")], "0.55");
        assert_eq!(first[col("overall_net_score")], "10.5");
        assert_eq!(first[col("overall_normalized_score")], "0.525");
        assert_eq!(second[col("math_accuracy")], "0");
        assert_eq!(second[col("math_total")], "10");
    }

    #[test]
    fn csv_output_is_deterministic() {
        let a = generate_csv(&sample_table()).unwrap();
        let b = generate_csv(&sample_table()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn csv_report_write_to_file() {
        let table = sample_table();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("metrics.csv");

        write_csv_report(&table, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("test_number,"));
    }
}
