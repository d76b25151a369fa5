//! JSON series output for chart consumption.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use testmetrics_core::summary::{summarize, MetricsSummary};
use testmetrics_core::MetricsTable;

/// One named column of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Every column of a metrics table as an array, in column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSeries {
    /// Subjects, sorted.
    pub subjects: Vec<String>,
    pub positive_mark: f64,
    pub negative_mark: f64,
    /// The x-axis.
    pub test_number: Vec<f64>,
    /// All output columns, including `test_number`.
    pub columns: Vec<NamedSeries>,
    /// Latest values with change since the previous test.
    pub summary: Option<MetricsSummary>,
}

impl MetricsSeries {
    pub fn from_table(table: &MetricsTable) -> Result<Self> {
        let columns = table
            .columns()
            .into_iter()
            .map(|name| {
                table
                    .series(name)
                    .map(|values| NamedSeries {
                        name: name.to_string(),
                        values,
                    })
                    .with_context(|| format!("column '{name}' is missing values"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            subjects: table.subjects().to_vec(),
            positive_mark: table.scheme().positive_mark(),
            negative_mark: table.scheme().negative_mark(),
            test_number: table.test_numbers(),
            columns,
            summary: summarize(table),
        })
    }

    /// Values of a named column.
    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }
}

/// Render the table as pretty-printed JSON series.
pub fn generate_series_json(table: &MetricsTable) -> Result<String> {
    let series = MetricsSeries::from_table(table)?;
    serde_json::to_string_pretty(&series).context("failed to serialize metrics series")
}

/// Write the JSON series to a file, creating parent directories.
pub fn write_series_report(table: &MetricsTable, path: &Path) -> Result<()> {
    let json = generate_series_json(table)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write series report to {}", path.display()))?;
    Ok(())
}

/// Load series previously written by [`write_series_report`].
pub fn load_series_json(path: &Path) -> Result<MetricsSeries> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read series from {}", path.display()))?;
    serde_json::from_str(&content).context("failed to parse series JSON")
}
