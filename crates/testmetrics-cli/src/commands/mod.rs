pub mod compute;
pub mod init;
pub mod summary;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};

use testmetrics_core::config::{load_config_from, MetricsConfig};
use testmetrics_core::{normalize, source, MarkingScheme, NormalizedTable};

use crate::MarkArgs;

/// Read and normalize an input CSV.
pub fn load_table(input: &Path) -> Result<NormalizedTable> {
    let raw = source::read_csv_file(input)?;
    let table = normalize(&raw).with_context(|| format!("invalid input {}", input.display()))?;
    tracing::info!(
        tests = table.len(),
        subjects = table.subjects.len(),
        "loaded {}",
        input.display()
    );
    Ok(table)
}

/// Resolve config and CLI overrides into a validated marking scheme.
pub fn resolve_scheme(marks: &MarkArgs) -> Result<(MetricsConfig, MarkingScheme)> {
    let mut config = load_config_from(marks.config.as_deref())?;
    if let Some(p) = marks.positive_mark {
        config.positive_mark = p;
    }
    if let Some(n) = marks.negative_mark {
        config.negative_mark = n;
    }
    let scheme = config
        .marking_scheme()
        .context("invalid marking scheme")?;
    Ok((config, scheme))
}
