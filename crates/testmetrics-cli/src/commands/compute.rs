//! The `testmetrics compute` command.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

use testmetrics_core::compute;
use testmetrics_core::config::OutputFormat;
use testmetrics_report::series::{generate_series_json, write_series_report};
use testmetrics_report::table::{write_csv_report, write_metrics_csv};

use super::{load_table, resolve_scheme};
use crate::MarkArgs;

pub fn execute(
    input: PathBuf,
    output: Option<PathBuf>,
    format: Option<String>,
    marks: MarkArgs,
) -> Result<()> {
    let (config, scheme) = resolve_scheme(&marks)?;
    let format = match format {
        Some(f) => f
            .parse::<OutputFormat>()
            .map_err(|e| anyhow::anyhow!("{}", e))?,
        None => config.output_format,
    };

    let table = load_table(&input)?;
    let metrics = compute(&table, &scheme);
    tracing::info!(
        positive_mark = scheme.positive_mark(),
        negative_mark = scheme.negative_mark(),
        "computed metrics for {} tests",
        metrics.len()
    );

    match (output, format) {
        (Some(path), OutputFormat::Csv) => {
            write_csv_report(&metrics, &path)?;
            eprintln!("Metrics written to: {}", path.display());
        }
        (Some(path), OutputFormat::Json) => {
            write_series_report(&metrics, &path)?;
            eprintln!("Series written to: {}", path.display());
        }
        (None, OutputFormat::Csv) => {
            let stdout = std::io::stdout();
            write_metrics_csv(&metrics, stdout.lock())?;
        }
        (None, OutputFormat::Json) => {
            let json = generate_series_json(&metrics)?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    Ok(())
}
