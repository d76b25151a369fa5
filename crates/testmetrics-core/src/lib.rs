//! testmetrics-core — Schema normalizer and metrics engine.
//!
//! This crate turns per-test raw counters (attempted, wrong, unattempted
//! questions per subject) into accuracy, attempt-ratio, net-score and
//! normalized-score series, per subject and overall.
//!
//! The pipeline is strictly linear: [`source`] reads a two-level-header CSV
//! into a [`normalizer::RawTable`], [`normalizer::normalize`] validates it into
//! typed records, and [`engine::compute`] derives the metrics.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalizer;
pub mod source;
pub mod summary;

pub use engine::{compute, MetricsTable};
pub use error::{ErrorKind, MarkingError, NormalizeError};
pub use model::{MarkingScheme, NormalizedTable};
pub use normalizer::{normalize, RawTable};
