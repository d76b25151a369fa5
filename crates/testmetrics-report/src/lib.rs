//! testmetrics-report — Output writers for metrics tables.
//!
//! [`table`] writes the augmented table as flat CSV; [`series`] writes one
//! JSON array per column for chart consumption.

pub mod series;
pub mod table;

#[cfg(test)]
pub(crate) mod fixtures {
    use testmetrics_core::{compute, normalize, MarkingScheme, MetricsTable, RawTable};

    pub fn sample_table() -> MetricsTable {
        let header = [
            ["date", "math", "math", "math", "verbal", "verbal", "verbal"],
            ["", "attempted", "wrong", "unattempt", "attempted", "wrong", "unattempt"],
        ];
        let rows = [
            ["1", "8", "2", "2", "5", "0", "5"],
            ["2", "0", "0", "10", "6", "1", "4"],
        ];
        let raw = RawTable::new(
            header
                .iter()
                .map(|l| l.iter().map(|s| s.to_string()).collect())
                .collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        );
        compute(&normalize(&raw).unwrap(), &MarkingScheme::default())
    }
}
