//! The `testmetrics validate` command.

use std::path::PathBuf;

use anyhow::Result;

use super::load_table;

pub fn execute(input: PathBuf) -> Result<()> {
    let table = load_table(&input)?;

    println!("Input: {} ({} tests)", input.display(), table.len());
    println!("Subjects: {}", table.subjects.join(", "));
    println!("Columns: {}", table.column_names().join(", "));

    if table.is_empty() {
        println!("\nWARNING: no test rows found.");
    } else {
        println!("\nInput valid.");
    }

    Ok(())
}
