//! The `testmetrics init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("testmetrics.toml").exists() {
        println!("testmetrics.toml already exists, skipping.");
    } else {
        std::fs::write("testmetrics.toml", SAMPLE_CONFIG)?;
        println!("Created testmetrics.toml");
    }

    std::fs::create_dir_all("data")?;
    let example_path = std::path::Path::new("data/example.csv");
    if example_path.exists() {
        println!("data/example.csv already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_INPUT)?;
        println!("Created data/example.csv");
    }

    println!("\nNext steps:");
    println!("  1. Edit testmetrics.toml with your marking scheme");
    println!("  2. Run: testmetrics validate --input data/example.csv");
    println!("  3. Run: testmetrics summary --input data/example.csv");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# testmetrics configuration

# Credit per correct answer.
positive_mark = 1.0

# Penalty per wrong answer (a magnitude; subtracted from the score).
negative_mark = 0.25

# Default format for `testmetrics compute`: csv or json.
output_format = "csv"
"#;

const EXAMPLE_INPUT: &str = "\
Date,Quant,,,Verbal,,,Reasoning,,
,Attempted,Wrong,Unattempt,Attempted,Wrong,Unattempt,Attempted,Wrong,Unattempt
1,18,4,7,20,6,5,15,3,10
2,20,3,5,22,5,3,17,4,8
3,21,5,4,19,2,6,0,0,25
";
