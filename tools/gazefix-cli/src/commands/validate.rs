//! Validate a gaze sample file.

use std::path::PathBuf;

use gazefix_gaze_model::{validate_samples, DataFormat, GazeSample};

pub fn run(input: PathBuf, format: Option<DataFormat>) -> anyhow::Result<()> {
    println!("Validating samples at: {}", input.display());

    let mut samples: Vec<GazeSample> = Vec::new();
    let mut parse_errors = Vec::new();

    let mut reader = super::open_samples(&input, format)?;
    for record in reader.by_ref() {
        match record {
            Ok(sample) => samples.push(sample),
            Err(e) => parse_errors.push(e),
        }
    }

    println!("  Lines read: {}", reader.lines_read());
    println!("  Samples: {}", samples.len());
    if let (Some(first), Some(last)) = (samples.first(), samples.last()) {
        println!(
            "  Time span: {:.3}s .. {:.3}s",
            first.timestamp, last.timestamp
        );
    }

    let issues = validate_samples(&samples);
    let total = parse_errors.len() + issues.len();
    if total == 0 {
        println!("\nSamples are valid.");
        return Ok(());
    }

    println!("\nValidation issues:");
    for error in &parse_errors {
        println!("  - {error}");
    }
    for issue in &issues {
        println!("  - {issue}");
    }

    anyhow::bail!("{total} issue(s) found in {}", input.display())
}
