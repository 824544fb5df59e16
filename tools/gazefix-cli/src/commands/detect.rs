//! Detect fixations in a recorded sample stream.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use gazefix_common::config::{AppConfig, TrailingPolicy};
use gazefix_fixation_core::{DetectionStats, FixationSegmenter, IdtConfig};
use gazefix_gaze_model::{DataFormat, Fixation, FixationSummary, FixationWriter, SampleReader};
use serde::Serialize;

pub struct DetectArgs {
    pub input: PathBuf,
    pub input_format: Option<DataFormat>,
    pub output: Option<PathBuf>,
    pub format: Option<DataFormat>,
    pub min_points: Option<usize>,
    pub min_size: Option<f64>,
    pub max_size: Option<f64>,
    pub flush_trailing: bool,
    pub report: Option<PathBuf>,
}

/// JSON run report written by `--report`.
#[derive(Debug, Serialize)]
struct RunReport {
    generated_at: DateTime<Utc>,
    input: PathBuf,
    output: Option<PathBuf>,
    config: IdtConfig,
    stats: DetectionStats,
    summary: FixationSummary,
}

pub fn run(args: DetectArgs, app: &AppConfig) -> anyhow::Result<()> {
    let config = effective_config(&args, app);
    let segmenter = FixationSegmenter::new(config)
        .map_err(|e| anyhow::anyhow!("Invalid detection parameters: {e}"))?;
    let samples = super::open_samples(&args.input, args.input_format)?;

    let format = args.format.unwrap_or_else(|| {
        args.output
            .as_deref()
            .map(DataFormat::from_path)
            .unwrap_or_default()
    });

    tracing::info!(
        input = %args.input.display(),
        min_points = config.min_points_per_fixation,
        min_size = config.min_fixation_size,
        max_size = config.max_fixation_size,
        "Detecting fixations"
    );

    let Segmented {
        fixations,
        stats,
        non_finite,
    } = match &args.output {
        Some(path) => {
            let mut writer = FixationWriter::create(path, format)
                .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", path.display()))?;
            segment(&args.input, samples, segmenter, &mut writer)?
        }
        None => {
            let mut writer = FixationWriter::new(io::stdout().lock(), format)
                .map_err(|e| anyhow::anyhow!("Failed to write to stdout: {e}"))?;
            segment(&args.input, samples, segmenter, &mut writer)?
        }
    };

    let summary = FixationSummary::from_fixations(&fixations);
    tracing::info!(
        samples = stats.samples,
        fixations = stats.fixations,
        discarded = stats.discarded_at_end,
        "Detection finished"
    );

    if let Some(path) = &args.output {
        println!("Detected {} fixation(s) in {}", summary.count, args.input.display());
        println!("  Samples: {}", stats.samples);
        if non_finite > 0 {
            println!("  Skipped (non-finite): {non_finite}");
        }
        println!("  In fixations: {}", stats.samples_in_fixations);
        println!("  Open at end of input: {}", stats.discarded_at_end);
        println!("  Total duration: {:.3}s", summary.total_duration);
        println!("  Mean duration: {:.3}s", summary.mean_duration);
        println!("  Longest: {:.3}s", summary.longest_duration);
        println!("  Output: {}", path.display());
    }

    if let Some(report_path) = &args.report {
        let report = RunReport {
            generated_at: Utc::now(),
            input: args.input.clone(),
            output: args.output.clone(),
            config,
            stats,
            summary,
        };
        write_report(report_path, &report)?;
    }

    Ok(())
}

/// Detection parameters: config file values overridden by flags.
fn effective_config(args: &DetectArgs, app: &AppConfig) -> IdtConfig {
    let mut config = IdtConfig::from(&app.detection);
    if let Some(points) = args.min_points {
        config.min_points_per_fixation = points;
    }
    if let Some(size) = args.min_size {
        config.min_fixation_size = size;
    }
    if let Some(size) = args.max_size {
        config.max_fixation_size = size;
    }
    if args.flush_trailing {
        config.trailing = TrailingPolicy::Flush;
    }
    config
}

/// Outcome of one pass over a sample stream.
#[derive(Debug)]
struct Segmented {
    fixations: Vec<Fixation>,
    stats: DetectionStats,
    /// Samples skipped before segmentation.
    non_finite: usize,
}

/// Stream every sample through the segmenter, writing fixations as they close.
/// Samples with non-finite fields are skipped.
fn segment<R: BufRead, W: Write>(
    input: &Path,
    samples: SampleReader<R>,
    mut segmenter: FixationSegmenter,
    writer: &mut FixationWriter<W>,
) -> anyhow::Result<Segmented> {
    let mut fixations = Vec::new();
    let mut last_timestamp = f64::NEG_INFINITY;
    let mut out_of_order = 0usize;
    let mut non_finite = 0usize;

    for record in samples {
        let sample =
            record.map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", input.display()))?;

        // NaN directions would slip past the bounds test and poison the mean.
        if !sample.is_finite() {
            non_finite += 1;
            continue;
        }

        if sample.timestamp < last_timestamp {
            out_of_order += 1;
        }
        last_timestamp = sample.timestamp;

        if let Some(fixation) = segmenter.push(sample) {
            writer
                .write_fixation(&fixation)
                .map_err(|e| anyhow::anyhow!("Failed to write fixation: {e}"))?;
            fixations.push(fixation);
        }
    }

    if non_finite > 0 {
        tracing::warn!(
            count = non_finite,
            "Skipped samples with non-finite timestamp, direction or origin"
        );
    }
    if out_of_order > 0 {
        tracing::warn!(
            count = out_of_order,
            "Timestamps decreased; samples were segmented in file order"
        );
    }

    let end = segmenter.finish();
    if let Some(fixation) = end.trailing {
        writer
            .write_fixation(&fixation)
            .map_err(|e| anyhow::anyhow!("Failed to write fixation: {e}"))?;
        fixations.push(fixation);
    }

    writer
        .flush()
        .map_err(|e| anyhow::anyhow!("Failed to flush output: {e}"))?;

    Ok(Segmented {
        fixations,
        stats: end.stats,
        non_finite,
    })
}

fn write_report(path: &Path, report: &RunReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)
        .map_err(|e| anyhow::anyhow!("Failed to write report {}: {e}", path.display()))?;
    tracing::debug!("Report written to {}", path.display());
    Ok(())
}
