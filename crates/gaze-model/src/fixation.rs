//! Fixation records produced by the I-DT segmenter.

use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::sample::GazeSample;
use crate::vector::Vec3;

/// A detected fixation: the time span of a spatially coherent run of
/// samples and the mean gaze ray over that run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fixation {
    /// Timestamp of the first member sample.
    pub start: f64,
    /// Timestamp of the last member sample.
    pub end: f64,
    /// Mean direction.
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Mean ray origin.
    pub origin_x: f64,
    pub origin_y: f64,
    pub origin_z: f64,
}

impl Fixation {
    /// Summarize a run of samples. Returns `None` for an empty run.
    pub fn from_samples<'a, I>(samples: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GazeSample>,
    {
        let mut iter = samples.into_iter();
        let first = iter.next()?;

        let mut count = 1usize;
        let mut end = first.timestamp;
        let mut direction_sum = first.direction;
        let mut origin_sum = first.origin;

        for sample in iter {
            count += 1;
            end = sample.timestamp;
            direction_sum += sample.direction;
            origin_sum += sample.origin;
        }

        let n = count as f64;
        Some(Self::new(
            first.timestamp,
            end,
            direction_sum / n,
            origin_sum / n,
        ))
    }

    pub fn new(start: f64, end: f64, direction: Vec3, origin: Vec3) -> Self {
        Self {
            start,
            end,
            x: direction.x,
            y: direction.y,
            z: direction.z,
            origin_x: origin.x,
            origin_y: origin.y,
            origin_z: origin.z,
        }
    }

    /// Mean gaze direction.
    pub fn direction(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Mean ray origin.
    pub fn origin(&self) -> Vec3 {
        Vec3::new(self.origin_x, self.origin_y, self.origin_z)
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `timestamp` falls within `[start, end]`.
    pub fn contains(&self, timestamp: f64) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }

    /// Values in output column order.
    pub fn to_row(&self) -> [f64; 8] {
        [
            self.start,
            self.end,
            self.x,
            self.y,
            self.z,
            self.origin_x,
            self.origin_y,
            self.origin_z,
        ]
    }
}

/// Aggregate figures over a list of fixations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FixationSummary {
    pub count: usize,
    /// Sum of fixation durations (seconds).
    pub total_duration: f64,
    pub mean_duration: f64,
    pub longest_duration: f64,
}

impl FixationSummary {
    pub fn from_fixations(fixations: &[Fixation]) -> Self {
        if fixations.is_empty() {
            return Self::default();
        }

        let total_duration: f64 = fixations.iter().map(Fixation::duration).sum();
        let longest_duration = fixations
            .iter()
            .map(Fixation::duration)
            .fold(0.0_f64, f64::max);

        Self {
            count: fixations.len(),
            total_duration,
            mean_duration: total_duration / fixations.len() as f64,
            longest_duration,
        }
    }
}

/// Parse fixations from JSONL content.
pub fn parse_fixations(jsonl: &str) -> Result<Vec<Fixation>, CodecError> {
    jsonl
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            serde_json::from_str(line).map_err(|source| CodecError::Json {
                line: line_no,
                source,
            })
        })
        .collect()
}

/// Serialize fixations to JSONL format.
pub fn serialize_fixations(fixations: &[Fixation]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for fixation in fixations {
        output.push_str(&serde_json::to_string(fixation)?);
        output.push('\n');
    }
    Ok(output)
}
