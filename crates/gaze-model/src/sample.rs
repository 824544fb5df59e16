//! Gaze samples as produced by the eye tracker.
//!
//! A sample is a single gaze ray: the direction the eye is looking in plus
//! the ray origin, stamped with the tracker time in seconds. On disk the
//! vectors are flattened into `direction_x/y/z` and `origin_x/y/z` columns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::format::DataFormat;
use crate::reader::SampleReader;
use crate::vector::Vec3;

/// A single timestamped gaze ray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "SampleRecord", into = "SampleRecord")]
pub struct GazeSample {
    /// Tracker timestamp in seconds.
    pub timestamp: f64,
    /// Gaze direction.
    pub direction: Vec3,
    /// Gaze ray origin.
    pub origin: Vec3,
}

/// Flat on-disk layout of a [`GazeSample`].
#[derive(Serialize, Deserialize)]
struct SampleRecord {
    timestamp: f64,
    direction_x: f64,
    direction_y: f64,
    direction_z: f64,
    origin_x: f64,
    origin_y: f64,
    origin_z: f64,
}

impl From<SampleRecord> for GazeSample {
    fn from(r: SampleRecord) -> Self {
        Self {
            timestamp: r.timestamp,
            direction: Vec3::new(r.direction_x, r.direction_y, r.direction_z),
            origin: Vec3::new(r.origin_x, r.origin_y, r.origin_z),
        }
    }
}

impl From<GazeSample> for SampleRecord {
    fn from(s: GazeSample) -> Self {
        Self {
            timestamp: s.timestamp,
            direction_x: s.direction.x,
            direction_y: s.direction.y,
            direction_z: s.direction.z,
            origin_x: s.origin.x,
            origin_y: s.origin.y,
            origin_z: s.origin.z,
        }
    }
}

impl GazeSample {
    pub fn new(timestamp: f64, direction: Vec3, origin: Vec3) -> Self {
        Self {
            timestamp,
            direction,
            origin,
        }
    }

    /// Sample with the given direction and the ray origin at zero.
    pub fn looking(timestamp: f64, x: f64, y: f64, z: f64) -> Self {
        Self::new(timestamp, Vec3::new(x, y, z), Vec3::ZERO)
    }

    /// Whether the timestamp and both vectors hold only finite values.
    pub fn is_finite(&self) -> bool {
        self.timestamp.is_finite() && self.direction.is_finite() && self.origin.is_finite()
    }
}

/// Parse samples from JSONL content (one JSON object per line).
///
/// Blank lines and `#` comment lines are skipped.
pub fn parse_samples(jsonl: &str) -> Result<Vec<GazeSample>, CodecError> {
    SampleReader::new(jsonl.as_bytes(), DataFormat::Jsonl).collect()
}

/// Serialize samples to JSONL format.
pub fn serialize_samples(samples: &[GazeSample]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for sample in samples {
        output.push_str(&serde_json::to_string(sample)?);
        output.push('\n');
    }
    Ok(output)
}

/// A problem found in a sample sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleIssue {
    /// Zero-based position of the offending sample.
    pub index: usize,
    pub kind: SampleIssueKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SampleIssueKind {
    /// Timestamp, direction, or origin holds NaN or infinity.
    NonFinite,
    /// Timestamp is smaller than the previous sample's.
    TimestampDecreased { previous: f64, current: f64 },
}

impl fmt::Display for SampleIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SampleIssueKind::NonFinite => {
                write!(f, "sample {} has a non-finite value", self.index)
            }
            SampleIssueKind::TimestampDecreased { previous, current } => write!(
                f,
                "sample {} goes back in time ({current} after {previous})",
                self.index
            ),
        }
    }
}

/// Check that samples are finite and ordered by non-decreasing timestamp.
///
/// Fixation detection assumes both; this lets callers reject bad input
/// before it reaches the segmenter.
pub fn validate_samples(samples: &[GazeSample]) -> Vec<SampleIssue> {
    let mut issues = vec![];
    let mut previous: Option<f64> = None;

    for (index, sample) in samples.iter().enumerate() {
        if !sample.is_finite() {
            issues.push(SampleIssue {
                index,
                kind: SampleIssueKind::NonFinite,
            });
            continue;
        }

        if let Some(prev) = previous {
            if sample.timestamp < prev {
                issues.push(SampleIssue {
                    index,
                    kind: SampleIssueKind::TimestampDecreased {
                        previous: prev,
                        current: sample.timestamp,
                    },
                });
            }
        }
        previous = Some(sample.timestamp);
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_json_layout() {
        let sample = GazeSample::new(1.25, Vec3::new(0.1, -0.2, 0.97), Vec3::new(0.0, 1.6, 0.0));
        let json = serde_json::to_string(&sample).unwrap();
        assert!(json.contains("\"timestamp\":1.25"));
        assert!(json.contains("\"direction_x\":0.1"));
        assert!(json.contains("\"direction_z\":0.97"));
        assert!(json.contains("\"origin_y\":1.6"));
        assert!(!json.contains("\"direction\":"));
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        let line = r#"{"timestamp":0.5,"direction_x":0.0,"direction_y":0.1,"direction_z":1.0,"origin_x":0.0,"origin_y":0.0,"origin_z":0.0,"confidence":0.9}"#;
        let parsed = parse_samples(line).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].direction, Vec3::new(0.0, 0.1, 1.0));
    }

    #[test]
    fn test_jsonl_roundtrip_skips_comments() {
        let samples = vec![
            GazeSample::looking(0.0, 0.0, 0.0, 1.0),
            GazeSample::looking(0.011, 0.01, 0.0, 1.0),
        ];
        let mut jsonl = String::from("# recorded on hololens 2\n\n");
        jsonl.push_str(&serialize_samples(&samples).unwrap());
        assert_eq!(parse_samples(&jsonl).unwrap(), samples);
    }

    #[test]
    fn test_parse_reports_line_number() {
        let jsonl = "# header\n{\"timestamp\":0.0}\n";
        let err = parse_samples(jsonl).unwrap_err();
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_validate_accepts_ordered_samples() {
        let samples = vec![
            GazeSample::looking(0.0, 0.0, 0.0, 1.0),
            GazeSample::looking(0.0, 0.0, 0.0, 1.0),
            GazeSample::looking(0.1, 0.0, 0.0, 1.0),
        ];
        assert!(validate_samples(&samples).is_empty());
    }

    #[test]
    fn test_validate_flags_backwards_time_and_nan() {
        let samples = vec![
            GazeSample::looking(1.0, 0.0, 0.0, 1.0),
            GazeSample::looking(0.5, 0.0, 0.0, 1.0),
            GazeSample::looking(2.0, f64::NAN, 0.0, 1.0),
        ];
        let issues = validate_samples(&samples);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].index, 1);
        assert!(matches!(
            issues[0].kind,
            SampleIssueKind::TimestampDecreased { .. }
        ));
        assert_eq!(issues[1].index, 2);
        assert_eq!(issues[1].kind, SampleIssueKind::NonFinite);
        assert!(issues[0].to_string().contains("goes back in time"));
    }
}
