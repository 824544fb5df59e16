//! CSV layout for samples and fixations.
//!
//! Sample files are located by column name, so exports with extra columns
//! (pupil size, confidence, eye id, ...) or a different column order still
//! load. Fixation files are always written with [`FIXATION_COLUMNS`] in
//! order.

use crate::error::CodecError;
use crate::fixation::Fixation;
use crate::sample::GazeSample;
use crate::vector::Vec3;

/// Columns a sample CSV must provide.
pub const SAMPLE_COLUMNS: [&str; 7] = [
    "timestamp",
    "direction_x",
    "direction_y",
    "direction_z",
    "origin_x",
    "origin_y",
    "origin_z",
];

/// Columns of a fixation CSV, in output order.
pub const FIXATION_COLUMNS: [&str; 8] = [
    "start", "end", "x", "y", "z", "origin_x", "origin_y", "origin_z",
];

/// Positions of the required sample columns within a CSV header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleColumns {
    indices: [usize; 7],
}

impl SampleColumns {
    /// Locate the required columns in a header row.
    pub fn from_header(header: &str) -> Result<Self, CodecError> {
        let names: Vec<&str> = split_row(header).collect();
        let mut indices = [0usize; 7];

        for (slot, column) in indices.iter_mut().zip(SAMPLE_COLUMNS) {
            *slot = names
                .iter()
                .position(|name| *name == column)
                .ok_or(CodecError::MissingColumn { column })?;
        }

        Ok(Self { indices })
    }

    /// Decode one data row. `line` is the one-based line number for errors.
    pub fn parse_row(&self, row: &str, line: usize) -> Result<GazeSample, CodecError> {
        let fields: Vec<&str> = split_row(row).collect();
        let needed = self.indices.iter().copied().max().unwrap_or(0) + 1;
        if fields.len() < needed {
            return Err(CodecError::ShortRow {
                line,
                expected: needed,
                found: fields.len(),
            });
        }

        let mut values = [0.0f64; 7];
        for ((value, &index), column) in values.iter_mut().zip(&self.indices).zip(SAMPLE_COLUMNS) {
            let raw = fields[index];
            *value = raw.parse().map_err(|_| CodecError::InvalidNumber {
                line,
                column,
                value: raw.to_string(),
            })?;
        }

        let [timestamp, dx, dy, dz, ox, oy, oz] = values;
        Ok(GazeSample::new(
            timestamp,
            Vec3::new(dx, dy, dz),
            Vec3::new(ox, oy, oz),
        ))
    }
}

/// Split a CSV row on commas, trimming whitespace and surrounding quotes.
///
/// Quoted fields containing commas are not supported; none of the numeric
/// columns we read can contain one.
fn split_row(row: &str) -> impl Iterator<Item = &str> {
    row.split(',').map(|field| field.trim().trim_matches('"'))
}

/// Parse a sample CSV document.
pub fn parse_samples_csv(text: &str) -> Result<Vec<GazeSample>, CodecError> {
    crate::reader::SampleReader::new(text.as_bytes(), crate::format::DataFormat::Csv).collect()
}

/// Header row for fixation CSV output.
pub fn fixation_csv_header() -> String {
    FIXATION_COLUMNS.join(",")
}

/// One fixation as a CSV data row (no trailing newline).
pub fn fixation_csv_row(fixation: &Fixation) -> String {
    fixation
        .to_row()
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Render fixations as a complete CSV document with header.
pub fn fixations_to_csv(fixations: &[Fixation]) -> String {
    let mut output = fixation_csv_header();
    output.push('\n');
    for fixation in fixations {
        output.push_str(&fixation_csv_row(fixation));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_in_any_order_with_extra_columns() {
        let header = "eye,origin_z,origin_y,origin_x,direction_z,direction_y,direction_x,timestamp";
        let columns = SampleColumns::from_header(header).unwrap();
        let sample = columns
            .parse_row("left,0.3,0.2,0.1,0.99,-0.05,0.02,12.5", 2)
            .unwrap();

        assert_eq!(sample.timestamp, 12.5);
        assert_eq!(sample.direction, Vec3::new(0.02, -0.05, 0.99));
        assert_eq!(sample.origin, Vec3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_missing_column() {
        let err = SampleColumns::from_header("timestamp,direction_x,direction_y").unwrap_err();
        assert!(matches!(
            err,
            CodecError::MissingColumn {
                column: "direction_z"
            }
        ));
    }

    #[test]
    fn test_invalid_number_reports_column() {
        let columns = SampleColumns::from_header(&SAMPLE_COLUMNS.join(",")).unwrap();
        let err = columns.parse_row("0.0,abc,0,1,0,0,0", 4).unwrap_err();
        match err {
            CodecError::InvalidNumber {
                line,
                column,
                value,
            } => {
                assert_eq!(line, 4);
                assert_eq!(column, "direction_x");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_row() {
        let columns = SampleColumns::from_header(&SAMPLE_COLUMNS.join(",")).unwrap();
        let err = columns.parse_row("0.0,0.1", 3).unwrap_err();
        assert!(matches!(
            err,
            CodecError::ShortRow {
                line: 3,
                expected: 7,
                found: 2
            }
        ));
    }

    #[test]
    fn test_parse_samples_csv() {
        let text = "timestamp,direction_x,direction_y,direction_z,origin_x,origin_y,origin_z\n\
                    0.0,0.0,0.0,1.0,0.0,0.0,0.0\n\
                    \n\
                    0.01,\"0.01\",0.0,1.0,0.0,0.0,0.0\n";
        let samples = parse_samples_csv(text).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].direction.x, 0.01);
    }

    #[test]
    fn test_fixations_to_csv() {
        let fixation = Fixation {
            start: 0.0,
            end: 0.25,
            x: 0.5,
            y: -0.5,
            z: 1.0,
            origin_x: 0.0,
            origin_y: 1.5,
            origin_z: 0.0,
        };
        let csv = fixations_to_csv(&[fixation]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "start,end,x,y,z,origin_x,origin_y,origin_z");
        assert_eq!(lines[1], "0,0.25,0.5,-0.5,1,0,1.5,0");
    }
}
