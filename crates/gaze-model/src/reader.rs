//! Streaming sample reader.
//!
//! Decodes one sample per line from any `BufRead` so long recordings can be
//! segmented without holding the whole file in memory.

use std::io::{BufRead, Lines};

use crate::error::CodecError;
use crate::format::DataFormat;
use crate::sample::GazeSample;
use crate::table::SampleColumns;

/// Iterator over the samples in a JSONL or CSV stream.
///
/// Blank lines and lines starting with `#` are skipped in both formats. For
/// CSV, the first remaining line is the header; a CSV stream without one
/// yields [`CodecError::MissingHeader`]. The iterator stops after the first
/// header error.
pub struct SampleReader<R> {
    lines: Lines<R>,
    format: DataFormat,
    columns: Option<SampleColumns>,
    line_no: usize,
    failed: bool,
}

impl<R: BufRead> SampleReader<R> {
    pub fn new(reader: R, format: DataFormat) -> Self {
        Self {
            lines: reader.lines(),
            format,
            columns: None,
            line_no: 0,
            failed: false,
        }
    }

    /// Number of input lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line_no
    }

    /// Next non-blank, non-comment line.
    fn next_content_line(&mut self) -> Option<Result<String, CodecError>> {
        loop {
            let line = self.lines.next()?;
            self.line_no += 1;
            match line {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() || trimmed.starts_with('#') {
                        continue;
                    }
                    return Some(Ok(trimmed.to_string()));
                }
                Err(source) => {
                    return Some(Err(CodecError::Io {
                        line: self.line_no,
                        source,
                    }))
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for SampleReader<R> {
    type Item = Result<GazeSample, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let awaiting_header = self.format == DataFormat::Csv && self.columns.is_none();

        let line = match self.next_content_line() {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                // Without a header no later row can be decoded.
                self.failed = awaiting_header;
                return Some(Err(e));
            }
            None if awaiting_header => {
                self.failed = true;
                return Some(Err(CodecError::MissingHeader));
            }
            None => return None,
        };

        match self.format {
            DataFormat::Jsonl => Some(serde_json::from_str(&line).map_err(|source| {
                CodecError::Json {
                    line: self.line_no,
                    source,
                }
            })),
            DataFormat::Csv => {
                if self.columns.is_none() {
                    match SampleColumns::from_header(&line) {
                        Ok(columns) => self.columns = Some(columns),
                        Err(e) => {
                            self.failed = true;
                            return Some(Err(e));
                        }
                    }
                    return self.next();
                }
                let columns = self.columns.as_ref()?;
                Some(columns.parse_row(&line, self.line_no))
            }
        }
    }
}
