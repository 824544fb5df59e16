//! Streaming fixation writer.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use gazefix_common::error::{GazefixError, GazefixResult};

use crate::fixation::Fixation;
use crate::format::DataFormat;
use crate::table::{fixation_csv_header, fixation_csv_row};

/// Writes fixations one record per line as they are emitted.
pub struct FixationWriter<W: Write> {
    writer: BufWriter<W>,
    format: DataFormat,
    fixations_written: u64,
}

impl FixationWriter<File> {
    /// Create (or truncate) a fixation file.
    pub fn create(path: impl AsRef<Path>, format: DataFormat) -> GazefixResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        tracing::debug!("Writing {} fixations to {}", format, path.display());
        Self::new(file, format)
    }
}

impl<W: Write> FixationWriter<W> {
    /// Wrap a writer. CSV output gets its header immediately.
    pub fn new(inner: W, format: DataFormat) -> GazefixResult<Self> {
        let mut writer = BufWriter::new(inner);

        if format == DataFormat::Csv {
            writeln!(writer, "{}", fixation_csv_header())
                .map_err(|e| GazefixError::output(format!("Failed to write header: {e}")))?;
        }

        Ok(Self {
            writer,
            format,
            fixations_written: 0,
        })
    }

    /// Write a single fixation.
    pub fn write_fixation(&mut self, fixation: &Fixation) -> GazefixResult<()> {
        let written = match self.format {
            DataFormat::Jsonl => {
                let json = serde_json::to_string(fixation)?;
                writeln!(self.writer, "{json}")
            }
            DataFormat::Csv => writeln!(self.writer, "{}", fixation_csv_row(fixation)),
        };
        written.map_err(|e| GazefixError::output(format!("Failed to write fixation: {e}")))?;

        self.fixations_written += 1;
        Ok(())
    }

    /// Flush buffered writes.
    pub fn flush(&mut self) -> GazefixResult<()> {
        self.writer
            .flush()
            .map_err(|e| GazefixError::output(format!("Failed to flush fixations: {e}")))?;
        Ok(())
    }

    /// Number of fixations written.
    pub fn fixations_written(&self) -> u64 {
        self.fixations_written
    }

    pub fn format(&self) -> DataFormat {
        self.format
    }
}

impl<W: Write> Drop for FixationWriter<W> {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
