pub mod config;
pub mod detect;
pub mod validate;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use gazefix_gaze_model::{DataFormat, SampleReader};

/// Open a sample source. `-` is stdin.
///
/// Without an explicit format, stdin is read as JSONL and files are sniffed
/// by extension.
pub fn open_samples(
    input: &Path,
    format: Option<DataFormat>,
) -> anyhow::Result<SampleReader<Box<dyn BufRead>>> {
    let (reader, guessed): (Box<dyn BufRead>, DataFormat) = if input == Path::new("-") {
        (Box::new(BufReader::new(io::stdin())), DataFormat::Jsonl)
    } else {
        let file = File::open(input)
            .map_err(|e| anyhow::anyhow!("Failed to open {}: {e}", input.display()))?;
        (Box::new(BufReader::new(file)), DataFormat::from_path(input))
    };

    Ok(SampleReader::new(reader, format.unwrap_or(guessed)))
}
