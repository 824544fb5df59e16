//! gazefix Gaze Model
//!
//! Defines the data contracts around fixation detection:
//! - **Samples:** Timestamped gaze rays (direction + origin)
//! - **Fixations:** Time span and mean ray of a detected fixation
//! - **Codecs:** JSONL and CSV encodings, a streaming reader and writer
//!
//! Timestamps are tracker seconds. Directions are whatever unit vectors the
//! tracker reports; dispersion thresholds are expressed in the same units.

pub mod error;
pub mod fixation;
pub mod format;
pub mod reader;
pub mod sample;
pub mod table;
pub mod vector;
pub mod writer;

pub use error::CodecError;
pub use fixation::*;
pub use format::DataFormat;
pub use reader::SampleReader;
pub use sample::*;
pub use vector::Vec3;
pub use writer::FixationWriter;
