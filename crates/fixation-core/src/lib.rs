//! gazefix Fixation Core: I-DT segmentation
//!
//! Turns an ordered stream of gaze samples into fixation records:
//! - **Dispersion test:** largest per-axis range of a window of directions
//! - **Window buffers:** bounded candidate queue and growing fixation window
//! - **Segmenter:** the streaming Accumulating/Fixating state machine
//! - **Detector:** batch driver with run statistics
//!
//! This crate is pure computation: no I/O, no global state.
//! All inputs are data; all outputs are data.

pub mod config;
pub mod detector;
pub mod dispersion;
pub mod segmenter;
pub mod window;

pub use config::IdtConfig;
pub use detector::FixationDetector;
pub use dispersion::{dispersion, is_within_dispersion, DirectionBounds};
pub use gazefix_common::config::TrailingPolicy;
pub use segmenter::{DetectionStats, FixationSegmenter, SegmenterState, StreamEnd};
