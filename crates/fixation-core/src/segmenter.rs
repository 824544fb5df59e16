//! Streaming I-DT segmenter.
//!
//! # Algorithm
//!
//! The segmenter is a two-state machine fed one sample at a time:
//!
//! 1. **Accumulating:** samples enter a queue capped at
//!    `min_points_per_fixation`. Once the queue is full it is tested against
//!    `min_fixation_size`; if it passes, its samples open a fixation window.
//! 2. **Fixating:** each new sample is tested against the window's bounds
//!    with `max_fixation_size`. While it fits it joins the window. The first
//!    sample that does not fit closes the fixation: the window is emitted as
//!    a [`Fixation`] and the outlier seeds a fresh queue.
//!
//! Samples are never re-sorted; the caller supplies them in timestamp order.

use gazefix_common::config::TrailingPolicy;
use gazefix_common::error::GazefixResult;
use gazefix_gaze_model::{Fixation, GazeSample};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::IdtConfig;
use crate::dispersion::is_within_dispersion;
use crate::window::{FixationWindow, SampleQueue};

/// Which buffer the segmenter is currently filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmenterState {
    /// No fixation confirmed; the candidate queue slides over the input.
    Accumulating,
    /// A fixation is open and growing.
    Fixating,
}

#[derive(Debug, Clone)]
enum Phase {
    Accumulating(SampleQueue),
    Fixating(FixationWindow),
}

/// Counters for one segmentation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DetectionStats {
    /// Samples pushed into the segmenter.
    pub samples: usize,
    /// Fixations emitted, including a flushed trailing one.
    pub fixations: usize,
    /// Samples that ended up inside an emitted fixation.
    pub samples_in_fixations: usize,
    /// Samples still buffered when the input ended and dropped.
    pub discarded_at_end: usize,
}

/// Result of closing a segmenter at end of input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamEnd {
    /// The open fixation, when the trailing policy is `Flush`.
    pub trailing: Option<Fixation>,
    pub stats: DetectionStats,
}

/// Single-pass fixation segmenter.
#[derive(Debug, Clone)]
pub struct FixationSegmenter {
    config: IdtConfig,
    phase: Phase,
    stats: DetectionStats,
}

impl FixationSegmenter {
    /// Create a segmenter, rejecting invalid parameters.
    pub fn new(config: IdtConfig) -> GazefixResult<Self> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    /// Segmenter with the default HoloLens 2 parameters.
    pub fn with_defaults() -> Self {
        Self::from_valid(IdtConfig::default())
    }

    pub(crate) fn from_valid(config: IdtConfig) -> Self {
        Self {
            phase: Phase::Accumulating(SampleQueue::new(config.min_points_per_fixation)),
            config,
            stats: DetectionStats::default(),
        }
    }

    pub fn config(&self) -> &IdtConfig {
        &self.config
    }

    pub fn state(&self) -> SegmenterState {
        match self.phase {
            Phase::Accumulating(_) => SegmenterState::Accumulating,
            Phase::Fixating(_) => SegmenterState::Fixating,
        }
    }

    /// Samples held in the current queue or fixation window, oldest first.
    pub fn buffered(&self) -> Box<dyn Iterator<Item = &GazeSample> + '_> {
        match &self.phase {
            Phase::Accumulating(queue) => Box::new(queue.iter()),
            Phase::Fixating(window) => Box::new(window.samples().iter()),
        }
    }

    pub fn buffered_len(&self) -> usize {
        match &self.phase {
            Phase::Accumulating(queue) => queue.len(),
            Phase::Fixating(window) => window.len(),
        }
    }

    /// Counters so far. `discarded_at_end` is only filled in by [`finish`].
    ///
    /// [`finish`]: FixationSegmenter::finish
    pub fn stats(&self) -> DetectionStats {
        self.stats
    }

    /// Feed the next sample. Returns the fixation this sample closed, if any.
    pub fn push(&mut self, sample: GazeSample) -> Option<Fixation> {
        self.stats.samples += 1;

        match &mut self.phase {
            Phase::Accumulating(queue) => {
                queue.push(sample);
                if !queue.is_full()
                    || !is_within_dispersion(queue.iter(), self.config.min_fixation_size)
                {
                    return None;
                }

                let window = FixationWindow::open(queue.drain())?;
                debug!(
                    start = window.samples()[0].timestamp,
                    points = window.len(),
                    "fixation started"
                );
                self.phase = Phase::Fixating(window);
                None
            }
            Phase::Fixating(window) => {
                if window.admits(&sample, self.config.max_fixation_size) {
                    window.push(sample);
                    return None;
                }

                let fixation = window.summarize();
                let members = window.len();

                let mut queue = SampleQueue::new(self.config.min_points_per_fixation);
                queue.push(sample);
                self.phase = Phase::Accumulating(queue);

                if let Some(fixation) = &fixation {
                    self.stats.fixations += 1;
                    self.stats.samples_in_fixations += members;
                    debug!(
                        start = fixation.start,
                        end = fixation.end,
                        points = members,
                        outlier = sample.timestamp,
                        "fixation ended"
                    );
                }
                fixation
            }
        }
    }

    /// Close the stream.
    ///
    /// An open queue is always dropped. An open fixation is dropped under
    /// [`TrailingPolicy::Discard`] and returned under
    /// [`TrailingPolicy::Flush`].
    pub fn finish(self) -> StreamEnd {
        let mut stats = self.stats;

        let trailing = match self.phase {
            Phase::Fixating(window) if self.config.trailing == TrailingPolicy::Flush => {
                let fixation = window.summarize();
                if fixation.is_some() {
                    stats.fixations += 1;
                    stats.samples_in_fixations += window.len();
                }
                fixation
            }
            Phase::Fixating(window) => {
                debug!(
                    points = window.len(),
                    "discarding fixation still open at end of input"
                );
                stats.discarded_at_end = window.len();
                None
            }
            Phase::Accumulating(queue) => {
                stats.discarded_at_end = queue.len();
                None
            }
        };

        StreamEnd { trailing, stats }
    }

    /// Drop all buffered samples and counters.
    pub fn reset(&mut self) {
        *self = Self::from_valid(self.config);
    }
}
