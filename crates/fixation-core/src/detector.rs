//! Batch driver over the segmenter.

use gazefix_common::error::GazefixResult;
use gazefix_gaze_model::{Fixation, GazeSample};

use crate::config::IdtConfig;
use crate::segmenter::{DetectionStats, FixationSegmenter};

/// Runs the I-DT segmenter over whole sample sequences.
///
/// Every call starts from a fresh segmenter, so one detector can be reused
/// across independent recordings.
#[derive(Debug, Clone)]
pub struct FixationDetector {
    config: IdtConfig,
}

impl FixationDetector {
    /// Create a detector, rejecting invalid parameters up front.
    pub fn new(config: IdtConfig) -> GazefixResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a detector with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: IdtConfig::default(),
        }
    }

    pub fn config(&self) -> &IdtConfig {
        &self.config
    }

    /// A fresh segmenter with this detector's parameters.
    pub fn segmenter(&self) -> FixationSegmenter {
        FixationSegmenter::from_valid(self.config)
    }

    /// Detect fixations in a slice of samples.
    pub fn detect(&self, samples: &[GazeSample]) -> Vec<Fixation> {
        let (fixations, _) = self.detect_with_stats(samples.iter().copied());
        fixations
    }

    /// Detect fixations and return the run counters alongside.
    pub fn detect_with_stats<I>(&self, samples: I) -> (Vec<Fixation>, DetectionStats)
    where
        I: IntoIterator<Item = GazeSample>,
    {
        let mut segmenter = self.segmenter();
        let mut fixations: Vec<Fixation> = samples
            .into_iter()
            .filter_map(|sample| segmenter.push(sample))
            .collect();

        let end = segmenter.finish();
        fixations.extend(end.trailing);

        tracing::debug!(
            samples = end.stats.samples,
            fixations = end.stats.fixations,
            discarded = end.stats.discarded_at_end,
            "fixation detection finished"
        );

        (fixations, end.stats)
    }
}
