//! I-DT parameters and their validation.

use gazefix_common::config::{DetectionDefaults, TrailingPolicy};
use gazefix_common::error::{GazefixError, GazefixResult};
use serde::{Deserialize, Serialize};

/// Parameters of the dispersion-threshold segmenter.
///
/// `min_fixation_size` and `max_fixation_size` form a hysteresis pair: a
/// candidate window must be tighter than `min_fixation_size` to start a
/// fixation, after which the fixation survives until its dispersion reaches
/// `max_fixation_size`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdtConfig {
    /// Length of the candidate window tested for a fixation start.
    pub min_points_per_fixation: usize,

    /// Dispersion bound to start a fixation.
    pub min_fixation_size: f64,

    /// Dispersion bound to continue a fixation.
    pub max_fixation_size: f64,

    /// What happens to a fixation still open at end of input.
    #[serde(default)]
    pub trailing: TrailingPolicy,
}

impl Default for IdtConfig {
    fn default() -> Self {
        Self::from(&DetectionDefaults::default())
    }
}

impl From<&DetectionDefaults> for IdtConfig {
    fn from(defaults: &DetectionDefaults) -> Self {
        Self {
            min_points_per_fixation: defaults.min_points_per_fixation,
            min_fixation_size: defaults.min_fixation_size,
            max_fixation_size: defaults.max_fixation_size,
            trailing: defaults.trailing,
        }
    }
}

impl IdtConfig {
    /// Reject parameters the segmenter cannot work with.
    ///
    /// A `max_fixation_size` below `min_fixation_size` is allowed (it just
    /// disables the hysteresis) but logged.
    pub fn validate(&self) -> GazefixResult<()> {
        if self.min_points_per_fixation < 1 {
            return Err(GazefixError::config(
                "min_points_per_fixation must be at least 1",
            ));
        }
        check_threshold("min_fixation_size", self.min_fixation_size)?;
        check_threshold("max_fixation_size", self.max_fixation_size)?;

        if self.max_fixation_size < self.min_fixation_size {
            tracing::warn!(
                min_fixation_size = self.min_fixation_size,
                max_fixation_size = self.max_fixation_size,
                "max_fixation_size is below min_fixation_size; fixations may end on the sample after they start"
            );
        }

        Ok(())
    }
}

fn check_threshold(name: &str, value: f64) -> GazefixResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GazefixError::config(format!(
            "{name} must be a positive finite number, got {value}"
        )))
    }
}
