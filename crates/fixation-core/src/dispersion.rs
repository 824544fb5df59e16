//! Dispersion of a window of gaze directions.
//!
//! Dispersion here is the largest per-axis range of the direction vectors:
//! the longest side of their axis-aligned bounding box. A window is "within
//! dispersion" when that side is strictly shorter than the threshold.

use gazefix_gaze_model::{GazeSample, Vec3};

/// Axis-aligned bounding box over gaze directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionBounds {
    min: Vec3,
    max: Vec3,
}

impl DirectionBounds {
    /// Bounds of a single direction (zero extent).
    pub fn from_direction(direction: Vec3) -> Self {
        Self {
            min: direction,
            max: direction,
        }
    }

    /// Bounds of every direction in `samples`, or `None` if there are none.
    pub fn from_samples<'a, I>(samples: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a GazeSample>,
    {
        let mut iter = samples.into_iter();
        let mut bounds = Self::from_direction(iter.next()?.direction);
        for sample in iter {
            bounds.include(sample.direction);
        }
        Some(bounds)
    }

    /// Grow the box to contain `direction`.
    pub fn include(&mut self, direction: Vec3) {
        self.min = self.min.min(direction);
        self.max = self.max.max(direction);
    }

    /// A copy of the box grown to contain `direction`.
    pub fn extended(&self, direction: Vec3) -> Self {
        let mut bounds = *self;
        bounds.include(direction);
        bounds
    }

    /// Per-axis ranges `max - min`.
    pub fn ranges(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest per-axis range.
    pub fn extent(&self) -> f64 {
        self.ranges().max_component()
    }

    pub fn is_within(&self, threshold: f64) -> bool {
        self.extent() < threshold
    }
}

/// Dispersion of a window, or `None` for an empty window.
pub fn dispersion<'a, I>(window: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a GazeSample>,
{
    DirectionBounds::from_samples(window).map(|bounds| bounds.extent())
}

/// Whether the window's dispersion is strictly below `threshold`.
///
/// An empty window is never within dispersion.
pub fn is_within_dispersion<'a, I>(window: I, threshold: f64) -> bool
where
    I: IntoIterator<Item = &'a GazeSample>,
{
    dispersion(window).is_some_and(|extent| extent < threshold)
}
