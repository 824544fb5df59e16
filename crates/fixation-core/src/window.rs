//! Sample buffers used by the segmenter.
//!
//! - [`SampleQueue`]: bounded FIFO holding the candidate window while no
//!   fixation is active. Pushing into a full queue evicts the oldest sample.
//! - [`FixationWindow`]: the growing member list of the active fixation,
//!   with its direction bounds kept up to date so each new sample is tested
//!   in constant time.

use std::collections::VecDeque;

use gazefix_gaze_model::{Fixation, GazeSample};

use crate::dispersion::DirectionBounds;

/// Bounded FIFO of the most recent samples.
#[derive(Debug, Clone)]
pub struct SampleQueue {
    samples: VecDeque<GazeSample>,
    capacity: usize,
}

impl SampleQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, returning the evicted oldest sample if the queue
    /// was already full.
    pub fn push(&mut self, sample: GazeSample) -> Option<GazeSample> {
        self.samples.push_back(sample);
        if self.samples.len() > self.capacity {
            self.samples.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether the queue holds `capacity` samples.
    pub fn is_full(&self) -> bool {
        self.samples.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &GazeSample> {
        self.samples.iter()
    }

    /// Remove and return every queued sample, oldest first.
    pub fn drain(&mut self) -> Vec<GazeSample> {
        self.samples.drain(..).collect()
    }
}

/// Member samples of the active fixation.
#[derive(Debug, Clone)]
pub struct FixationWindow {
    samples: Vec<GazeSample>,
    bounds: DirectionBounds,
}

impl FixationWindow {
    /// Open a window over `samples`. Returns `None` if `samples` is empty.
    pub fn open(samples: Vec<GazeSample>) -> Option<Self> {
        let bounds = DirectionBounds::from_samples(&samples)?;
        Some(Self { samples, bounds })
    }

    /// Whether the window would stay strictly under `threshold` with
    /// `sample` added.
    pub fn admits(&self, sample: &GazeSample, threshold: f64) -> bool {
        self.bounds.extended(sample.direction).is_within(threshold)
    }

    pub fn push(&mut self, sample: GazeSample) {
        self.bounds.include(sample.direction);
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[GazeSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Current dispersion of the members.
    pub fn extent(&self) -> f64 {
        self.bounds.extent()
    }

    /// Fixation record for the current members.
    pub fn summarize(&self) -> Option<Fixation> {
        Fixation::from_samples(&self.samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(t: f64, x: f64) -> GazeSample {
        GazeSample::looking(t, x, 0.0, 1.0)
    }

    #[test]
    fn test_queue_evicts_oldest() {
        let mut queue = SampleQueue::new(3);
        assert_eq!(queue.push(sample(0.0, 0.0)), None);
        assert_eq!(queue.push(sample(1.0, 0.0)), None);
        assert!(!queue.is_full());
        assert_eq!(queue.push(sample(2.0, 0.0)), None);
        assert!(queue.is_full());

        let evicted = queue.push(sample(3.0, 0.0)).unwrap();
        assert_eq!(evicted.timestamp, 0.0);
        assert_eq!(queue.len(), 3);

        let times: Vec<f64> = queue.iter().map(|s| s.timestamp).collect();
        assert_eq!(times, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_queue_drain_empties() {
        let mut queue = SampleQueue::new(2);
        queue.push(sample(0.0, 0.0));
        queue.push(sample(1.0, 0.0));
        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert!(queue.is_empty());
        assert_eq!(queue.capacity(), 2);
    }

    #[test]
    fn test_window_admits_against_bounds() {
        let mut window = FixationWindow::open(vec![sample(0.0, 0.0), sample(0.1, 0.02)]).unwrap();
        assert!(window.admits(&sample(0.2, 0.05), 0.095));
        assert!(!window.admits(&sample(0.2, 0.2), 0.095));

        window.push(sample(0.2, -0.07));
        assert!((window.extent() - 0.09).abs() < 1e-12);
        assert!(window.admits(&sample(0.3, 0.01), 0.095));
        assert!(!window.admits(&sample(0.3, 0.04), 0.095));
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_window_summarize() {
        let window = FixationWindow::open(vec![sample(0.0, 0.0), sample(0.5, 0.1)]).unwrap();
        let fixation = window.summarize().unwrap();
        assert_eq!(fixation.start, 0.0);
        assert_eq!(fixation.end, 0.5);
        assert!((fixation.x - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_empty_window_cannot_open() {
        assert!(FixationWindow::open(vec![]).is_none());
    }
}
