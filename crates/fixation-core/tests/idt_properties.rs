use gazefix_fixation_core::dispersion::{dispersion, is_within_dispersion};
use gazefix_fixation_core::{FixationDetector, FixationSegmenter, IdtConfig, SegmenterState};
use gazefix_gaze_model::{Fixation, GazeSample, Vec3};
use proptest::prelude::*;

const CENTERS: [(f64, f64, f64); 3] = [(0.0, 0.0, 1.0), (0.3, 0.1, 0.95), (-0.2, 0.3, 0.93)];

/// Gaze that dwells on one of a few targets for a while, then jumps.
fn gaze_stream() -> impl Strategy<Value = Vec<GazeSample>> {
    (
        prop::collection::vec((0usize..3, 1usize..30), 0..12),
        prop::collection::vec(
            (-0.04f64..0.04, -0.04f64..0.04, -0.04f64..0.04),
            1..64,
        ),
    )
        .prop_map(|(runs, noise)| {
            let mut samples = vec![];
            for (center, len) in runs {
                let (cx, cy, cz) = CENTERS[center];
                for _ in 0..len {
                    let i = samples.len();
                    let (nx, ny, nz) = noise[i % noise.len()];
                    samples.push(GazeSample::new(
                        i as f64 * 0.01,
                        Vec3::new(cx + nx, cy + ny, cz + nz),
                        Vec3::new(nx, 1.6 + ny, nz),
                    ));
                }
            }
            samples
        })
}

/// Hysteresis configs: the continue bound is never below the start bound.
fn idt_config() -> impl Strategy<Value = IdtConfig> {
    (1usize..6, 0.005f64..0.08, 0.0f64..0.07).prop_map(|(points, min_size, slack)| IdtConfig {
        min_points_per_fixation: points,
        min_fixation_size: min_size,
        max_fixation_size: min_size + slack,
        ..Default::default()
    })
}

/// Any accepted config, including inverted thresholds.
fn any_idt_config() -> impl Strategy<Value = IdtConfig> {
    (1usize..6, 0.005f64..0.08, 0.01f64..0.15).prop_map(|(points, min_size, max_size)| {
        IdtConfig {
            min_points_per_fixation: points,
            min_fixation_size: min_size,
            max_fixation_size: max_size,
            ..Default::default()
        }
    })
}

/// Straightforward rendition that appends, rescans the whole window, and
/// pops the outlier back off.
fn rescan_detect(samples: &[GazeSample], config: &IdtConfig) -> Vec<Fixation> {
    let mut queue: Vec<GazeSample> = vec![];
    let mut fixation: Vec<GazeSample> = vec![];
    let mut fixating = false;
    let mut out = vec![];

    for sample in samples {
        if !fixating {
            queue.push(*sample);
            if queue.len() >= config.min_points_per_fixation {
                let keep = queue.len() - config.min_points_per_fixation;
                queue.drain(..keep);
                if is_within_dispersion(&queue, config.min_fixation_size) {
                    fixating = true;
                    fixation = queue.clone();
                }
            }
        } else {
            fixation.push(*sample);
            if !is_within_dispersion(&fixation, config.max_fixation_size) {
                let outlier = fixation.pop().unwrap();
                queue = vec![outlier];
                out.push(Fixation::from_samples(&fixation).unwrap());
                fixation.clear();
                fixating = false;
            }
        }
    }

    out
}

fn members<'a>(samples: &'a [GazeSample], fixation: &Fixation) -> Vec<&'a GazeSample> {
    samples
        .iter()
        .filter(|s| fixation.contains(s.timestamp))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn matches_full_rescan(samples in gaze_stream(), config in any_idt_config()) {
        let detector = FixationDetector::new(config).unwrap();
        prop_assert_eq!(detector.detect(&samples), rescan_detect(&samples, &config));
    }

    #[test]
    fn fixations_are_ordered_and_disjoint(samples in gaze_stream(), config in idt_config()) {
        let fixations = FixationDetector::new(config).unwrap().detect(&samples);
        for f in &fixations {
            prop_assert!(f.start <= f.end);
        }
        for pair in fixations.windows(2) {
            prop_assert!(pair[0].end < pair[1].start);
        }
    }

    #[test]
    fn means_cover_exactly_the_member_samples(samples in gaze_stream(), config in idt_config()) {
        let fixations = FixationDetector::new(config).unwrap().detect(&samples);
        for f in &fixations {
            let run = members(&samples, f);
            prop_assert!(!run.is_empty());
            let n = run.len() as f64;
            let mean_x: f64 = run.iter().map(|s| s.direction.x).sum::<f64>() / n;
            let mean_z: f64 = run.iter().map(|s| s.direction.z).sum::<f64>() / n;
            let mean_oy: f64 = run.iter().map(|s| s.origin.y).sum::<f64>() / n;
            prop_assert!((f.x - mean_x).abs() < 1e-9);
            prop_assert!((f.z - mean_z).abs() < 1e-9);
            prop_assert!((f.origin_y - mean_oy).abs() < 1e-9);
        }
    }

    #[test]
    fn members_fit_and_outlier_does_not(samples in gaze_stream(), config in idt_config()) {
        let fixations = FixationDetector::new(config).unwrap().detect(&samples);
        for f in &fixations {
            let run: Vec<GazeSample> = members(&samples, f).into_iter().copied().collect();
            prop_assert!(dispersion(&run).unwrap() < config.max_fixation_size);

            // Discarded-by-default trailing fixations never get here, so the
            // closing outlier always exists.
            let outlier = samples.iter().find(|s| s.timestamp > f.end).copied().unwrap();
            let mut with_outlier = run.clone();
            with_outlier.push(outlier);
            prop_assert!(!is_within_dispersion(&with_outlier, config.max_fixation_size));
        }
    }

    #[test]
    fn queue_never_exceeds_window_length(samples in gaze_stream(), config in idt_config()) {
        let mut segmenter = FixationSegmenter::new(config).unwrap();
        for sample in samples {
            segmenter.push(sample);
            if segmenter.state() == SegmenterState::Accumulating {
                prop_assert!(segmenter.buffered_len() <= config.min_points_per_fixation);
            }
        }
    }

    #[test]
    fn closing_sample_seeds_next_queue(samples in gaze_stream(), config in idt_config()) {
        let mut segmenter = FixationSegmenter::new(config).unwrap();
        for sample in samples {
            if segmenter.push(sample).is_some() {
                prop_assert_eq!(segmenter.state(), SegmenterState::Accumulating);
                let buffered: Vec<GazeSample> = segmenter.buffered().copied().collect();
                prop_assert_eq!(buffered, vec![sample]);
            }
        }
    }

    #[test]
    fn stats_account_for_every_sample(samples in gaze_stream(), config in idt_config()) {
        let detector = FixationDetector::new(config).unwrap();
        let (fixations, stats) = detector.detect_with_stats(samples.iter().copied());
        prop_assert_eq!(stats.samples, samples.len());
        prop_assert_eq!(stats.fixations, fixations.len());
        prop_assert!(stats.samples_in_fixations + stats.discarded_at_end <= samples.len());
        let counted: usize = fixations.iter().map(|f| members(&samples, f).len()).sum();
        prop_assert_eq!(counted, stats.samples_in_fixations);
    }
}

#[test]
fn inverted_thresholds_close_on_the_next_sample() {
    // The opening window only has to beat min_fixation_size, so it may
    // already be wider than max_fixation_size and end on the next sample.
    let config = IdtConfig {
        min_points_per_fixation: 3,
        min_fixation_size: 0.0442,
        max_fixation_size: 0.01,
        ..Default::default()
    };
    let samples: Vec<GazeSample> = [0.0, 0.02, 0.04, 0.04, 0.04]
        .iter()
        .enumerate()
        .map(|(i, &x)| GazeSample::looking(i as f64 * 0.01, x, 0.0, 1.0))
        .collect();

    let fixations = FixationDetector::new(config).unwrap().detect(&samples);
    assert_eq!(fixations, rescan_detect(&samples, &config));
    assert_eq!(fixations.len(), 1);
    assert_eq!(fixations[0].start, 0.0);
    assert_eq!(fixations[0].end, 0.02);

    let members: Vec<GazeSample> = samples[..3].to_vec();
    assert!(dispersion(&members).unwrap() >= config.max_fixation_size);
}

#[test]
fn identical_samples_never_close() {
    let samples: Vec<GazeSample> = (0..3)
        .map(|i| GazeSample::looking(i as f64, 0.0, 0.0, 0.0))
        .collect();
    let detector = FixationDetector::new(IdtConfig {
        min_points_per_fixation: 2,
        min_fixation_size: 0.01,
        ..Default::default()
    })
    .unwrap();
    assert!(detector.detect(&samples).is_empty());
}

#[test]
fn scattered_gaze_yields_nothing() {
    let samples: Vec<GazeSample> = (0..500)
        .map(|i| {
            let phase = i as f64 * 0.7;
            GazeSample::looking(i as f64 * 0.01, phase.sin(), phase.cos(), 0.5)
        })
        .collect();
    assert!(FixationDetector::with_defaults().detect(&samples).is_empty());
}
