//! Property-based tests for grainctl-core control primitives.
//!
//! Covers pickup convergence and idempotence, latency-line alignment, and
//! one-pole boundedness using proptest for randomized inputs.

use grainctl_core::{Authority, LatencyLine, OnePole, PICKUP_TOLERANCE, Parameter, PitchTable};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// A live stream approaching the loaded value hands over at the first
    /// sample within tolerance, and never hands back.
    #[test]
    fn pickup_converges_at_first_close_sample(
        loaded in 0.1f32..0.9f32,
        start_below in any::<bool>(),
        steps in 5usize..200,
    ) {
        let start = if start_below { 0.0 } else { 1.0 };
        let mut param = Parameter::new(start);
        param.load(loaded);

        let mut handed_over_at = None;
        for i in 0..=steps {
            let live = start + (loaded - start) * (i as f32 / steps as f32);
            let was_loaded = param.authority() == Authority::Loaded;
            param.update(live);
            let close = (live - loaded).abs() < PICKUP_TOLERANCE;
            if was_loaded {
                prop_assert_eq!(param.authority() == Authority::Live, close);
                if close && handed_over_at.is_none() {
                    handed_over_at = Some(i);
                }
            } else {
                prop_assert_eq!(param.authority(), Authority::Live);
            }
        }
        prop_assert!(handed_over_at.is_some(), "the last sample equals the loaded value");

        // Moving the knob anywhere afterwards keeps authority live.
        param.update(start);
        prop_assert_eq!(param.authority(), Authority::Live);
        prop_assert_eq!(param.value(), start);
    }

    /// Repeated updates inside the tolerance band keep authority on live.
    #[test]
    fn pickup_is_idempotent_inside_band(
        loaded in 0.0f32..1.0f32,
        jitter in prop::collection::vec(-0.009f32..0.009f32, 1..64),
    ) {
        let mut param = Parameter::new(loaded);
        param.load(loaded);
        for delta in jitter {
            param.update(loaded + delta);
            prop_assert_eq!(param.authority(), Authority::Live);
            prop_assert!((param.value() - loaded).abs() < PICKUP_TOLERANCE);
        }
    }

    /// Whatever goes into a latency line comes out exactly `N` ticks later.
    #[test]
    fn latency_line_preserves_sequence(input in prop::collection::vec(any::<bool>(), 0..256)) {
        let mut line: LatencyLine<bool, 5> = LatencyLine::new();
        let output: Vec<bool> = input.iter().map(|&v| line.process(v)).collect();
        for (tick, &value) in output.iter().enumerate() {
            let expected = if tick < 5 { false } else { input[tick - 5] };
            prop_assert_eq!(value, expected, "tick {}", tick);
        }
    }

    /// A smoother fed readings in [0, 1] stays in [0, 1].
    #[test]
    fn one_pole_stays_bounded(
        coeff in 0.001f32..=1.0f32,
        readings in prop::collection::vec(0.0f32..=1.0f32, 1..512),
    ) {
        let mut pole = OnePole::new(coeff);
        for reading in readings {
            let out = pole.process(reading);
            prop_assert!((-1e-6..=1.0 + 1e-6).contains(&out), "out of range: {}", out);
        }
    }

    /// The pitch table never decreases as the pot turns clockwise.
    #[test]
    fn pitch_lookup_is_monotonic(a in 0.0f32..=1.0f32, b in 0.0f32..=1.0f32) {
        let table = PitchTable::new();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(table.lookup(lo) <= table.lookup(hi) + 1e-5);
    }
}
