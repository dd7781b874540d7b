//! Property-based tests for configuration-space adapters.
//!
//! Run with: cargo test -p motion-space -- proptest

use std::f64::consts::PI;

use motion_space::{BaseSpace, ConfigurationSpace, JointSpace};
use motion_types::{JointRange, SampleSequence, circular_difference};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// A circular joint followed by a bounded one, like a planar 2-link arm.
fn arm_space() -> JointSpace {
    JointSpace::new(&[JointRange::Circular, JointRange::bounded(-2.0, 2.0)])
        .unwrap()
        .with_resolutions(&[0.05, 0.1])
        .unwrap()
}

fn arb_arm_conf() -> impl Strategy<Value = [f64; 2]> {
    (-10.0..10.0f64, -2.0..2.0f64).prop_map(|(a, b)| [a, b])
}

fn arb_base_conf() -> impl Strategy<Value = [f64; 3]> {
    (-5.0..5.0f64, -5.0..5.0f64, -PI..PI).prop_map(|(x, y, t)| [x, y, t])
}

// =============================================================================
// Joint space
// =============================================================================

proptest! {
    /// Circular differences always take the short way round.
    #[test]
    fn circular_difference_in_half_open_range(a in -100.0..100.0f64, b in -100.0..100.0f64) {
        let d = circular_difference(a, b);
        prop_assert!(d > -PI && d <= PI, "difference {} out of range", d);
    }

    /// Distance is symmetric and zero on identical configurations.
    #[test]
    fn distance_is_symmetric(q1 in arb_arm_conf(), q2 in arb_arm_conf()) {
        let space = arm_space();
        let forward = space.distance(&q1, &q2);
        let backward = space.distance(&q2, &q1);
        prop_assert!((forward - backward).abs() < 1e-9);
        prop_assert!(space.distance(&q1, &q1) == 0.0);
    }

    /// Extension ends exactly at the target and respects the resolution.
    #[test]
    fn extend_ends_at_target_in_small_steps(q1 in arb_arm_conf(), q2 in arb_arm_conf()) {
        let space = arm_space();
        let steps: Vec<_> = space.extend(&q1, &q2).collect();
        prop_assert!(!steps.is_empty());
        prop_assert_eq!(steps.last().unwrap().as_slice(), &q2[..]);

        let mut previous = q1.to_vec();
        for q in &steps {
            let d = space.difference(q, &previous);
            prop_assert!(d[0].abs() <= 0.05 + 1e-9, "circular step {} too large", d[0]);
            prop_assert!(d[1].abs() <= 0.1 + 1e-9, "linear step {} too large", d[1]);
            previous = q.to_vec();
        }
    }

    /// The circular joint never sweeps more than half a turn.
    #[test]
    fn extend_never_takes_long_arc(q1 in arb_arm_conf(), q2 in arb_arm_conf()) {
        let space = arm_space();
        let mut swept = 0.0;
        let mut previous = q1[0];
        for q in space.extend(&q1, &q2) {
            swept += circular_difference(q[0], previous).abs();
            previous = q[0];
        }
        prop_assert!(swept <= PI + 1e-6, "swept {} rad", swept);
    }

    /// Samples stay within the sampling bounds for either sequence.
    #[test]
    fn samples_within_limits(seed in any::<u64>(), halton in any::<bool>()) {
        let sequence = if halton { SampleSequence::Halton } else { SampleSequence::Uniform };
        let mut space = arm_space().with_sequence(sequence, Some(seed));
        for _ in 0..20 {
            let q = space.sample();
            prop_assert!(q[0] >= -PI && q[0] <= PI);
            prop_assert!(space.within_limits(&q));
        }
    }
}

// =============================================================================
// Base space
// =============================================================================

proptest! {
    /// Three-phase extension ends at the target and never jumps.
    #[test]
    fn base_extend_is_continuous(
        q1 in arb_base_conf(),
        q2 in arb_base_conf(),
        reversible in any::<bool>(),
    ) {
        let space = BaseSpace::new((-5.0, -5.0), (5.0, 5.0))
            .unwrap()
            .with_reversible(reversible);
        let steps: Vec<_> = space.extend(&q1, &q2).collect();
        prop_assert_eq!(steps.last().unwrap().as_slice(), &q2[..]);

        let mut previous = q1.to_vec();
        for q in &steps {
            let d = space.difference(q, &previous);
            prop_assert!(d[0].abs() <= 0.05 + 1e-9);
            prop_assert!(d[1].abs() <= 0.05 + 1e-9);
            prop_assert!(d[2].abs() <= 0.05 + 1e-9);
            previous = q.to_vec();
        }
    }

    /// Each step either turns in place or drives straight, never both.
    #[test]
    fn base_extend_separates_turning_and_driving(q1 in arb_base_conf(), q2 in arb_base_conf()) {
        let space = BaseSpace::new((-5.0, -5.0), (5.0, 5.0)).unwrap();
        let mut previous = q1.to_vec();
        for q in space.extend(&q1, &q2) {
            let d = space.difference(&q, &previous);
            let moved = d[0].hypot(d[1]) > 1e-9;
            let turned = d[2].abs() > 1e-9;
            prop_assert!(!(moved && turned), "step {:?} both drives and turns", d);
            previous = q.to_vec();
        }
    }
}
