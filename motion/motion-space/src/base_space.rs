//! Planar `(x, y, heading)` configuration space for mobile bases.
//!
//! Extension between two base configurations happens in three phases:
//! turn in place to face the target position, drive straight to it, then
//! turn in place to the final heading. Interpolating the three coordinates
//! independently would crab sideways, which the base can do but never looks
//! like a plausible drive.

use std::f64::consts::FRAC_PI_2;
use std::iter::Chain;

use motion_types::{
    CIRCULAR_LIMITS, Configuration, PlanningError, Result, SampleSequence, circular_difference,
    wrap_angle,
};

use crate::generator::PointGenerator;
use crate::joint_space::{DEFAULT_RESOLUTION, DEFAULT_WEIGHT};
use crate::space::{ConfigurationSpace, Interpolation};

/// Translations shorter than this are treated as pure rotations.
const MIN_TRANSLATION: f64 = 1e-9;

/// Iterator returned by [`BaseSpace::extend`]: the three phases in order.
pub type BaseExtend = Chain<Chain<Interpolation, Interpolation>, Interpolation>;

/// Heading from which the base drives straight from `q1` toward `q2`.
///
/// When `reversible` is set the base may drive backwards: of the two
/// headings along the line of travel, the one closer to `q1`'s current
/// heading wins.
///
/// # Example
///
/// ```
/// use motion_space::travel_heading;
/// use std::f64::consts::PI;
///
/// // Target is behind a base facing +X
/// let forward = travel_heading(&[0.0, 0.0, 0.0], &[-1.0, 0.0, 0.0], false);
/// let reverse = travel_heading(&[0.0, 0.0, 0.0], &[-1.0, 0.0, 0.0], true);
/// assert!((forward - PI).abs() < 1e-12);
/// assert!(reverse.abs() < 1e-12);
/// ```
#[must_use]
pub fn travel_heading(q1: &[f64], q2: &[f64], reversible: bool) -> f64 {
    let forward = (q2[1] - q1[1]).atan2(q2[0] - q1[0]);
    if reversible && circular_difference(forward, q1[2]).abs() > FRAC_PI_2 {
        wrap_angle(forward + std::f64::consts::PI)
    } else {
        forward
    }
}

/// Configuration space of a planar mobile base.
///
/// # Example
///
/// ```
/// use motion_space::{BaseSpace, ConfigurationSpace};
///
/// let space = BaseSpace::new((-5.0, -5.0), (5.0, 5.0)).unwrap();
/// let path: Vec<_> = space.extend(&[0.0, 0.0, 0.0], &[0.0, 1.0, 0.0]).collect();
///
/// // Turns to face +Y, drives, turns back
/// assert!(path.iter().any(|q| (q[2] - std::f64::consts::FRAC_PI_2).abs() < 1e-9));
/// assert_eq!(path.last().unwrap().as_slice(), &[0.0, 1.0, 0.0]);
/// ```
#[derive(Debug, Clone)]
pub struct BaseSpace {
    lower: (f64, f64),
    upper: (f64, f64),
    weights: [f64; 3],
    resolutions: [f64; 3],
    reversible: bool,
    generator: PointGenerator,
}

impl BaseSpace {
    /// Creates a base space sampling positions in the rectangle spanned by
    /// `lower` and `upper`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::InvalidConfig`] unless both extents are
    /// finite with `lower < upper`.
    pub fn new(lower: (f64, f64), upper: (f64, f64)) -> Result<Self> {
        let valid = |lo: f64, hi: f64| lo.is_finite() && hi.is_finite() && lo < hi;
        if !valid(lower.0, upper.0) || !valid(lower.1, upper.1) {
            return Err(PlanningError::invalid_config(format!(
                "base limits {lower:?}..{upper:?} do not span a rectangle"
            )));
        }
        Ok(Self {
            lower,
            upper,
            weights: [DEFAULT_WEIGHT; 3],
            resolutions: [DEFAULT_RESOLUTION; 3],
            reversible: false,
            generator: PointGenerator::new(SampleSequence::Uniform, 3, None),
        })
    }

    /// Sets the `(x, y, heading)` distance weights.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::InvalidConfig`] for negative or non-finite
    /// weights.
    pub fn with_weights(mut self, weights: [f64; 3]) -> Result<Self> {
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(PlanningError::invalid_config(
                "base weights must be finite and non-negative",
            ));
        }
        self.weights = weights;
        Ok(self)
    }

    /// Sets the `(x, y, heading)` interpolation resolutions.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::InvalidConfig`] for non-positive resolutions.
    pub fn with_resolutions(mut self, resolutions: [f64; 3]) -> Result<Self> {
        if resolutions.iter().any(|r| !r.is_finite() || *r <= 0.0) {
            return Err(PlanningError::invalid_config(
                "base resolutions must be finite and positive",
            ));
        }
        self.resolutions = resolutions;
        Ok(self)
    }

    /// Allows driving backwards when that needs less turning.
    #[must_use]
    pub const fn with_reversible(mut self, reversible: bool) -> Self {
        self.reversible = reversible;
        self
    }

    /// Selects the sample sequence and seed.
    #[must_use]
    pub fn with_sequence(mut self, sequence: SampleSequence, seed: Option<u64>) -> Self {
        self.generator = PointGenerator::new(sequence, 3, seed);
        self
    }

    /// Lower corner of the sampling rectangle.
    #[must_use]
    pub const fn lower(&self) -> (f64, f64) {
        self.lower
    }

    /// Upper corner of the sampling rectangle.
    #[must_use]
    pub const fn upper(&self) -> (f64, f64) {
        self.upper
    }

    /// Returns true if `q` is an `(x, y, theta)` triple inside the sampling
    /// rectangle. Any other length is outside.
    #[must_use]
    pub fn within_limits(&self, q: &[f64]) -> bool {
        let &[x, y, theta] = q else {
            return false;
        };
        (self.lower.0..=self.upper.0).contains(&x)
            && (self.lower.1..=self.upper.1).contains(&y)
            && theta.is_finite()
    }

    fn rotation(&self, at: [f64; 3], from: f64, to: f64) -> Interpolation {
        let delta = circular_difference(to, from);
        let steps = phase_steps(delta.abs() / self.resolutions[2]);
        Interpolation::new(
            &[at[0], at[1], from],
            &[at[0], at[1], to],
            Configuration::from([0.0, 0.0, delta]),
            steps,
        )
    }
}

fn phase_steps(ratio: f64) -> usize {
    // Saturating float to integer conversion; NaN maps to zero
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = (ratio - 1e-12).ceil().max(0.0) as usize;
    steps
}

impl ConfigurationSpace for BaseSpace {
    type Extend = BaseExtend;

    fn dimension(&self) -> usize {
        3
    }

    fn sample(&mut self) -> Configuration {
        let mut unit = [0.0; 3];
        self.generator.fill(&mut unit);
        let (heading_lo, heading_hi) = CIRCULAR_LIMITS;
        Configuration::from([
            unit[0].mul_add(self.upper.0 - self.lower.0, self.lower.0),
            unit[1].mul_add(self.upper.1 - self.lower.1, self.lower.1),
            unit[2].mul_add(heading_hi - heading_lo, heading_lo),
        ])
    }

    fn difference(&self, q2: &[f64], q1: &[f64]) -> Configuration {
        assert!(q1.len() == 3 && q2.len() == 3, "base configurations have three coordinates");
        Configuration::from([q2[0] - q1[0], q2[1] - q1[1], circular_difference(q2[2], q1[2])])
    }

    fn distance(&self, q1: &[f64], q2: &[f64]) -> f64 {
        self.difference(q2, q1)
            .iter()
            .zip(&self.weights)
            .map(|(d, w)| w * d * d)
            .sum::<f64>()
            .sqrt()
    }

    fn extend(&self, q1: &[f64], q2: &[f64]) -> BaseExtend {
        let diff = self.difference(q2, q1);
        let translating = diff[0].hypot(diff[1]) > MIN_TRANSLATION;
        let heading = if translating {
            travel_heading(q1, q2, self.reversible)
        } else {
            q1[2]
        };

        let face = if translating {
            self.rotation([q1[0], q1[1], 0.0], q1[2], heading)
        } else {
            Interpolation::empty(q1)
        };
        let drive = if translating {
            let steps = phase_steps(
                (diff[0] / self.resolutions[0])
                    .abs()
                    .max((diff[1] / self.resolutions[1]).abs()),
            );
            Interpolation::new(
                &[q1[0], q1[1], heading],
                &[q2[0], q2[1], heading],
                Configuration::from([diff[0], diff[1], 0.0]),
                steps,
            )
        } else {
            Interpolation::empty(q1)
        };
        let mut turn = self.rotation([q2[0], q2[1], 0.0], heading, q2[2]);
        if turn.steps() == 0 {
            // Heading already final; still finish on exactly q2
            turn = Interpolation::new(q2, q2, Configuration::zeros(3), 1);
        }
        face.chain(drive).chain(turn)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    const TAU_MINUS_6: f64 = std::f64::consts::TAU - 6.0;

    fn space() -> BaseSpace {
        BaseSpace::new((-10.0, -10.0), (10.0, 10.0)).unwrap()
    }

    #[test]
    fn test_invalid_limits() {
        assert!(BaseSpace::new((0.0, 0.0), (0.0, 1.0)).is_err());
        assert!(BaseSpace::new((0.0, f64::NEG_INFINITY), (1.0, 1.0)).is_err());
    }

    #[test]
    fn test_difference_wraps_heading() {
        let d = space().difference(&[1.0, 2.0, -3.0], &[0.0, 0.0, 3.0]);
        assert_relative_eq!(d[0], 1.0);
        assert_relative_eq!(d[1], 2.0);
        assert_relative_eq!(d[2], TAU_MINUS_6, epsilon = 1e-12);
    }

    #[test]
    fn test_three_phase_extend() {
        let s = space();
        let path: Vec<_> = s.extend(&[0.0, 0.0, 0.0], &[1.0, 0.0, PI / 2.0]).collect();
        // Already facing +X: drive 20 steps, then turn 32 steps
        let drive: Vec<_> = path.iter().filter(|q| q[2] == 0.0).collect();
        assert_eq!(drive.len(), 20);
        assert!(drive.iter().all(|q| q[1] == 0.0));
        assert_eq!(path.len(), 20 + 32);
        assert_eq!(path.last().unwrap().as_slice(), &[1.0, 0.0, PI / 2.0]);
    }

    #[test]
    fn test_pure_rotation_skips_facing() {
        let s = space();
        let path: Vec<_> = s.extend(&[2.0, 3.0, 0.0], &[2.0, 3.0, 0.5]).collect();
        assert_eq!(path.len(), 10);
        assert!(path.iter().all(|q| q[0] == 2.0 && q[1] == 3.0));
        assert_relative_eq!(path[4][2], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_identical_configurations_yield_goal() {
        let path: Vec<_> = space().extend(&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]).collect();
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].as_slice(), &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_reversible_drives_backwards() {
        let forward = space();
        let reverse = space().with_reversible(true);
        let q1 = [0.0, 0.0, 0.0];
        let q2 = [-1.0, 0.0, 0.0];
        let turns = |path: &[Configuration]| path.iter().filter(|q| q[2].abs() > 1e-9).count();

        let fwd: Vec<_> = forward.extend(&q1, &q2).collect();
        let rev: Vec<_> = reverse.extend(&q1, &q2).collect();
        assert!(turns(&fwd) > 100);
        assert_eq!(turns(&rev), 0);
        assert_eq!(rev.last().unwrap().as_slice(), &q2);
    }

    #[test]
    fn test_samples_within_limits() {
        let mut s = BaseSpace::new((1.0, -2.0), (3.0, 2.0))
            .unwrap()
            .with_sequence(SampleSequence::Halton, Some(9));
        for _ in 0..200 {
            let q = s.sample();
            assert!(s.within_limits(&q));
            assert!(q[2] >= -PI && q[2] < PI);
        }
    }

    #[test]
    fn test_within_limits_rejects_wrong_length() {
        let s = space();
        assert!(s.within_limits(&[0.0, 0.0, 0.0]));
        assert!(!s.within_limits(&[0.0, 0.0]));
        assert!(!s.within_limits(&[0.0, 0.0, 0.0, 0.0]));
        assert!(!s.within_limits(&[11.0, 0.0, 0.0]));
    }

    #[test]
    fn test_weighted_distance() {
        let s = space().with_weights([1.0, 1.0, 0.0]).unwrap();
        assert_relative_eq!(s.distance(&[0.0, 0.0, 0.0], &[3.0, 4.0, 2.0]), 5.0);
        assert!(space().with_resolutions([0.1, 0.1, -0.1]).is_err());
    }
}
