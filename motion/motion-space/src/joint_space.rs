//! Configuration space over the joints of an articulated body.

use motion_scene::Scene;
use motion_types::{
    BodyId, Configuration, JointId, JointRange, PlanningError, Result, SampleSequence,
    circular_difference,
};
use tracing::debug;

use crate::generator::PointGenerator;
use crate::space::{ConfigurationSpace, Interpolation};

/// Default interpolation step per joint (radians or meters).
pub const DEFAULT_RESOLUTION: f64 = 0.05;

/// Default distance weight per joint.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// One coordinate of a joint space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointAxis {
    /// The joint this coordinate drives.
    pub joint: JointId,
    /// Whether values wrap around every full turn.
    pub circular: bool,
    /// Lower sampling bound.
    pub lower: f64,
    /// Upper sampling bound.
    pub upper: f64,
}

impl JointAxis {
    fn from_range(joint: JointId, range: JointRange, custom: Option<(f64, f64)>) -> Result<Self> {
        let (lower, upper) = custom.unwrap_or_else(|| range.sampling_bounds());
        let axis = Self {
            joint,
            circular: range.is_circular(),
            lower,
            upper,
        };
        if JointRange::bounded(lower, upper).is_degenerate() {
            return Err(PlanningError::DegenerateJointRange { joint, lower, upper });
        }
        Ok(axis)
    }

    /// Returns true if `value` respects this coordinate's limits. Circular
    /// coordinates accept any finite value.
    #[must_use]
    pub fn admits(&self, value: f64) -> bool {
        if self.circular {
            value.is_finite()
        } else {
            (self.lower..=self.upper).contains(&value)
        }
    }
}

/// Joint-space adapter: sampling within joint limits, wrap-aware
/// differences, weighted distance and resolution-driven interpolation.
///
/// # Example
///
/// ```
/// use motion_space::{ConfigurationSpace, JointSpace};
/// use motion_types::JointRange;
///
/// // A 2-link planar arm whose shoulder wraps around
/// let space = JointSpace::new(&[JointRange::Circular, JointRange::bounded(-2.0, 2.0)]).unwrap();
///
/// // 6.0 rad is 0.283 rad the other way round
/// let d = space.distance(&[0.0, 0.0], &[6.0, 0.0]);
/// assert!((d - 0.283).abs() < 1e-3);
///
/// // Interpolation ends exactly at the target
/// let last = space.extend(&[0.0, 0.0], &[6.0, 0.0]).last().unwrap();
/// assert_eq!(last.as_slice(), &[6.0, 0.0]);
/// ```
#[derive(Debug, Clone)]
pub struct JointSpace {
    axes: Vec<JointAxis>,
    weights: Vec<f64>,
    resolutions: Vec<f64>,
    generator: PointGenerator,
    unit: Vec<f64>,
}

impl JointSpace {
    /// Creates a space from joint ranges, numbering joints from zero.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::DegenerateJointRange`] for a bounded range
    /// with `lower >= upper` or non-finite limits.
    pub fn new(ranges: &[JointRange]) -> Result<Self> {
        let axes = ranges
            .iter()
            .zip(0u32..)
            .map(|(&range, i)| JointAxis::from_range(JointId::new(i), range, None))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_axes(axes))
    }

    /// Creates a space over `joints` of `body`, reading kinds and limits
    /// from the scene. Entries of `custom_limits` replace the sampling
    /// bounds of their joint.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::UnsupportedJoint`] for fixed or multi-DOF
    /// joints, [`PlanningError::DegenerateJointRange`] for unusable limits,
    /// and [`PlanningError::Scene`] if the scene query fails.
    pub fn from_scene<S: Scene + ?Sized>(
        scene: &S,
        body: BodyId,
        joints: &[JointId],
        custom_limits: &[(JointId, (f64, f64))],
    ) -> Result<Self> {
        let mut axes = Vec::with_capacity(joints.len());
        for &joint in joints {
            let info = scene.joint_info(body, joint)?;
            if info.kind.dof() != 1 {
                return Err(PlanningError::UnsupportedJoint {
                    joint,
                    kind: info.kind,
                });
            }
            let custom = custom_limits
                .iter()
                .find_map(|&(j, limits)| (j == joint).then_some(limits));
            axes.push(JointAxis::from_range(joint, info.range, custom)?);
        }
        debug!(
            body = %body,
            dimension = axes.len(),
            circular = axes.iter().filter(|a| a.circular).count(),
            "Joint space created"
        );
        Ok(Self::from_axes(axes))
    }

    fn from_axes(axes: Vec<JointAxis>) -> Self {
        let n = axes.len();
        Self {
            generator: PointGenerator::new(SampleSequence::Uniform, n, None),
            weights: vec![DEFAULT_WEIGHT; n],
            resolutions: vec![DEFAULT_RESOLUTION; n],
            unit: vec![0.0; n],
            axes,
        }
    }

    /// Sets per-joint distance weights.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::DimensionMismatch`] for a wrong length and
    /// [`PlanningError::InvalidConfig`] for negative or non-finite weights.
    pub fn with_weights(mut self, weights: &[f64]) -> Result<Self> {
        PlanningError::check_dimension(self.axes.len(), weights.len())?;
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(PlanningError::invalid_config(
                "joint weights must be finite and non-negative",
            ));
        }
        self.weights = weights.to_vec();
        Ok(self)
    }

    /// Sets per-joint interpolation resolutions.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::DimensionMismatch`] for a wrong length and
    /// [`PlanningError::InvalidConfig`] for non-positive resolutions.
    pub fn with_resolutions(mut self, resolutions: &[f64]) -> Result<Self> {
        PlanningError::check_dimension(self.axes.len(), resolutions.len())?;
        if resolutions.iter().any(|r| !r.is_finite() || *r <= 0.0) {
            return Err(PlanningError::invalid_config(
                "joint resolutions must be finite and positive",
            ));
        }
        self.resolutions = resolutions.to_vec();
        Ok(self)
    }

    /// Selects the sample sequence and seed.
    #[must_use]
    pub fn with_sequence(mut self, sequence: SampleSequence, seed: Option<u64>) -> Self {
        self.generator = PointGenerator::new(sequence, self.axes.len(), seed);
        self
    }

    /// The coordinates of this space.
    #[must_use]
    pub fn axes(&self) -> &[JointAxis] {
        &self.axes
    }

    /// Joint ids, in coordinate order.
    #[must_use]
    pub fn joints(&self) -> Vec<JointId> {
        self.axes.iter().map(|a| a.joint).collect()
    }

    /// Returns true if every non-circular coordinate of `q` lies within its
    /// limits.
    ///
    /// # Panics
    ///
    /// Panics if `q` has the wrong length.
    #[must_use]
    pub fn within_limits(&self, q: &[f64]) -> bool {
        assert_eq!(q.len(), self.axes.len(), "configuration length mismatch");
        self.axes.iter().zip(q).all(|(axis, &v)| axis.admits(v))
    }

    /// Number of interpolation steps `extend` would take from `q1` to `q2`.
    #[must_use]
    pub fn extend_steps(&self, q1: &[f64], q2: &[f64]) -> usize {
        let diff = self.difference(q2, q1);
        let norm = diff
            .iter()
            .zip(&self.resolutions)
            .map(|(d, r)| (d / r).powi(2))
            .sum::<f64>()
            .sqrt();
        // Saturating float to integer conversion; NaN maps to zero
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = (norm - 1e-12).ceil() as usize;
        steps.max(1)
    }
}

impl ConfigurationSpace for JointSpace {
    type Extend = Interpolation;

    fn dimension(&self) -> usize {
        self.axes.len()
    }

    fn sample(&mut self) -> Configuration {
        self.generator.fill(&mut self.unit);
        self.axes
            .iter()
            .zip(&self.unit)
            .map(|(axis, u)| u.mul_add(axis.upper - axis.lower, axis.lower))
            .collect()
    }

    fn difference(&self, q2: &[f64], q1: &[f64]) -> Configuration {
        assert_eq!(q1.len(), self.axes.len(), "configuration length mismatch");
        assert_eq!(q2.len(), self.axes.len(), "configuration length mismatch");
        self.axes
            .iter()
            .zip(q2.iter().zip(q1))
            .map(|(axis, (&b, &a))| {
                if axis.circular {
                    circular_difference(b, a)
                } else {
                    b - a
                }
            })
            .collect()
    }

    fn distance(&self, q1: &[f64], q2: &[f64]) -> f64 {
        self.difference(q2, q1)
            .iter()
            .zip(&self.weights)
            .map(|(d, w)| w * d * d)
            .sum::<f64>()
            .sqrt()
    }

    fn extend(&self, q1: &[f64], q2: &[f64]) -> Interpolation {
        let steps = self.extend_steps(q1, q2);
        Interpolation::new(q1, q2, self.difference(q2, q1), steps)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use motion_scene::{BodyBuilder, KinematicWorld, LinkSpec};
    use std::f64::consts::{PI, TAU};

    fn planar_arm() -> JointSpace {
        JointSpace::new(&[JointRange::Circular, JointRange::bounded(-2.0, 2.0)]).unwrap()
    }

    #[test]
    fn test_degenerate_range_rejected() {
        let err = JointSpace::new(&[JointRange::bounded(1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, PlanningError::DegenerateJointRange { .. }));
        let err = JointSpace::new(&[JointRange::bounded(0.0, f64::INFINITY)]).unwrap_err();
        assert!(matches!(err, PlanningError::DegenerateJointRange { .. }));
    }

    #[test]
    fn test_wrap_around_distance() {
        let space = planar_arm();
        let direct = space.distance(&[0.0, 0.0], &[6.0, 0.0]);
        let wrapped = space.distance(&[0.0, 0.0], &[6.0 - TAU, 0.0]);
        assert_relative_eq!(direct, wrapped, epsilon = 1e-12);
        assert_relative_eq!(direct, TAU - 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_linear_joint_does_not_wrap() {
        let space = planar_arm();
        let d = space.difference(&[0.0, 1.5], &[0.0, -1.5]);
        assert_eq!(d[1], 3.0);
    }

    #[test]
    fn test_extend_takes_short_arc() {
        let space = planar_arm();
        let steps: Vec<_> = space.extend(&[3.0, 0.0], &[-3.0, 0.0]).collect();
        // 0.283 rad at 0.05 per step
        assert_eq!(steps.len(), 6);
        for q in &steps[..steps.len() - 1] {
            assert!(q[0] > 3.0 && q[0] < 3.0 + (TAU - 6.0) + 1e-9);
        }
        assert_eq!(steps.last().unwrap().as_slice(), &[-3.0, 0.0]);
    }

    #[test]
    fn test_extend_identical_configurations() {
        let space = planar_arm();
        let steps: Vec<_> = space.extend(&[0.5, 0.5], &[0.5, 0.5]).collect();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].as_slice(), &[0.5, 0.5]);
    }

    #[test]
    fn test_refine_yields_steps_plus_one() {
        let space = planar_arm();
        let steps: Vec<_> = space.refine(&[0.0, 0.0], &[0.0, 1.0], 4).collect();
        assert_eq!(steps.len(), 5);
        assert_relative_eq!(steps[0][1], 0.2, epsilon = 1e-12);
        assert_eq!(steps[4][1], 1.0);
    }

    #[test]
    fn test_samples_respect_limits() {
        for sequence in [SampleSequence::Uniform, SampleSequence::Halton] {
            let mut space = planar_arm().with_sequence(sequence, Some(5));
            for _ in 0..500 {
                let q = space.sample();
                assert!(q[0] >= -PI && q[0] < PI);
                assert!(q[1] >= -2.0 && q[1] < 2.0);
                assert!(space.within_limits(&q));
            }
        }
    }

    #[test]
    fn test_weights_and_resolutions_validated() {
        assert!(planar_arm().with_weights(&[1.0]).unwrap_err().is_dimension_mismatch());
        assert!(matches!(
            planar_arm().with_resolutions(&[0.1, 0.0]),
            Err(PlanningError::InvalidConfig(_))
        ));
        let space = planar_arm().with_weights(&[0.0, 4.0]).unwrap();
        assert_relative_eq!(space.distance(&[0.0, 0.0], &[1.0, 1.0]), 2.0);
    }

    #[test]
    fn test_within_limits() {
        let space = planar_arm();
        assert!(space.within_limits(&[100.0, 2.0]));
        assert!(!space.within_limits(&[0.0, 2.1]));
        assert!(!space.within_limits(&[f64::NAN, 0.0]));
    }

    #[test]
    fn test_from_scene_with_custom_limits() {
        let mut world = KinematicWorld::new();
        let body = world
            .add_body(
                BodyBuilder::new("arm")
                    .with_link(LinkSpec::continuous("a", "base"))
                    .with_link(LinkSpec::revolute("b", "a", -1.0, 1.0))
                    .with_link(LinkSpec::fixed("c", "b")),
            )
            .unwrap();
        let joints = [JointId::new(0), JointId::new(1)];
        let custom = [(JointId::new(1), (0.0, 0.5))];
        let space = JointSpace::from_scene(&world, body, &joints, &custom).unwrap();
        assert!(space.axes()[0].circular);
        assert_eq!(space.axes()[1].upper, 0.5);
        assert_eq!(space.joints(), joints.to_vec());

        let err = JointSpace::from_scene(&world, body, &[JointId::new(2)], &[]).unwrap_err();
        assert!(matches!(err, PlanningError::UnsupportedJoint { .. }));
    }
}
