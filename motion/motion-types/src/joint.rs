//! Joint kinds, ranges and static joint descriptions.

use nalgebra::{Point3, Unit, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::angle::CIRCULAR_LIMITS;
use crate::ids::LinkId;
use crate::pose::Pose;

/// Type of joint connecting a link to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointKind {
    /// Rotation about a single axis within limits.
    Revolute,
    /// Rotation about a single axis without limits.
    Continuous,
    /// Translation along a single axis.
    Prismatic,
    /// No relative motion.
    Fixed,
    /// Rotation about all axes (ball joint).
    Spherical,
    /// Translation in a plane.
    Planar,
}

impl JointKind {
    /// Number of degrees of freedom of this joint kind.
    #[must_use]
    pub const fn dof(self) -> usize {
        match self {
            Self::Fixed => 0,
            Self::Revolute | Self::Continuous | Self::Prismatic => 1,
            Self::Spherical | Self::Planar => 3,
        }
    }

    /// Returns true if the joint can move at all.
    #[must_use]
    pub const fn is_movable(self) -> bool {
        self.dof() > 0
    }

    /// Returns true for single-axis rotational joints.
    #[must_use]
    pub const fn is_rotational(self) -> bool {
        matches!(self, Self::Revolute | Self::Continuous)
    }
}

impl std::fmt::Display for JointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Revolute => write!(f, "revolute"),
            Self::Continuous => write!(f, "continuous"),
            Self::Prismatic => write!(f, "prismatic"),
            Self::Fixed => write!(f, "fixed"),
            Self::Spherical => write!(f, "spherical"),
            Self::Planar => write!(f, "planar"),
        }
    }
}

/// The admissible positions of a single-DOF joint.
///
/// A circular range wraps around: positions that differ by whole turns are
/// the same configuration.
///
/// # Example
///
/// ```
/// use motion_types::JointRange;
/// use std::f64::consts::PI;
///
/// let elbow = JointRange::bounded(-1.5, 1.5);
/// assert!(elbow.contains(1.0));
/// assert!(!elbow.contains(2.0));
///
/// let wrist = JointRange::Circular;
/// assert!(wrist.contains(100.0));
/// assert_eq!(wrist.sampling_bounds(), (-PI, PI));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointRange {
    /// Limited to `[lower, upper]`.
    Bounded {
        /// Lower limit.
        lower: f64,
        /// Upper limit.
        upper: f64,
    },
    /// Unlimited rotation.
    Circular,
}

impl JointRange {
    /// Creates a bounded range.
    #[must_use]
    pub const fn bounded(lower: f64, upper: f64) -> Self {
        Self::Bounded { lower, upper }
    }

    /// Interprets raw engine limits.
    ///
    /// Rotational joints whose upper limit lies below the lower limit are
    /// reported by engines as unlimited and become [`JointRange::Circular`].
    #[must_use]
    pub fn from_limits(kind: JointKind, lower: f64, upper: f64) -> Self {
        if kind == JointKind::Continuous || (kind.is_rotational() && upper < lower) {
            Self::Circular
        } else {
            Self::Bounded { lower, upper }
        }
    }

    /// Returns true for wrap-around ranges.
    #[must_use]
    pub const fn is_circular(&self) -> bool {
        matches!(self, Self::Circular)
    }

    /// Returns true if `value` is admissible.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            Self::Bounded { lower, upper } => (lower..=upper).contains(&value),
            Self::Circular => value.is_finite(),
        }
    }

    /// Returns true for bounded ranges that cannot be sampled: non-finite
    /// limits or `lower >= upper`.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        match *self {
            Self::Bounded { lower, upper } => {
                !lower.is_finite() || !upper.is_finite() || lower >= upper
            }
            Self::Circular => false,
        }
    }

    /// Interval that samplers draw from.
    #[must_use]
    pub const fn sampling_bounds(&self) -> (f64, f64) {
        match *self {
            Self::Bounded { lower, upper } => (lower, upper),
            Self::Circular => CIRCULAR_LIMITS,
        }
    }
}

/// Static description of a joint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointInfo {
    /// Human-readable name.
    pub name: String,
    /// Joint kind.
    pub kind: JointKind,
    /// Admissible positions.
    pub range: JointRange,
    /// Link the joint hangs from.
    pub parent_link: LinkId,
    /// Link the joint moves.
    pub child_link: LinkId,
    /// Motion axis in the joint frame.
    pub axis: Unit<Vector3<f64>>,
    /// Joint frame relative to the parent link frame.
    pub origin: Pose,
}

impl JointInfo {
    /// Creates a joint description with identity origin and a Z axis.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: JointKind,
        range: JointRange,
        parent_link: LinkId,
        child_link: LinkId,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            range,
            parent_link,
            child_link,
            axis: Vector3::z_axis(),
            origin: Pose::identity(),
        }
    }

    /// Sets the joint frame relative to the parent link.
    #[must_use]
    pub fn with_origin(mut self, origin: Pose) -> Self {
        self.origin = origin;
        self
    }

    /// Sets the motion axis.
    #[must_use]
    pub fn with_axis(mut self, axis: Unit<Vector3<f64>>) -> Self {
        self.axis = axis;
        self
    }

    /// Sets the joint frame translation, keeping its rotation.
    #[must_use]
    pub fn with_offset(mut self, offset: Vector3<f64>) -> Self {
        self.origin.position = Point3::from(offset);
        self
    }

    /// Returns true if the joint wraps around.
    #[must_use]
    pub const fn is_circular(&self) -> bool {
        self.range.is_circular()
    }

    /// Pose of the child link frame relative to the parent link frame at
    /// joint position `q`.
    ///
    /// Fixed and multi-DOF joints ignore `q`.
    #[must_use]
    pub fn child_transform(&self, q: f64) -> Pose {
        let motion = match self.kind {
            JointKind::Revolute | JointKind::Continuous => Pose::from_axis_angle(&self.axis, q),
            JointKind::Prismatic => Pose::from_position(Point3::from(self.axis.into_inner() * q)),
            JointKind::Fixed | JointKind::Spherical | JointKind::Planar => Pose::identity(),
        };
        self.origin.compose(&motion)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_joint_kind_dof() {
        assert_eq!(JointKind::Fixed.dof(), 0);
        assert_eq!(JointKind::Revolute.dof(), 1);
        assert_eq!(JointKind::Continuous.dof(), 1);
        assert_eq!(JointKind::Spherical.dof(), 3);
        assert!(!JointKind::Fixed.is_movable());
        assert!(JointKind::Prismatic.is_movable());
        assert!(!JointKind::Prismatic.is_rotational());
    }

    #[test]
    fn test_range_from_engine_limits() {
        assert!(JointRange::from_limits(JointKind::Revolute, 0.0, -1.0).is_circular());
        assert!(JointRange::from_limits(JointKind::Continuous, -1.0, 1.0).is_circular());
        assert!(!JointRange::from_limits(JointKind::Revolute, -1.0, 1.0).is_circular());
        // Prismatic limits are never reinterpreted
        let r = JointRange::from_limits(JointKind::Prismatic, 1.0, -1.0);
        assert!(!r.is_circular());
        assert!(r.is_degenerate());
    }

    #[test]
    fn test_degenerate_ranges() {
        assert!(JointRange::bounded(1.0, 1.0).is_degenerate());
        assert!(JointRange::bounded(0.0, f64::INFINITY).is_degenerate());
        assert!(JointRange::bounded(f64::NAN, 1.0).is_degenerate());
        assert!(!JointRange::bounded(-1.0, 1.0).is_degenerate());
        assert!(!JointRange::Circular.is_degenerate());
    }

    #[test]
    fn test_revolute_child_transform() {
        let joint = JointInfo::new(
            "shoulder",
            JointKind::Revolute,
            JointRange::bounded(-3.0, 3.0),
            LinkId::BASE,
            LinkId::new(1),
        )
        .with_offset(Vector3::new(1.0, 0.0, 0.0));

        let t = joint.child_transform(FRAC_PI_2);
        let p = t.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_prismatic_child_transform() {
        let joint = JointInfo::new(
            "slide",
            JointKind::Prismatic,
            JointRange::bounded(0.0, 1.0),
            LinkId::BASE,
            LinkId::new(1),
        )
        .with_axis(Vector3::x_axis());

        let t = joint.child_transform(0.25);
        assert_relative_eq!(t.position, Point3::new(0.25, 0.0, 0.0), epsilon = 1e-12);
    }
}
