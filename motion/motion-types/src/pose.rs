//! Rigid poses of bodies and links.

use nalgebra::{Isometry3, Point3, Unit, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::angle::wrap_angle;

/// Position and orientation of a body or link frame.
///
/// # Example
///
/// ```
/// use motion_types::Pose;
/// use nalgebra::Point3;
///
/// let pose = Pose::from_base_values(1.0, 2.0, 0.0);
/// let world = pose.transform_point(&Point3::new(1.0, 0.0, 0.0));
/// assert_eq!(world, Point3::new(2.0, 2.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    /// Position in the parent frame.
    pub position: Point3<f64>,
    /// Orientation as a unit quaternion.
    pub rotation: UnitQuaternion<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    /// Create an identity pose (origin, no rotation).
    #[must_use]
    pub fn identity() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Create a pose from position only (identity rotation).
    #[must_use]
    pub fn from_position(position: Point3<f64>) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Create a pose from position and rotation.
    #[must_use]
    pub const fn from_position_rotation(
        position: Point3<f64>,
        rotation: UnitQuaternion<f64>,
    ) -> Self {
        Self { position, rotation }
    }

    /// Pure rotation of `angle` radians about `axis`.
    #[must_use]
    pub fn from_axis_angle(axis: &Unit<Vector3<f64>>, angle: f64) -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::from_axis_angle(axis, angle),
        }
    }

    /// Planar pose of a mobile base: `(x, y)` on the ground plane and a
    /// heading `yaw` about +Z.
    #[must_use]
    pub fn from_base_values(x: f64, y: f64, yaw: f64) -> Self {
        Self {
            position: Point3::new(x, y, 0.0),
            rotation: UnitQuaternion::from_axis_angle(&Vector3::z_axis(), yaw),
        }
    }

    /// Replaces the planar components of this pose, keeping its height,
    /// roll and pitch.
    #[must_use]
    pub fn with_base_values(&self, x: f64, y: f64, yaw: f64) -> Self {
        let (roll, pitch, _) = self.rotation.euler_angles();
        Self {
            position: Point3::new(x, y, self.position.z),
            rotation: UnitQuaternion::from_euler_angles(roll, pitch, yaw),
        }
    }

    /// Planar components `(x, y, yaw)`, with `yaw` in `(-π, π]`.
    #[must_use]
    pub fn base_values(&self) -> (f64, f64, f64) {
        let (_, _, yaw) = self.rotation.euler_angles();
        (self.position.x, self.position.y, wrap_angle(yaw))
    }

    /// Create a pose from an isometry.
    #[must_use]
    pub fn from_isometry(iso: Isometry3<f64>) -> Self {
        Self {
            position: Point3::from(iso.translation.vector),
            rotation: iso.rotation,
        }
    }

    /// Convert to an isometry.
    #[must_use]
    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(self.position.coords.into(), self.rotation)
    }

    /// Transform a point from local to parent coordinates.
    #[must_use]
    pub fn transform_point(&self, local: &Point3<f64>) -> Point3<f64> {
        self.position + self.rotation * local.coords
    }

    /// Transform a vector from local to parent coordinates (rotation only).
    #[must_use]
    pub fn transform_vector(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * local
    }

    /// Compute the inverse pose.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.inverse();
        Self {
            position: Point3::from(-(inv_rotation * self.position.coords)),
            rotation: inv_rotation,
        }
    }

    /// Compose two poses: `self * other`.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            position: self.transform_point(&other.position),
            rotation: self.rotation * other.rotation,
        }
    }

    /// Returns true if both poses agree within `epsilon` in position and
    /// rotation angle.
    #[must_use]
    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.position - other.position).norm() <= epsilon
            && self.rotation.angle_to(&other.rotation) <= epsilon
    }

    /// Check if the pose contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|x| x.is_finite())
            && self.rotation.coords.iter().all(|x| x.is_finite())
    }
}
