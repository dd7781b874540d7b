//! Rigid attachments between a grasping link and a grasped body.

use motion_scene::{Scene, SceneResult};
use motion_types::{BodyId, LinkId, Pose};
use tracing::trace;

/// A child body held at a fixed transform relative to a parent link.
///
/// # Example
///
/// ```
/// use motion_collision::Attachment;
/// use motion_scene::{BodyBuilder, KinematicWorld, LinkSpec, Scene};
/// use motion_types::{LinkId, Pose};
/// use nalgebra::{Point3, Vector3};
///
/// let mut world = KinematicWorld::new();
/// let arm = world
///     .add_body(
///         BodyBuilder::new("arm").with_link(
///             LinkSpec::revolute("hand", "base", -3.0, 3.0)
///                 .with_offset(Vector3::new(1.0, 0.0, 0.0)),
///         ),
///     )
///     .unwrap();
/// let cup = world.add_body(BodyBuilder::new("cup")).unwrap();
///
/// let grasp = Pose::from_position(Point3::new(0.1, 0.0, 0.0));
/// let attachment = Attachment::new(arm, LinkId::new(1), grasp, cup);
/// let pose = attachment.assign(&mut world).unwrap();
/// assert!((pose.position.x - 1.1).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    parent: BodyId,
    parent_link: LinkId,
    grasp: Pose,
    child: BodyId,
}

impl Attachment {
    /// Attaches `child` to `parent_link` of `parent` at `grasp`, expressed
    /// in the parent link frame.
    #[must_use]
    pub const fn new(parent: BodyId, parent_link: LinkId, grasp: Pose, child: BodyId) -> Self {
        Self {
            parent,
            parent_link,
            grasp,
            child,
        }
    }

    /// Attaches `child` where it currently is relative to the parent link.
    ///
    /// # Errors
    ///
    /// Returns an error if either body or the link does not exist.
    pub fn from_current<S: Scene + ?Sized>(
        scene: &S,
        parent: BodyId,
        parent_link: LinkId,
        child: BodyId,
    ) -> SceneResult<Self> {
        let link_pose = scene.link_pose(parent, parent_link)?;
        let child_pose = scene.body_pose(child)?;
        let grasp = link_pose.inverse().compose(&child_pose);
        Ok(Self::new(parent, parent_link, grasp, child))
    }

    /// The grasping body.
    #[must_use]
    pub const fn parent(&self) -> BodyId {
        self.parent
    }

    /// The grasping link.
    #[must_use]
    pub const fn parent_link(&self) -> LinkId {
        self.parent_link
    }

    /// Child pose in the parent link frame.
    #[must_use]
    pub const fn grasp(&self) -> &Pose {
        &self.grasp
    }

    /// The grasped body.
    #[must_use]
    pub const fn child(&self) -> BodyId {
        self.child
    }

    /// Moves the child body to follow the parent link and returns its new
    /// world pose.
    ///
    /// # Errors
    ///
    /// Returns an error if either body or the link does not exist.
    pub fn assign<S: Scene + ?Sized>(&self, scene: &mut S) -> SceneResult<Pose> {
        let link_pose = scene.link_pose(self.parent, self.parent_link)?;
        let child_pose = body_from_end_effector(&link_pose, &self.grasp);
        scene.set_body_pose(self.child, &child_pose)?;
        trace!(parent = %self.parent, child = %self.child, "Attachment assigned");
        Ok(child_pose)
    }
}

/// World pose of a held body given the end-effector pose.
#[must_use]
pub fn body_from_end_effector(end_effector: &Pose, grasp: &Pose) -> Pose {
    end_effector.compose(grasp)
}

/// End-effector pose that holds a body at `body_pose`.
#[must_use]
pub fn end_effector_from_body(body_pose: &Pose, grasp: &Pose) -> Pose {
    body_pose.compose(&grasp.inverse())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use motion_scene::{BodyBuilder, KinematicWorld, LinkSpec};
    use nalgebra::{Point3, Vector3};
    use std::f64::consts::FRAC_PI_2;

    fn arm_and_cup() -> (KinematicWorld, BodyId, BodyId) {
        let mut world = KinematicWorld::new();
        let arm = world
            .add_body(
                BodyBuilder::new("arm").with_link(
                    LinkSpec::continuous("hand", "base").with_offset(Vector3::new(1.0, 0.0, 0.0)),
                ),
            )
            .unwrap();
        let cup = world.add_body(BodyBuilder::new("cup")).unwrap();
        (world, arm, cup)
    }

    #[test]
    fn test_assign_follows_link() {
        let (mut world, arm, cup) = arm_and_cup();
        let grasp = Pose::from_position(Point3::new(0.5, 0.0, 0.0));
        let attachment = Attachment::new(arm, LinkId::new(1), grasp, cup);

        world.set_joint_positions(arm, &world.joints(arm).unwrap(), &[FRAC_PI_2]).unwrap();
        let pose = attachment.assign(&mut world).unwrap();
        // Hand at (1, 0) rotated a quarter turn; grasp offset now points along +Y
        assert_relative_eq!(pose.position.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(pose.position.y, 0.5, epsilon = 1e-12);
        assert!(world.body_pose(cup).unwrap().approx_eq(&pose, 1e-12));
    }

    #[test]
    fn test_assign_is_idempotent() {
        let (mut world, arm, cup) = arm_and_cup();
        let attachment =
            Attachment::new(arm, LinkId::new(1), Pose::from_base_values(0.2, 0.1, 0.3), cup);
        world.set_joint_positions(arm, &world.joints(arm).unwrap(), &[0.7]).unwrap();
        let first = attachment.assign(&mut world).unwrap();
        let second = attachment.assign(&mut world).unwrap();
        assert!(first.approx_eq(&second, 1e-12));
    }

    #[test]
    fn test_from_current_preserves_pose() {
        let (mut world, arm, cup) = arm_and_cup();
        let placed = Pose::from_base_values(1.3, -0.4, 0.2);
        world.set_body_pose(cup, &placed).unwrap();
        let attachment = Attachment::from_current(&world, arm, LinkId::new(1), cup).unwrap();
        let pose = attachment.assign(&mut world).unwrap();
        assert!(pose.approx_eq(&placed, 1e-9));
    }

    #[test]
    fn test_end_effector_round_trip() {
        let grasp = Pose::from_base_values(0.1, 0.2, 0.4);
        let ee = Pose::from_base_values(1.0, -1.0, 1.2);
        let body = body_from_end_effector(&ee, &grasp);
        assert!(end_effector_from_body(&body, &grasp).approx_eq(&ee, 1e-12));
    }
}
