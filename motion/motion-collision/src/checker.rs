//! Collision predicate for an articulated body among obstacles.

use std::fmt;

use motion_scene::{Scene, SceneResult};
use motion_types::{
    BodyId, BodyLink, CollisionSettings, JointId, LinkId, Obstacle, PlanningError, Result,
    SceneError,
};
use tracing::{debug, warn};

use crate::attachment::Attachment;
use crate::check::CollisionCheck;
use crate::graph::LinkGraph;
use crate::pairs::self_collision_pairs;

/// The first contact found by a collision query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Contact {
    /// Two links of the planned body.
    SelfCollision {
        /// First link.
        a: LinkId,
        /// Second link.
        b: LinkId,
    },
    /// A robot part, or a body it holds, against an obstacle.
    Obstacle {
        /// Link of the robot or of an attached body.
        robot: BodyLink,
        /// Link of the obstacle.
        obstacle: BodyLink,
    },
    /// The scene failed to answer; treated as a collision.
    SceneFailure,
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfCollision { a, b } => write!(f, "self-collision {a} / {b}"),
            Self::Obstacle { robot, obstacle } => write!(f, "{robot} hits {obstacle}"),
            Self::SceneFailure => write!(f, "scene query failed"),
        }
    }
}

/// Collision test for one body's joint set against itself and a list of
/// obstacles, with attached bodies following their parent links.
///
/// Pair lists are computed once at construction. Each query sets the
/// joints, re-assigns attachments, then checks self pairs at zero margin
/// and obstacle pairs at the configured clearance, stopping at the first
/// contact. Joint limits are not checked here.
///
/// # Example
///
/// ```
/// use motion_collision::{CollisionCheck, CollisionChecker};
/// use motion_scene::{BodyBuilder, KinematicWorld, LinkSpec, Scene};
/// use motion_types::{CollisionSettings, Obstacle};
/// use nalgebra::{Point3, Vector3};
///
/// let mut world = KinematicWorld::new();
/// let arm = world
///     .add_body(
///         BodyBuilder::new("arm").with_link(
///             LinkSpec::continuous("link", "base")
///                 .with_capsule(Point3::origin(), Point3::new(1.0, 0.0, 0.0), 0.05),
///         ),
///     )
///     .unwrap();
/// let post = world
///     .add_body(BodyBuilder::new("post").with_base_sphere(Point3::new(0.0, 0.8, 0.0), 0.1))
///     .unwrap();
///
/// let joints = world.joints(arm).unwrap();
/// let mut checker = CollisionChecker::new(
///     &mut world,
///     arm,
///     &joints,
///     &[Obstacle::body(post)],
///     &[],
///     &CollisionSettings::new(),
/// )
/// .unwrap();
///
/// assert!(!checker.in_collision(&[0.0]));
/// assert!(checker.in_collision(&[std::f64::consts::FRAC_PI_2]));
/// ```
pub struct CollisionChecker<'s, S: Scene + ?Sized> {
    scene: &'s mut S,
    body: BodyId,
    joints: Vec<JointId>,
    attachments: Vec<Attachment>,
    self_pairs: Vec<(LinkId, LinkId)>,
    obstacle_pairs: Vec<(BodyLink, BodyLink)>,
    max_distance: f64,
}

impl<'s, S: Scene + ?Sized> CollisionChecker<'s, S> {
    /// Builds the predicate for `joints` of `body`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::InvalidConfig`] for invalid settings, or a
    /// scene error if a body, link or joint does not exist.
    pub fn new(
        scene: &'s mut S,
        body: BodyId,
        joints: &[JointId],
        obstacles: &[Obstacle],
        attachments: &[Attachment],
        settings: &CollisionSettings,
    ) -> Result<Self> {
        let issues = settings.validate();
        if !issues.is_empty() {
            return Err(PlanningError::invalid_config(issues.join("; ")));
        }

        let graph = LinkGraph::from_scene(&*scene, body)?;
        if let Some(&joint) = joints.iter().find(|&&joint| graph.child_link(joint).is_none()) {
            return Err(SceneError::UnknownJoint { body, joint }.into());
        }

        let self_pairs = if settings.self_collisions() {
            self_collision_pairs(&graph, joints, settings)
        } else {
            Vec::new()
        };

        let mut parts: Vec<BodyLink> = graph
            .moving_links(joints)
            .into_iter()
            .filter(|link| !settings.allowed_links().contains(link))
            .map(|link| BodyLink::new(body, link))
            .collect();
        for attachment in attachments {
            parts.extend(body_links(&*scene, attachment.child())?);
        }

        let mut targets = Vec::new();
        for obstacle in obstacles {
            match obstacle.links() {
                Some(links) => targets.extend(
                    links.iter().map(|&link| BodyLink::new(obstacle.body_id(), link)),
                ),
                None => targets.extend(body_links(&*scene, obstacle.body_id())?),
            }
        }
        let obstacle_pairs: Vec<_> = parts
            .iter()
            .flat_map(|&part| targets.iter().map(move |&target| (part, target)))
            .filter(|(part, target)| part.body != target.body)
            .collect();

        debug!(
            body = %body,
            joints = joints.len(),
            self_pairs = self_pairs.len(),
            obstacle_pairs = obstacle_pairs.len(),
            attachments = attachments.len(),
            "Collision checker built"
        );

        Ok(Self {
            scene,
            body,
            joints: joints.to_vec(),
            attachments: attachments.to_vec(),
            self_pairs,
            obstacle_pairs,
            max_distance: settings.max_distance(),
        })
    }

    /// The body being planned for.
    #[must_use]
    pub const fn body(&self) -> BodyId {
        self.body
    }

    /// Joints the queried configurations assign.
    #[must_use]
    pub fn joints(&self) -> &[JointId] {
        &self.joints
    }

    /// Link pairs checked for self-collision.
    #[must_use]
    pub fn self_pairs(&self) -> &[(LinkId, LinkId)] {
        &self.self_pairs
    }

    /// Robot-part and obstacle link pairs checked at the clearance margin.
    #[must_use]
    pub fn obstacle_pairs(&self) -> &[(BodyLink, BodyLink)] {
        &self.obstacle_pairs
    }

    /// Read access to the scene.
    #[must_use]
    pub fn scene(&self) -> &S {
        &*self.scene
    }

    /// Mutable access to the scene, for restoring state between queries.
    pub fn scene_mut(&mut self) -> &mut S {
        &mut *self.scene
    }

    /// Places the body at `q` and returns the first contact, if any.
    ///
    /// # Panics
    ///
    /// Panics if `q` does not have one value per joint.
    pub fn first_collision(&mut self, q: &[f64]) -> Option<Contact> {
        assert_eq!(q.len(), self.joints.len(), "configuration length mismatch");
        match self.query(q) {
            Ok(contact) => contact,
            Err(error) => {
                warn!(body = %self.body, %error, "Collision query failed; treating as collision");
                Some(Contact::SceneFailure)
            }
        }
    }

    fn query(&mut self, q: &[f64]) -> SceneResult<Option<Contact>> {
        self.scene.set_joint_positions(self.body, &self.joints, q)?;
        for attachment in &self.attachments {
            attachment.assign(&mut *self.scene)?;
        }

        for &(a, b) in &self.self_pairs {
            let hit = self.scene.links_within(
                BodyLink::new(self.body, a),
                BodyLink::new(self.body, b),
                0.0,
            )?;
            if hit {
                return Ok(Some(Contact::SelfCollision { a, b }));
            }
        }
        for &(robot, obstacle) in &self.obstacle_pairs {
            if self.scene.links_within(robot, obstacle, self.max_distance)? {
                return Ok(Some(Contact::Obstacle { robot, obstacle }));
            }
        }
        Ok(None)
    }
}

impl<S: Scene + ?Sized> CollisionCheck for CollisionChecker<'_, S> {
    fn in_collision(&mut self, q: &[f64]) -> bool {
        self.first_collision(q).is_some()
    }
}

impl<S: Scene + ?Sized> fmt::Debug for CollisionChecker<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionChecker")
            .field("body", &self.body)
            .field("joints", &self.joints)
            .field("self_pairs", &self.self_pairs.len())
            .field("obstacle_pairs", &self.obstacle_pairs.len())
            .field("max_distance", &self.max_distance)
            .finish_non_exhaustive()
    }
}

pub(crate) fn body_links<S: Scene + ?Sized>(scene: &S, body: BodyId) -> SceneResult<Vec<BodyLink>> {
    Ok(scene
        .links(body)?
        .into_iter()
        .map(|link| BodyLink::new(body, link))
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use motion_scene::{BodyBuilder, KinematicWorld, LinkSpec};
    use motion_types::Pose;
    use nalgebra::{Point3, Vector3};
    use std::f64::consts::FRAC_PI_2;

    fn unit_capsule() -> (Point3<f64>, Point3<f64>, f64) {
        (Point3::origin(), Point3::new(1.0, 0.0, 0.0), 0.05)
    }

    /// Three unit links in a plane; folding the last two brings the third
    /// back across the first.
    fn folding_arm(world: &mut KinematicWorld) -> BodyId {
        let (a, b, r) = unit_capsule();
        world
            .add_body(
                BodyBuilder::new("folding")
                    .with_link(LinkSpec::revolute("l0", "base", -3.0, 3.0).with_capsule(a, b, r))
                    .with_link(
                        LinkSpec::revolute("l1", "l0", -3.0, 3.0)
                            .with_offset(Vector3::new(1.0, 0.0, 0.0))
                            .with_capsule(a, b, r),
                    )
                    .with_link(
                        LinkSpec::revolute("l2", "l1", -3.0, 3.0)
                            .with_offset(Vector3::new(1.0, 0.0, 0.0))
                            .with_capsule(a, b, r),
                    ),
            )
            .unwrap()
    }

    /// A single unit link and a post at (0, 1.2).
    fn arm_and_post(world: &mut KinematicWorld) -> (BodyId, BodyId) {
        let (a, b, r) = unit_capsule();
        let arm = world
            .add_body(
                BodyBuilder::new("arm")
                    .with_link(LinkSpec::continuous("link", "base").with_capsule(a, b, r)),
            )
            .unwrap();
        let post = world
            .add_body(BodyBuilder::new("post").with_base_sphere(Point3::new(0.0, 1.2, 0.0), 0.1))
            .unwrap();
        (arm, post)
    }

    #[test]
    fn test_self_collision_detected() {
        let mut world = KinematicWorld::new();
        let arm = folding_arm(&mut world);
        let joints = world.joints(arm).unwrap();
        let mut checker =
            CollisionChecker::new(&mut world, arm, &joints, &[], &[], &CollisionSettings::new())
                .unwrap();

        assert!(!checker.in_collision(&[0.0, 0.0, 0.0]));
        assert_eq!(
            checker.first_collision(&[0.0, 2.5, 2.5]),
            Some(Contact::SelfCollision {
                a: LinkId::new(1),
                b: LinkId::new(3)
            })
        );
    }

    #[test]
    fn test_self_collisions_can_be_disabled() {
        let mut world = KinematicWorld::new();
        let arm = folding_arm(&mut world);
        let joints = world.joints(arm).unwrap();
        let settings = CollisionSettings::new().with_self_collisions(false);
        let mut checker =
            CollisionChecker::new(&mut world, arm, &joints, &[], &[], &settings).unwrap();
        assert!(checker.self_pairs().is_empty());
        assert!(!checker.in_collision(&[0.0, 2.5, 2.5]));
    }

    #[test]
    fn test_query_leaves_body_at_configuration() {
        let mut world = KinematicWorld::new();
        let arm = folding_arm(&mut world);
        let joints = world.joints(arm).unwrap();
        let mut checker =
            CollisionChecker::new(&mut world, arm, &joints, &[], &[], &CollisionSettings::new())
                .unwrap();
        checker.in_collision(&[0.1, 0.2, 0.3]);
        drop(checker);
        assert_eq!(world.joint_positions(arm, &joints).unwrap().as_slice(), &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_clearance_margin() {
        let mut world = KinematicWorld::new();
        let (arm, post) = arm_and_post(&mut world);
        let joints = world.joints(arm).unwrap();
        let obstacles = [Obstacle::body(post)];

        // Tip at (0, 1) is 0.05 clear of the post surface
        let settings = CollisionSettings::new();
        let mut tight =
            CollisionChecker::new(&mut world, arm, &joints, &obstacles, &[], &settings).unwrap();
        assert!(!tight.in_collision(&[FRAC_PI_2]));
        drop(tight);

        let settings = CollisionSettings::new().with_max_distance(0.1);
        let mut wide =
            CollisionChecker::new(&mut world, arm, &joints, &obstacles, &[], &settings).unwrap();
        assert!(wide.in_collision(&[FRAC_PI_2]));
        assert!(!wide.in_collision(&[0.0]));
    }

    #[test]
    fn test_allowed_links_skip_obstacles() {
        let mut world = KinematicWorld::new();
        let (arm, post) = arm_and_post(&mut world);
        let joints = world.joints(arm).unwrap();
        let settings = CollisionSettings::new()
            .with_max_distance(0.1)
            .with_allowed_link(LinkId::new(1));
        let mut checker =
            CollisionChecker::new(&mut world, arm, &joints, &[Obstacle::body(post)], &[], &settings)
                .unwrap();
        assert!(checker.obstacle_pairs().is_empty());
        assert!(!checker.in_collision(&[FRAC_PI_2]));
    }

    #[test]
    fn test_attached_body_checked_against_obstacles() {
        let mut world = KinematicWorld::new();
        let (arm, post) = arm_and_post(&mut world);
        let cup = world
            .add_body(BodyBuilder::new("cup").with_base_sphere(Point3::origin(), 0.1))
            .unwrap();
        let grasp = Pose::from_position(Point3::new(1.2, 0.0, 0.0));
        let held = Attachment::new(arm, LinkId::new(1), grasp, cup);
        let joints = world.joints(arm).unwrap();

        let mut checker = CollisionChecker::new(
            &mut world,
            arm,
            &joints,
            &[Obstacle::body(post)],
            &[held],
            &CollisionSettings::new(),
        )
        .unwrap();

        assert!(!checker.in_collision(&[0.0]));
        assert_eq!(
            checker.first_collision(&[FRAC_PI_2]),
            Some(Contact::Obstacle {
                robot: BodyLink::new(cup, LinkId::BASE),
                obstacle: BodyLink::new(post, LinkId::BASE),
            })
        );
        let cup_pose = checker.scene().body_pose(cup).unwrap();
        assert!((cup_pose.position.y - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_scene_failure_counts_as_collision() {
        let mut world = KinematicWorld::new();
        let (arm, post) = arm_and_post(&mut world);
        let joints = world.joints(arm).unwrap();
        let mut checker = CollisionChecker::new(
            &mut world,
            arm,
            &joints,
            &[Obstacle::body(post)],
            &[],
            &CollisionSettings::new(),
        )
        .unwrap();
        checker.scene_mut().remove_body(post).unwrap();
        assert_eq!(checker.first_collision(&[0.0]), Some(Contact::SceneFailure));
    }

    #[test]
    fn test_unknown_joint_rejected() {
        let mut world = KinematicWorld::new();
        let (arm, _) = arm_and_post(&mut world);
        let result = CollisionChecker::new(
            &mut world,
            arm,
            &[JointId::new(7)],
            &[],
            &[],
            &CollisionSettings::new(),
        );
        assert!(matches!(result, Err(PlanningError::Scene(_))));
    }

    #[test]
    fn test_contact_display() {
        let contact = Contact::SelfCollision {
            a: LinkId::new(1),
            b: LinkId::new(3),
        };
        assert_eq!(contact.to_string(), "self-collision Link(1) / Link(3)");
    }
}
