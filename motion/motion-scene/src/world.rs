//! A kinematic reference world: forward kinematics plus capsule proximity.

use cf_spatial::Capsule;
use hashbrown::HashMap;
use motion_types::{
    BodyId, BodyLink, Configuration, JointId, JointInfo, JointRange, LinkId, Pose, SceneError,
};
use tracing::debug;

use crate::builder::{BASE_LINK_NAME, BodyBuilder};
use crate::scene::{Scene, SceneResult};

#[derive(Debug, Clone)]
struct LinkModel {
    name: String,
    parent_joint: Option<JointId>,
    colliders: Vec<Capsule>,
}

#[derive(Debug, Clone)]
struct Body {
    name: String,
    base_pose: Pose,
    links: Vec<LinkModel>,
    joints: Vec<JointInfo>,
    positions: Vec<f64>,
    // Derived state, refreshed after every mutation
    link_poses: Vec<Pose>,
    world_colliders: Vec<Vec<Capsule>>,
}

impl Body {
    fn from_builder(builder: BodyBuilder) -> SceneResult<Self> {
        let mut names: HashMap<String, LinkId> = HashMap::new();
        names.insert(BASE_LINK_NAME.to_string(), LinkId::BASE);

        let mut links = vec![LinkModel {
            name: BASE_LINK_NAME.to_string(),
            parent_joint: None,
            colliders: builder.base_colliders,
        }];
        let mut joints = Vec::with_capacity(builder.links.len());
        let mut positions = Vec::with_capacity(builder.links.len());

        for (index, spec) in builder.links.into_iter().enumerate() {
            let parent = *names.get(&spec.parent).ok_or_else(|| {
                SceneError::invalid_model(format!(
                    "parent '{}' of link '{}' must be declared before it",
                    spec.parent, spec.name
                ))
            })?;
            let raw = u32::try_from(index + 1)
                .map_err(|_| SceneError::invalid_model("too many links"))?;
            let child = LinkId::new(raw);
            let joint = JointId::new(raw - 1);
            if names.insert(spec.name.clone(), child).is_some() {
                return Err(SceneError::invalid_model(format!(
                    "duplicate link name '{}'",
                    spec.name
                )));
            }

            let initial = match spec.range {
                JointRange::Bounded { lower, upper } if !(lower..=upper).contains(&0.0) => lower,
                _ => 0.0,
            };
            positions.push(initial);
            joints.push(
                JointInfo::new(spec.joint_name, spec.kind, spec.range, parent, child)
                    .with_axis(spec.axis)
                    .with_origin(spec.origin),
            );
            links.push(LinkModel {
                name: spec.name,
                parent_joint: Some(joint),
                colliders: spec.colliders,
            });
        }

        let mut body = Self {
            name: builder.name,
            base_pose: builder.base_pose,
            link_poses: vec![Pose::identity(); links.len()],
            world_colliders: vec![Vec::new(); links.len()],
            links,
            joints,
            positions,
        };
        body.update_kinematics();
        Ok(body)
    }

    fn link_index(&self, id: BodyId, link: LinkId) -> SceneResult<usize> {
        let index = link.raw() as usize;
        if index < self.links.len() {
            Ok(index)
        } else {
            Err(SceneError::UnknownLink { body: id, link })
        }
    }

    fn joint_index(&self, id: BodyId, joint: JointId) -> SceneResult<usize> {
        let index = joint.raw() as usize;
        if index < self.joints.len() {
            Ok(index)
        } else {
            Err(SceneError::UnknownJoint { body: id, joint })
        }
    }

    /// Forward kinematics over the link tree. Parents always precede their
    /// children, so one pass suffices.
    fn update_kinematics(&mut self) {
        self.link_poses[0] = self.base_pose;
        for (joint, &q) in self.joints.iter().zip(&self.positions) {
            let parent = self.link_poses[joint.parent_link.raw() as usize];
            self.link_poses[joint.child_link.raw() as usize] =
                parent.compose(&joint.child_transform(q));
        }
        for ((link, pose), world) in self
            .links
            .iter()
            .zip(&self.link_poses)
            .zip(&mut self.world_colliders)
        {
            world.clear();
            world.extend(link.colliders.iter().map(|c| {
                Capsule::new(pose.transform_point(&c.a), pose.transform_point(&c.b), c.radius)
            }));
        }
    }
}

/// An in-memory world of articulated bodies.
///
/// Links carry capsule colliders; proximity is exact capsule–capsule
/// distance. Joint setters force positions without enforcing limits, as a
/// physics engine's reset call would.
///
/// # Example
///
/// ```
/// use motion_scene::{BodyBuilder, KinematicWorld, LinkSpec, Scene};
/// use motion_types::{BodyLink, LinkId};
/// use nalgebra::{Point3, Vector3};
/// use std::f64::consts::FRAC_PI_2;
///
/// let mut world = KinematicWorld::new();
/// let arm = world
///     .add_body(
///         BodyBuilder::new("arm").with_link(
///             LinkSpec::continuous("link1", "base")
///                 .with_capsule(Point3::origin(), Point3::new(1.0, 0.0, 0.0), 0.05),
///         ),
///     )
///     .unwrap();
/// let post = world
///     .add_body(BodyBuilder::new("post").with_base_sphere(Point3::new(0.0, 1.0, 0.0), 0.1))
///     .unwrap();
///
/// let joints = world.joints(arm).unwrap();
/// let tip = BodyLink::new(arm, LinkId::new(1));
/// let obstacle = BodyLink::new(post, LinkId::BASE);
///
/// assert!(!world.links_within(tip, obstacle, 0.0).unwrap());
/// world.set_joint_positions(arm, &joints, &[FRAC_PI_2]).unwrap();
/// assert!(world.links_within(tip, obstacle, 0.0).unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct KinematicWorld {
    bodies: HashMap<BodyId, Body>,
    next_id: u64,
}

impl KinematicWorld {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a body and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidModel`] if a link names an undeclared
    /// parent or two links share a name.
    pub fn add_body(&mut self, builder: BodyBuilder) -> SceneResult<BodyId> {
        let body = Body::from_builder(builder)?;
        let id = BodyId::new(self.next_id);
        self.next_id += 1;
        debug!(
            body = %id,
            name = %body.name,
            links = body.links.len(),
            joints = body.joints.len(),
            "Body added"
        );
        self.bodies.insert(id, body);
        Ok(id)
    }

    /// Removes a body.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownBody`] if the body does not exist.
    pub fn remove_body(&mut self, id: BodyId) -> SceneResult<()> {
        self.bodies
            .remove(&id)
            .map(|body| debug!(body = %id, name = %body.name, "Body removed"))
            .ok_or(SceneError::UnknownBody(id))
    }

    /// Number of bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns true if the world holds no bodies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Ids and names of all bodies, ordered by id.
    #[must_use]
    pub fn body_names(&self) -> Vec<(BodyId, &str)> {
        let mut names: Vec<_> = self
            .bodies
            .iter()
            .map(|(&id, body)| (id, body.name.as_str()))
            .collect();
        names.sort_unstable_by_key(|&(id, _)| id);
        names
    }

    /// Looks up a body by name.
    #[must_use]
    pub fn body_by_name(&self, name: &str) -> Option<BodyId> {
        self.body_names()
            .into_iter()
            .find_map(|(id, n)| (n == name).then_some(id))
    }

    /// Looks up a link by name.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownBody`] or [`SceneError::InvalidModel`]
    /// when no link has that name.
    pub fn link_by_name(&self, id: BodyId, name: &str) -> SceneResult<LinkId> {
        let body = self.body(id)?;
        body.links
            .iter()
            .position(|link| link.name == name)
            .and_then(|i| u32::try_from(i).ok())
            .map(LinkId::new)
            .ok_or_else(|| SceneError::invalid_model(format!("{id} has no link named '{name}'")))
    }

    /// Looks up a joint by name.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownBody`] or [`SceneError::InvalidModel`]
    /// when no joint has that name.
    pub fn joint_by_name(&self, id: BodyId, name: &str) -> SceneResult<JointId> {
        let body = self.body(id)?;
        body.joints
            .iter()
            .position(|joint| joint.name == name)
            .and_then(|i| u32::try_from(i).ok())
            .map(JointId::new)
            .ok_or_else(|| SceneError::invalid_model(format!("{id} has no joint named '{name}'")))
    }

    /// Joints that can move, in index order.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownBody`] if the body does not exist.
    pub fn movable_joints(&self, id: BodyId) -> SceneResult<Vec<JointId>> {
        let body = self.body(id)?;
        Ok(body
            .joints
            .iter()
            .zip(0u32..)
            .filter(|(joint, _)| joint.kind.is_movable())
            .map(|(_, i)| JointId::new(i))
            .collect())
    }

    /// Colliders of a link in world coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if the body or link does not exist.
    pub fn link_colliders(&self, id: BodyId, link: LinkId) -> SceneResult<&[Capsule]> {
        let body = self.body(id)?;
        let index = body.link_index(id, link)?;
        Ok(&body.world_colliders[index])
    }

    fn body(&self, id: BodyId) -> SceneResult<&Body> {
        self.bodies.get(&id).ok_or(SceneError::UnknownBody(id))
    }

    fn body_mut(&mut self, id: BodyId) -> SceneResult<&mut Body> {
        self.bodies.get_mut(&id).ok_or(SceneError::UnknownBody(id))
    }
}

impl Scene for KinematicWorld {
    fn links(&self, body: BodyId) -> SceneResult<Vec<LinkId>> {
        let count = self.body(body)?.links.len();
        Ok((0..count)
            .filter_map(|i| u32::try_from(i).ok())
            .map(LinkId::new)
            .collect())
    }

    fn joints(&self, body: BodyId) -> SceneResult<Vec<JointId>> {
        let count = self.body(body)?.joints.len();
        Ok((0..count)
            .filter_map(|i| u32::try_from(i).ok())
            .map(JointId::new)
            .collect())
    }

    fn joint_info(&self, body: BodyId, joint: JointId) -> SceneResult<JointInfo> {
        let b = self.body(body)?;
        Ok(b.joints[b.joint_index(body, joint)?].clone())
    }

    fn parent_joint(&self, body: BodyId, link: LinkId) -> SceneResult<Option<JointId>> {
        let b = self.body(body)?;
        Ok(b.links[b.link_index(body, link)?].parent_joint)
    }

    fn joint_positions(&self, body: BodyId, joints: &[JointId]) -> SceneResult<Configuration> {
        let b = self.body(body)?;
        joints
            .iter()
            .map(|&joint| Ok(b.positions[b.joint_index(body, joint)?]))
            .collect()
    }

    fn set_joint_positions(
        &mut self,
        body: BodyId,
        joints: &[JointId],
        values: &[f64],
    ) -> SceneResult<()> {
        if joints.len() != values.len() {
            return Err(SceneError::DimensionMismatch {
                expected: joints.len(),
                actual: values.len(),
            });
        }
        let b = self.body_mut(body)?;
        for (&joint, &value) in joints.iter().zip(values) {
            let index = b.joint_index(body, joint)?;
            b.positions[index] = value;
        }
        b.update_kinematics();
        Ok(())
    }

    fn link_pose(&self, body: BodyId, link: LinkId) -> SceneResult<Pose> {
        let b = self.body(body)?;
        Ok(b.link_poses[b.link_index(body, link)?])
    }

    fn body_pose(&self, body: BodyId) -> SceneResult<Pose> {
        Ok(self.body(body)?.base_pose)
    }

    fn set_body_pose(&mut self, body: BodyId, pose: &Pose) -> SceneResult<()> {
        let b = self.body_mut(body)?;
        b.base_pose = *pose;
        b.update_kinematics();
        Ok(())
    }

    fn links_within(&self, a: BodyLink, b: BodyLink, margin: f64) -> SceneResult<bool> {
        let a_colliders = self.link_colliders(a.body, a.link)?;
        let b_colliders = self.link_colliders(b.body, b.link)?;
        Ok(a_colliders
            .iter()
            .any(|ca| b_colliders.iter().any(|cb| ca.within(cb, margin))))
    }
}
