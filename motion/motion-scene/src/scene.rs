//! The engine-context trait planners query and mutate.

use motion_types::{
    BodyId, BodyLink, Configuration, JointId, JointInfo, LinkId, Pose, SceneError,
};

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Kinematic structure, state and proximity queries of a world of bodies.
///
/// Planners never touch a global engine handle; every query goes through a
/// `Scene` passed in explicitly. State setters are forcing: they place
/// bodies without stepping any dynamics.
///
/// Implementors supply the required methods; the provided methods derive
/// tree structure and planar base access from them.
pub trait Scene {
    /// All links of `body`, starting with [`LinkId::BASE`].
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownBody`] if the body does not exist.
    fn links(&self, body: BodyId) -> SceneResult<Vec<LinkId>>;

    /// All joints of `body`, movable or not.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownBody`] if the body does not exist.
    fn joints(&self, body: BodyId) -> SceneResult<Vec<JointId>>;

    /// Static description of a joint.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownJoint`] if the joint does not exist.
    fn joint_info(&self, body: BodyId, joint: JointId) -> SceneResult<JointInfo>;

    /// The joint whose child is `link`, or `None` for the base link.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownLink`] if the link does not exist.
    fn parent_joint(&self, body: BodyId, link: LinkId) -> SceneResult<Option<JointId>>;

    /// Current positions of `joints`, in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the body or any joint does not exist.
    fn joint_positions(&self, body: BodyId, joints: &[JointId]) -> SceneResult<Configuration>;

    /// Forces `joints` to `values` and updates link poses.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DimensionMismatch`] if the lengths differ, or an
    /// error if the body or any joint does not exist.
    fn set_joint_positions(
        &mut self,
        body: BodyId,
        joints: &[JointId],
        values: &[f64],
    ) -> SceneResult<()>;

    /// World pose of a link frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the body or link does not exist.
    fn link_pose(&self, body: BodyId, link: LinkId) -> SceneResult<Pose>;

    /// World pose of the body's base frame.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownBody`] if the body does not exist.
    fn body_pose(&self, body: BodyId) -> SceneResult<Pose>;

    /// Moves the body's base frame, carrying all links with it.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownBody`] if the body does not exist.
    fn set_body_pose(&mut self, body: BodyId, pose: &Pose) -> SceneResult<()>;

    /// Closest-points query: true if the two links are within `margin` of
    /// each other (zero margin means touching or penetrating).
    ///
    /// # Errors
    ///
    /// Returns an error if either body or link does not exist.
    fn links_within(&self, a: BodyLink, b: BodyLink, margin: f64) -> SceneResult<bool>;

    /// Parent link of `link`, or `None` for the base link.
    ///
    /// # Errors
    ///
    /// Returns an error if the body or link does not exist.
    fn link_parent(&self, body: BodyId, link: LinkId) -> SceneResult<Option<LinkId>> {
        match self.parent_joint(body, link)? {
            Some(joint) => Ok(Some(self.joint_info(body, joint)?.parent_link)),
            None => Ok(None),
        }
    }

    /// True if any link of `a` is within `margin` of any link of `b`.
    ///
    /// # Errors
    ///
    /// Returns an error if either body does not exist.
    fn bodies_within(&self, a: BodyId, b: BodyId, margin: f64) -> SceneResult<bool> {
        let a_links = self.links(a)?;
        let b_links = self.links(b)?;
        for &la in &a_links {
            for &lb in &b_links {
                if self.links_within(BodyLink::new(a, la), BodyLink::new(b, lb), margin)? {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Planar `(x, y, yaw)` of the body's base.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownBody`] if the body does not exist.
    fn base_values(&self, body: BodyId) -> SceneResult<Configuration> {
        let (x, y, yaw) = self.body_pose(body)?.base_values();
        Ok(Configuration::from([x, y, yaw]))
    }

    /// Places the body's base at planar `(x, y, yaw)`, keeping its height,
    /// roll and pitch.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DimensionMismatch`] unless `values` has three
    /// entries, or [`SceneError::UnknownBody`].
    fn set_base_values(&mut self, body: BodyId, values: &[f64]) -> SceneResult<()> {
        let &[x, y, yaw] = values else {
            return Err(SceneError::DimensionMismatch {
                expected: 3,
                actual: values.len(),
            });
        };
        let pose = self.body_pose(body)?.with_base_values(x, y, yaw);
        self.set_body_pose(body, &pose)
    }
}
