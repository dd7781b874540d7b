//! Joint-space planning against a scene.

use motion_collision::{CollisionCheck, CollisionChecker};
use motion_scene::Scene;
use motion_space::{ConfigurationSpace, JointSpace};
use motion_types::{
    BodyId, Configuration, JointId, Path, PlannerConfig, PlanningError, PlanningMode, Pose,
    Result,
};
use tracing::debug;

use crate::dispatch::plan_motion;
use crate::observer::{NullObserver, PlanningObserver};
use crate::request::JointMotionRequest;

/// Scene state an entry point must put back before returning.
struct Snapshot {
    body: BodyId,
    joints: Vec<JointId>,
    positions: Configuration,
    attached: Vec<(BodyId, Pose)>,
}

impl Snapshot {
    fn capture<S: Scene + ?Sized>(
        scene: &S,
        body: BodyId,
        joints: &[JointId],
        request: &JointMotionRequest,
    ) -> Result<Self> {
        let positions = scene.joint_positions(body, joints)?;
        let attached = request
            .attachments()
            .iter()
            .map(|a| Ok((a.child(), scene.body_pose(a.child())?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            body,
            joints: joints.to_vec(),
            positions,
            attached,
        })
    }

    fn restore<S: Scene + ?Sized>(&self, scene: &mut S) -> Result<()> {
        scene.set_joint_positions(self.body, &self.joints, &self.positions)?;
        for (child, pose) in &self.attached {
            scene.set_body_pose(*child, pose)?;
        }
        Ok(())
    }
}

fn check_request(request: &JointMotionRequest) -> Result<()> {
    let issues = request.validate();
    if issues.is_empty() {
        Ok(())
    } else {
        Err(PlanningError::invalid_config(issues.join("; ")))
    }
}

fn check_configuration(dimension: usize, q: &[f64]) -> Result<()> {
    PlanningError::check_dimension(dimension, q.len())?;
    if q.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(PlanningError::NonFiniteConfiguration)
    }
}

/// The configuration space of `joints` with the request's limits and
/// metric.
///
/// # Errors
///
/// Returns an error for unsupported or unknown joints, degenerate limits
/// or weight and resolution vectors of the wrong length.
pub fn joint_space<S: Scene + ?Sized>(
    scene: &S,
    body: BodyId,
    joints: &[JointId],
    request: &JointMotionRequest,
    seed: Option<u64>,
) -> Result<JointSpace> {
    let mut space = JointSpace::from_scene(scene, body, joints, request.custom_limits())?
        .with_sequence(request.sequence(), seed);
    if let Some(weights) = request.weights() {
        space = space.with_weights(weights)?;
    }
    if let Some(resolutions) = request.resolutions() {
        space = space.with_resolutions(resolutions)?;
    }
    Ok(space)
}

/// The collision predicate for `joints` of `body` under `request`.
///
/// The predicate leaves the scene at the last queried configuration.
///
/// # Errors
///
/// Returns an error for invalid settings or unknown bodies, links and
/// joints.
pub fn collision_checker<'s, S: Scene + ?Sized>(
    scene: &'s mut S,
    body: BodyId,
    joints: &[JointId],
    request: &JointMotionRequest,
) -> Result<CollisionChecker<'s, S>> {
    check_request(request)?;
    CollisionChecker::new(
        scene,
        body,
        joints,
        request.obstacles(),
        request.attachments(),
        request.collision(),
    )
}

/// Plans `joints` of `body` from their current positions to `end_conf`.
///
/// Returns `Ok(None)` if the start or goal is outside the joint limits or
/// in collision, or if the planner finds nothing within its budget. The
/// joints and any attached bodies are back at their start state when this
/// returns.
///
/// # Errors
///
/// Returns an error if `end_conf` has the wrong length or non-finite
/// values, the request or configuration is invalid, or the scene rejects a
/// query.
///
/// # Example
///
/// ```
/// use motion_plan::{JointMotionRequest, plan_joint_motion};
/// use motion_scene::{BodyBuilder, KinematicWorld, Scene};
/// use motion_types::{JointId, PlannerConfig};
///
/// let mut world = KinematicWorld::new();
/// let arm = world
///     .add_body(BodyBuilder::planar_arm("arm", &[1.0, 1.0], 0.05))
///     .unwrap();
/// let joints = [JointId::new(0), JointId::new(1)];
///
/// let path = plan_joint_motion(
///     &mut world,
///     arm,
///     &joints,
///     &[1.0, -0.5],
///     &JointMotionRequest::new(),
///     &PlannerConfig::new().with_seed(1),
/// )
/// .unwrap()
/// .unwrap();
///
/// assert_eq!(path.last().unwrap().as_slice(), &[1.0, -0.5]);
/// assert_eq!(world.joint_positions(arm, &joints).unwrap().as_slice(), &[0.0, 0.0]);
/// ```
pub fn plan_joint_motion<S: Scene + ?Sized>(
    scene: &mut S,
    body: BodyId,
    joints: &[JointId],
    end_conf: &[f64],
    request: &JointMotionRequest,
    config: &PlannerConfig,
) -> Result<Option<Path>> {
    plan_joint_motion_observed(scene, body, joints, end_conf, request, config, &mut NullObserver)
}

/// [`plan_joint_motion`] reporting planner progress to `observer`.
///
/// # Errors
///
/// See [`plan_joint_motion`].
pub fn plan_joint_motion_observed<S: Scene + ?Sized>(
    scene: &mut S,
    body: BodyId,
    joints: &[JointId],
    end_conf: &[f64],
    request: &JointMotionRequest,
    config: &PlannerConfig,
    observer: &mut dyn PlanningObserver,
) -> Result<Option<Path>> {
    check_configuration(joints.len(), end_conf)?;
    check_request(request)?;
    config.ensure_valid()?;

    let mut space = joint_space(&*scene, body, joints, request, config.seed())?;
    let snapshot = Snapshot::capture(&*scene, body, joints, request)?;
    let start = snapshot.positions.clone();
    if !space.within_limits(&start) {
        debug!(body = %body, start = %start, "start configuration violates joint limits");
        return Ok(None);
    }
    if !space.within_limits(end_conf) {
        debug!(body = %body, ?end_conf, "end configuration violates joint limits");
        return Ok(None);
    }

    let outcome = CollisionChecker::new(
        scene,
        body,
        joints,
        request.obstacles(),
        request.attachments(),
        request.collision(),
    )
    .and_then(|mut checker| {
        plan_motion(
            &start,
            end_conf,
            &mut space,
            &mut checker,
            config,
            PlanningMode::Joint,
            observer,
        )
    });
    snapshot.restore(scene)?;
    outcome
}

/// Moves straight to `end_conf` from the current joint positions.
///
/// # Errors
///
/// See [`plan_waypoints_joint_motion`].
pub fn plan_direct_joint_motion<S: Scene + ?Sized>(
    scene: &mut S,
    body: BodyId,
    joints: &[JointId],
    end_conf: &[f64],
    request: &JointMotionRequest,
) -> Result<Option<Path>> {
    let waypoints = [Configuration::from_slice(end_conf)];
    plan_waypoints_joint_motion(scene, body, joints, None, &waypoints, request)
}

/// Interpolates through `waypoints` in order, starting from `start_conf`
/// or the current joint positions.
///
/// Returns `Ok(None)` if any waypoint is outside the limits or in
/// collision, or if any interpolated configuration collides. The scene is
/// restored before returning.
///
/// # Errors
///
/// Returns an error for configurations of the wrong length or non-finite
/// values, an invalid request, or a failed scene query.
///
/// # Example
///
/// ```
/// use motion_plan::{JointMotionRequest, plan_waypoints_joint_motion};
/// use motion_scene::{BodyBuilder, KinematicWorld};
/// use motion_types::{Configuration, JointId};
///
/// let mut world = KinematicWorld::new();
/// let arm = world
///     .add_body(BodyBuilder::planar_arm("arm", &[1.0], 0.05))
///     .unwrap();
/// let waypoints = [Configuration::from([0.5]), Configuration::from([1.0])];
///
/// let path = plan_waypoints_joint_motion(
///     &mut world, arm, &[JointId::new(0)], None, &waypoints, &JointMotionRequest::new(),
/// )
/// .unwrap()
/// .unwrap();
/// assert_eq!(path.first().unwrap().as_slice(), &[0.0]);
/// assert_eq!(path.last().unwrap().as_slice(), &[1.0]);
/// ```
pub fn plan_waypoints_joint_motion<S: Scene + ?Sized>(
    scene: &mut S,
    body: BodyId,
    joints: &[JointId],
    start_conf: Option<&[f64]>,
    waypoints: &[Configuration],
    request: &JointMotionRequest,
) -> Result<Option<Path>> {
    let dimension = joints.len();
    if let Some(start) = start_conf {
        check_configuration(dimension, start)?;
    }
    for waypoint in waypoints {
        check_configuration(dimension, waypoint)?;
    }
    check_request(request)?;

    let space = joint_space(&*scene, body, joints, request, None)?;
    let snapshot = Snapshot::capture(&*scene, body, joints, request)?;
    let start = start_conf.map_or_else(|| snapshot.positions.clone(), Configuration::from_slice);

    let outcome = CollisionChecker::new(
        scene,
        body,
        joints,
        request.obstacles(),
        request.attachments(),
        request.collision(),
    )
    .map(|mut checker| follow_waypoints(&space, &mut checker, &start, waypoints));
    snapshot.restore(scene)?;
    outcome
}

fn follow_waypoints<C: CollisionCheck + ?Sized>(
    space: &JointSpace,
    collision: &mut C,
    start: &Configuration,
    waypoints: &[Configuration],
) -> Option<Path> {
    for q in std::iter::once(start).chain(waypoints) {
        if !space.within_limits(q) || collision.in_collision(q) {
            debug!(configuration = %q, "waypoint is invalid");
            return None;
        }
    }

    let mut path = Path::new(vec![start.clone()]);
    let mut previous = start;
    for waypoint in waypoints {
        for q in space.extend(previous, waypoint) {
            if collision.in_collision(&q) {
                debug!(configuration = %q, "waypoint interpolation collides");
                return None;
            }
            path.push(q);
        }
        previous = waypoint;
    }
    Some(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use motion_scene::{BodyBuilder, KinematicWorld};
    use motion_types::{Algorithm, Obstacle};
    use nalgebra::Point3;

    fn arm_world() -> (KinematicWorld, BodyId, BodyId) {
        let mut world = KinematicWorld::new();
        let arm = world
            .add_body(BodyBuilder::planar_arm("arm", &[1.0, 1.0], 0.05))
            .unwrap();
        let post = world
            .add_body(BodyBuilder::new("post").with_base_sphere(Point3::new(0.0, 1.5, 0.0), 0.1))
            .unwrap();
        (world, arm, post)
    }

    fn joints() -> [JointId; 2] {
        [JointId::new(0), JointId::new(1)]
    }

    #[test]
    fn test_goal_in_collision_returns_none() {
        let (mut world, arm, post) = arm_world();
        let request = JointMotionRequest::new().with_obstacle(Obstacle::body(post));
        // Straight up puts the second link through the post
        let path = plan_joint_motion(
            &mut world,
            arm,
            &joints(),
            &[std::f64::consts::FRAC_PI_2, 0.0],
            &request,
            &PlannerConfig::new().with_seed(3),
        )
        .unwrap();
        assert!(path.is_none());
    }

    #[test]
    fn test_wrong_length_is_an_error() {
        let (mut world, arm, _) = arm_world();
        let result = plan_joint_motion(
            &mut world,
            arm,
            &joints(),
            &[0.0],
            &JointMotionRequest::new(),
            &PlannerConfig::new(),
        );
        assert!(result.unwrap_err().is_dimension_mismatch());
    }

    #[test]
    fn test_restores_start_after_planning() {
        let (mut world, arm, post) = arm_world();
        world.set_joint_positions(arm, &joints(), &[-0.5, 0.2]).unwrap();
        let request = JointMotionRequest::new().with_obstacle(Obstacle::body(post));
        let config = PlannerConfig::new().with_algorithm(Algorithm::Rrt).with_seed(8);

        let path = plan_joint_motion(&mut world, arm, &joints(), &[2.5, 0.0], &request, &config)
            .unwrap()
            .unwrap();
        assert_eq!(path.first().unwrap().as_slice(), &[-0.5, 0.2]);
        assert_eq!(world.joint_positions(arm, &joints()).unwrap().as_slice(), &[-0.5, 0.2]);
    }

    #[test]
    fn test_waypoints_blocked_by_obstacle() {
        let (mut world, arm, post) = arm_world();
        let request = JointMotionRequest::new().with_obstacle(Obstacle::body(post));
        let path =
            plan_direct_joint_motion(&mut world, arm, &joints(), &[2.5, 0.0], &request).unwrap();
        assert!(path.is_none());

        let free = plan_direct_joint_motion(&mut world, arm, &joints(), &[-1.0, 0.0], &request)
            .unwrap()
            .unwrap();
        assert_eq!(free.last().unwrap().as_slice(), &[-1.0, 0.0]);
    }

    #[test]
    fn test_explicit_start_conf() {
        let (mut world, arm, _) = arm_world();
        let start = [0.3, 0.0];
        let waypoints = [Configuration::from([0.6, 0.1])];
        let path = plan_waypoints_joint_motion(
            &mut world,
            arm,
            &joints(),
            Some(&start),
            &waypoints,
            &JointMotionRequest::new(),
        )
        .unwrap()
        .unwrap();
        assert_eq!(path.first().unwrap().as_slice(), &start);
        assert_eq!(world.joint_positions(arm, &joints()).unwrap().as_slice(), &[0.0, 0.0]);
    }
}
