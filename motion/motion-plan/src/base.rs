//! Mobile-base planning over `(x, y, heading)`.

use motion_collision::{BaseBodyCollision, CollisionCheck, GridCollision};
use motion_scene::Scene;
use motion_space::BaseSpace;
use motion_types::{BodyId, Path, PlannerConfig, PlanningError, PlanningMode, Result};
use tracing::debug;

use crate::dispatch::plan_motion;
use crate::observer::{NullObserver, PlanningObserver};
use crate::planner::planner_rng;
use crate::request::{BaseMotionRequest, OccupancyMap};
use crate::smooth::smooth_path;

/// The base configuration space described by `request`.
///
/// # Errors
///
/// Returns an error for invalid limits, weights or resolutions.
pub fn base_space(request: &BaseMotionRequest, seed: Option<u64>) -> Result<BaseSpace> {
    Ok(BaseSpace::new(request.lower(), request.upper())?
        .with_weights(request.weights())?
        .with_resolutions(request.resolutions())?
        .with_reversible(request.reversible())
        .with_sequence(request.sequence(), seed))
}

fn check_inputs(
    end_conf: &[f64],
    request: &BaseMotionRequest,
    config: &PlannerConfig,
) -> Result<()> {
    PlanningError::check_dimension(3, end_conf.len())?;
    if !end_conf.iter().all(|v| v.is_finite()) {
        return Err(PlanningError::NonFiniteConfiguration);
    }
    let issues = request.validate();
    if !issues.is_empty() {
        return Err(PlanningError::invalid_config(issues.join("; ")));
    }
    config.ensure_valid()
}

/// Plans, then shortcuts the result for the request's optimization budget.
fn plan_and_optimize<C: CollisionCheck + ?Sized>(
    start: &[f64],
    end_conf: &[f64],
    space: &mut BaseSpace,
    collision: &mut C,
    request: &BaseMotionRequest,
    config: &PlannerConfig,
    observer: &mut dyn PlanningObserver,
) -> Result<Option<Path>> {
    let Some(path) = plan_motion(
        start,
        end_conf,
        space,
        collision,
        config,
        PlanningMode::Base,
        observer,
    )?
    else {
        return Ok(None);
    };
    if request.optimize_iterations() == 0 {
        return Ok(Some(path));
    }
    let mut rng = planner_rng(config.seed());
    let optimized = smooth_path(&path, &*space, collision, request.optimize_iterations(), &mut rng);
    Ok(Some(optimized))
}

/// Plans the planar base of `body` from its current pose to `end_conf`,
/// checking the whole body against the request's obstacles.
///
/// Returns `Ok(None)` if the goal is within the minimum goal distance, if
/// the start or goal collides, or if the planner finds nothing. The body is
/// back at its start pose when this returns.
///
/// # Errors
///
/// Returns an error if `end_conf` is not a finite `(x, y, heading)`, the
/// request or configuration is invalid, or the scene rejects a query.
///
/// # Example
///
/// ```
/// use motion_plan::{BaseMotionRequest, plan_base_motion};
/// use motion_scene::{BodyBuilder, KinematicWorld, Scene};
/// use motion_types::{Obstacle, PlannerConfig};
/// use nalgebra::Point3;
///
/// let mut world = KinematicWorld::new();
/// let robot = world
///     .add_body(BodyBuilder::new("robot").with_base_sphere(Point3::origin(), 0.2))
///     .unwrap();
/// let crate_ = world
///     .add_body(BodyBuilder::new("crate").with_base_sphere(Point3::new(1.0, 0.0, 0.0), 0.3))
///     .unwrap();
///
/// let request = BaseMotionRequest::new((-3.0, -3.0), (3.0, 3.0))
///     .with_obstacle(Obstacle::body(crate_));
/// let path = plan_base_motion(
///     &mut world,
///     robot,
///     &[2.0, 0.0, 0.0],
///     &request,
///     &PlannerConfig::new().with_max_iterations(200).with_seed(4),
/// )
/// .unwrap()
/// .unwrap();
///
/// assert_eq!(path.last().unwrap().as_slice(), &[2.0, 0.0, 0.0]);
/// assert_eq!(world.base_values(robot).unwrap().as_slice(), &[0.0, 0.0, 0.0]);
/// ```
pub fn plan_base_motion<S: Scene + ?Sized>(
    scene: &mut S,
    body: BodyId,
    end_conf: &[f64],
    request: &BaseMotionRequest,
    config: &PlannerConfig,
) -> Result<Option<Path>> {
    check_inputs(end_conf, request, config)?;
    let mut space = base_space(request, config.seed())?;
    let start = scene.base_values(body)?;
    if request.goal_too_close(&start, end_conf) {
        debug!(body = %body, ?end_conf, "goal is too close to the start");
        return Ok(None);
    }
    plan_with_physics(scene, body, &start, end_conf, &mut space, request, config, &mut NullObserver)
}

#[allow(clippy::too_many_arguments)]
fn plan_with_physics<S: Scene + ?Sized>(
    scene: &mut S,
    body: BodyId,
    start: &[f64],
    end_conf: &[f64],
    space: &mut BaseSpace,
    request: &BaseMotionRequest,
    config: &PlannerConfig,
    observer: &mut dyn PlanningObserver,
) -> Result<Option<Path>> {
    let start_pose = scene.body_pose(body)?;
    let outcome = BaseBodyCollision::new(scene, body, request.obstacles(), request.max_distance())
        .and_then(|mut collision| {
            plan_and_optimize(start, end_conf, space, &mut collision, request, config, observer)
        });
    scene.set_body_pose(body, &start_pose)?;
    outcome
}

/// Plans the planar base of `body` on a 2D occupancy map.
///
/// Configurations are projected onto `map` and the robot's footprint must
/// cover only free cells; leaving the map counts as a collision. With
/// [`BaseMotionRequest::with_physics_collisions`] the body is checked
/// against the request's obstacles instead, as in [`plan_base_motion`].
///
/// # Errors
///
/// See [`plan_base_motion`]; additionally fails if the map's projection
/// cannot be built from the start pose.
///
/// # Example
///
/// ```
/// use cf_spatial::{CellState, OccupancyGrid};
/// use motion_plan::{BaseMotionRequest, OccupancyMap, plan_base_motion_2d};
/// use motion_scene::{BodyBuilder, KinematicWorld};
/// use motion_types::PlannerConfig;
/// use nalgebra::Point3;
///
/// let mut world = KinematicWorld::new();
/// let robot = world
///     .add_body(BodyBuilder::new("robot").with_base_sphere(Point3::origin(), 0.2))
///     .unwrap();
///
/// // 10 m across, 0.1 m cells, centered on the robot
/// let grid = OccupancyGrid::new(100, 100, CellState::Free).unwrap();
/// let map = OccupancyMap::local(&grid, 10.0, 2);
/// let request = BaseMotionRequest::new((-4.0, -4.0), (4.0, 4.0));
///
/// let path = plan_base_motion_2d(
///     &mut world, robot, &[2.0, 1.0, 0.0], &map, &request, &PlannerConfig::new().with_seed(2),
/// )
/// .unwrap()
/// .unwrap();
/// assert_eq!(path.last().unwrap().as_slice(), &[2.0, 1.0, 0.0]);
/// ```
pub fn plan_base_motion_2d<S: Scene + ?Sized>(
    scene: &mut S,
    body: BodyId,
    end_conf: &[f64],
    map: &OccupancyMap<'_>,
    request: &BaseMotionRequest,
    config: &PlannerConfig,
) -> Result<Option<Path>> {
    plan_base_motion_2d_observed(scene, body, end_conf, map, request, config, &mut NullObserver)
}

/// [`plan_base_motion_2d`] reporting planner progress to `observer`.
///
/// # Errors
///
/// See [`plan_base_motion_2d`].
pub fn plan_base_motion_2d_observed<S: Scene + ?Sized>(
    scene: &mut S,
    body: BodyId,
    end_conf: &[f64],
    map: &OccupancyMap<'_>,
    request: &BaseMotionRequest,
    config: &PlannerConfig,
    observer: &mut dyn PlanningObserver,
) -> Result<Option<Path>> {
    check_inputs(end_conf, request, config)?;
    let mut space = base_space(request, config.seed())?;
    let start = scene.base_values(body)?;
    if request.goal_too_close(&start, end_conf) {
        debug!(body = %body, ?end_conf, "goal is too close to the start");
        return Ok(None);
    }

    if request.physics_collisions() {
        return plan_with_physics(
            scene,
            body,
            &start,
            end_conf,
            &mut space,
            request,
            config,
            observer,
        );
    }

    let projection = map.projection(&start)?;
    let mut collision = GridCollision::new(map.grid(), projection, map.footprint().clone());
    debug!(
        body = %body,
        rows = map.grid().rows(),
        cols = map.grid().cols(),
        footprint = map.footprint().radius_cells(),
        "planning on occupancy map"
    );
    plan_and_optimize(&start, end_conf, &mut space, &mut collision, request, config, observer)
}
