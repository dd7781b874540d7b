//! Algorithm selection and the checked planning entry point.

use motion_collision::CollisionCheck;
use motion_space::ConfigurationSpace;
use motion_types::{Algorithm, Path, PlannerConfig, PlanningError, PlanningMode, Result};
use tracing::{debug, info};

use crate::birrt::BiRrtPlanner;
use crate::direct::DirectPlanner;
use crate::lazy_prm::LazyPrmPlanner;
use crate::observer::PlanningObserver;
use crate::planner::Planner;
use crate::rrt::RrtPlanner;
use crate::rrt_star::RrtStarPlanner;

/// Any of the built-in planners, chosen at runtime.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum AnyPlanner {
    /// Straight interpolation.
    Direct(DirectPlanner),
    /// Bidirectional RRT.
    BiRrt(BiRrtPlanner),
    /// RRT*.
    RrtStar(RrtStarPlanner),
    /// Single-tree RRT.
    Rrt(RrtPlanner),
    /// Lazy PRM.
    LazyPrm(LazyPrmPlanner),
}

impl AnyPlanner {
    /// Builds the planner selected by `config`, with budgets for `mode`.
    #[must_use]
    pub fn from_config(config: &PlannerConfig, mode: PlanningMode) -> Self {
        match config.algorithm() {
            Algorithm::Direct => Self::Direct(DirectPlanner::new()),
            Algorithm::BiRrt => Self::BiRrt(BiRrtPlanner::from_config(config, mode)),
            Algorithm::RrtStar => Self::RrtStar(RrtStarPlanner::from_config(config, mode)),
            Algorithm::Rrt => Self::Rrt(RrtPlanner::from_config(config, mode)),
            Algorithm::LazyPrm => Self::LazyPrm(LazyPrmPlanner::from_config(config, mode)),
        }
    }
}

impl Planner for AnyPlanner {
    fn algorithm(&self) -> Algorithm {
        match self {
            Self::Direct(p) => p.algorithm(),
            Self::BiRrt(p) => p.algorithm(),
            Self::RrtStar(p) => p.algorithm(),
            Self::Rrt(p) => p.algorithm(),
            Self::LazyPrm(p) => p.algorithm(),
        }
    }

    fn plan<S, C>(
        &mut self,
        start: &[f64],
        goal: &[f64],
        space: &mut S,
        collision: &mut C,
        observer: &mut dyn PlanningObserver,
    ) -> Option<Path>
    where
        S: ConfigurationSpace,
        C: CollisionCheck + ?Sized,
    {
        match self {
            Self::Direct(p) => p.plan(start, goal, space, collision, observer),
            Self::BiRrt(p) => p.plan(start, goal, space, collision, observer),
            Self::RrtStar(p) => p.plan(start, goal, space, collision, observer),
            Self::Rrt(p) => p.plan(start, goal, space, collision, observer),
            Self::LazyPrm(p) => p.plan(start, goal, space, collision, observer),
        }
    }
}

/// Plans from `start` to `goal` with the algorithm selected by `config`.
///
/// Returns `Ok(None)` when the start or goal is in collision or when the
/// planner exhausts its budget.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, if `start` or `goal`
/// has the wrong length, or if either contains non-finite values.
///
/// # Example
///
/// ```
/// use motion_plan::{NullObserver, plan_motion};
/// use motion_space::JointSpace;
/// use motion_types::{Algorithm, JointRange, PlannerConfig, PlanningMode};
///
/// let mut space = JointSpace::new(&[JointRange::bounded(-1.0, 1.0)]).unwrap();
/// let mut wall = |q: &[f64]| (q[0] - 0.5).abs() < 0.1;
/// let config = PlannerConfig::new().with_algorithm(Algorithm::Direct);
///
/// let blocked = plan_motion(
///     &[0.0], &[1.0], &mut space, &mut wall, &config, PlanningMode::Joint, &mut NullObserver,
/// )
/// .unwrap();
/// assert!(blocked.is_none());
///
/// let err = plan_motion(
///     &[0.0, 0.0], &[1.0], &mut space, &mut wall, &config, PlanningMode::Joint, &mut NullObserver,
/// );
/// assert!(err.unwrap_err().is_dimension_mismatch());
/// ```
pub fn plan_motion<S, C>(
    start: &[f64],
    goal: &[f64],
    space: &mut S,
    collision: &mut C,
    config: &PlannerConfig,
    mode: PlanningMode,
    observer: &mut dyn PlanningObserver,
) -> Result<Option<Path>>
where
    S: ConfigurationSpace,
    C: CollisionCheck + ?Sized,
{
    config.ensure_valid()?;
    let dimension = space.dimension();
    PlanningError::check_dimension(dimension, start.len())?;
    PlanningError::check_dimension(dimension, goal.len())?;
    if !start.iter().chain(goal).all(|v| v.is_finite()) {
        return Err(PlanningError::NonFiniteConfiguration);
    }

    if collision.in_collision(start) {
        debug!(?start, "start configuration in collision");
        return Ok(None);
    }
    if collision.in_collision(goal) {
        debug!(?goal, "goal configuration in collision");
        return Ok(None);
    }

    let mut planner = AnyPlanner::from_config(config, mode);
    let path = planner.plan(start, goal, space, collision, observer);
    match &path {
        Some(path) => info!(
            algorithm = %config.algorithm(),
            dimension,
            waypoints = path.len(),
            "planning succeeded"
        ),
        None => info!(algorithm = %config.algorithm(), dimension, "planning failed"),
    }
    Ok(path)
}
