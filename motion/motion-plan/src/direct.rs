//! Straight-line planning.

use motion_collision::CollisionCheck;
use motion_space::ConfigurationSpace;
use motion_types::{Algorithm, Configuration, Path};
use tracing::debug;

use crate::observer::PlanningObserver;
use crate::planner::Planner;

/// Follows the space's extension from start to goal and fails at the first
/// blocked configuration. Deterministic.
///
/// # Example
///
/// ```
/// use motion_plan::{DirectPlanner, NullObserver, Planner};
/// use motion_space::JointSpace;
/// use motion_types::JointRange;
///
/// let mut space = JointSpace::new(&[JointRange::bounded(-2.0, 2.0)]).unwrap();
/// let mut wall = |q: &[f64]| (q[0] - 0.5).abs() < 0.01;
///
/// let mut planner = DirectPlanner::new();
/// assert!(planner.plan(&[0.0], &[0.4], &mut space, &mut wall, &mut NullObserver).is_some());
/// assert!(planner.plan(&[0.0], &[1.0], &mut space, &mut wall, &mut NullObserver).is_none());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectPlanner;

impl DirectPlanner {
    /// Creates a direct planner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Planner for DirectPlanner {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Direct
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
        let mut path = Path::new(vec![Configuration::from_slice(start)]);
        for q in space.extend(start, goal) {
            if collision.in_collision(&q) {
                debug!(at = %q, "Direct path blocked");
                return None;
            }
            if let Some(previous) = path.last() {
                observer.on_edge(previous, &q);
            }
            path.push(q);
        }
        observer.on_path(&path);
        Some(path)
    }
}
