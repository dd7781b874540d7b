//! The planner capability shared by every algorithm.

use std::time::{Duration, Instant};

use motion_collision::CollisionCheck;
use motion_space::ConfigurationSpace;
use motion_types::{Algorithm, Configuration, Path};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::observer::PlanningObserver;

/// A sampling-based planning strategy.
///
/// Given exact start and goal configurations, a configuration space and a
/// collision check, a planner returns a [`Path`] that starts at `start`,
/// ends at `goal`, and whose consecutive configurations are joined by
/// collision-free extensions. `None` means no path was found within the
/// budget; callers cannot tell that apart from an unsolvable problem.
///
/// Planners assume `start` and `goal` are themselves collision-free.
pub trait Planner {
    /// The algorithm this planner implements.
    fn algorithm(&self) -> Algorithm;

    /// Searches for a path from `start` to `goal`.
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
        C: CollisionCheck + ?Sized;
}

/// Iteration and wall-clock limits for one planning call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Budget {
    deadline: Option<Instant>,
}

impl Budget {
    pub(crate) fn start(timeout: Option<Duration>) -> Self {
        Self {
            deadline: timeout.and_then(|t| Instant::now().checked_add(t)),
        }
    }

    pub(crate) fn expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Random source for planner decisions, seeded apart from the space's
/// sampler.
pub(crate) fn planner_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed ^ 0x9E37_79B9_7F4A_7C15),
        None => StdRng::from_entropy(),
    }
}

/// Extends `from` toward `to` and keeps the collision-free prefix. The flag
/// is true if `to` was reached.
pub(crate) fn safe_extension<S, C>(
    space: &S,
    collision: &mut C,
    from: &[f64],
    to: &[f64],
) -> (Vec<Configuration>, bool)
where
    S: ConfigurationSpace,
    C: CollisionCheck + ?Sized,
{
    let mut prefix = Vec::new();
    for q in space.extend(from, to) {
        if collision.in_collision(&q) {
            return (prefix, false);
        }
        prefix.push(q);
    }
    (prefix, true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::observer::NullObserver;
    use crate::rrt::RrtPlanner;
    use motion_space::JointSpace;
    use motion_types::{JointRange, PlannerConfig, PlanningMode};

    #[test]
    fn test_budget_without_timeout_never_expires() {
        assert!(!Budget::start(None).expired());
    }

    #[test]
    fn test_zero_timeout_expires_immediately() {
        assert!(Budget::start(Some(Duration::ZERO)).expired());
        assert!(!Budget::start(Some(Duration::from_secs(3600))).expired());
    }

    #[test]
    fn test_expired_deadline_stops_planner() {
        let mut space = JointSpace::new(&[JointRange::bounded(-2.0, 2.0)]).unwrap();
        let mut free = |_: &[f64]| false;

        let config = PlannerConfig::new().with_seed(1).with_timeout(Duration::ZERO);
        let mut planner = RrtPlanner::from_config(&config, PlanningMode::Joint);
        assert!(planner.plan(&[0.0], &[1.0], &mut space, &mut free, &mut NullObserver).is_none());

        let mut planner = RrtPlanner::from_config(&PlannerConfig::new(), PlanningMode::Joint);
        assert!(planner.plan(&[0.0], &[1.0], &mut space, &mut free, &mut NullObserver).is_some());
    }
}
