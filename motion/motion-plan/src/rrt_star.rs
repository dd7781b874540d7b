//! Asymptotically optimal RRT*.

use std::time::Duration;

use motion_collision::CollisionCheck;
use motion_space::ConfigurationSpace;
use motion_types::{Algorithm, Configuration, Path, PlannerConfig, PlanningMode};
use rand::Rng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::observer::PlanningObserver;
use crate::planner::{Budget, Planner, planner_rng, safe_extension};
use crate::tree::Tree;

/// Goal tolerance for accepting an extension as having reached the goal.
const GOAL_TOLERANCE: f64 = 1e-9;

/// RRT* with rewiring inside a fixed radius.
///
/// Runs the full iteration budget, improving the best path as the tree
/// grows. Each new node takes the cheapest collision-free parent among
/// its neighbors, then offers itself as a cheaper parent to them. Once a
/// path exists, samples that cannot improve on it are skipped (informed
/// sampling).
///
/// # Example
///
/// ```
/// use motion_plan::{NullObserver, Planner, RrtStarPlanner};
/// use motion_space::JointSpace;
/// use motion_types::{JointRange, SampleSequence};
///
/// let mut space = JointSpace::new(&[JointRange::bounded(-2.0, 2.0); 2])
///     .unwrap()
///     .with_resolutions(&[0.1, 0.1])
///     .unwrap()
///     .with_sequence(SampleSequence::Uniform, Some(9));
/// let mut free = |_: &[f64]| false;
///
/// let mut planner = RrtStarPlanner::new(200).with_seed(9);
/// let path = planner
///     .plan(&[0.0, 0.0], &[1.0, 0.5], &mut space, &mut free, &mut NullObserver)
///     .unwrap();
/// assert_eq!(path.first().unwrap().as_slice(), &[0.0, 0.0]);
/// assert_eq!(path.last().unwrap().as_slice(), &[1.0, 0.5]);
/// ```
#[derive(Debug, Clone)]
pub struct RrtStarPlanner {
    iterations: usize,
    goal_bias: f64,
    radius: f64,
    informed: bool,
    timeout: Option<Duration>,
    rng: StdRng,
}

impl RrtStarPlanner {
    /// Creates an RRT* with an iteration budget, goal bias 0.2 and rewire
    /// radius 0.5.
    #[must_use]
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            goal_bias: 0.2,
            radius: 0.5,
            informed: true,
            timeout: None,
            rng: planner_rng(None),
        }
    }

    /// Creates an RRT* from a planner configuration.
    #[must_use]
    pub fn from_config(config: &PlannerConfig, mode: PlanningMode) -> Self {
        Self {
            iterations: config.iterations(mode),
            goal_bias: config.goal_bias(),
            radius: config.rewire_radius(),
            informed: true,
            timeout: config.timeout(),
            rng: planner_rng(config.seed()),
        }
    }

    /// Sets the neighborhood radius used for rewiring.
    #[must_use]
    pub const fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Enables or disables skipping samples that cannot improve the path.
    #[must_use]
    pub const fn with_informed(mut self, informed: bool) -> Self {
        self.informed = informed;
        self
    }

    /// Seeds the planner's random choices.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = planner_rng(Some(seed));
        self
    }
}

impl Planner for RrtStarPlanner {
    fn algorithm(&self) -> Algorithm {
        Algorithm::RrtStar
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
        let budget = Budget::start(self.timeout);
        let mut tree = Tree::new(Configuration::from_slice(start));
        let mut goal_node: Option<usize> = None;

        for iteration in 0..self.iterations {
            if budget.expired() {
                debug!(iteration, "RRT* timed out");
                break;
            }
            let toward_goal = goal_node.is_none()
                && (iteration == 0 || self.rng.gen_range(0.0..1.0) < self.goal_bias);
            let target = if toward_goal {
                Configuration::from_slice(goal)
            } else {
                space.sample()
            };
            if let (true, Some(best)) = (self.informed && !toward_goal, goal_node) {
                let bound = space.distance(start, &target) + space.distance(&target, goal);
                if bound >= tree.cost(best) {
                    continue;
                }
            }
            observer.on_sample(&target);

            let nearest = tree.nearest(space, &target);
            let (mut edge, _) = safe_extension(space, collision, tree.config(nearest), &target);
            let Some(config) = edge.pop() else {
                continue;
            };
            observer.on_edge(tree.config(nearest), &config);
            let step = space.distance(tree.config(nearest), &config);
            let new = tree.add(config, nearest, step, edge);
            if toward_goal && space.distance(tree.config(new), goal) < GOAL_TOLERANCE {
                debug!(iteration, nodes = tree.len(), "RRT* reached goal");
                goal_node = Some(new);
            }

            let neighbors: Vec<(usize, f64)> = tree
                .within(space, tree.config(new), self.radius)
                .into_iter()
                .filter(|&(n, _)| n != new)
                .collect();

            // Cheapest collision-free parent
            for &(n, d) in &neighbors {
                if tree.cost(n) + d < tree.cost(new) {
                    let (mut edge, reached) =
                        safe_extension(space, collision, tree.config(n), tree.config(new));
                    if reached {
                        edge.pop();
                        tree.rewire(new, n, d, edge);
                    }
                }
            }
            // Neighbors that are cheaper through the new node
            for &(n, d) in &neighbors {
                if tree.cost(new) + d < tree.cost(n) {
                    let (mut edge, reached) =
                        safe_extension(space, collision, tree.config(new), tree.config(n));
                    if reached {
                        edge.pop();
                        tree.rewire(n, new, d, edge);
                    }
                }
            }
        }

        let best = goal_node?;
        let path = tree.path_to(best);
        debug!(cost = tree.cost(best), waypoints = path.len(), "RRT* finished");
        observer.on_path(&path);
        Some(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::observer::NullObserver;
    use motion_space::JointSpace;
    use motion_types::{JointRange, SampleSequence};

    #[test]
    fn test_path_is_collision_free_and_anchored() {
        let mut space = JointSpace::new(&[JointRange::bounded(-2.0, 2.0); 2])
            .unwrap()
            .with_resolutions(&[0.05, 0.05])
            .unwrap()
            .with_sequence(SampleSequence::Uniform, Some(21));
        let blocked = |q: &[f64]| q[0].abs() < 0.2 && q[1].abs() < 0.5;
        let mut check = blocked;

        let mut planner = RrtStarPlanner::new(1500).with_seed(21).with_radius(0.6);
        let path = planner
            .plan(&[-1.0, 0.0], &[1.0, 0.0], &mut space, &mut check, &mut NullObserver)
            .unwrap();

        assert_eq!(path.first().unwrap().as_slice(), &[-1.0, 0.0]);
        assert_eq!(path.last().unwrap().as_slice(), &[1.0, 0.0]);
        for (a, b) in path.segments() {
            for q in space.extend(a, b) {
                assert!(!blocked(&q));
            }
        }
    }
}
