//! Single-tree RRT with goal biasing.

use std::time::Duration;

use motion_collision::CollisionCheck;
use motion_space::ConfigurationSpace;
use motion_types::{Algorithm, Configuration, Path, PlannerConfig, PlanningMode};
use rand::Rng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::observer::PlanningObserver;
use crate::planner::{Budget, Planner, planner_rng};
use crate::tree::Tree;

/// Grows one tree from the start, steering toward the goal with
/// probability `goal_bias` (and always on the first iteration).
///
/// # Example
///
/// ```
/// use motion_plan::{NullObserver, Planner, RrtPlanner};
/// use motion_space::JointSpace;
/// use motion_types::{JointRange, SampleSequence};
///
/// let mut space = JointSpace::new(&[JointRange::bounded(-2.0, 2.0); 2])
///     .unwrap()
///     .with_sequence(SampleSequence::Uniform, Some(5));
/// let mut free = |_: &[f64]| false;
///
/// let mut planner = RrtPlanner::new(100).with_seed(5);
/// let path = planner
///     .plan(&[0.0, 0.0], &[1.0, 1.0], &mut space, &mut free, &mut NullObserver)
///     .unwrap();
/// assert_eq!(path.last().unwrap().as_slice(), &[1.0, 1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct RrtPlanner {
    iterations: usize,
    goal_bias: f64,
    timeout: Option<Duration>,
    rng: StdRng,
}

impl RrtPlanner {
    /// Creates an RRT with an iteration budget and the default goal bias.
    #[must_use]
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            goal_bias: 0.2,
            timeout: None,
            rng: planner_rng(None),
        }
    }

    /// Creates an RRT from a planner configuration.
    #[must_use]
    pub fn from_config(config: &PlannerConfig, mode: PlanningMode) -> Self {
        Self {
            iterations: config.iterations(mode),
            goal_bias: config.goal_bias(),
            timeout: config.timeout(),
            rng: planner_rng(config.seed()),
        }
    }

    /// Sets the probability of steering toward the goal.
    #[must_use]
    pub const fn with_goal_bias(mut self, bias: f64) -> Self {
        self.goal_bias = bias;
        self
    }

    /// Seeds the planner's random choices.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = planner_rng(Some(seed));
        self
    }

    /// Iteration budget.
    #[must_use]
    pub const fn iterations(&self) -> usize {
        self.iterations
    }
}

impl Planner for RrtPlanner {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Rrt
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

        for iteration in 0..self.iterations {
            if budget.expired() {
                debug!(iteration, "RRT timed out");
                break;
            }
            let toward_goal = iteration == 0 || self.rng.gen_range(0.0..1.0) < self.goal_bias;
            let target = if toward_goal {
                Configuration::from_slice(goal)
            } else {
                space.sample()
            };
            observer.on_sample(&target);

            let mut last = tree.nearest(space, &target);
            let mut reached = true;
            for q in space.extend(tree.config(last), &target) {
                if collision.in_collision(&q) {
                    reached = false;
                    break;
                }
                observer.on_edge(tree.config(last), &q);
                let step = space.distance(tree.config(last), &q);
                last = tree.add(q, last, step, Vec::new());
            }
            if reached && toward_goal {
                let path = tree.path_to(last);
                debug!(iteration, nodes = tree.len(), "RRT reached goal");
                observer.on_path(&path);
                return Some(path);
            }
        }
        debug!(nodes = tree.len(), "RRT exhausted its budget");
        None
    }
}
