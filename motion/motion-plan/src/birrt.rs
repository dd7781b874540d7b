//! Bidirectional RRT (RRT-Connect) with restarts and smoothing.

use std::time::Duration;

use motion_collision::CollisionCheck;
use motion_space::ConfigurationSpace;
use motion_types::{Algorithm, Configuration, Path, PlannerConfig, PlanningMode};
use rand::rngs::StdRng;
use tracing::debug;

use crate::direct::DirectPlanner;
use crate::observer::PlanningObserver;
use crate::planner::{Budget, Planner, planner_rng};
use crate::smooth::smooth_path;
use crate::tree::Tree;

/// Bidirectional RRT, the default planner.
///
/// Tries the direct path first. Otherwise runs RRT-Connect up to
/// `restarts + 1` times with `iterations` each: the smaller tree extends
/// toward a random sample, then the other tree extends toward the new
/// node until the two connect. A found path is shortened with
/// [`smooth_path`](crate::smooth_path) for `smoothing` iterations.
///
/// # Example
///
/// ```
/// use motion_plan::{BiRrtPlanner, NullObserver, Planner};
/// use motion_space::JointSpace;
/// use motion_types::{JointRange, SampleSequence};
///
/// let mut space = JointSpace::new(&[JointRange::bounded(-2.0, 2.0); 2])
///     .unwrap()
///     .with_resolutions(&[0.05, 0.05])
///     .unwrap()
///     .with_sequence(SampleSequence::Uniform, Some(1));
/// // A wall at x = 0 with a gap above y = 1
/// let mut wall = |q: &[f64]| q[0].abs() < 0.1 && q[1] < 1.0;
///
/// let mut planner = BiRrtPlanner::new(200).with_seed(1);
/// let path = planner
///     .plan(&[-1.0, 0.0], &[1.0, 0.0], &mut space, &mut wall, &mut NullObserver)
///     .unwrap();
/// assert!(path.iter().any(|q| q[1] >= 1.0));
/// ```
#[derive(Debug, Clone)]
pub struct BiRrtPlanner {
    iterations: usize,
    restarts: usize,
    smoothing: usize,
    timeout: Option<Duration>,
    rng: StdRng,
}

impl BiRrtPlanner {
    /// Creates a bidirectional RRT with `iterations` per attempt, two
    /// restarts and 20 smoothing iterations.
    #[must_use]
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            restarts: 2,
            smoothing: 20,
            timeout: None,
            rng: planner_rng(None),
        }
    }

    /// Creates a bidirectional RRT from a planner configuration.
    #[must_use]
    pub fn from_config(config: &PlannerConfig, mode: PlanningMode) -> Self {
        Self {
            iterations: config.iterations(mode),
            restarts: config.restarts(),
            smoothing: config.smoothing(),
            timeout: config.timeout(),
            rng: planner_rng(config.seed()),
        }
    }

    /// Sets the number of fresh attempts after the first.
    #[must_use]
    pub const fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Sets the smoothing iterations applied to a found path.
    #[must_use]
    pub const fn with_smoothing(mut self, iterations: usize) -> Self {
        self.smoothing = iterations;
        self
    }

    /// Seeds the planner's random choices.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = planner_rng(Some(seed));
        self
    }
}

impl Planner for BiRrtPlanner {
    fn algorithm(&self) -> Algorithm {
        Algorithm::BiRrt
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
        if let Some(path) = DirectPlanner::new().plan(start, goal, space, collision, observer) {
            return Some(path);
        }

        let budget = Budget::start(self.timeout);
        for attempt in 0..=self.restarts {
            if budget.expired() {
                break;
            }
            let Some(path) =
                rrt_connect(start, goal, space, collision, self.iterations, &budget, observer)
            else {
                debug!(attempt, "RRT-Connect attempt failed");
                continue;
            };
            debug!(attempt, waypoints = path.len(), "RRT-Connect found a path");
            let path = if self.smoothing > 0 {
                smooth_path(&path, space, collision, self.smoothing, &mut self.rng)
            } else {
                path
            };
            observer.on_path(&path);
            return Some(path);
        }
        None
    }
}

/// Extends `tree` from `from` toward `target` until blocked. Returns the
/// last node added (or `from`) and whether `target` was reached.
fn grow<S, C>(
    tree: &mut Tree,
    from: usize,
    target: &[f64],
    space: &S,
    collision: &mut C,
    observer: &mut dyn PlanningObserver,
) -> (usize, bool)
where
    S: ConfigurationSpace,
    C: CollisionCheck + ?Sized,
{
    let mut last = from;
    for q in space.extend(tree.config(from), target) {
        if collision.in_collision(&q) {
            return (last, false);
        }
        observer.on_edge(tree.config(last), &q);
        let step = space.distance(tree.config(last), &q);
        last = tree.add(q, last, step, Vec::new());
    }
    (last, true)
}

fn rrt_connect<S, C>(
    start: &[f64],
    goal: &[f64],
    space: &mut S,
    collision: &mut C,
    iterations: usize,
    budget: &Budget,
    observer: &mut dyn PlanningObserver,
) -> Option<Path>
where
    S: ConfigurationSpace,
    C: CollisionCheck + ?Sized,
{
    let mut start_tree = Tree::new(Configuration::from_slice(start));
    let mut goal_tree = Tree::new(Configuration::from_slice(goal));

    for _ in 0..iterations {
        if budget.expired() {
            return None;
        }
        // Grow the smaller tree toward the sample
        let swapped = start_tree.len() > goal_tree.len();
        let (grow_tree, connect_tree) = if swapped {
            (&mut goal_tree, &mut start_tree)
        } else {
            (&mut start_tree, &mut goal_tree)
        };

        let sample = space.sample();
        observer.on_sample(&sample);
        let nearest = grow_tree.nearest(space, &sample);
        let (last1, _) = grow(grow_tree, nearest, &sample, space, collision, observer);

        let target = grow_tree.config(last1).clone();
        let nearest = connect_tree.nearest(space, &target);
        let (last2, connected) = grow(connect_tree, nearest, &target, space, collision, observer);
        if !connected {
            continue;
        }

        // The connecting node duplicates `target`; drop it from one side
        let mut first = grow_tree.retrace(last1);
        let mut second = connect_tree.retrace(last2);
        if swapped {
            std::mem::swap(&mut first, &mut second);
        }
        first.pop();
        second.reverse();
        first.extend(second);
        return Some(Path::new(first));
    }
    None
}
