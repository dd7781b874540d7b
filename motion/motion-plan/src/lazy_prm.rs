//! Lazy probabilistic roadmap with a growing sample schedule.

use std::time::Duration;

use hashbrown::{HashMap, HashSet};
use motion_collision::CollisionCheck;
use motion_space::ConfigurationSpace;
use motion_types::{Algorithm, Configuration, Path, PlannerConfig, PlanningMode};
use pathfinding::prelude::dijkstra;
use tracing::{debug, trace};

use crate::observer::PlanningObserver;
use crate::planner::{Budget, Planner};

const START: usize = 0;
const GOAL: usize = 1;

/// Lazily validated state of a roadmap vertex or edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Validity {
    Free,
    Blocked,
}

/// A roadmap whose vertices and edges are only collision checked when a
/// shortest path passes through them.
struct Roadmap {
    vertices: Vec<Configuration>,
    adjacency: Vec<Vec<(usize, u64)>>,
    vertex_state: HashMap<usize, Validity>,
    edge_state: HashMap<(usize, usize), Validity>,
}

/// Scales a distance to the integer costs the search runs on.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled_cost(distance: f64) -> u64 {
    (distance * 1000.0).round() as u64
}

impl Roadmap {
    /// Connects every vertex to its `k` nearest neighbors.
    fn build<S: ConfigurationSpace>(space: &S, vertices: Vec<Configuration>, k: usize) -> Self {
        let n = vertices.len();
        let mut adjacency = vec![Vec::new(); n];
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        let mut ranked: Vec<(usize, f64)> = Vec::with_capacity(n);

        for i in 0..n {
            ranked.clear();
            ranked.extend(
                (0..n)
                    .filter(|&j| j != i)
                    .map(|j| (j, space.distance(&vertices[i], &vertices[j]))),
            );
            let k = k.min(ranked.len());
            if k == 0 {
                continue;
            }
            ranked.select_nth_unstable_by(k - 1, |a, b| a.1.total_cmp(&b.1));
            for &(j, d) in &ranked[..k] {
                if seen.insert((i.min(j), i.max(j))) {
                    let cost = scaled_cost(d);
                    adjacency[i].push((j, cost));
                    adjacency[j].push((i, cost));
                }
            }
        }

        Self {
            vertices,
            adjacency,
            vertex_state: HashMap::new(),
            edge_state: HashMap::new(),
        }
    }

    fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Shortest start-goal route avoiding everything known to collide.
    fn shortest(&self) -> Option<Vec<usize>> {
        let blocked_vertex = |v: usize| self.vertex_state.get(&v) == Some(&Validity::Blocked);
        let blocked_edge = |a: usize, b: usize| {
            self.edge_state.get(&(a, b)) == Some(&Validity::Blocked)
        };
        dijkstra(
            &START,
            |&v| {
                self.adjacency[v]
                    .iter()
                    .filter(|&&(u, _)| !blocked_vertex(u) && !blocked_edge(v, u))
                    .copied()
                    .collect::<Vec<_>>()
            },
            |&v| v == GOAL,
        )
        .map(|(route, _)| route)
    }

    /// Checks unvisited vertices on `route`; false if any collides.
    fn validate_vertices<C>(
        &mut self,
        route: &[usize],
        collision: &mut C,
        observer: &mut dyn PlanningObserver,
    ) -> bool
    where
        C: CollisionCheck + ?Sized,
    {
        let mut valid = true;
        for &v in route {
            let state = match self.vertex_state.get(&v) {
                Some(&state) => state,
                None => {
                    observer.on_sample(&self.vertices[v]);
                    let state = if collision.in_collision(&self.vertices[v]) {
                        Validity::Blocked
                    } else {
                        Validity::Free
                    };
                    self.vertex_state.insert(v, state);
                    state
                }
            };
            if state == Validity::Blocked {
                trace!(vertex = v, "roadmap vertex in collision");
                valid = false;
            }
        }
        valid
    }

    /// Checks unvisited edges on `route`; false if any collides.
    fn validate_edges<S, C>(
        &mut self,
        route: &[usize],
        space: &S,
        collision: &mut C,
        observer: &mut dyn PlanningObserver,
    ) -> bool
    where
        S: ConfigurationSpace,
        C: CollisionCheck + ?Sized,
    {
        for pair in route.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if self.edge_state.contains_key(&(a, b)) {
                continue;
            }
            let (from, to) = (&self.vertices[a], &self.vertices[b]);
            let free = space.extend(from, to).all(|q| !collision.in_collision(&q));
            if free {
                observer.on_edge(from, to);
                self.edge_state.insert((a, b), Validity::Free);
            } else {
                trace!(from = a, to = b, "roadmap edge in collision");
                self.edge_state.insert((a, b), Validity::Blocked);
                return false;
            }
        }
        true
    }

    /// Densified configurations along a validated route.
    fn expand<S: ConfigurationSpace>(&self, route: &[usize], space: &S) -> Path {
        let mut waypoints = vec![self.vertices[START].clone()];
        for pair in route.windows(2) {
            waypoints.extend(space.extend(&self.vertices[pair[0]], &self.vertices[pair[1]]));
        }
        Path::new(waypoints)
    }
}

/// Lazy PRM that rebuilds a larger roadmap after each failure.
///
/// Every roadmap holds the start, the goal and a fresh batch of samples,
/// each joined to its nearest neighbors. The shortest route is checked
/// only along its own vertices and edges; colliding ones are removed and
/// the search repeats until a route validates or the roadmap is
/// disconnected, at which point the next schedule entry is tried.
///
/// # Example
///
/// ```
/// use motion_plan::{LazyPrmPlanner, NullObserver, Planner};
/// use motion_space::JointSpace;
/// use motion_types::{JointRange, SampleSequence};
///
/// let mut space = JointSpace::new(&[JointRange::bounded(-1.0, 1.0); 2])
///     .unwrap()
///     .with_sequence(SampleSequence::Halton, Some(1));
/// let mut free = |_: &[f64]| false;
///
/// let mut planner = LazyPrmPlanner::new(vec![50, 100]);
/// let path = planner
///     .plan(&[-0.5, 0.0], &[0.5, 0.0], &mut space, &mut free, &mut NullObserver)
///     .unwrap();
/// assert_eq!(path.last().unwrap().as_slice(), &[0.5, 0.0]);
/// ```
#[derive(Debug, Clone)]
pub struct LazyPrmPlanner {
    schedule: Vec<usize>,
    neighbors: usize,
    timeout: Option<Duration>,
}

impl LazyPrmPlanner {
    /// Creates a lazy PRM trying each roadmap size in `schedule`, joining
    /// every vertex to its 8 nearest neighbors.
    #[must_use]
    pub fn new(schedule: Vec<usize>) -> Self {
        Self {
            schedule,
            neighbors: 8,
            timeout: None,
        }
    }

    /// Creates a lazy PRM from a planner configuration.
    #[must_use]
    pub fn from_config(config: &PlannerConfig, mode: PlanningMode) -> Self {
        Self {
            schedule: config.schedule(mode).to_vec(),
            neighbors: config.neighbors(),
            timeout: config.timeout(),
        }
    }

    /// Sets how many nearest neighbors each vertex is joined to.
    #[must_use]
    pub const fn with_neighbors(mut self, neighbors: usize) -> Self {
        self.neighbors = neighbors;
        self
    }

    /// Roadmap sizes tried in order.
    pub fn schedule(&self) -> &[usize] {
        &self.schedule
    }
}

impl Planner for LazyPrmPlanner {
    fn algorithm(&self) -> Algorithm {
        Algorithm::LazyPrm
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

        for &samples in &self.schedule {
            if budget.expired() {
                debug!(samples, "lazy PRM timed out");
                break;
            }
            let mut vertices = Vec::with_capacity(samples + 2);
            vertices.push(Configuration::from_slice(start));
            vertices.push(Configuration::from_slice(goal));
            vertices.extend((0..samples).map(|_| space.sample()));

            let mut roadmap = Roadmap::build(&*space, vertices, self.neighbors);
            debug!(samples, edges = roadmap.edge_count(), "lazy PRM roadmap built");

            while let Some(route) = roadmap.shortest() {
                if budget.expired() {
                    break;
                }
                if !roadmap.validate_vertices(&route, collision, observer) {
                    continue;
                }
                if !roadmap.validate_edges(&route, &*space, collision, observer) {
                    continue;
                }
                let path = roadmap.expand(&route, &*space);
                debug!(samples, vertices = route.len(), "lazy PRM found path");
                observer.on_path(&path);
                return Some(path);
            }
        }
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::observer::NullObserver;
    use motion_space::JointSpace;
    use motion_types::{JointRange, SampleSequence};

    fn square(seed: u64) -> JointSpace {
        JointSpace::new(&[JointRange::bounded(-2.0, 2.0); 2])
            .unwrap()
            .with_resolutions(&[0.05, 0.05])
            .unwrap()
            .with_sequence(SampleSequence::Uniform, Some(seed))
    }

    #[test]
    fn test_roadmap_connects_nearest_neighbors() {
        let space = square(0);
        let vertices: Vec<Configuration> = [[0.0, 0.0], [1.0, 0.0], [0.1, 0.0], [3.0, 3.0]]
            .into_iter()
            .map(Configuration::from)
            .collect();
        let roadmap = Roadmap::build(&space, vertices, 1);
        assert!(roadmap.adjacency[0].iter().any(|&(j, _)| j == 2));
        assert!(roadmap.adjacency[2].iter().any(|&(j, _)| j == 0));
        assert_eq!(roadmap.adjacency[0][0].1, 100);
    }

    #[test]
    fn test_routes_around_wall() {
        let mut space = square(3);
        let blocked = |q: &[f64]| q[0].abs() < 0.15 && q[1] < 1.0;
        let mut check = blocked;

        let mut planner = LazyPrmPlanner::new(vec![100, 400, 1600]).with_neighbors(10);
        let path = planner
            .plan(&[-1.0, 0.0], &[1.0, 0.0], &mut space, &mut check, &mut NullObserver)
            .unwrap();

        assert_eq!(path.first().unwrap().as_slice(), &[-1.0, 0.0]);
        assert_eq!(path.last().unwrap().as_slice(), &[1.0, 0.0]);
        assert!(path.iter().all(|q| !blocked(q)));
    }

    #[test]
    fn test_enclosed_goal_fails() {
        let mut space = square(4);
        let mut check = |q: &[f64]| {
            let d = (q[0] - 1.0).hypot(q[1]);
            d > 0.2 && d < 0.5
        };

        let mut planner = LazyPrmPlanner::new(vec![50, 100]);
        let path = planner.plan(
            &[-1.0, 0.0],
            &[1.0, 0.0],
            &mut space,
            &mut check,
            &mut NullObserver,
        );
        assert!(path.is_none());
    }
}
