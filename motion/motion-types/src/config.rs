//! Configuration types for planners and collision queries.
//!
//! This module provides builder-style configuration:
//! - [`PlannerConfig`] - Algorithm choice and search budgets
//! - [`CollisionSettings`] - Self-collision pruning and obstacle clearance
//! - [`Algorithm`], [`PlanningMode`] and [`SampleSequence`] - Enumerated choices

use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::PlanningError;
use crate::ids::LinkId;

/// Motion planning algorithm.
///
/// # Example
///
/// ```
/// use motion_types::Algorithm;
///
/// let algorithm: Algorithm = "rrt_star".parse().unwrap();
/// assert_eq!(algorithm, Algorithm::RrtStar);
/// assert_eq!(Algorithm::default(), Algorithm::BiRrt);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Algorithm {
    /// Straight interpolation only; fails if it collides.
    Direct,
    /// Bidirectional RRT with restarts and smoothing.
    #[default]
    BiRrt,
    /// Asymptotically optimal RRT with rewiring.
    RrtStar,
    /// Single-tree RRT with goal bias.
    Rrt,
    /// Lazy probabilistic roadmap with a growing sample schedule.
    LazyPrm,
}

impl Algorithm {
    /// All algorithms, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Direct,
        Self::BiRrt,
        Self::RrtStar,
        Self::Rrt,
        Self::LazyPrm,
    ];

    /// Short snake-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::BiRrt => "birrt",
            Self::RrtStar => "rrt_star",
            Self::Rrt => "rrt",
            Self::LazyPrm => "lazy_prm",
        }
    }

    /// Returns true if the algorithm draws random samples.
    #[must_use]
    pub const fn is_sampling_based(self) -> bool {
        !matches!(self, Self::Direct)
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = PlanningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| PlanningError::invalid_config(format!("unknown algorithm '{s}'")))
    }
}

/// Which kind of configuration space is being planned over.
///
/// Budget defaults differ between arm joints and mobile bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlanningMode {
    /// Joint positions of an articulated body.
    #[default]
    Joint,
    /// Planar `(x, y, heading)` of a mobile base.
    Base,
}

impl PlanningMode {
    /// Default iteration budget of `algorithm` in this mode.
    ///
    /// For [`Algorithm::BiRrt`] this is the budget of a single restart.
    #[must_use]
    pub const fn default_iterations(self, algorithm: Algorithm) -> usize {
        match (algorithm, self) {
            (Algorithm::Direct, _) => 0,
            (Algorithm::BiRrt, _) => 20,
            (Algorithm::RrtStar, _) | (Algorithm::Rrt, Self::Base) => 5000,
            (Algorithm::Rrt, Self::Joint) => 500,
            (Algorithm::LazyPrm, _) => self.default_schedule()[0],
        }
    }

    /// Default lazy-PRM roadmap sizes, tried in order.
    #[must_use]
    pub const fn default_schedule(self) -> &'static [usize] {
        match self {
            Self::Joint => &[500, 2000, 5000],
            Self::Base => &[250, 500, 1000, 2000, 4000, 4000],
        }
    }
}

/// Source of the unit-interval numbers behind configuration sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SampleSequence {
    /// Independent pseudo-random draws.
    #[default]
    Uniform,
    /// Generalized Halton low-discrepancy sequence.
    Halton,
}

/// Configuration for a planning query.
///
/// # Example
///
/// ```
/// use motion_types::{Algorithm, PlannerConfig, PlanningMode};
///
/// let config = PlannerConfig::new()
///     .with_algorithm(Algorithm::Rrt)
///     .with_goal_bias(0.1)
///     .with_seed(7);
///
/// assert_eq!(config.iterations(PlanningMode::Joint), 500);
/// assert_eq!(config.iterations(PlanningMode::Base), 5000);
/// assert!(config.validate().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlannerConfig {
    /// Algorithm to run.
    algorithm: Algorithm,
    /// Iteration budget override (None = per-mode default).
    max_iterations: Option<usize>,
    /// Number of bidirectional RRT restarts after the first attempt.
    restarts: usize,
    /// Random shortcutting iterations applied to a found path.
    smoothing: usize,
    /// Probability of sampling the goal directly (0-1).
    goal_bias: f64,
    /// RRT* rewiring radius in configuration-space distance units.
    rewire_radius: f64,
    /// Lazy-PRM roadmap sizes override (None = per-mode default).
    schedule: Option<Vec<usize>>,
    /// Roadmap neighbors connected per sample.
    neighbors: usize,
    /// Random seed for reproducibility (None = random).
    seed: Option<u64>,
    /// Wall-clock budget.
    timeout: Option<Duration>,
}

impl PlannerConfig {
    /// Creates a planner configuration with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            algorithm: Algorithm::BiRrt,
            max_iterations: None,
            restarts: 2,
            smoothing: 20,
            goal_bias: 0.2,
            rewire_radius: 0.5,
            schedule: None,
            neighbors: 10,
            seed: None,
            timeout: None,
        }
    }

    /// Sets the algorithm.
    #[must_use]
    pub const fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Overrides the iteration budget.
    #[must_use]
    pub const fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    /// Sets the number of bidirectional RRT restarts.
    #[must_use]
    pub const fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Sets the number of shortcutting iterations (0 disables smoothing).
    #[must_use]
    pub const fn with_smoothing(mut self, iterations: usize) -> Self {
        self.smoothing = iterations;
        self
    }

    /// Sets the goal bias probability (0-1).
    #[must_use]
    pub const fn with_goal_bias(mut self, bias: f64) -> Self {
        self.goal_bias = bias;
        self
    }

    /// Sets the RRT* rewiring radius.
    #[must_use]
    pub const fn with_rewire_radius(mut self, radius: f64) -> Self {
        self.rewire_radius = radius;
        self
    }

    /// Overrides the lazy-PRM roadmap schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: Vec<usize>) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Sets the number of roadmap neighbors per sample.
    #[must_use]
    pub const fn with_neighbors(mut self, neighbors: usize) -> Self {
        self.neighbors = neighbors;
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Removes the seed (use random initialization).
    #[must_use]
    pub const fn without_seed(mut self) -> Self {
        self.seed = None;
        self
    }

    /// Sets the wall-clock budget.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Returns the iteration budget for `mode`.
    #[must_use]
    pub const fn iterations(&self, mode: PlanningMode) -> usize {
        match self.max_iterations {
            Some(max) => max,
            None => mode.default_iterations(self.algorithm),
        }
    }

    /// Returns the number of restarts.
    #[must_use]
    pub const fn restarts(&self) -> usize {
        self.restarts
    }

    /// Returns the number of smoothing iterations.
    #[must_use]
    pub const fn smoothing(&self) -> usize {
        self.smoothing
    }

    /// Returns the goal bias.
    #[must_use]
    pub const fn goal_bias(&self) -> f64 {
        self.goal_bias
    }

    /// Returns the rewiring radius.
    #[must_use]
    pub const fn rewire_radius(&self) -> f64 {
        self.rewire_radius
    }

    /// Returns the lazy-PRM schedule for `mode`.
    #[must_use]
    pub fn schedule(&self, mode: PlanningMode) -> &[usize] {
        self.schedule
            .as_deref()
            .unwrap_or_else(|| mode.default_schedule())
    }

    /// Returns the number of roadmap neighbors.
    #[must_use]
    pub const fn neighbors(&self) -> usize {
        self.neighbors
    }

    /// Returns the seed, if set.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns the timeout, if set.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Validates the configuration.
    ///
    /// Returns a list of issues found, or an empty vector if valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !(0.0..=1.0).contains(&self.goal_bias) {
            issues.push(format!("goal_bias must lie in [0, 1], got {}", self.goal_bias));
        }
        if !(self.rewire_radius.is_finite() && self.rewire_radius > 0.0) {
            issues.push(format!(
                "rewire_radius must be positive, got {}",
                self.rewire_radius
            ));
        }
        if self.max_iterations == Some(0) && self.algorithm.is_sampling_based() {
            issues.push(format!("{} needs a positive iteration budget", self.algorithm));
        }
        if let Some(schedule) = &self.schedule {
            if schedule.is_empty() || schedule.contains(&0) {
                issues.push("lazy-PRM schedule must be non-empty and positive".to_string());
            }
        }
        if self.neighbors == 0 {
            issues.push("neighbors must be positive".to_string());
        }

        issues
    }

    /// Validates the configuration, failing on the first issue.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::InvalidConfig`] listing every issue.
    pub fn ensure_valid(&self) -> Result<(), PlanningError> {
        let issues = self.validate();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(PlanningError::invalid_config(issues.join("; ")))
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Which link pairs a collision query checks, and with what clearance.
///
/// # Example
///
/// ```
/// use motion_types::{CollisionSettings, LinkId};
///
/// let settings = CollisionSettings::new()
///     .with_disabled_pair(LinkId::new(1), LinkId::new(3))
///     .with_max_distance(0.02);
///
/// assert!(settings.is_disabled(LinkId::new(3), LinkId::new(1)));
/// assert!(settings.self_collisions());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollisionSettings {
    /// Whether link pairs of the planned body are checked.
    self_collisions: bool,
    /// Restrict moving × moving pairs to those not driven rigidly together.
    only_moving: bool,
    /// Self-collision pairs never checked, in either order.
    disabled_pairs: Vec<(LinkId, LinkId)>,
    /// Robot links exempt from obstacle checks.
    allowed_links: Vec<LinkId>,
    /// Clearance margin for obstacle checks.
    max_distance: f64,
}

impl CollisionSettings {
    /// Creates default settings: self-collisions on, zero clearance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            self_collisions: true,
            only_moving: true,
            disabled_pairs: Vec::new(),
            allowed_links: Vec::new(),
            max_distance: 0.0,
        }
    }

    /// Enables or disables self-collision checks.
    #[must_use]
    pub const fn with_self_collisions(mut self, enabled: bool) -> Self {
        self.self_collisions = enabled;
        self
    }

    /// Enables or disables the moving-pairs pruning rule.
    #[must_use]
    pub const fn with_only_moving(mut self, enabled: bool) -> Self {
        self.only_moving = enabled;
        self
    }

    /// Disables one self-collision pair.
    #[must_use]
    pub fn with_disabled_pair(mut self, a: LinkId, b: LinkId) -> Self {
        self.disabled_pairs.push((a, b));
        self
    }

    /// Disables several self-collision pairs.
    #[must_use]
    pub fn with_disabled_pairs(
        mut self,
        pairs: impl IntoIterator<Item = (LinkId, LinkId)>,
    ) -> Self {
        self.disabled_pairs.extend(pairs);
        self
    }

    /// Exempts a link from obstacle checks.
    #[must_use]
    pub fn with_allowed_link(mut self, link: LinkId) -> Self {
        self.allowed_links.push(link);
        self
    }

    /// Sets the obstacle clearance margin.
    #[must_use]
    pub const fn with_max_distance(mut self, distance: f64) -> Self {
        self.max_distance = distance;
        self
    }

    /// Returns whether self-collisions are checked.
    #[must_use]
    pub const fn self_collisions(&self) -> bool {
        self.self_collisions
    }

    /// Returns whether the moving-pairs rule is applied.
    #[must_use]
    pub const fn only_moving(&self) -> bool {
        self.only_moving
    }

    /// Returns the disabled pairs as given.
    #[must_use]
    pub fn disabled_pairs(&self) -> &[(LinkId, LinkId)] {
        &self.disabled_pairs
    }

    /// Returns the links exempt from obstacle checks.
    #[must_use]
    pub fn allowed_links(&self) -> &[LinkId] {
        &self.allowed_links
    }

    /// Returns the obstacle clearance margin.
    #[must_use]
    pub const fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Returns true if the pair is disabled in either order.
    #[must_use]
    pub fn is_disabled(&self, a: LinkId, b: LinkId) -> bool {
        self.disabled_pairs
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    /// Validates the settings.
    ///
    /// Returns a list of issues found, or an empty vector if valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !(self.max_distance.is_finite() && self.max_distance >= 0.0) {
            issues.push(format!(
                "max_distance must be finite and non-negative, got {}",
                self.max_distance
            ));
        }
        issues
    }
}

impl Default for CollisionSettings {
    fn default() -> Self {
        Self::new()
    }
}
