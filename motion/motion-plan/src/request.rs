//! Inputs of the joint and base planning entry points.
//!
//! - [`JointMotionRequest`] - Obstacles, attachments, collision settings and
//!   metric overrides for arm planning
//! - [`BaseMotionRequest`] - Base limits, metric, goal distance and
//!   collision backend for mobile-base planning
//! - [`OccupancyMap`] - A 2D map and how configurations land on it

use cf_spatial::{FootprintMask, OccupancyGrid};
use motion_collision::{Attachment, MapProjection};
use motion_types::{CollisionSettings, JointId, Obstacle, SampleSequence};

fn check_positive(name: &str, values: &[f64], issues: &mut Vec<String>) {
    if values.iter().any(|v| !(v.is_finite() && *v > 0.0)) {
        issues.push(format!("{name} must be positive and finite, got {values:?}"));
    }
}

/// Everything besides the endpoints that shapes a joint-space query.
///
/// # Example
///
/// ```
/// use motion_plan::JointMotionRequest;
/// use motion_types::{BodyId, CollisionSettings, JointId, Obstacle};
///
/// let request = JointMotionRequest::new()
///     .with_obstacle(Obstacle::body(BodyId::new(3)))
///     .with_custom_limit(JointId::new(0), (-1.0, 1.0))
///     .with_collision(CollisionSettings::new().with_max_distance(0.01));
///
/// assert_eq!(request.obstacles().len(), 1);
/// assert!(request.validate().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct JointMotionRequest {
    obstacles: Vec<Obstacle>,
    attachments: Vec<Attachment>,
    collision: CollisionSettings,
    custom_limits: Vec<(JointId, (f64, f64))>,
    weights: Option<Vec<f64>>,
    resolutions: Option<Vec<f64>>,
    sequence: SampleSequence,
}

impl JointMotionRequest {
    /// A request with no obstacles, no attachments and default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an obstacle.
    #[must_use]
    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    /// Adds several obstacles.
    #[must_use]
    pub fn with_obstacles(mut self, obstacles: impl IntoIterator<Item = Obstacle>) -> Self {
        self.obstacles.extend(obstacles);
        self
    }

    /// Adds an attached body that moves with the arm.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Replaces the collision settings.
    #[must_use]
    pub fn with_collision(mut self, settings: CollisionSettings) -> Self {
        self.collision = settings;
        self
    }

    /// Overrides the sampling bounds of one joint.
    #[must_use]
    pub fn with_custom_limit(mut self, joint: JointId, limits: (f64, f64)) -> Self {
        self.custom_limits.push((joint, limits));
        self
    }

    /// Sets per-joint distance weights.
    #[must_use]
    pub fn with_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Sets per-joint interpolation resolutions.
    #[must_use]
    pub fn with_resolutions(mut self, resolutions: Vec<f64>) -> Self {
        self.resolutions = Some(resolutions);
        self
    }

    /// Sets the sample sequence.
    #[must_use]
    pub const fn with_sequence(mut self, sequence: SampleSequence) -> Self {
        self.sequence = sequence;
        self
    }

    /// Obstacles checked against the moving links.
    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Bodies carried by the arm.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Collision settings.
    #[must_use]
    pub const fn collision(&self) -> &CollisionSettings {
        &self.collision
    }

    /// Per-joint sampling bound overrides.
    #[must_use]
    pub fn custom_limits(&self) -> &[(JointId, (f64, f64))] {
        &self.custom_limits
    }

    /// Distance weights, if overridden.
    #[must_use]
    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    /// Interpolation resolutions, if overridden.
    #[must_use]
    pub fn resolutions(&self) -> Option<&[f64]> {
        self.resolutions.as_deref()
    }

    /// Sample sequence.
    #[must_use]
    pub const fn sequence(&self) -> SampleSequence {
        self.sequence
    }

    /// Validates the request.
    ///
    /// Returns a list of issues found, or an empty vector if valid. Vector
    /// lengths are checked against the joint count when planning.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = self.collision.validate();
        for &(joint, (lower, upper)) in &self.custom_limits {
            if !(lower.is_finite() && upper.is_finite() && lower < upper) {
                issues.push(format!(
                    "custom limits of {joint} must satisfy lower < upper, got [{lower}, {upper}]"
                ));
            }
        }
        if let Some(weights) = &self.weights {
            if weights.iter().any(|w| !(w.is_finite() && *w >= 0.0)) {
                issues.push(format!("weights must be non-negative and finite, got {weights:?}"));
            }
        }
        if let Some(resolutions) = &self.resolutions {
            check_positive("resolutions", resolutions, &mut issues);
        }
        issues
    }
}

/// Everything besides the goal that shapes a base query.
///
/// Defaults: unit weights, 0.05 resolutions, no clearance margin, a
/// minimum goal distance of -0.02 (every goal is planned), no
/// reversing and no post-optimization.
///
/// # Example
///
/// ```
/// use motion_plan::BaseMotionRequest;
///
/// let request = BaseMotionRequest::new((-5.0, -5.0), (5.0, 5.0))
///     .with_min_goal_distance(0.1)
///     .with_optimize_iterations(50);
///
/// assert_eq!(request.min_goal_distance(), 0.1);
/// assert!(request.validate().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BaseMotionRequest {
    lower: (f64, f64),
    upper: (f64, f64),
    obstacles: Vec<Obstacle>,
    max_distance: f64,
    weights: [f64; 3],
    resolutions: [f64; 3],
    min_goal_distance: f64,
    reversible: bool,
    optimize_iterations: usize,
    sequence: SampleSequence,
    physics_collisions: bool,
}

impl BaseMotionRequest {
    /// A request sampling `(x, y)` within `lower..upper`.
    #[must_use]
    pub const fn new(lower: (f64, f64), upper: (f64, f64)) -> Self {
        Self {
            lower,
            upper,
            obstacles: Vec::new(),
            max_distance: 0.0,
            weights: [1.0; 3],
            resolutions: [0.05; 3],
            min_goal_distance: -0.02,
            reversible: false,
            optimize_iterations: 0,
            sequence: SampleSequence::Uniform,
            physics_collisions: false,
        }
    }

    /// Adds an obstacle for physics collision checks.
    #[must_use]
    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    /// Adds several obstacles for physics collision checks.
    #[must_use]
    pub fn with_obstacles(mut self, obstacles: impl IntoIterator<Item = Obstacle>) -> Self {
        self.obstacles.extend(obstacles);
        self
    }

    /// Sets the clearance below which the body counts as colliding.
    #[must_use]
    pub const fn with_max_distance(mut self, distance: f64) -> Self {
        self.max_distance = distance;
        self
    }

    /// Sets the `(x, y, heading)` distance weights.
    #[must_use]
    pub const fn with_weights(mut self, weights: [f64; 3]) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the `(x, y, heading)` interpolation resolutions.
    #[must_use]
    pub const fn with_resolutions(mut self, resolutions: [f64; 3]) -> Self {
        self.resolutions = resolutions;
        self
    }

    /// Refuses goals closer than `distance` along both x and y.
    ///
    /// A negative distance plans every goal, including pure rotations.
    #[must_use]
    pub const fn with_min_goal_distance(mut self, distance: f64) -> Self {
        self.min_goal_distance = distance;
        self
    }

    /// Allows driving backwards when that needs less rotation.
    #[must_use]
    pub const fn with_reversible(mut self, reversible: bool) -> Self {
        self.reversible = reversible;
        self
    }

    /// Shortcutting iterations applied to the found path.
    #[must_use]
    pub const fn with_optimize_iterations(mut self, iterations: usize) -> Self {
        self.optimize_iterations = iterations;
        self
    }

    /// Sets the sample sequence.
    #[must_use]
    pub const fn with_sequence(mut self, sequence: SampleSequence) -> Self {
        self.sequence = sequence;
        self
    }

    /// Checks 2D plans against the scene's bodies instead of the map.
    #[must_use]
    pub const fn with_physics_collisions(mut self, enabled: bool) -> Self {
        self.physics_collisions = enabled;
        self
    }

    /// Lower `(x, y)` sampling bound.
    #[must_use]
    pub const fn lower(&self) -> (f64, f64) {
        self.lower
    }

    /// Upper `(x, y)` sampling bound.
    #[must_use]
    pub const fn upper(&self) -> (f64, f64) {
        self.upper
    }

    /// Obstacles for physics collision checks.
    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Clearance margin.
    #[must_use]
    pub const fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Distance weights.
    #[must_use]
    pub const fn weights(&self) -> [f64; 3] {
        self.weights
    }

    /// Interpolation resolutions.
    #[must_use]
    pub const fn resolutions(&self) -> [f64; 3] {
        self.resolutions
    }

    /// Minimum goal distance.
    #[must_use]
    pub const fn min_goal_distance(&self) -> f64 {
        self.min_goal_distance
    }

    /// Whether the base may drive backwards.
    #[must_use]
    pub const fn reversible(&self) -> bool {
        self.reversible
    }

    /// Post-optimization iterations.
    #[must_use]
    pub const fn optimize_iterations(&self) -> usize {
        self.optimize_iterations
    }

    /// Sample sequence.
    #[must_use]
    pub const fn sequence(&self) -> SampleSequence {
        self.sequence
    }

    /// Whether 2D plans use physics collision checks.
    #[must_use]
    pub const fn physics_collisions(&self) -> bool {
        self.physics_collisions
    }

    /// Returns true if `goal` lies within the minimum goal distance of
    /// `start` along both x and y.
    #[must_use]
    pub fn goal_too_close(&self, start: &[f64], goal: &[f64]) -> bool {
        (start[0] - goal[0]).abs() < self.min_goal_distance
            && (start[1] - goal[1]).abs() < self.min_goal_distance
    }

    /// Validates the request.
    ///
    /// Returns a list of issues found, or an empty vector if valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let (lower, upper) = (self.lower, self.upper);
        let finite = [lower.0, lower.1, upper.0, upper.1].iter().all(|v| v.is_finite());
        if !finite || lower.0 >= upper.0 || lower.1 >= upper.1 {
            issues.push(format!(
                "base limits must satisfy lower < upper, got {lower:?}..{upper:?}"
            ));
        }
        if !(self.max_distance.is_finite() && self.max_distance >= 0.0) {
            issues.push(format!(
                "max_distance must be finite and non-negative, got {}",
                self.max_distance
            ));
        }
        if self.weights.iter().any(|w| !(w.is_finite() && *w >= 0.0)) {
            issues.push(format!("weights must be non-negative and finite, got {:?}", self.weights));
        }
        check_positive("resolutions", &self.resolutions, &mut issues);
        if !self.min_goal_distance.is_finite() {
            issues.push("min_goal_distance must be finite".to_string());
        }
        issues
    }
}

#[derive(Debug, Clone, Copy)]
enum MapFrame {
    Local { range: f64 },
    Global(MapProjection),
}

/// An occupancy map plus the frame configurations are projected in.
///
/// Local maps are centered on the robot's start pose and span `range`
/// meters across the grid's rows; the projection is fixed when planning
/// starts.
///
/// # Example
///
/// ```
/// use cf_spatial::{CellState, OccupancyGrid};
/// use motion_plan::OccupancyMap;
///
/// let grid = OccupancyGrid::new(100, 100, CellState::Free).unwrap();
/// let map = OccupancyMap::local(&grid, 5.0, 4);
/// assert_eq!(map.footprint().radius_cells(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct OccupancyMap<'g> {
    grid: &'g OccupancyGrid,
    frame: MapFrame,
    footprint: FootprintMask,
}

impl<'g> OccupancyMap<'g> {
    /// A robot-centric map covering `range` meters, with a disc footprint
    /// of `footprint_cells` radius.
    #[must_use]
    pub fn local(grid: &'g OccupancyGrid, range: f64, footprint_cells: u32) -> Self {
        Self {
            grid,
            frame: MapFrame::Local { range },
            footprint: FootprintMask::disc(footprint_cells),
        }
    }

    /// A world-fixed map using `projection`.
    #[must_use]
    pub fn global(
        grid: &'g OccupancyGrid,
        projection: MapProjection,
        footprint_cells: u32,
    ) -> Self {
        Self {
            grid,
            frame: MapFrame::Global(projection),
            footprint: FootprintMask::disc(footprint_cells),
        }
    }

    /// Replaces the footprint.
    #[must_use]
    pub fn with_footprint(mut self, footprint: FootprintMask) -> Self {
        self.footprint = footprint;
        self
    }

    /// The occupancy grid.
    #[must_use]
    pub const fn grid(&self) -> &'g OccupancyGrid {
        self.grid
    }

    /// The robot footprint.
    #[must_use]
    pub const fn footprint(&self) -> &FootprintMask {
        &self.footprint
    }

    /// The projection used for a robot starting at `start`.
    ///
    /// # Errors
    ///
    /// Returns an error if a local map's range or `start` is invalid.
    pub fn projection(&self, start: &[f64]) -> motion_types::Result<MapProjection> {
        match self.frame {
            MapFrame::Local { range } => MapProjection::local(start, range, self.grid.rows()),
            MapFrame::Global(projection) => Ok(projection),
        }
    }
}
