//! Hooks for watching a planner work.

use motion_types::Path;

/// Receives planner progress for visualization or diagnostics.
///
/// Every method has a no-op default; implement only what you need.
///
/// # Example
///
/// ```
/// use motion_plan::PlanningObserver;
///
/// #[derive(Default)]
/// struct EdgeCounter(usize);
///
/// impl PlanningObserver for EdgeCounter {
///     fn on_edge(&mut self, _from: &[f64], _to: &[f64]) {
///         self.0 += 1;
///     }
/// }
///
/// let mut counter = EdgeCounter::default();
/// counter.on_edge(&[0.0], &[1.0]);
/// assert_eq!(counter.0, 1);
/// ```
pub trait PlanningObserver {
    /// A configuration was sampled.
    fn on_sample(&mut self, _q: &[f64]) {}

    /// A collision-free edge was added to a tree or roadmap.
    fn on_edge(&mut self, _from: &[f64], _to: &[f64]) {}

    /// A path was found.
    fn on_path(&mut self, _path: &Path) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl PlanningObserver for NullObserver {}
