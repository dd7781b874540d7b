//! The configuration-space contract and straight-line interpolation.

use motion_types::Configuration;

/// Sampling, metric and interpolation over one kind of configuration.
///
/// Implementations never validate joint limits; callers check start and
/// goal once and sampling stays inside the limits by construction.
///
/// Every method taking configurations expects slices of length
/// [`dimension`](Self::dimension).
pub trait ConfigurationSpace {
    /// Iterator produced by [`extend`](Self::extend).
    type Extend: Iterator<Item = Configuration>;

    /// Number of coordinates.
    fn dimension(&self) -> usize;

    /// Draws a configuration from the valid range of every coordinate.
    fn sample(&mut self) -> Configuration;

    /// Per-coordinate signed difference `q2 - q1`; circular coordinates take
    /// the short way around and lie in `(-π, π]`.
    fn difference(&self, q2: &[f64], q1: &[f64]) -> Configuration;

    /// Weighted Euclidean norm of [`difference`](Self::difference).
    fn distance(&self, q1: &[f64], q2: &[f64]) -> f64;

    /// Finely spaced configurations from `q1` (exclusive) to `q2`
    /// (inclusive). Always yields at least one configuration and always ends
    /// at exactly `q2`.
    fn extend(&self, q1: &[f64], q2: &[f64]) -> Self::Extend;

    /// `steps + 1` evenly spaced configurations from `q1` (exclusive) to
    /// `q2` (inclusive), following [`difference`](Self::difference).
    fn refine(&self, q1: &[f64], q2: &[f64], steps: usize) -> Interpolation {
        Interpolation::new(q1, q2, self.difference(q2, q1), steps + 1)
    }
}

/// Evenly spaced configurations along a fixed displacement.
///
/// Yields `start + delta * i / steps` for `i = 1..=steps`, substituting
/// `end` exactly for the last one. A clone continues independently from the
/// same position.
///
/// # Example
///
/// ```
/// use motion_space::Interpolation;
/// use motion_types::Configuration;
///
/// let steps: Vec<Configuration> =
///     Interpolation::new(&[0.0], &[1.0], Configuration::from([1.0]), 4).collect();
/// assert_eq!(steps.len(), 4);
/// assert_eq!(steps[1][0], 0.5);
/// assert_eq!(steps[3][0], 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Interpolation {
    start: Configuration,
    delta: Configuration,
    end: Configuration,
    steps: usize,
    index: usize,
}

impl Interpolation {
    /// Interpolation of `steps` increments from `start` by `delta`, ending at
    /// `end`.
    ///
    /// # Panics
    ///
    /// Panics if the three configurations differ in length.
    #[must_use]
    pub fn new(start: &[f64], end: &[f64], delta: Configuration, steps: usize) -> Self {
        assert_eq!(start.len(), end.len(), "interpolation endpoints differ in length");
        assert_eq!(start.len(), delta.len(), "interpolation delta has wrong length");
        Self {
            start: Configuration::from_slice(start),
            delta,
            end: Configuration::from_slice(end),
            steps,
            index: 0,
        }
    }

    /// An interpolation that yields nothing.
    #[must_use]
    pub fn empty(at: &[f64]) -> Self {
        Self::new(at, at, Configuration::zeros(at.len()), 0)
    }

    /// Total number of configurations this interpolation yields.
    #[must_use]
    pub const fn steps(&self) -> usize {
        self.steps
    }
}

impl Iterator for Interpolation {
    type Item = Configuration;

    fn next(&mut self) -> Option<Configuration> {
        if self.index >= self.steps {
            return None;
        }
        self.index += 1;
        if self.index == self.steps {
            return Some(self.end.clone());
        }
        #[allow(clippy::cast_precision_loss)]
        let t = self.index as f64 / self.steps as f64;
        Some(
            self.start
                .iter()
                .zip(self.delta.iter())
                .map(|(s, d)| d.mul_add(t, *s))
                .collect(),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.steps - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Interpolation {}

impl std::iter::FusedIterator for Interpolation {}
