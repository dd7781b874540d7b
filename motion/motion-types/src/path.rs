//! Planned paths through configuration space.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::configuration::Configuration;

/// An ordered sequence of configurations.
///
/// A planned path starts at exactly the start configuration and ends at
/// exactly the goal; consecutive entries are close enough that the straight
/// interpolation between them has been collision checked.
///
/// # Example
///
/// ```
/// use motion_types::{Configuration, Path};
///
/// let path = Path::new(vec![
///     Configuration::from([0.0, 0.0]),
///     Configuration::from([3.0, 0.0]),
///     Configuration::from([3.0, 4.0]),
/// ]);
///
/// let euclidean = |a: &[f64], b: &[f64]| {
///     a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt()
/// };
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.length(euclidean), 7.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Path {
    waypoints: Vec<Configuration>,
}

impl Path {
    /// Creates a path from waypoints.
    #[must_use]
    pub const fn new(waypoints: Vec<Configuration>) -> Self {
        Self { waypoints }
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Returns true if the path has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// First waypoint.
    #[must_use]
    pub fn first(&self) -> Option<&Configuration> {
        self.waypoints.first()
    }

    /// Last waypoint.
    #[must_use]
    pub fn last(&self) -> Option<&Configuration> {
        self.waypoints.last()
    }

    /// Waypoints as a slice.
    #[must_use]
    pub fn waypoints(&self) -> &[Configuration] {
        &self.waypoints
    }

    /// Iterates over waypoints.
    pub fn iter(&self) -> std::slice::Iter<'_, Configuration> {
        self.waypoints.iter()
    }

    /// Consecutive waypoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = (&Configuration, &Configuration)> {
        self.waypoints.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// Appends a waypoint.
    pub fn push(&mut self, q: Configuration) {
        self.waypoints.push(q);
    }

    /// Appends the waypoints of `other`, skipping its first one when it
    /// repeats this path's last waypoint.
    pub fn extend_path(&mut self, other: Self) {
        let mut rest = other.waypoints.into_iter().peekable();
        if let (Some(last), Some(next)) = (self.waypoints.last(), rest.peek()) {
            if last == next {
                rest.next();
            }
        }
        self.waypoints.extend(rest);
    }

    /// Sum of `distance` over consecutive waypoints.
    #[must_use]
    pub fn length(&self, distance: impl Fn(&[f64], &[f64]) -> f64) -> f64 {
        self.segments().map(|(a, b)| distance(a, b)).sum()
    }

    /// Consumes the path and returns its waypoints.
    #[must_use]
    pub fn into_waypoints(self) -> Vec<Configuration> {
        self.waypoints
    }
}

impl From<Vec<Configuration>> for Path {
    fn from(waypoints: Vec<Configuration>) -> Self {
        Self::new(waypoints)
    }
}

impl FromIterator<Configuration> for Path {
    fn from_iter<I: IntoIterator<Item = Configuration>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Path {
    type Item = Configuration;
    type IntoIter = std::vec::IntoIter<Configuration>;

    fn into_iter(self) -> Self::IntoIter {
        self.waypoints.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Configuration;
    type IntoIter = std::slice::Iter<'a, Configuration>;

    fn into_iter(self) -> Self::IntoIter {
        self.waypoints.iter()
    }
}

impl std::ops::Index<usize> for Path {
    type Output = Configuration;

    fn index(&self, index: usize) -> &Configuration {
        &self.waypoints[index]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn q(values: &[f64]) -> Configuration {
        Configuration::from_slice(values)
    }

    #[test]
    fn test_empty_path() {
        let path = Path::default();
        assert!(path.is_empty());
        assert!(path.first().is_none());
        assert_eq!(path.segments().count(), 0);
        assert_eq!(path.length(|_, _| 1.0), 0.0);
    }

    #[test]
    fn test_segments() {
        let path: Path = vec![q(&[0.0]), q(&[1.0]), q(&[2.0])].into();
        let segments: Vec<_> = path.segments().collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].0[0], 1.0);
        assert_eq!(path[2][0], 2.0);
    }

    #[test]
    fn test_extend_path_skips_shared_endpoint() {
        let mut a: Path = vec![q(&[0.0]), q(&[1.0])].into();
        let b: Path = vec![q(&[1.0]), q(&[2.0])].into();
        a.extend_path(b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.last().unwrap()[0], 2.0);
    }
}
