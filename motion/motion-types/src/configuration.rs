//! Joint-space configurations.

use std::ops::{Deref, DerefMut};

use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Inline capacity before a configuration spills to the heap.
const INLINE_JOINTS: usize = 8;

/// An ordered vector of joint positions.
///
/// The length always equals the dimension of the configuration space that
/// produced it. Configurations of up to eight joints are stored inline.
///
/// # Example
///
/// ```
/// use motion_types::Configuration;
///
/// let q = Configuration::from([0.1, -0.4, 1.2]);
/// assert_eq!(q.len(), 3);
/// assert_eq!(q[1], -0.4);
/// assert_eq!(q.iter().sum::<f64>(), 0.1 - 0.4 + 1.2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Configuration(SmallVec<[f64; INLINE_JOINTS]>);

impl Configuration {
    /// Creates an all-zero configuration of `dimension` joints.
    #[must_use]
    pub fn zeros(dimension: usize) -> Self {
        Self(SmallVec::from_elem(0.0, dimension))
    }

    /// Copies positions from a slice.
    #[must_use]
    pub fn from_slice(values: &[f64]) -> Self {
        Self(SmallVec::from_slice(values))
    }

    /// Returns the positions as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Returns true if every position is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Largest absolute per-joint deviation from `other`.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    #[must_use]
    pub fn max_abs_diff(&self, other: &[f64]) -> f64 {
        assert_eq!(self.len(), other.len(), "configuration length mismatch");
        self.0
            .iter()
            .zip(other)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// Consumes the configuration and returns a `Vec`.
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.0.into_vec()
    }
}

impl Deref for Configuration {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl DerefMut for Configuration {
    fn deref_mut(&mut self) -> &mut [f64] {
        &mut self.0
    }
}

impl AsRef<[f64]> for Configuration {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for Configuration {
    fn from(values: Vec<f64>) -> Self {
        Self(SmallVec::from_vec(values))
    }
}

impl From<&[f64]> for Configuration {
    fn from(values: &[f64]) -> Self {
        Self::from_slice(values)
    }
}

impl<const N: usize> From<[f64; N]> for Configuration {
    fn from(values: [f64; N]) -> Self {
        Self::from_slice(&values)
    }
}

impl FromIterator<f64> for Configuration {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Configuration {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v:.4}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let q = Configuration::zeros(4);
        assert_eq!(q.len(), 4);
        assert!(q.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_spills_past_inline_capacity() {
        let q: Configuration = (0..12).map(f64::from).collect();
        assert_eq!(q.len(), 12);
        assert_eq!(q[11], 11.0);
    }

    #[test]
    fn test_deref_mut() {
        let mut q = Configuration::from([1.0, 2.0]);
        q[0] = 5.0;
        assert_eq!(q.as_slice(), &[5.0, 2.0]);
    }

    #[test]
    fn test_is_finite() {
        assert!(Configuration::from([0.0, 1.0]).is_finite());
        assert!(!Configuration::from([0.0, f64::NAN]).is_finite());
    }

    #[test]
    fn test_max_abs_diff() {
        let q = Configuration::from([1.0, -1.0, 0.5]);
        assert_eq!(q.max_abs_diff(&[1.5, -1.0, 0.0]), 0.5);
    }

    #[test]
    fn test_display() {
        let q = Configuration::from([0.5, -1.0]);
        assert_eq!(q.to_string(), "(0.5000, -1.0000)");
    }
}
