//! Error types for scene access and planning.
//!
//! Two error enums cover the two halves of the planning stack:
//! [`SceneError`] for failures reported by the engine context, and
//! [`PlanningError`] for malformed planning requests. A request that is
//! well-formed but cannot be solved (blocked start, blocked goal, exhausted
//! budget) is not an error; planners report it as `Ok(None)`.

use crate::ids::{BodyId, JointId, LinkId};
use crate::joint::JointKind;

/// Errors reported by a scene when queried or mutated.
///
/// # Example
///
/// ```
/// use motion_types::{BodyId, SceneError};
///
/// let error = SceneError::UnknownBody(BodyId::new(7));
/// assert!(error.to_string().contains("Body(7)"));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum SceneError {
    /// The body does not exist.
    #[error("unknown body {0}")]
    UnknownBody(BodyId),

    /// The link does not exist on the body.
    #[error("unknown link {link} on {body}")]
    UnknownLink {
        /// The body queried.
        body: BodyId,
        /// The missing link.
        link: LinkId,
    },

    /// The joint does not exist on the body.
    #[error("unknown joint {joint} on {body}")]
    UnknownJoint {
        /// The body queried.
        body: BodyId,
        /// The missing joint.
        joint: JointId,
    },

    /// Joint list and value list lengths differ.
    #[error("expected {expected} joint values, got {actual}")]
    DimensionMismatch {
        /// Number of joints addressed.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// A body description is inconsistent.
    #[error("invalid body model: {0}")]
    InvalidModel(String),
}

impl SceneError {
    /// Creates an invalid model error with the given message.
    ///
    /// # Example
    ///
    /// ```
    /// use motion_types::SceneError;
    ///
    /// let error = SceneError::invalid_model("duplicate link name 'arm'");
    /// assert!(error.to_string().contains("arm"));
    /// ```
    #[must_use]
    pub fn invalid_model(message: impl Into<String>) -> Self {
        Self::InvalidModel(message.into())
    }
}

/// Errors in a planning request.
///
/// # Example
///
/// ```
/// use motion_types::PlanningError;
///
/// let error = PlanningError::DimensionMismatch { expected: 3, actual: 2 };
/// assert!(error.is_dimension_mismatch());
/// assert!(error.to_string().contains("expected 3"));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum PlanningError {
    /// A configuration length does not match the joint count.
    #[error("configuration dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension of the configuration space.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },

    /// A bounded joint range cannot be sampled.
    #[error("degenerate range [{lower}, {upper}] for {joint}")]
    DegenerateJointRange {
        /// Offending joint.
        joint: JointId,
        /// Lower limit.
        lower: f64,
        /// Upper limit.
        upper: f64,
    },

    /// The joint cannot be planned over as a single coordinate.
    #[error("{joint} of kind {kind} is not supported for planning")]
    UnsupportedJoint {
        /// Offending joint.
        joint: JointId,
        /// Its kind.
        kind: JointKind,
    },

    /// A configuration contains NaN or infinite values.
    #[error("configuration contains non-finite values")]
    NonFiniteConfiguration,

    /// An invalid configuration parameter was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The engine context failed.
    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
}

impl PlanningError {
    /// Creates an invalid configuration error with the given message.
    ///
    /// # Example
    ///
    /// ```
    /// use motion_types::PlanningError;
    ///
    /// let error = PlanningError::invalid_config("goal_bias must lie in [0, 1]");
    /// assert!(error.to_string().contains("goal_bias"));
    /// ```
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Returns a dimension mismatch error unless `actual == expected`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::DimensionMismatch`] when the lengths differ.
    pub const fn check_dimension(expected: usize, actual: usize) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::DimensionMismatch { expected, actual })
        }
    }

    /// Returns `true` if this is a dimension mismatch.
    #[must_use]
    pub const fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Self::DimensionMismatch { .. })
    }

    /// Returns `true` if this wraps a scene error.
    #[must_use]
    pub const fn is_scene(&self) -> bool {
        matches!(self, Self::Scene(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_link_display() {
        let error = SceneError::UnknownLink {
            body: BodyId::new(1),
            link: LinkId::new(4),
        };
        let msg = error.to_string();
        assert!(msg.contains("Body(1)"));
        assert!(msg.contains("Link(4)"));
    }

    #[test]
    fn test_scene_error_converts() {
        let error: PlanningError = SceneError::UnknownBody(BodyId::new(3)).into();
        assert!(error.is_scene());
        assert!(!error.is_dimension_mismatch());
    }

    #[test]
    fn test_check_dimension() {
        assert!(PlanningError::check_dimension(2, 2).is_ok());
        let error = PlanningError::check_dimension(2, 3).unwrap_err();
        assert_eq!(
            error,
            PlanningError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_unsupported_joint_display() {
        let error = PlanningError::UnsupportedJoint {
            joint: JointId::new(2),
            kind: JointKind::Spherical,
        };
        assert!(error.to_string().contains("spherical"));
    }
}
