//! Core types for configuration-space motion planning.
//!
//! This crate provides the vocabulary shared by the scene, configuration
//! space, collision and planner crates:
//!
//! - **Identifiers**: [`BodyId`], [`LinkId`], [`JointId`], [`BodyLink`]
//! - **Kinematics**: [`JointKind`], [`JointRange`], [`JointInfo`], [`Pose`]
//! - **Configurations**: [`Configuration`] and planned [`Path`]s
//! - **Angles**: [`wrap_angle`] and [`circular_difference`] for wrap-around joints
//! - **Configuration**: [`PlannerConfig`], [`CollisionSettings`], [`Algorithm`]
//! - **Errors**: [`SceneError`] and [`PlanningError`]
//!
//! # Example
//!
//! ```
//! use motion_types::{Algorithm, Configuration, PlannerConfig, circular_difference};
//!
//! let start = Configuration::from([0.0, 0.0]);
//! let goal = Configuration::from([6.0, 0.0]);
//!
//! // The first joint wraps: going backwards is much shorter
//! let d = circular_difference(goal[0], start[0]);
//! assert!((d.abs() - 0.283).abs() < 1e-3);
//!
//! let config = PlannerConfig::new().with_algorithm(Algorithm::BiRrt).with_seed(42);
//! assert!(config.validate().is_empty());
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for all types

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

pub mod angle;
pub mod config;
pub mod configuration;
pub mod error;
pub mod ids;
pub mod joint;
pub mod obstacle;
pub mod path;
pub mod pose;

// Re-export main types at crate root for convenience
pub use angle::{CIRCULAR_LIMITS, circular_difference, unwrap_toward, wrap_angle};
pub use config::{Algorithm, CollisionSettings, PlannerConfig, PlanningMode, SampleSequence};
pub use configuration::Configuration;
pub use error::{PlanningError, SceneError};
pub use ids::{BodyId, BodyLink, JointId, LinkId};
pub use joint::{JointInfo, JointKind, JointRange};
pub use obstacle::Obstacle;
pub use path::Path;
pub use pose::Pose;

/// Result type for planning operations.
pub type Result<T> = std::result::Result<T, PlanningError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod integration_tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::TAU;

    #[test]
    fn test_wrap_around_difference_from_configurations() {
        let start = Configuration::from([0.0, 0.0]);
        let goal = Configuration::from([6.0, 0.0]);
        let diff: Configuration = goal
            .iter()
            .zip(start.iter())
            .map(|(&b, &a)| circular_difference(b, a))
            .collect();
        assert_relative_eq!(diff[0], 6.0 - TAU, epsilon = 1e-12);
        assert_relative_eq!(diff[0].abs(), 0.283, epsilon = 1e-3);
    }

    #[test]
    fn test_joint_range_feeds_planner_types() {
        let range = JointRange::from_limits(JointKind::Revolute, 1.0, -1.0);
        assert_eq!(range.sampling_bounds(), CIRCULAR_LIMITS);
        let error = PlanningError::DegenerateJointRange {
            joint: JointId::new(0),
            lower: 1.0,
            upper: 1.0,
        };
        assert!(error.to_string().contains("Joint(0)"));
    }
}
