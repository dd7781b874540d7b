//! Configuration-space adapters for sampling-based motion planning.
//!
//! A configuration space supplies the four primitives every sampling
//! planner needs, bundled behind the [`ConfigurationSpace`] trait:
//!
//! - **sample**: a configuration drawn within the valid range of every
//!   coordinate, from a pluggable [`PointGenerator`]
//! - **difference**: signed per-coordinate difference, short way around
//!   for circular coordinates
//! - **distance**: weighted Euclidean norm of the difference
//! - **extend**: lazily interpolated configurations ending exactly at the
//!   target
//!
//! Two spaces are provided: [`JointSpace`] over the joints of an
//! articulated body, and [`BaseSpace`] over the planar pose of a mobile
//! base with three-phase (turn, drive, turn) extension.
//!
//! Path post-processing lives alongside: [`remove_redundant`],
//! [`waypoints_from_path`], [`refine_path`] and [`adjust_path`].
//!
//! # Example
//!
//! ```
//! use motion_space::{ConfigurationSpace, JointSpace};
//! use motion_types::{JointRange, SampleSequence};
//!
//! let mut space = JointSpace::new(&[JointRange::Circular, JointRange::bounded(-1.0, 1.0)])
//!     .unwrap()
//!     .with_resolutions(&[0.1, 0.1])
//!     .unwrap()
//!     .with_sequence(SampleSequence::Halton, Some(42));
//!
//! let q = space.sample();
//! assert!(space.within_limits(&q));
//!
//! let steps: Vec<_> = space.extend(&[0.0, 0.0], &[0.0, 1.0]).collect();
//! assert_eq!(steps.len(), 10);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod base_space;
mod generator;
mod joint_space;
mod path_ops;
mod space;

pub use base_space::{BaseExtend, BaseSpace, travel_heading};
pub use generator::{GeneralizedHalton, PointGenerator};
pub use joint_space::{DEFAULT_RESOLUTION, DEFAULT_WEIGHT, JointAxis, JointSpace};
pub use path_ops::{adjust_path, refine_path, remove_redundant, waypoints_from_path};
pub use space::{ConfigurationSpace, Interpolation};
