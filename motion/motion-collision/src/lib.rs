//! Collision predicates for configuration-space motion planning.
//!
//! Planners test configurations through one trait, [`CollisionCheck`].
//! This crate provides its implementations:
//!
//! - [`CollisionChecker`] - An articulated body among obstacles, with
//!   self-collision pruning and [`Attachment`]s that follow their parent
//!   links
//! - [`GridCollision`] - A disc-shaped base on an occupancy grid, through a
//!   local or global [`MapProjection`]
//! - [`BaseBodyCollision`] - A body placed by its planar base pose and
//!   checked with the scene's proximity query
//!
//! Any `FnMut(&[f64]) -> bool` closure is also a [`CollisionCheck`].
//!
//! # Self-collision pairs
//!
//! Pair lists are computed once from the body's [`LinkGraph`]. Links moved
//! by the active joints are checked against the fixed links and against
//! each other, except where two links are driven by exactly the same
//! active joints (they move rigidly together). Adjacent links and pairs in
//! the disabled list are never checked.
//!
//! # Example
//!
//! ```
//! use motion_collision::{CollisionCheck, CollisionChecker};
//! use motion_scene::{BodyBuilder, KinematicWorld, LinkSpec, Scene};
//! use motion_types::CollisionSettings;
//! use nalgebra::{Point3, Vector3};
//!
//! let mut world = KinematicWorld::new();
//! let capsule = (Point3::origin(), Point3::new(1.0, 0.0, 0.0), 0.05);
//! let arm = world
//!     .add_body(
//!         BodyBuilder::new("arm")
//!             .with_link(
//!                 LinkSpec::revolute("l0", "base", -3.0, 3.0)
//!                     .with_capsule(capsule.0, capsule.1, capsule.2),
//!             )
//!             .with_link(
//!                 LinkSpec::revolute("l1", "l0", -3.0, 3.0)
//!                     .with_offset(Vector3::new(1.0, 0.0, 0.0))
//!                     .with_capsule(capsule.0, capsule.1, capsule.2),
//!             )
//!             .with_link(
//!                 LinkSpec::revolute("l2", "l1", -3.0, 3.0)
//!                     .with_offset(Vector3::new(1.0, 0.0, 0.0))
//!                     .with_capsule(capsule.0, capsule.1, capsule.2),
//!             ),
//!     )
//!     .unwrap();
//!
//! let joints = world.joints(arm).unwrap();
//! let settings = CollisionSettings::new();
//! let mut checker =
//!     CollisionChecker::new(&mut world, arm, &joints, &[], &[], &settings).unwrap();
//!
//! assert!(!checker.in_collision(&[0.0, 0.0, 0.0]));
//! // Folded back over itself
//! assert!(checker.in_collision(&[0.0, 2.5, 2.5]));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod attachment;
mod base;
mod check;
mod checker;
mod graph;
mod grid;
mod pairs;

pub use attachment::{Attachment, body_from_end_effector, end_effector_from_body};
pub use base::BaseBodyCollision;
pub use check::{CollisionCheck, NoCollision};
pub use checker::{CollisionChecker, Contact};
pub use graph::LinkGraph;
pub use grid::{GridCollision, MapProjection};
pub use pairs::{DisabledPairs, moving_pairs, self_collision_pairs};
