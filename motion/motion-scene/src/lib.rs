//! Engine context for motion planning.
//!
//! Planners interact with the world only through the [`Scene`] trait:
//! kinematic structure (links, joints, parents), forcing state setters
//! (joint positions, base poses) and a closest-points proximity query.
//!
//! [`KinematicWorld`] is a self-contained implementation with forward
//! kinematics over link trees and capsule colliders. It serves tests,
//! examples and any caller that does not need a physics engine.
//!
//! # Example
//!
//! ```
//! use motion_scene::{BodyBuilder, KinematicWorld, LinkSpec, Scene};
//! use nalgebra::{Point3, Vector3};
//!
//! let mut world = KinematicWorld::new();
//! let arm = world
//!     .add_body(
//!         BodyBuilder::new("arm")
//!             .with_link(LinkSpec::revolute("upper", "base", -1.5, 1.5))
//!             .with_link(
//!                 LinkSpec::revolute("fore", "upper", -1.5, 1.5)
//!                     .with_offset(Vector3::new(1.0, 0.0, 0.0)),
//!             ),
//!     )
//!     .unwrap();
//!
//! let joints = world.joints(arm).unwrap();
//! world.set_joint_positions(arm, &joints, &[0.3, -0.2]).unwrap();
//! assert_eq!(world.joint_positions(arm, &joints).unwrap().as_slice(), &[0.3, -0.2]);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod builder;
mod scene;
mod world;

pub use builder::{BASE_LINK_NAME, BodyBuilder, LinkSpec};
pub use scene::{Scene, SceneResult};
pub use world::KinematicWorld;
