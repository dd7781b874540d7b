//! Sampling-based motion planners and scene-level planning entry points.
//!
//! Planners search a [`ConfigurationSpace`](motion_space::ConfigurationSpace)
//! for a path whose every extension passes a
//! [`CollisionCheck`](motion_collision::CollisionCheck):
//!
//! - [`DirectPlanner`] - The straight extension or nothing
//! - [`BiRrtPlanner`] - Direct first, then restarted RRT-Connect and
//!   shortcut smoothing (the default)
//! - [`RrtPlanner`] - One goal-biased tree
//! - [`RrtStarPlanner`] - Rewiring RRT* with informed sampling
//! - [`LazyPrmPlanner`] - Lazily validated roadmaps of growing size
//!
//! [`plan_motion`] validates a query, rejects blocked endpoints and runs the
//! algorithm chosen by a [`PlannerConfig`](motion_types::PlannerConfig).
//! The scene-level entry points build the space and collision predicate
//! from a [`Scene`](motion_scene::Scene) and restore its state afterwards:
//!
//! - [`plan_joint_motion`], [`plan_direct_joint_motion`] and
//!   [`plan_waypoints_joint_motion`] for articulated bodies
//! - [`plan_base_motion`] and [`plan_base_motion_2d`] for mobile bases
//!
//! # Outcomes
//!
//! Malformed input (wrong lengths, non-finite values, invalid settings) is
//! an `Err`. A blocked start or goal and an exhausted budget are both
//! `Ok(None)`.
//!
//! # Example
//!
//! ```
//! use motion_plan::{JointMotionRequest, plan_joint_motion};
//! use motion_scene::{BodyBuilder, KinematicWorld, Scene};
//! use motion_types::{Algorithm, JointId, Obstacle, PlannerConfig, wrap_angle};
//! use nalgebra::Point3;
//! use std::f64::consts::FRAC_PI_2;
//!
//! let mut world = KinematicWorld::new();
//! let arm = world
//!     .add_body(BodyBuilder::planar_arm("arm", &[1.0], 0.05))
//!     .unwrap();
//! let post = world
//!     .add_body(BodyBuilder::new("post").with_base_sphere(Point3::new(0.0, 0.6, 0.0), 0.1))
//!     .unwrap();
//!
//! let request = JointMotionRequest::new().with_obstacle(Obstacle::body(post));
//! let config = PlannerConfig::new().with_algorithm(Algorithm::BiRrt).with_seed(7);
//!
//! // The short way to pi is blocked by the post; the planner goes around
//! let path = plan_joint_motion(&mut world, arm, &[JointId::new(0)], &[3.0], &request, &config)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(path.last().unwrap().as_slice(), &[3.0]);
//! assert!(path.iter().all(|q| (wrap_angle(q[0]) - FRAC_PI_2).abs() > 0.2));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

pub mod base;
pub mod birrt;
pub mod direct;
pub mod dispatch;
pub mod joint;
pub mod lazy_prm;
pub mod observer;
pub mod planner;
pub mod request;
pub mod rrt;
pub mod rrt_star;
pub mod smooth;

mod tree;

pub use base::{base_space, plan_base_motion, plan_base_motion_2d, plan_base_motion_2d_observed};
pub use birrt::BiRrtPlanner;
pub use direct::DirectPlanner;
pub use dispatch::{AnyPlanner, plan_motion};
pub use joint::{
    collision_checker, joint_space, plan_direct_joint_motion, plan_joint_motion,
    plan_joint_motion_observed, plan_waypoints_joint_motion,
};
pub use lazy_prm::LazyPrmPlanner;
pub use observer::{NullObserver, PlanningObserver};
pub use planner::Planner;
pub use request::{BaseMotionRequest, JointMotionRequest, OccupancyMap};
pub use rrt::RrtPlanner;
pub use rrt_star::RrtStarPlanner;
pub use smooth::smooth_path;
