//! Spatial primitives for CortenForge motion planning.
//!
//! This crate provides the geometry that collision queries are built on:
//!
//! - [`Aabb`] and [`Sphere`] - Bounding volumes for broad-phase rejection
//! - [`Capsule`] and [`segment_segment_distance`] - Exact proximity between
//!   link colliders
//! - [`OccupancyGrid`] and [`CellState`] - 2D maps for mobile-base planning
//! - [`FootprintMask`] - Disc-shaped robot footprints on an occupancy grid
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It only depends on
//! `nalgebra` and `thiserror`.
//!
//! # Example
//!
//! ```
//! use cf_spatial::{Capsule, CellState, FootprintMask, OccupancyGrid};
//! use nalgebra::Point3;
//!
//! let arm = Capsule::new(Point3::origin(), Point3::new(1.0, 0.0, 0.0), 0.05);
//! let post = Capsule::new(Point3::new(0.5, 0.5, -1.0), Point3::new(0.5, 0.5, 1.0), 0.05);
//! assert!(arm.distance(&post) > 0.0);
//!
//! let grid = OccupancyGrid::new(16, 16, CellState::Free).unwrap();
//! assert!(grid.footprint_is_free(8, 8, &FootprintMask::disc(3)));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod occupancy;
mod overlap;

pub use error::SpatialError;
pub use occupancy::{CellState, FootprintMask, OccupancyGrid};
pub use overlap::{Aabb, Capsule, Sphere, segment_segment_distance};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
