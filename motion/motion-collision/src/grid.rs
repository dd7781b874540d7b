//! Occupancy-grid collision for planar bases.

use cf_spatial::{FootprintMask, OccupancyGrid};
use motion_types::{PlanningError, Result};
use tracing::trace;

use crate::check::CollisionCheck;

/// Maps a planar base configuration `(x, y, heading)` to a grid cell
/// `(row, col)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapProjection {
    /// A robot-centric map captured at `origin`, spanning `range` meters
    /// over `cells` cells per side with the robot at the center.
    Local {
        /// Base configuration the map was captured from.
        origin: [f64; 3],
        /// Side length of the map in meters.
        range: f64,
        /// Side length of the map in cells.
        cells: usize,
    },
    /// A world-fixed map whose cell `(0, 0)` starts at `origin`.
    Global {
        /// World `(x, y)` of the map corner.
        origin: (f64, f64),
        /// Meters per cell.
        cell_size: f64,
        /// Row count when rows are stored bottom-up, `None` otherwise.
        flip_rows: Option<usize>,
    },
}

impl MapProjection {
    /// A robot-centric map captured at base configuration `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::InvalidConfig`] if `origin` is not a finite
    /// planar configuration, `range` is not positive or `cells` is zero.
    pub fn local(origin: &[f64], range: f64, cells: usize) -> Result<Self> {
        let &[x, y, theta] = origin else {
            return Err(PlanningError::DimensionMismatch {
                expected: 3,
                actual: origin.len(),
            });
        };
        if !(x.is_finite() && y.is_finite() && theta.is_finite()) {
            return Err(PlanningError::NonFiniteConfiguration);
        }
        if !(range.is_finite() && range > 0.0) || cells == 0 {
            return Err(PlanningError::invalid_config(format!(
                "local map needs a positive range and cell count, got {range} m over {cells} cells"
            )));
        }
        Ok(Self::Local {
            origin: [x, y, theta],
            range,
            cells,
        })
    }

    /// A world-fixed map with `cell_size` meters per cell.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::InvalidConfig`] unless `cell_size` is
    /// positive and `origin` is finite.
    pub fn global(origin: (f64, f64), cell_size: f64) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(PlanningError::invalid_config(format!(
                "cell size must be positive, got {cell_size}"
            )));
        }
        if !(origin.0.is_finite() && origin.1.is_finite()) {
            return Err(PlanningError::NonFiniteConfiguration);
        }
        Ok(Self::Global {
            origin,
            cell_size,
            flip_rows: None,
        })
    }

    /// Counts rows from the opposite edge of a `rows`-row map. Has no
    /// effect on local maps.
    #[must_use]
    pub const fn flipped_vertically(self, rows: usize) -> Self {
        match self {
            Self::Global {
                origin, cell_size, ..
            } => Self::Global {
                origin,
                cell_size,
                flip_rows: Some(rows),
            },
            local @ Self::Local { .. } => local,
        }
    }

    /// Meters covered by one cell.
    #[must_use]
    pub fn cell_size(&self) -> f64 {
        match *self {
            #[allow(clippy::cast_precision_loss)]
            Self::Local { range, cells, .. } => range / cells as f64,
            Self::Global { cell_size, .. } => cell_size,
        }
    }

    /// Cell under configuration `q`, or `None` for non-finite input.
    #[must_use]
    pub fn project(&self, q: &[f64]) -> Option<(i64, i64)> {
        let (row, col) = match *self {
            Self::Local {
                origin,
                range,
                cells,
            } => {
                let (dx, dy) = (q[0] - origin[0], q[1] - origin[1]);
                let (sin, cos) = origin[2].sin_cos();
                // Map rows run along the robot's right-hand side, columns
                // along its heading
                let across = sin.mul_add(dx, -cos * dy);
                let along = cos.mul_add(dx, sin * dy);
                #[allow(clippy::cast_precision_loss)]
                let (scale, center) = (cells as f64 / range, cells as f64 / 2.0);
                (across.mul_add(scale, center), along.mul_add(scale, center))
            }
            Self::Global {
                origin,
                cell_size,
                flip_rows,
            } => {
                let row = (q[1] - origin.1) / cell_size;
                let col = (q[0] - origin.0) / cell_size;
                #[allow(clippy::cast_precision_loss)]
                let row = flip_rows.map_or(row, |rows| rows as f64 - row);
                (row, col)
            }
        };
        to_cell(row).zip(to_cell(col))
    }
}

fn to_cell(value: f64) -> Option<i64> {
    // Out-of-range values saturate and fall outside any grid
    #[allow(clippy::cast_possible_truncation)]
    value.is_finite().then(|| value.floor() as i64)
}

/// Collision test of a disc-shaped base against an occupancy grid.
///
/// A configuration is free only if every cell under the footprint is free;
/// footprints that leave the grid are collisions.
///
/// # Example
///
/// ```
/// use cf_spatial::{CellState, FootprintMask, OccupancyGrid};
/// use motion_collision::{CollisionCheck, GridCollision, MapProjection};
///
/// let mut grid = OccupancyGrid::new(20, 20, CellState::Free).unwrap();
/// grid.set(10, 15, CellState::Obstacle).unwrap();
///
/// // 0.1 m cells, map corner at the world origin
/// let projection = MapProjection::global((0.0, 0.0), 0.1).unwrap();
/// let mut check = GridCollision::new(&grid, projection, FootprintMask::disc(1));
///
/// assert!(!check.in_collision(&[0.55, 1.05, 0.0]));
/// assert!(check.in_collision(&[1.55, 1.05, 0.0]));
/// assert!(check.in_collision(&[5.0, 5.0, 0.0]));
/// ```
#[derive(Debug, Clone)]
pub struct GridCollision<'g> {
    grid: &'g OccupancyGrid,
    projection: MapProjection,
    footprint: FootprintMask,
}

impl<'g> GridCollision<'g> {
    /// Checks `footprint` on `grid` at cells given by `projection`.
    #[must_use]
    pub const fn new(
        grid: &'g OccupancyGrid,
        projection: MapProjection,
        footprint: FootprintMask,
    ) -> Self {
        Self {
            grid,
            projection,
            footprint,
        }
    }

    /// Builds the footprint from a robot radius in meters.
    #[must_use]
    pub fn for_robot(
        grid: &'g OccupancyGrid,
        projection: MapProjection,
        robot_radius: f64,
    ) -> Self {
        let footprint = FootprintMask::for_robot(robot_radius, projection.cell_size());
        Self::new(grid, projection, footprint)
    }

    /// The projection in use.
    #[must_use]
    pub const fn projection(&self) -> &MapProjection {
        &self.projection
    }

    /// The robot footprint.
    #[must_use]
    pub const fn footprint(&self) -> &FootprintMask {
        &self.footprint
    }
}

impl CollisionCheck for GridCollision<'_> {
    fn in_collision(&mut self, q: &[f64]) -> bool {
        let Some((row, col)) = self.projection.project(q) else {
            return true;
        };
        let blocked = !self.grid.footprint_is_free(row, col, &self.footprint);
        trace!(row, col, blocked, "Grid footprint checked");
        blocked
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cf_spatial::CellState;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_local_projection_centers_robot() {
        let projection = MapProjection::local(&[2.0, -1.0, 0.3], 5.0, 100).unwrap();
        assert_eq!(projection.project(&[2.0, -1.0, 1.0]), Some((50, 50)));
    }

    #[test]
    fn test_local_projection_axes() {
        let projection = MapProjection::local(&[0.0, 0.0, 0.0], 10.0, 100).unwrap();
        // Heading +X: ahead moves along columns, the left side lowers rows
        assert_eq!(projection.project(&[1.0, 0.0, 0.0]), Some((50, 60)));
        assert_eq!(projection.project(&[0.0, 1.0, 0.0]), Some((40, 50)));

        let turned = MapProjection::local(&[0.0, 0.0, FRAC_PI_2], 10.0, 100).unwrap();
        assert_eq!(turned.project(&[0.05, 1.05, 0.0]), Some((50, 60)));
    }

    #[test]
    fn test_global_projection_and_flip() {
        let projection = MapProjection::global((-1.0, -1.0), 0.5).unwrap();
        assert_eq!(projection.project(&[0.25, 0.75, 0.0]), Some((3, 2)));
        let flipped = projection.flipped_vertically(10);
        assert_eq!(flipped.project(&[0.25, 0.75, 0.0]), Some((6, 2)));
    }

    #[test]
    fn test_invalid_projections_rejected() {
        assert!(MapProjection::local(&[0.0, 0.0], 1.0, 10).is_err());
        assert!(MapProjection::local(&[0.0, 0.0, 0.0], 0.0, 10).is_err());
        assert!(MapProjection::global((0.0, 0.0), -1.0).is_err());
    }

    #[test]
    fn test_non_finite_query_is_collision() {
        let grid = OccupancyGrid::new(10, 10, CellState::Free).unwrap();
        let projection = MapProjection::global((0.0, 0.0), 0.1).unwrap();
        let mut check = GridCollision::new(&grid, projection, FootprintMask::disc(0));
        assert!(check.in_collision(&[f64::NAN, 0.5, 0.0]));
        assert!(!check.in_collision(&[0.5, 0.5, 0.0]));
    }

    #[test]
    fn test_unknown_cells_block() {
        let mut grid = OccupancyGrid::new(10, 10, CellState::Free).unwrap();
        grid.set(5, 5, CellState::Unknown).unwrap();
        let projection = MapProjection::global((0.0, 0.0), 1.0).unwrap();
        let mut check = GridCollision::new(&grid, projection, FootprintMask::disc(1));
        assert!(check.in_collision(&[5.5, 4.5, 0.0]));
        assert!(!check.in_collision(&[2.5, 2.5, 0.0]));
    }

    #[test]
    fn test_footprint_from_robot_radius() {
        let grid = OccupancyGrid::new(10, 10, CellState::Free).unwrap();
        let projection = MapProjection::local(&[0.0, 0.0, 0.0], 1.0, 10).unwrap();
        let check = GridCollision::for_robot(&grid, projection, 0.25);
        assert_eq!(check.footprint().radius_cells(), 3);
    }
}
