//! Two-dimensional occupancy grids and circular robot footprints.
//!
//! An [`OccupancyGrid`] stores one [`CellState`] per cell in row-major order.
//! Grids are usually built from a floating-point map image where `0.0` marks
//! obstacles, `0.5` unknown space and `1.0` free space. A [`FootprintMask`]
//! describes the cells a disc-shaped robot covers around its center cell.

use crate::error::SpatialError;

/// Classification of a single occupancy grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    /// The cell is known to contain an obstacle.
    Obstacle,
    /// Nothing is known about the cell.
    #[default]
    Unknown,
    /// The cell is known to be traversable.
    Free,
}

impl CellState {
    /// Map encoding of an obstacle cell.
    pub const OBSTACLE_VALUE: f32 = 0.0;
    /// Map encoding of an unknown cell.
    pub const UNKNOWN_VALUE: f32 = 0.5;
    /// Map encoding of a free cell.
    pub const FREE_VALUE: f32 = 1.0;

    /// Classifies a map value.
    ///
    /// Only values at or above [`Self::FREE_VALUE`] are free and only values
    /// at or below [`Self::OBSTACLE_VALUE`] are obstacles. Everything in
    /// between, including NaN, is unknown.
    ///
    /// # Example
    ///
    /// ```
    /// use cf_spatial::CellState;
    ///
    /// assert_eq!(CellState::from_value(1.0), CellState::Free);
    /// assert_eq!(CellState::from_value(0.5), CellState::Unknown);
    /// assert_eq!(CellState::from_value(0.99), CellState::Unknown);
    /// assert_eq!(CellState::from_value(0.0), CellState::Obstacle);
    /// ```
    #[must_use]
    pub fn from_value(value: f32) -> Self {
        if value >= Self::FREE_VALUE {
            Self::Free
        } else if value <= Self::OBSTACLE_VALUE {
            Self::Obstacle
        } else {
            Self::Unknown
        }
    }

    /// Returns the map encoding of this state.
    #[must_use]
    pub const fn value(self) -> f32 {
        match self {
            Self::Obstacle => Self::OBSTACLE_VALUE,
            Self::Unknown => Self::UNKNOWN_VALUE,
            Self::Free => Self::FREE_VALUE,
        }
    }

    /// Returns true for free cells.
    #[must_use]
    pub const fn is_free(self) -> bool {
        matches!(self, Self::Free)
    }
}

/// A dense row-major grid of [`CellState`] values.
///
/// # Example
///
/// ```
/// use cf_spatial::{CellState, FootprintMask, OccupancyGrid};
///
/// let mut grid = OccupancyGrid::new(20, 20, CellState::Free).unwrap();
/// grid.set(10, 10, CellState::Obstacle).unwrap();
///
/// let mask = FootprintMask::disc(2);
/// assert!(grid.footprint_is_free(4, 4, &mask));
/// assert!(!grid.footprint_is_free(9, 11, &mask));
/// // The footprint would leave the grid
/// assert!(!grid.footprint_is_free(1, 10, &mask));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OccupancyGrid {
    rows: usize,
    cols: usize,
    cells: Vec<CellState>,
}

impl OccupancyGrid {
    /// Creates a grid with every cell set to `fill`.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidDimensions`] if either dimension is zero.
    pub fn new(rows: usize, cols: usize, fill: CellState) -> Result<Self, SpatialError> {
        Self::check_dimensions(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![fill; rows * cols],
        })
    }

    /// Creates a grid from row-major map values.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidDimensions`] for a zero dimension and
    /// [`SpatialError::ValueCountMismatch`] if `values` does not hold exactly
    /// `rows * cols` entries.
    pub fn from_values(rows: usize, cols: usize, values: &[f32]) -> Result<Self, SpatialError> {
        Self::check_dimensions(rows, cols)?;
        let expected = rows * cols;
        if values.len() != expected {
            return Err(SpatialError::ValueCountMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            cells: values.iter().copied().map(CellState::from_value).collect(),
        })
    }

    /// Creates a grid by evaluating `f(row, col)` for every cell.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidDimensions`] if either dimension is zero.
    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> CellState,
    ) -> Result<Self, SpatialError> {
        Self::check_dimensions(rows, cols)?;
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(f(row, col));
            }
        }
        Ok(Self { rows, cols, cells })
    }

    const fn check_dimensions(rows: usize, cols: usize) -> Result<(), SpatialError> {
        if rows == 0 || cols == 0 {
            return Err(SpatialError::InvalidDimensions { rows, cols });
        }
        Ok(())
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Returns true if `(row, col)` lies inside the grid.
    #[must_use]
    pub fn in_bounds(&self, row: i64, col: i64) -> bool {
        self.index(row, col).is_some()
    }

    fn index(&self, row: i64, col: i64) -> Option<usize> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    /// Returns the state of a cell, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, row: i64, col: i64) -> Option<CellState> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// Sets the state of a cell.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::OutOfBounds`] if the cell is outside the grid.
    pub fn set(&mut self, row: i64, col: i64, state: CellState) -> Result<(), SpatialError> {
        let i = self
            .index(row, col)
            .ok_or(SpatialError::OutOfBounds { row, col })?;
        self.cells[i] = state;
        Ok(())
    }

    /// Paints every in-bounds cell of `mask` centered at `(row, col)`.
    ///
    /// Returns the number of cells written.
    pub fn paint(&mut self, row: i64, col: i64, mask: &FootprintMask, state: CellState) -> usize {
        let mut written = 0;
        for &(dr, dc) in mask.offsets() {
            if let Some(i) = self.index(row + dr, col + dc) {
                self.cells[i] = state;
                written += 1;
            }
        }
        written
    }

    /// Counts cells in the given state.
    #[must_use]
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    /// Returns true if a footprint centered at `(row, col)` covers only free
    /// cells.
    ///
    /// The whole `(2r+1)²` window of the mask must lie inside the grid;
    /// a footprint that touches the border region is treated as blocked.
    #[must_use]
    pub fn footprint_is_free(&self, row: i64, col: i64, mask: &FootprintMask) -> bool {
        let r = mask.radius_cells();
        if row < r || col < r {
            return false;
        }
        // Cast is safe: dimensions fit in memory, so they fit in i64
        #[allow(clippy::cast_possible_wrap)]
        let (rows, cols) = (self.rows as i64, self.cols as i64);
        if row > rows - r - 1 || col > cols - r - 1 {
            return false;
        }
        mask.offsets()
            .iter()
            .all(|&(dr, dc)| self.get(row + dr, col + dc).is_some_and(CellState::is_free))
    }
}

/// The cells covered by a disc-shaped robot, as offsets from its center cell.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FootprintMask {
    radius: i64,
    offsets: Vec<(i64, i64)>,
}

impl FootprintMask {
    /// Builds a filled disc of `radius` cells on a `(2r+1)²` window.
    ///
    /// # Example
    ///
    /// ```
    /// use cf_spatial::FootprintMask;
    ///
    /// assert_eq!(FootprintMask::disc(0).len(), 1);
    /// // 3x3 window minus the four corners
    /// assert_eq!(FootprintMask::disc(1).len(), 5);
    /// ```
    #[must_use]
    pub fn disc(radius: u32) -> Self {
        let r = i64::from(radius);
        let mut offsets = Vec::new();
        for dr in -r..=r {
            for dc in -r..=r {
                if dr * dr + dc * dc <= r * r {
                    offsets.push((dr, dc));
                }
            }
        }
        Self { radius: r, offsets }
    }

    /// Builds the mask for a robot of `robot_radius` meters on a grid with
    /// `cell_size` meters per cell, rounding the radius up to whole cells.
    #[must_use]
    pub fn for_robot(robot_radius: f64, cell_size: f64) -> Self {
        let cells = if cell_size > 0.0 && robot_radius > 0.0 {
            (robot_radius / cell_size).ceil()
        } else {
            0.0
        };
        // Truncation is intended: footprints are small whole-cell discs
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self::disc(cells.min(f64::from(u32::MAX)) as u32)
    }

    /// Radius of the disc in cells.
    #[must_use]
    pub const fn radius_cells(&self) -> i64 {
        self.radius
    }

    /// Offsets `(d_row, d_col)` of every covered cell.
    #[must_use]
    pub fn offsets(&self) -> &[(i64, i64)] {
        &self.offsets
    }

    /// Number of covered cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Always false: a disc covers at least its center cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
