//! Georeferenced raster grids.

use crate::{BoundingBox, Crs};
use serde::{Deserialize, Serialize};

/// A regular, north-up grid anchored at its upper-left corner.
///
/// Rows run north to south and columns west to east, so pixel `(row, col)`
/// covers `x_origin + col * cell_width .. x_origin + (col + 1) * cell_width`
/// and `y_origin - (row + 1) * cell_height .. y_origin - row * cell_height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterGrid {
    /// Coordinate reference system of `x_origin`/`y_origin` and the cell sizes
    pub crs: Crs,
    /// X coordinate of the upper-left corner
    pub x_origin: f64,
    /// Y coordinate of the upper-left corner
    pub y_origin: f64,
    /// Cell size along x (positive)
    pub cell_width: f64,
    /// Cell size along y (positive, rows go down)
    pub cell_height: f64,
    /// Number of columns
    pub width: usize,
    /// Number of rows
    pub height: usize,
}

impl RasterGrid {
    /// Create a grid from its upper-left corner and cell size.
    pub fn new(
        crs: Crs,
        x_origin: f64,
        y_origin: f64,
        cell_width: f64,
        cell_height: f64,
        width: usize,
        height: usize,
    ) -> Self {
        Self {
            crs,
            x_origin,
            y_origin,
            cell_width,
            cell_height,
            width,
            height,
        }
    }

    /// Create a grid covering `bbox` with the given number of columns and rows.
    pub fn from_bbox(crs: Crs, bbox: BoundingBox, width: usize, height: usize) -> Self {
        Self {
            crs,
            x_origin: bbox.min_x,
            y_origin: bbox.max_y,
            cell_width: bbox.width() / width.max(1) as f64,
            cell_height: bbox.height() / height.max(1) as f64,
            width,
            height,
        }
    }

    /// `(rows, cols)` of arrays laid out on this grid.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Check if grid is empty.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Outer extent of the grid.
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(
            self.x_origin,
            self.y_origin - self.height as f64 * self.cell_height,
            self.x_origin + self.width as f64 * self.cell_width,
            self.y_origin,
        )
    }

    /// Coordinates of the centre of pixel `(row, col)`.
    pub fn pixel_center(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.x_origin + (col as f64 + 0.5) * self.cell_width,
            self.y_origin - (row as f64 + 0.5) * self.cell_height,
        )
    }

    /// Fractional `(row, col)` position of a coordinate, measured from the
    /// upper-left corner in pixel units (pixel centres sit at `n + 0.5`).
    pub fn fractional_index(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (self.y_origin - y) / self.cell_height,
            (x - self.x_origin) / self.cell_width,
        )
    }

    /// Index of the pixel containing a coordinate, if inside the grid.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let (row_f, col_f) = self.fractional_index(x, y);
        if !row_f.is_finite() || !col_f.is_finite() || row_f < 0.0 || col_f < 0.0 {
            return None;
        }

        let row = row_f.floor() as usize;
        let col = col_f.floor() as usize;
        if row >= self.height || col >= self.width {
            return None;
        }

        Some((row, col))
    }

    /// Outer corners in ring order: upper-left, lower-left, lower-right, upper-right.
    pub fn corners(&self) -> [(f64, f64); 4] {
        let bbox = self.bbox();
        [
            (bbox.min_x, bbox.max_y),
            (bbox.min_x, bbox.min_y),
            (bbox.max_x, bbox.min_y),
            (bbox.max_x, bbox.max_y),
        ]
    }
}
