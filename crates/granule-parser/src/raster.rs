//! Georeferenced raster values.

use viirs_common::RasterGrid;

use crate::error::{GranuleError, GranuleResult};

/// Row-major values plus the grid they are georeferenced to.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster<T> {
    data: Vec<T>,
    grid: RasterGrid,
}

impl<T> Raster<T> {
    /// Wrap `data`, which must hold exactly one value per grid cell.
    pub fn new(data: Vec<T>, grid: RasterGrid) -> GranuleResult<Self> {
        if data.len() != grid.len() {
            return Err(GranuleError::ShapeMismatch {
                path: "raster".to_string(),
                shape: vec![data.len()],
                reason: "value count does not match grid size",
            });
        }
        Ok(Self { data, grid })
    }

    pub fn grid(&self) -> &RasterGrid {
        &self.grid
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        self.grid.shape()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        let (rows, cols) = self.shape();
        if row >= rows || col >= cols {
            return None;
        }
        self.data.get(row * cols + col)
    }

    /// New raster on the same grid with every value mapped.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Raster<U> {
        Raster {
            data: self.data.iter().map(f).collect(),
            grid: self.grid.clone(),
        }
    }

    /// Caller guarantees `data.len() == grid.len()`.
    pub(crate) fn from_parts(data: Vec<T>, grid: RasterGrid) -> Self {
        debug_assert_eq!(data.len(), grid.len());
        Self { data, grid }
    }

    pub(crate) fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl Raster<f64> {
    /// Number of values that are not NaN.
    pub fn valid_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }
}
