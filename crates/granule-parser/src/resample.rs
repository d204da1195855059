//! Nearest-neighbour reprojection between raster grids.

use projection::transform_point;
use tracing::debug;
use viirs_common::RasterGrid;

use crate::raster::Raster;

/// For each target cell (row-major), the index of the source cell whose
/// footprint contains the target cell centre, or `None` when the centre
/// falls outside the source grid or the projection.
pub fn nearest_indices(source: &RasterGrid, target: &RasterGrid) -> Vec<Option<usize>> {
    let mut indices = Vec::with_capacity(target.len());

    for row in 0..target.height {
        for col in 0..target.width {
            let (x, y) = target.pixel_center(row, col);
            let index = transform_point(target.crs, source.crs, x, y)
                .and_then(|(sx, sy)| source.cell_at(sx, sy))
                .map(|(r, c)| r * source.width + c);
            indices.push(index);
        }
    }

    indices
}

/// Resample `source` onto `target`. Cells with no source pixel get `outside`.
pub fn reproject<T: Clone>(source: &Raster<T>, target: &RasterGrid, outside: T) -> Raster<T> {
    let indices = nearest_indices(source.grid(), target);
    let values = source.data();

    let data: Vec<T> = indices
        .iter()
        .map(|index| match index.and_then(|i| values.get(i)) {
            Some(value) => value.clone(),
            None => outside.clone(),
        })
        .collect();

    debug!(
        source_crs = %source.grid().crs,
        target_crs = %target.crs,
        hits = indices.iter().filter(|i| i.is_some()).count(),
        cells = data.len(),
        "Reprojected raster"
    );

    // One value per target cell by construction
    Raster::from_parts(data, target.clone())
}
