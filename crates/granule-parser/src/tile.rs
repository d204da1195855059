//! Tile address resolution.

use projection::{ProjectionError, TileAddress, TileGridSource};
use viirs_common::RasterGrid;

use crate::error::{GranuleError, GranuleResult};

/// Parse a tile token such as `h10v05` into its horizontal and vertical indices.
pub fn resolve_tile_address(tile: &str) -> GranuleResult<TileAddress> {
    tile.parse::<TileAddress>().map_err(|e| match e {
        ProjectionError::InvalidTileToken(token) => {
            GranuleError::parse("tile", token, "expected h<digits>v<digits>")
        }
        other => GranuleError::Tiling(other),
    })
}

/// Georeferenced grid for `tile` at the resolution implied by `pixel_dimension`.
///
/// The pixel dimension comes from the dataset being decoded: one granule can
/// hold grids at several resolutions.
pub fn build_tile_grid<T: TileGridSource + ?Sized>(
    tiling: &T,
    tile: &str,
    pixel_dimension: usize,
) -> GranuleResult<RasterGrid> {
    resolve_tile_address(tile)?;
    Ok(tiling.tile_grid(tile, pixel_dimension)?)
}
