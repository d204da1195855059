//! Point transforms between the supported coordinate reference systems.

use viirs_common::{Crs, LinearRing, Polygon, RasterGrid};

use crate::error::{ProjectionError, ProjectionResult};
use crate::sinusoidal::Sinusoidal;

/// Convert a coordinate in `crs` to geographic `(lon, lat)` degrees.
pub fn to_geographic(crs: Crs, x: f64, y: f64) -> Option<(f64, f64)> {
    match crs {
        Crs::Geographic => {
            if x.is_finite() && y.is_finite() && y.abs() <= 90.0 {
                Some((x, y))
            } else {
                None
            }
        }
        Crs::Sinusoidal => Sinusoidal::modis().inverse(x, y),
    }
}

/// Convert geographic `(lon, lat)` degrees to a coordinate in `crs`.
pub fn from_geographic(crs: Crs, lon: f64, lat: f64) -> Option<(f64, f64)> {
    match crs {
        Crs::Geographic => {
            if lon.is_finite() && lat.is_finite() && lat.abs() <= 90.0 {
                Some((lon, lat))
            } else {
                None
            }
        }
        Crs::Sinusoidal => Sinusoidal::modis().forward(lon, lat),
    }
}

/// Transform a coordinate between two reference systems.
pub fn transform_point(from: Crs, to: Crs, x: f64, y: f64) -> Option<(f64, f64)> {
    if from == to {
        return Some((x, y));
    }
    let (lon, lat) = to_geographic(from, x, y)?;
    from_geographic(to, lon, lat)
}

/// Outline of a grid's four outer corners as a geographic polygon.
///
/// Corners of sinusoidal tiles that reach past the projected globe are pulled
/// onto the ±180° meridian. The ring is returned in the grid's natural corner
/// order, which is counter-clockwise for north-up grids.
pub fn corner_polygon_latlon(grid: &RasterGrid) -> ProjectionResult<Polygon> {
    let mut coords = Vec::with_capacity(4);
    for (x, y) in grid.corners() {
        let lonlat = match grid.crs {
            Crs::Geographic => to_geographic(Crs::Geographic, x, y),
            Crs::Sinusoidal => Sinusoidal::modis().inverse_clamped(x, y),
        };
        coords.push(lonlat.ok_or(ProjectionError::OutsideProjection { x, y })?);
    }

    Ok(Polygon::new(LinearRing::new(coords), Vec::new()))
}
