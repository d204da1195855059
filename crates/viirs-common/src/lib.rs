//! Common types shared across the VIIRS tiled granule crates.

pub mod bbox;
pub mod crs;
pub mod geometry;
pub mod grid;
pub mod time;

pub use bbox::BoundingBox;
pub use crs::{Crs, SINUSOIDAL_SPHERE_RADIUS};
pub use geometry::{GeoPoint, LinearRing, Polygon, Winding};
pub use grid::RasterGrid;
pub use time::{CalendarDay, TimeParseError, TimeRange};
