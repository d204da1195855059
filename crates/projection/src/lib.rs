//! Coordinate reference system transformations and tile grids.
//!
//! Implements the sinusoidal projection from scratch without external
//! dependencies, plus the MODLAND tiling that VIIRS land granules are cut on.

pub mod error;
pub mod modland;
pub mod sinusoidal;
pub mod transform;

pub use error::{ProjectionError, ProjectionResult};
pub use modland::{ModlandTiling, TileAddress, TileGridSource};
pub use sinusoidal::Sinusoidal;
pub use transform::{corner_polygon_latlon, from_geographic, to_geographic, transform_point};
