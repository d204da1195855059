//! MODLAND sinusoidal tile grid.
//!
//! The global sinusoidal map is cut into 36 columns (`h`) by 18 rows (`v`) of
//! square tiles, counted from the upper-left corner. Products store each
//! variable as a square array covering one tile; the array size sets the
//! resolution (1200 px ≈ 926 m, 2400 px ≈ 463 m, 3600 px ≈ 309 m).

use std::fmt;
use std::str::FromStr;

use tracing::debug;
use viirs_common::{Crs, RasterGrid};

use crate::error::{ProjectionError, ProjectionResult};

/// Upper-left x of the global tile grid (meters)
pub const GLOBAL_X_MIN: f64 = -20_015_109.354;
/// Upper-left y of the global tile grid (meters)
pub const GLOBAL_Y_MAX: f64 = 10_007_554.677;
/// Side length of one tile (meters)
pub const TILE_SIZE_METERS: f64 = 1_111_950.519_666_666_6;
/// Number of tile columns
pub const TILE_COLUMNS: u32 = 36;
/// Number of tile rows
pub const TILE_ROWS: u32 = 18;

/// Horizontal/vertical position of a tile in the global grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileAddress {
    pub h: u32,
    pub v: u32,
}

impl TileAddress {
    pub fn new(h: u32, v: u32) -> Self {
        Self { h, v }
    }

    /// Canonical token, e.g. `h08v05`.
    pub fn token(&self) -> String {
        self.to_string()
    }
}

impl FromStr for TileAddress {
    type Err = ProjectionError;

    /// Parse a `h<digits>v<digits>` token. Letters are lowercase and nothing
    /// may precede or follow the two numbers.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || ProjectionError::InvalidTileToken(token.to_string());

        let rest = token.strip_prefix('h').ok_or_else(invalid)?;
        let (h_digits, v_digits) = rest.split_once('v').ok_or_else(invalid)?;

        let parse_index = |digits: &str| -> ProjectionResult<u32> {
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            digits.parse::<u32>().map_err(|_| invalid())
        };

        Ok(Self {
            h: parse_index(h_digits)?,
            v: parse_index(v_digits)?,
        })
    }
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{:02}v{:02}", self.h, self.v)
    }
}

/// Capability that turns tile tokens into georeferenced grids.
pub trait TileGridSource {
    /// Parse a tile token into its indices.
    fn parse_tile(&self, tile: &str) -> ProjectionResult<TileAddress> {
        tile.parse()
    }

    /// Grid covering `tile` with `pixel_dimension` pixels per side.
    fn tile_grid(&self, tile: &str, pixel_dimension: usize) -> ProjectionResult<RasterGrid>;
}

/// The MODLAND sinusoidal tiling used by MODIS and VIIRS land products.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModlandTiling;

impl ModlandTiling {
    /// Grid for an already-parsed tile address.
    pub fn grid_for(
        &self,
        address: TileAddress,
        pixel_dimension: usize,
    ) -> ProjectionResult<RasterGrid> {
        if address.h >= TILE_COLUMNS || address.v >= TILE_ROWS {
            return Err(ProjectionError::TileOutOfRange {
                h: address.h,
                v: address.v,
                scheme: "MODLAND sinusoidal",
            });
        }
        if pixel_dimension == 0 {
            return Err(ProjectionError::InvalidPixelDimension(pixel_dimension));
        }

        let cell_size = TILE_SIZE_METERS / pixel_dimension as f64;
        let grid = RasterGrid::new(
            Crs::Sinusoidal,
            GLOBAL_X_MIN + address.h as f64 * TILE_SIZE_METERS,
            GLOBAL_Y_MAX - address.v as f64 * TILE_SIZE_METERS,
            cell_size,
            cell_size,
            pixel_dimension,
            pixel_dimension,
        );

        debug!(
            tile = %address,
            pixel_dimension = pixel_dimension,
            cell_size = cell_size,
            "Built MODLAND tile grid"
        );

        Ok(grid)
    }
}

impl TileGridSource for ModlandTiling {
    fn tile_grid(&self, tile: &str, pixel_dimension: usize) -> ProjectionResult<RasterGrid> {
        let address = self.parse_tile(tile)?;
        self.grid_for(address, pixel_dimension)
    }
}
