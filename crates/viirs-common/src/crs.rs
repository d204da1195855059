//! Coordinate Reference System types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Radius of the authalic sphere used by the MODIS/VIIRS sinusoidal grid (meters).
pub const SINUSOIDAL_SPHERE_RADIUS: f64 = 6_371_007.181;

/// Coordinate reference systems a [`RasterGrid`](crate::RasterGrid) can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Crs {
    /// WGS84 geographic, x = longitude, y = latitude (degrees).
    Geographic,
    /// MODIS/VIIRS sinusoidal on a sphere, central meridian 0 (meters).
    Sinusoidal,
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Crs::Geographic => "EPSG:4326",
            Crs::Sinusoidal => "SR-ORG:6842",
        };
        write!(f, "{}", code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_codes() {
        assert_eq!(Crs::Geographic.to_string(), "EPSG:4326");
        assert_eq!(Crs::Sinusoidal.to_string(), "SR-ORG:6842");
    }
}
