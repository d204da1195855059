//! Sinusoidal (Sanson-Flamsteed) projection on a sphere.
//!
//! The MODIS and VIIRS land tile grids use this projection with the central
//! meridian at 0° and a sphere of radius 6 371 007.181 m:
//!
//! - x = R · λ · cos φ
//! - y = R · φ
//!
//! It is equal-area, so pixel areas stay constant across the globe while
//! shapes shear towards the edges of the map.

use viirs_common::SINUSOIDAL_SPHERE_RADIUS;

/// Sinusoidal projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sinusoidal {
    /// Sphere radius (meters)
    pub radius: f64,
    /// Central meridian in degrees
    pub central_meridian: f64,
}

impl Default for Sinusoidal {
    fn default() -> Self {
        Self::modis()
    }
}

impl Sinusoidal {
    /// Projection used by the MODIS/VIIRS land products (SR-ORG:6842).
    pub fn modis() -> Self {
        Self {
            radius: SINUSOIDAL_SPHERE_RADIUS,
            central_meridian: 0.0,
        }
    }

    /// Project geographic coordinates (degrees) to map coordinates (meters).
    ///
    /// Returns `None` for latitudes beyond the poles or non-finite input.
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> Option<(f64, f64)> {
        if !lon_deg.is_finite() || !lat_deg.is_finite() || lat_deg.abs() > 90.0 {
            return None;
        }

        let lat = lat_deg.to_radians();
        let dlon = wrap_longitude(lon_deg - self.central_meridian).to_radians();

        Some((self.radius * dlon * lat.cos(), self.radius * lat))
    }

    /// Unproject map coordinates (meters) to geographic coordinates (degrees).
    ///
    /// Returns `None` when the point lies outside the projected globe, i.e.
    /// beyond the poles or east/west of the ±180° meridian at its latitude.
    pub fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (lon, lat) = self.inverse_unchecked(x, y)?;
        if (lon - self.central_meridian).abs() > 180.0 + 1e-9 {
            return None;
        }
        Some((lon, lat))
    }

    /// Like [`Sinusoidal::inverse`], but longitudes beyond the map edge are
    /// clamped to the ±180° meridian instead of rejected.
    ///
    /// Useful for outlining tiles in the corners of the global grid, whose
    /// rectangular extent reaches past the projected globe.
    pub fn inverse_clamped(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (lon, lat) = self.inverse_unchecked(x, y)?;
        let lon = lon.clamp(self.central_meridian - 180.0, self.central_meridian + 180.0);
        Some((lon, lat))
    }

    fn inverse_unchecked(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }

        let lat = y / self.radius;
        if lat.abs() > std::f64::consts::FRAC_PI_2 + 1e-12 {
            return None;
        }
        let lat = lat.clamp(-std::f64::consts::FRAC_PI_2, std::f64::consts::FRAC_PI_2);

        let cos_lat = lat.cos();
        let lon = if cos_lat.abs() < 1e-12 {
            // Every longitude meets at the pole
            self.central_meridian
        } else {
            self.central_meridian + (x / (self.radius * cos_lat)).to_degrees()
        };

        Some((lon, lat.to_degrees()))
    }
}

/// Wrap a longitude difference into [-180, 180].
fn wrap_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}
