//! Generators for synthetic granule content.
//!
//! These create predictable DN patterns and conforming filenames so decode
//! tests can check exact values.

/// Creates a square DN tile with predictable values.
///
/// Each cell value is `row * 1000 + col`, so a decoded pixel can be traced
/// back to its position.
///
/// # Example
///
/// ```
/// use test_utils::create_dn_tile;
///
/// let tile = create_dn_tile(4);
/// assert_eq!(tile.len(), 16);
/// assert_eq!(tile[1], 1.0);    // row 0, col 1
/// assert_eq!(tile[4], 1000.0); // row 1, col 0
/// ```
pub fn create_dn_tile(dimension: usize) -> Vec<f64> {
    let mut data = Vec::with_capacity(dimension * dimension);
    for row in 0..dimension {
        for col in 0..dimension {
            data.push((row * 1000 + col) as f64);
        }
    }
    data
}

/// Creates a reflectance-like DN tile with fill values at given positions.
///
/// Valid pixels ramp from 0 to 10000 across the tile, the range VIIRS
/// surface reflectance products store before a 0.0001 scale factor.
///
/// # Arguments
///
/// * `dimension` - Side length in pixels
/// * `fill` - DN written at each fill position
/// * `fill_positions` - List of (row, col) positions that hold `fill`
pub fn create_reflectance_tile(
    dimension: usize,
    fill: f64,
    fill_positions: &[(usize, usize)],
) -> Vec<f64> {
    let cells = (dimension * dimension).max(1);
    let mut data: Vec<f64> = (0..dimension * dimension)
        .map(|i| (i * 10000 / cells) as f64)
        .collect();
    for &(row, col) in fill_positions {
        if row < dimension && col < dimension {
            data[row * dimension + col] = fill;
        }
    }
    data
}

/// Builds a conforming granule filename.
///
/// # Example
///
/// ```
/// use test_utils::viirs_filename;
///
/// assert_eq!(
///     viirs_filename("VNP09GA", 2020, 123, 10, 5, 1),
///     "VNP09GA.A2020123.h10v05.001.h5"
/// );
/// ```
pub fn viirs_filename(product: &str, year: i32, day_of_year: u32, h: u32, v: u32, build: u32) -> String {
    format!(
        "{}.A{:04}{:03}.h{:02}v{:02}.{:03}.h5",
        product, year, day_of_year, h, v, build
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dn_tile_pattern() {
        let tile = create_dn_tile(3);
        assert_eq!(tile, vec![0.0, 1.0, 2.0, 1000.0, 1001.0, 1002.0, 2000.0, 2001.0, 2002.0]);
    }

    #[test]
    fn test_reflectance_tile_fill_positions() {
        let tile = create_reflectance_tile(4, -28672.0, &[(0, 0), (3, 3), (9, 9)]);
        assert_eq!(tile.len(), 16);
        assert_eq!(tile[0], -28672.0);
        assert_eq!(tile[15], -28672.0);
        assert!(tile[1..15].iter().all(|v| (0.0..=10000.0).contains(v)));
    }

    #[test]
    fn test_viirs_filename_pads_fields() {
        assert_eq!(viirs_filename("VNP13A1", 2021, 1, 8, 0, 2), "VNP13A1.A2021001.h08v00.002.h5");
    }
}
