//! Error types for projection and tiling operations.

use thiserror::Error;

/// Result type for projection operations.
pub type ProjectionResult<T> = Result<T, ProjectionError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// Tile token does not follow the `h<digits>v<digits>` grammar
    #[error("invalid tile token '{0}': expected h<digits>v<digits>, e.g. h10v05")]
    InvalidTileToken(String),

    /// Tile indices fall outside the tiling scheme
    #[error("tile h{h}v{v} is outside the {scheme} tiling")]
    TileOutOfRange {
        h: u32,
        v: u32,
        scheme: &'static str,
    },

    /// A tile grid needs at least one pixel per side
    #[error("pixel dimension must be >= 1, got {0}")]
    InvalidPixelDimension(usize),

    /// Coordinate has no image under the projection
    #[error("coordinate ({x}, {y}) is outside the projection domain")]
    OutsideProjection { x: f64, y: f64 },
}
