//! Error types for granule parsing and decoding.

use projection::ProjectionError;
use thiserror::Error;

/// Result type for granule operations.
pub type GranuleResult<T> = Result<T, GranuleError>;

/// Errors raised while parsing granule names or decoding granule content.
#[derive(Error, Debug)]
pub enum GranuleError {
    /// A filename field or tile token does not follow the expected grammar
    #[error("cannot parse {field} from '{token}': {reason}")]
    Parse {
        field: &'static str,
        token: String,
        reason: String,
    },

    /// The granule file could not be opened
    #[error("failed to open granule {path}: {reason}")]
    Open { path: String, reason: String },

    /// Requested group is absent from the file
    #[error("group not found: {0}")]
    GroupNotFound(String),

    /// Requested dataset is absent from the file
    #[error("dataset not found: {0}")]
    DatasetNotFound(String),

    /// Attribute exists but does not hold the expected kind of value
    #[error("attribute '{name}' has unexpected type: expected {expected}, found {found}")]
    AttributeTypeMismatch {
        name: String,
        expected: &'static str,
        found: String,
    },

    /// Dataset values could not be read
    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    /// Dataset shape is not usable as a square tile array
    #[error("dataset {path} has shape {shape:?}: {reason}")]
    ShapeMismatch {
        path: String,
        shape: Vec<usize>,
        reason: &'static str,
    },

    /// Tile grid construction failed
    #[error("tile grid error: {0}")]
    Tiling(#[from] ProjectionError),

    /// Invalid layout configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GranuleError {
    /// Create a Parse error.
    pub fn parse(field: &'static str, token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            field,
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Create a Read error.
    pub fn read(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Read {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an AttributeTypeMismatch error.
    pub fn attribute_mismatch(
        name: impl Into<String>,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        Self::AttributeTypeMismatch {
            name: name.into(),
            expected,
            found: found.into(),
        }
    }

    /// True for the parse failures of filenames and tile tokens.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Parse { .. })
            || matches!(self, Self::Tiling(ProjectionError::InvalidTileToken(_)))
    }
}

impl From<serde_yaml::Error> for GranuleError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}
