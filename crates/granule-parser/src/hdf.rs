//! Hierarchical file capability.
//!
//! Granules are HDF5 files with an HDF-EOS5 group layout. The decoder only
//! needs four operations on them, expressed by [`HierarchicalFile`]. A file is
//! closed when its handle is dropped, so every decode call releases the file
//! on all exit paths.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::GranuleResult;

/// Value of a dataset attribute, widened to 64-bit types.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Int(i64),
    Ints(Vec<i64>),
    Float(f64),
    Floats(Vec<f64>),
    Text(String),
    Texts(Vec<String>),
}

impl AttributeValue {
    /// Single numeric value. One-element arrays count as scalars, since
    /// HDF5 writers commonly store fill values that way.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Ints(v) if v.len() == 1 => Some(v[0] as f64),
            Self::Floats(v) if v.len() == 1 => Some(v[0]),
            _ => None,
        }
    }

    /// Exactly two numeric values, e.g. a `valid_range`.
    pub fn as_pair(&self) -> Option<(f64, f64)> {
        match self {
            Self::Ints(v) if v.len() == 2 => Some((v[0] as f64, v[1] as f64)),
            Self::Floats(v) if v.len() == 2 => Some((v[0], v[1])),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "integer {}", v),
            Self::Ints(v) => write!(f, "{} integers {:?}", v.len(), v),
            Self::Float(v) => write!(f, "float {}", v),
            Self::Floats(v) => write!(f, "{} floats {:?}", v.len(), v),
            Self::Text(v) => write!(f, "text {:?}", v),
            Self::Texts(v) => write!(f, "{} strings {:?}", v.len(), v),
        }
    }
}

/// Attributes of one dataset, keyed by exact (case-sensitive) name.
pub type AttributeMap = BTreeMap<String, AttributeValue>;

/// A fully materialized dataset in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub shape: Vec<usize>,
    pub values: Vec<f64>,
}

/// Read-only access to an open hierarchical file.
///
/// Paths are `/`-separated group names relative to the root, e.g.
/// `HDFEOS/GRIDS/VNP_Grid_1km_2D/Data Fields/SensorZenith_1`.
pub trait HierarchicalFile {
    /// Names of the sub-groups of the group at `path`.
    fn list_groups(&self, path: &str) -> GranuleResult<Vec<String>>;

    /// Names of the datasets directly inside the group at `path`.
    fn list_datasets(&self, path: &str) -> GranuleResult<Vec<String>>;

    /// Read the full dataset at `path`.
    fn read_dataset(&self, path: &str) -> GranuleResult<Dataset>;

    /// Read all attributes attached to the dataset at `path`.
    fn read_attributes(&self, path: &str) -> GranuleResult<AttributeMap>;
}

/// Opens granule files read-only.
pub trait GranuleOpener {
    type File: HierarchicalFile;

    fn open(&self, path: &Path) -> GranuleResult<Self::File>;
}

/// Join path segments with `/`, skipping empty segments and stray slashes.
pub fn join_path(segments: &[&str]) -> String {
    segments
        .iter()
        .flat_map(|s| s.split('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path() {
        assert_eq!(
            join_path(&["HDFEOS/GRIDS/", "VNP_Grid_1km_2D", "Data Fields", "num_observations_1km"]),
            "HDFEOS/GRIDS/VNP_Grid_1km_2D/Data Fields/num_observations_1km"
        );
        assert_eq!(join_path(&["/", "", "a"]), "a");
    }

    #[test]
    fn test_scalar_coercion() {
        assert_eq!(AttributeValue::Int(-28672).as_scalar(), Some(-28672.0));
        assert_eq!(AttributeValue::Floats(vec![0.0001]).as_scalar(), Some(0.0001));
        assert_eq!(AttributeValue::Ints(vec![1, 2]).as_scalar(), None);
        assert_eq!(AttributeValue::Text("1".into()).as_scalar(), None);
    }

    #[test]
    fn test_pair_coercion() {
        assert_eq!(AttributeValue::Ints(vec![-100, 16000]).as_pair(), Some((-100.0, 16000.0)));
        assert_eq!(AttributeValue::Int(3).as_pair(), None);
        assert_eq!(AttributeValue::Floats(vec![0.0, 1.0, 2.0]).as_pair(), None);
    }
}
