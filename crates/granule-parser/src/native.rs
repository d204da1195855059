//! Native HDF5 access through the netcdf library.
//!
//! libnetcdf reads HDF5 files directly (it is built on libhdf5), including the
//! HDF-EOS5 group layout used by VIIRS tiled products. Group and variable
//! lookups accept `/`-separated paths.
//!
//! System requirements: libhdf5-dev libnetcdf-dev

use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing::debug;

use crate::error::{GranuleError, GranuleResult};
use crate::hdf::{AttributeMap, AttributeValue, Dataset, GranuleOpener, HierarchicalFile};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when probing for a group that
/// does not exist). This function disables that output by calling
/// H5Eset_auto2 with null handlers. It only needs to be called once per
/// process, but is safe to call multiple times.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Opens granules with libnetcdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetcdfOpener;

impl GranuleOpener for NetcdfOpener {
    type File = NetcdfGranule;

    fn open(&self, path: &Path) -> GranuleResult<NetcdfGranule> {
        silence_hdf5_errors();

        let file = netcdf::open(path).map_err(|e| GranuleError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        debug!(path = %path.display(), "Opened granule");

        Ok(NetcdfGranule {
            file,
            path: path.to_path_buf(),
        })
    }
}

/// An open granule. The underlying file is closed on drop.
pub struct NetcdfGranule {
    file: netcdf::File,
    path: PathBuf,
}

impl NetcdfGranule {
    fn group(&self, path: &str) -> GranuleResult<netcdf::Group<'_>> {
        let found = if path.is_empty() {
            self.file.root()
        } else {
            self.file.group(path).ok().flatten()
        };
        found.ok_or_else(|| GranuleError::GroupNotFound(path.to_string()))
    }

    fn variable(&self, path: &str) -> GranuleResult<netcdf::Variable<'_>> {
        self.file
            .variable(path)
            .ok_or_else(|| GranuleError::DatasetNotFound(path.to_string()))
    }
}

impl Drop for NetcdfGranule {
    fn drop(&mut self) {
        debug!(path = %self.path.display(), "Closed granule");
    }
}

impl HierarchicalFile for NetcdfGranule {
    fn list_groups(&self, path: &str) -> GranuleResult<Vec<String>> {
        Ok(self.group(path)?.groups().map(|g| g.name()).collect())
    }

    fn list_datasets(&self, path: &str) -> GranuleResult<Vec<String>> {
        Ok(self.group(path)?.variables().map(|v| v.name()).collect())
    }

    fn read_dataset(&self, path: &str) -> GranuleResult<Dataset> {
        let var = self.variable(path)?;
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

        // Read all extents; libnetcdf converts the stored type to f64
        let values: Vec<f64> = var
            .get_values(..)
            .map_err(|e| GranuleError::read(path, e.to_string()))?;

        Ok(Dataset { shape, values })
    }

    fn read_attributes(&self, path: &str) -> GranuleResult<AttributeMap> {
        let var = self.variable(path)?;
        let mut attributes = AttributeMap::new();

        for attr in var.attributes() {
            let name = attr.name().to_string();
            let value = attr
                .value()
                .map_err(|e| GranuleError::read(format!("{}@{}", path, name), e.to_string()))?;
            if let Some(value) = convert_attribute(value) {
                attributes.insert(name, value);
            }
        }

        Ok(attributes)
    }
}

/// Widen a netcdf attribute value. Returns `None` for kinds the decoder
/// never consumes.
#[allow(unreachable_patterns)]
fn convert_attribute(value: netcdf::AttributeValue) -> Option<AttributeValue> {
    use netcdf::AttributeValue as Nc;

    let converted = match value {
        Nc::Uchar(v) => AttributeValue::Int(v.into()),
        Nc::Schar(v) => AttributeValue::Int(v.into()),
        Nc::Ushort(v) => AttributeValue::Int(v.into()),
        Nc::Short(v) => AttributeValue::Int(v.into()),
        Nc::Uint(v) => AttributeValue::Int(v.into()),
        Nc::Int(v) => AttributeValue::Int(v.into()),
        Nc::Longlong(v) => AttributeValue::Int(v),
        Nc::Ulonglong(v) => wide_unsigned(v),
        Nc::Uchars(v) => AttributeValue::Ints(v.into_iter().map(i64::from).collect()),
        Nc::Schars(v) => AttributeValue::Ints(v.into_iter().map(i64::from).collect()),
        Nc::Ushorts(v) => AttributeValue::Ints(v.into_iter().map(i64::from).collect()),
        Nc::Shorts(v) => AttributeValue::Ints(v.into_iter().map(i64::from).collect()),
        Nc::Uints(v) => AttributeValue::Ints(v.into_iter().map(i64::from).collect()),
        Nc::Ints(v) => AttributeValue::Ints(v.into_iter().map(i64::from).collect()),
        Nc::Longlongs(v) => AttributeValue::Ints(v),
        Nc::Ulonglongs(v) => AttributeValue::Floats(v.into_iter().map(|x| x as f64).collect()),
        Nc::Float(v) => AttributeValue::Float(v.into()),
        Nc::Floats(v) => AttributeValue::Floats(v.into_iter().map(f64::from).collect()),
        Nc::Double(v) => AttributeValue::Float(v),
        Nc::Doubles(v) => AttributeValue::Floats(v),
        Nc::Str(v) => AttributeValue::Text(v),
        Nc::Strs(v) => AttributeValue::Texts(v),
        _ => return None,
    };

    Some(converted)
}

fn wide_unsigned(v: u64) -> AttributeValue {
    match i64::try_from(v) {
        Ok(v) => AttributeValue::Int(v),
        Err(_) => AttributeValue::Float(v as f64),
    }
}
