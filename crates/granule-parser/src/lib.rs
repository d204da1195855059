//! Reader for VIIRS tiled granules (HDF-EOS5 on the MODLAND sinusoidal grid).
//!
//! Granules are addressed by filename (`PRODUCT.AYYYYDDD.hHHvVV.BBB...`) and
//! decoded into georeferenced rasters. File access goes through the
//! [`GranuleOpener`] / [`HierarchicalFile`] capability, backed by libnetcdf
//! by default ([`NetcdfOpener`]) or by an in-memory file for tests.
//!
//! ```no_run
//! use granule_parser::{Calibration, TiledGranule};
//!
//! let granule = TiledGranule::new("VNP09GA.A2020123.h10v05.001.2020125082235.h5");
//! let zenith = granule.read_layer("SensorZenith_1", "VNP_Grid_1km_2D", &Calibration::default(), None)?;
//! println!("{} valid pixels", zenith.valid_count());
//! # Ok::<(), granule_parser::GranuleError>(())
//! ```

pub mod calibration;
pub mod config;
pub mod error;
pub mod filename;
pub mod granule;
pub mod hdf;
pub mod memory;
pub mod native;
pub mod raster;
pub mod resample;
pub mod tile;

pub use calibration::{Calibration, Stage, VariableDescriptor};
pub use config::GranuleLayout;
pub use error::{GranuleError, GranuleResult};
pub use filename::{
    format_filename, parse_build, parse_date, parse_identity, parse_product, parse_tile,
    GranuleIdentity,
};
pub use granule::TiledGranule;
pub use hdf::{AttributeMap, AttributeValue, Dataset, GranuleOpener, HierarchicalFile};
pub use memory::{InMemoryGranule, InMemoryOpener};
pub use native::{silence_hdf5_errors, NetcdfOpener};
pub use raster::Raster;
pub use tile::{build_tile_grid, resolve_tile_address};
