//! Tiled granule decoder.
//!
//! A [`TiledGranule`] holds only a path. Every operation opens the file,
//! reads what it needs and drops the handle before returning, so no state is
//! carried between calls.
//!
//! # Limitations
//!
//! Datasets are always materialized in full, even when a target grid covers
//! only part of the tile. Windowed reads are not supported.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use projection::{ModlandTiling, TileGridSource};
use tracing::{debug, info, instrument};
use viirs_common::{CalendarDay, RasterGrid};

use crate::calibration::{apply_stages, fill_mask, Calibration, VariableDescriptor};
use crate::config::GranuleLayout;
use crate::error::{GranuleError, GranuleResult};
use crate::filename::{self, GranuleIdentity};
use crate::hdf::{Dataset, GranuleOpener, HierarchicalFile};
use crate::native::NetcdfOpener;
use crate::raster::Raster;
use crate::resample::reproject;
use crate::tile::{build_tile_grid, resolve_tile_address};

/// A VIIRS tiled granule on disk.
#[derive(Debug, Clone)]
pub struct TiledGranule<O = NetcdfOpener, T = ModlandTiling> {
    path: PathBuf,
    opener: O,
    tiling: T,
    layout: GranuleLayout,
}

impl TiledGranule {
    /// Granule read through libnetcdf on the MODLAND sinusoidal tiling.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_backends(path, NetcdfOpener, ModlandTiling)
    }
}

impl<O, T> TiledGranule<O, T> {
    /// Granule read through custom file and tiling backends.
    pub fn with_backends<P: AsRef<Path>>(path: P, opener: O, tiling: T) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            opener,
            tiling,
            layout: GranuleLayout::default(),
        }
    }

    /// Replace the dataset layout.
    pub fn with_layout(mut self, layout: GranuleLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn layout(&self) -> &GranuleLayout {
        &self.layout
    }

    /// Path as given.
    pub fn filename(&self) -> &Path {
        &self.path
    }

    /// Path with `~` expanded, made absolute against the working directory.
    pub fn filename_absolute(&self) -> GranuleResult<PathBuf> {
        let raw = self.path.to_string_lossy();
        let expanded = PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref());
        if expanded.is_absolute() {
            Ok(expanded)
        } else {
            Ok(std::env::current_dir()?.join(expanded))
        }
    }

    /// File name without directories.
    pub fn filename_base(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File name without directories and without its last extension.
    pub fn filename_stem(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn product(&self) -> GranuleResult<String> {
        filename::parse_product(&self.path)
    }

    pub fn tile(&self) -> GranuleResult<String> {
        filename::parse_tile(&self.path)
    }

    /// `(h, v)` tile indices.
    pub fn hv(&self) -> GranuleResult<(u32, u32)> {
        let address = resolve_tile_address(&self.tile()?)?;
        Ok((address.h, address.v))
    }

    pub fn h(&self) -> GranuleResult<u32> {
        Ok(self.hv()?.0)
    }

    pub fn v(&self) -> GranuleResult<u32> {
        Ok(self.hv()?.1)
    }

    pub fn date(&self) -> GranuleResult<NaiveDate> {
        filename::parse_date(&self.path)
    }

    /// Acquisition date at midnight UTC.
    pub fn date_utc(&self) -> GranuleResult<DateTime<Utc>> {
        Ok(CalendarDay::from(self.date()?).earliest())
    }

    pub fn build(&self) -> GranuleResult<u32> {
        filename::parse_build(&self.path)
    }

    pub fn identity(&self) -> GranuleResult<GranuleIdentity> {
        filename::parse_identity(&self.path)
    }
}

impl<O: GranuleOpener, T: TileGridSource> TiledGranule<O, T> {
    fn open(&self) -> GranuleResult<O::File> {
        self.opener.open(&self.path)
    }

    /// Names of the grids in the granule, e.g. `VNP_Grid_1km_2D`.
    #[instrument(skip(self), fields(granule = %self.filename_base()))]
    pub fn grids(&self) -> GranuleResult<Vec<String>> {
        let file = self.open()?;
        file.list_groups(&self.layout.grids_root)
    }

    /// Names of the variables in `grid`.
    #[instrument(skip(self), fields(granule = %self.filename_base()))]
    pub fn variables(&self, grid: &str) -> GranuleResult<Vec<String>> {
        let file = self.open()?;
        file.list_datasets(&self.layout.fields_path(grid))
    }

    /// Raw digital numbers of `variable`, optionally reprojected to `target`.
    ///
    /// Without a target the raster sits on the tile's native grid, whose
    /// resolution follows from the dataset size.
    #[instrument(skip(self, target), fields(granule = %self.filename_base()))]
    pub fn read_raw(
        &self,
        variable: &str,
        grid: &str,
        target: Option<&RasterGrid>,
    ) -> GranuleResult<Raster<f64>> {
        let file = self.open()?;
        self.read_raw_from(&file, variable, grid, target)
    }

    /// Calibration attributes of `variable`.
    #[instrument(skip(self), fields(granule = %self.filename_base()))]
    pub fn attributes(&self, variable: &str, grid: &str) -> GranuleResult<VariableDescriptor> {
        let file = self.open()?;
        self.descriptor_from(&file, variable, grid)
    }

    /// Calibrated values of `variable`.
    ///
    /// Fill pixels and pixels outside the valid range become NaN, the rest
    /// are scaled and offset. Parameters in `calibration` take precedence
    /// over the dataset attributes.
    #[instrument(skip(self, calibration, target), fields(granule = %self.filename_base()))]
    pub fn read_layer(
        &self,
        variable: &str,
        grid: &str,
        calibration: &Calibration,
        target: Option<&RasterGrid>,
    ) -> GranuleResult<Raster<f64>> {
        let file = self.open()?;
        let mut raster = self.read_raw_from(&file, variable, grid, target)?;
        let descriptor = self.descriptor_from(&file, variable, grid)?;
        drop(file);

        let stages = calibration.stages(&descriptor);
        debug!(?stages, "Calibrating");
        apply_stages(raster.data_mut(), &stages);

        info!(
            valid = raster.valid_count(),
            total = raster.data().len(),
            "Decoded layer"
        );
        Ok(raster)
    }

    /// True where the raw value equals the fill value.
    ///
    /// `fill` overrides the dataset attribute. With neither, every pixel is
    /// reported as valid.
    #[instrument(skip(self, target), fields(granule = %self.filename_base()))]
    pub fn fill_mask(
        &self,
        variable: &str,
        grid: &str,
        fill: Option<f64>,
        target: Option<&RasterGrid>,
    ) -> GranuleResult<Raster<bool>> {
        let file = self.open()?;
        let raw = self.read_raw_from(&file, variable, grid, target)?;
        let fill = match fill {
            Some(fill) => Some(fill),
            None => self.descriptor_from(&file, variable, grid)?.fill_value,
        };
        drop(file);

        if fill.is_none() {
            debug!("No fill value known, mask is empty");
        }

        Ok(Raster::from_parts(fill_mask(raw.data(), fill), raw.grid().clone()))
    }

    fn read_raw_from(
        &self,
        file: &O::File,
        variable: &str,
        grid: &str,
        target: Option<&RasterGrid>,
    ) -> GranuleResult<Raster<f64>> {
        let path = self.layout.dataset_path(grid, variable);
        let dataset = file.read_dataset(&path)?;
        let pixel_dimension = square_dimension(&path, &dataset)?;

        let tile = self.tile()?;
        let native_grid = build_tile_grid(&self.tiling, &tile, pixel_dimension)?;
        debug!(%path, %tile, pixel_dimension, "Read dataset");

        let native = Raster::new(dataset.values, native_grid)?;
        Ok(match target {
            Some(target) => reproject(&native, target, f64::NAN),
            None => native,
        })
    }

    fn descriptor_from(
        &self,
        file: &O::File,
        variable: &str,
        grid: &str,
    ) -> GranuleResult<VariableDescriptor> {
        let path = self.layout.dataset_path(grid, variable);
        let attributes = file.read_attributes(&path)?;
        VariableDescriptor::from_attributes(grid, variable, &attributes, &self.layout)
    }
}

/// Side length of a square 2-D tile array.
fn square_dimension(path: &str, dataset: &Dataset) -> GranuleResult<usize> {
    let mismatch = |reason| GranuleError::ShapeMismatch {
        path: path.to_string(),
        shape: dataset.shape.clone(),
        reason,
    };

    match dataset.shape.as_slice() {
        [rows, cols] if rows != cols => Err(mismatch("tile arrays must be square")),
        [rows, _] if *rows == 0 => Err(mismatch("dataset is empty")),
        [rows, cols] if rows.checked_mul(*cols) != Some(dataset.values.len()) => {
            Err(mismatch("value count does not match shape"))
        }
        [rows, _] => Ok(*rows),
        _ => Err(mismatch("expected a 2-D array")),
    }
}

impl<O, T> fmt::Display for TiledGranule<O, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = serde_json::json!({ "filename": self.path.to_string_lossy() });
        let text = serde_json::to_string_pretty(&summary).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: &str = "VNP09GA.A2020123.h10v05.001.2020125082235.h5";

    #[test]
    fn test_path_accessors() {
        let granule = TiledGranule::new(format!("/data/{}", NAME));
        assert_eq!(granule.filename_base(), NAME);
        assert_eq!(granule.filename_stem(), "VNP09GA.A2020123.h10v05.001.2020125082235");
        assert_eq!(granule.filename_absolute().unwrap(), PathBuf::from(format!("/data/{}", NAME)));
    }

    #[test]
    fn test_relative_path_made_absolute() {
        let granule = TiledGranule::new(NAME);
        let absolute = granule.filename_absolute().unwrap();
        assert!(absolute.is_absolute());
        assert!(absolute.ends_with(NAME));
    }

    #[test]
    fn test_identity_accessors() {
        let granule = TiledGranule::new(NAME);
        assert_eq!(granule.product().unwrap(), "VNP09GA");
        assert_eq!(granule.tile().unwrap(), "h10v05");
        assert_eq!(granule.hv().unwrap(), (10, 5));
        assert_eq!(granule.h().unwrap(), 10);
        assert_eq!(granule.v().unwrap(), 5);
        assert_eq!(granule.build().unwrap(), 1);
        assert_eq!(granule.date_utc().unwrap().to_rfc3339(), "2020-05-02T00:00:00+00:00");
    }

    #[test]
    fn test_display_is_json() {
        let granule = TiledGranule::new(NAME);
        let parsed: serde_json::Value = serde_json::from_str(&granule.to_string()).unwrap();
        assert_eq!(parsed["filename"], NAME);
        assert!(granule.to_string().contains('\n'));
    }

    #[test]
    fn test_square_dimension() {
        let ok = Dataset { shape: vec![2, 2], values: vec![0.0; 4] };
        assert_eq!(square_dimension("p", &ok).unwrap(), 2);

        let rect = Dataset { shape: vec![2, 3], values: vec![0.0; 6] };
        assert!(matches!(square_dimension("p", &rect), Err(GranuleError::ShapeMismatch { .. })));

        let cube = Dataset { shape: vec![1, 2, 2], values: vec![0.0; 4] };
        assert!(matches!(square_dimension("p", &cube), Err(GranuleError::ShapeMismatch { .. })));

        let short = Dataset { shape: vec![2, 2], values: vec![0.0; 3] };
        assert!(square_dimension("p", &short).is_err());
    }

    #[test]
    fn test_square_dimension_overflowing_shape() {
        let huge = Dataset { shape: vec![usize::MAX, usize::MAX], values: vec![0.0; 4] };
        assert!(matches!(
            square_dimension("p", &huge),
            Err(GranuleError::ShapeMismatch { reason: "value count does not match shape", .. })
        ));
    }
}
