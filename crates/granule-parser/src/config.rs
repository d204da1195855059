//! Layout configuration for the granule decoder.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GranuleError, GranuleResult};
use crate::hdf::join_path;

/// Where datasets live inside a granule and which attributes calibrate them.
///
/// Dataset paths are `{grids_root}/{grid}/{fields_group}/{variable}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GranuleLayout {
    /// Group holding one sub-group per grid.
    pub grids_root: String,

    /// Group inside each grid that holds the datasets.
    pub fields_group: String,

    /// Matched case-sensitively. Tiled VIIRS products spell it `_Fillvalue`.
    pub fill_value_attribute: String,
    pub valid_range_attribute: String,
    pub scale_factor_attribute: String,
    pub add_offset_attribute: String,
}

impl Default for GranuleLayout {
    fn default() -> Self {
        Self {
            grids_root: "HDFEOS/GRIDS".to_string(),
            fields_group: "Data Fields".to_string(),
            fill_value_attribute: "_Fillvalue".to_string(),
            valid_range_attribute: "valid_range".to_string(),
            scale_factor_attribute: "scale_factor".to_string(),
            add_offset_attribute: "add_offset".to_string(),
        }
    }
}

impl GranuleLayout {
    /// Parse a layout from YAML. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> GranuleResult<Self> {
        let layout: Self = serde_yaml::from_str(yaml)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Load a layout from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> GranuleResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> GranuleResult<()> {
        let required = [
            ("grids_root", &self.grids_root),
            ("fields_group", &self.fields_group),
            ("fill_value_attribute", &self.fill_value_attribute),
            ("valid_range_attribute", &self.valid_range_attribute),
            ("scale_factor_attribute", &self.scale_factor_attribute),
            ("add_offset_attribute", &self.add_offset_attribute),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(GranuleError::Config(format!("{} must not be empty", key)));
            }
        }
        Ok(())
    }

    /// Group holding the datasets of `grid`.
    pub fn fields_path(&self, grid: &str) -> String {
        join_path(&[&self.grids_root, grid, &self.fields_group])
    }

    /// Full path of `variable` in `grid`.
    pub fn dataset_path(&self, grid: &str, variable: &str) -> String {
        join_path(&[&self.grids_root, grid, &self.fields_group, variable])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let layout = GranuleLayout::default();
        assert_eq!(
            layout.dataset_path("VNP_Grid_1km_2D", "SensorZenith_1"),
            "HDFEOS/GRIDS/VNP_Grid_1km_2D/Data Fields/SensorZenith_1"
        );
        assert_eq!(
            layout.fields_path("VNP_Grid_500m_2D"),
            "HDFEOS/GRIDS/VNP_Grid_500m_2D/Data Fields"
        );
        assert_eq!(layout.fill_value_attribute, "_Fillvalue");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let layout = GranuleLayout::from_yaml_str("fill_value_attribute: _FillValue\n").unwrap();
        assert_eq!(layout.fill_value_attribute, "_FillValue");
        assert_eq!(layout.grids_root, "HDFEOS/GRIDS");
    }

    #[test]
    fn test_validate_rejects_empty() {
        let err = GranuleLayout::from_yaml_str("grids_root: ''\n").unwrap_err();
        assert!(matches!(err, GranuleError::Config(msg) if msg.contains("grids_root")));
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            GranuleLayout::from_yaml_str("grids_root: [unclosed"),
            Err(GranuleError::Config(_))
        ));
    }
}
