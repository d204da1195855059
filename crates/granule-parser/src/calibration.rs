//! Conversion of raw digital numbers to physical values.
//!
//! Stages run in a fixed order: fill masking, low clamp, high clamp, scale,
//! offset. Valid-range bounds are in raw DN units, so clamping happens before
//! rescaling. Each stage runs only when its parameter is known, either from an
//! explicit [`Calibration`] override or from the dataset attributes.

use serde::{Deserialize, Serialize};

use crate::config::GranuleLayout;
use crate::error::{GranuleError, GranuleResult};
use crate::hdf::AttributeMap;

/// Calibration parameters discovered on one dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    pub grid: String,
    pub variable: String,
    pub fill_value: Option<f64>,
    pub scale_factor: Option<f64>,
    pub add_offset: Option<f64>,
    pub valid_min: Option<f64>,
    pub valid_max: Option<f64>,
}

impl VariableDescriptor {
    /// Pick the calibration attributes out of a dataset's attribute map.
    ///
    /// Absent attributes stay `None`. An attribute that is present but not
    /// numeric (or a `valid_range` that is not a pair) is an error.
    pub fn from_attributes(
        grid: &str,
        variable: &str,
        attributes: &AttributeMap,
        layout: &GranuleLayout,
    ) -> GranuleResult<Self> {
        let scalar = |name: &str| -> GranuleResult<Option<f64>> {
            match attributes.get(name) {
                None => Ok(None),
                Some(value) => value
                    .as_scalar()
                    .map(Some)
                    .ok_or_else(|| GranuleError::attribute_mismatch(name, "number", value.to_string())),
            }
        };

        let range_name = layout.valid_range_attribute.as_str();
        let (valid_min, valid_max) = match attributes.get(range_name) {
            None => (None, None),
            Some(value) => {
                let (lo, hi) = value.as_pair().ok_or_else(|| {
                    GranuleError::attribute_mismatch(range_name, "pair of numbers", value.to_string())
                })?;
                (Some(lo), Some(hi))
            }
        };

        Ok(Self {
            grid: grid.to_string(),
            variable: variable.to_string(),
            fill_value: scalar(&layout.fill_value_attribute)?,
            scale_factor: scalar(&layout.scale_factor_attribute)?,
            add_offset: scalar(&layout.add_offset_attribute)?,
            valid_min,
            valid_max,
        })
    }
}

/// Caller-supplied overrides. A set field always wins over the attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    pub fill_value: Option<f64>,
    pub valid_min: Option<f64>,
    pub valid_max: Option<f64>,
    pub scale_factor: Option<f64>,
    pub add_offset: Option<f64>,
}

impl Calibration {
    /// No overrides: calibrate from attributes only.
    pub fn from_attributes() -> Self {
        Self::default()
    }

    pub fn with_fill_value(mut self, fill: f64) -> Self {
        self.fill_value = Some(fill);
        self
    }

    pub fn with_valid_range(mut self, min: f64, max: f64) -> Self {
        self.valid_min = Some(min);
        self.valid_max = Some(max);
        self
    }

    pub fn with_valid_min(mut self, min: f64) -> Self {
        self.valid_min = Some(min);
        self
    }

    pub fn with_valid_max(mut self, max: f64) -> Self {
        self.valid_max = Some(max);
        self
    }

    pub fn with_scale_factor(mut self, scale: f64) -> Self {
        self.scale_factor = Some(scale);
        self
    }

    pub fn with_add_offset(mut self, offset: f64) -> Self {
        self.add_offset = Some(offset);
        self
    }

    /// Stages to run for a dataset described by `descriptor`, in order.
    pub fn stages(&self, descriptor: &VariableDescriptor) -> Vec<Stage> {
        [
            self.fill_value.or(descriptor.fill_value).map(Stage::MaskFill),
            self.valid_min.or(descriptor.valid_min).map(Stage::ClampLow),
            self.valid_max.or(descriptor.valid_max).map(Stage::ClampHigh),
            self.scale_factor.or(descriptor.scale_factor).map(Stage::Scale),
            self.add_offset.or(descriptor.add_offset).map(Stage::Offset),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// One step of the calibration pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stage {
    /// Values equal to the fill value become NaN.
    MaskFill(f64),
    /// Values strictly below the bound become NaN.
    ClampLow(f64),
    /// Values strictly above the bound become NaN.
    ClampHigh(f64),
    Scale(f64),
    Offset(f64),
}

impl Stage {
    fn apply(self, values: &mut [f64]) {
        match self {
            Stage::MaskFill(fill) => mask_where(values, |v| v == fill),
            Stage::ClampLow(min) => mask_where(values, |v| v < min),
            Stage::ClampHigh(max) => mask_where(values, |v| v > max),
            Stage::Scale(scale) => values.iter_mut().for_each(|v| *v *= scale),
            Stage::Offset(offset) => values.iter_mut().for_each(|v| *v += offset),
        }
    }
}

fn mask_where(values: &mut [f64], predicate: impl Fn(f64) -> bool) {
    for v in values.iter_mut() {
        if predicate(*v) {
            *v = f64::NAN;
        }
    }
}

/// Run `stages` over `values` in order. NaN propagates through later stages.
pub fn apply_stages(values: &mut [f64], stages: &[Stage]) {
    for stage in stages {
        stage.apply(values);
    }
}

/// True where a raw value equals `fill`. All false when `fill` is unknown.
pub fn fill_mask(values: &[f64], fill: Option<f64>) -> Vec<bool> {
    match fill {
        Some(fill) => values.iter().map(|&v| v == fill).collect(),
        None => vec![false; values.len()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hdf::AttributeValue;

    fn attrs(entries: &[(&str, AttributeValue)]) -> AttributeMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_descriptor_from_attributes() {
        let map = attrs(&[
            ("_Fillvalue", AttributeValue::Int(-28672)),
            ("valid_range", AttributeValue::Ints(vec![-100, 16000])),
            ("scale_factor", AttributeValue::Float(0.0001)),
        ]);
        let d = VariableDescriptor::from_attributes("G", "V", &map, &GranuleLayout::default()).unwrap();
        assert_eq!(d.fill_value, Some(-28672.0));
        assert_eq!(d.valid_min, Some(-100.0));
        assert_eq!(d.valid_max, Some(16000.0));
        assert_eq!(d.scale_factor, Some(0.0001));
        assert_eq!(d.add_offset, None);
    }

    #[test]
    fn test_attribute_names_are_case_sensitive() {
        let map = attrs(&[("_FillValue", AttributeValue::Int(-1))]);
        let d = VariableDescriptor::from_attributes("G", "V", &map, &GranuleLayout::default()).unwrap();
        assert_eq!(d.fill_value, None);
    }

    #[test]
    fn test_type_mismatch() {
        let map = attrs(&[("scale_factor", AttributeValue::Text("0.1".into()))]);
        let err = VariableDescriptor::from_attributes("G", "V", &map, &GranuleLayout::default()).unwrap_err();
        assert!(matches!(err, GranuleError::AttributeTypeMismatch { ref name, .. } if name == "scale_factor"));

        let map = attrs(&[("valid_range", AttributeValue::Int(5))]);
        let err = VariableDescriptor::from_attributes("G", "V", &map, &GranuleLayout::default()).unwrap_err();
        assert!(matches!(err, GranuleError::AttributeTypeMismatch { expected: "pair of numbers", .. }));
    }

    #[test]
    fn test_explicit_overrides_attributes() {
        let descriptor = VariableDescriptor {
            fill_value: Some(-1.0),
            scale_factor: Some(0.5),
            ..Default::default()
        };
        let stages = Calibration::from_attributes()
            .with_scale_factor(2.0)
            .stages(&descriptor);
        assert_eq!(stages, vec![Stage::MaskFill(-1.0), Stage::Scale(2.0)]);
    }

    #[test]
    fn test_stage_order() {
        let cal = Calibration::default()
            .with_add_offset(1.0)
            .with_scale_factor(2.0)
            .with_valid_range(0.0, 10.0)
            .with_fill_value(-5.0);
        assert_eq!(
            cal.stages(&VariableDescriptor::default()),
            vec![
                Stage::MaskFill(-5.0),
                Stage::ClampLow(0.0),
                Stage::ClampHigh(10.0),
                Stage::Scale(2.0),
                Stage::Offset(1.0),
            ]
        );
    }

    #[test]
    fn test_clamp_precedes_rescale() {
        let (fill, vmin, vmax) = (-999.0, 10.0, 20.0);
        let mut values = vec![fill, vmin - 1.0, vmin, vmax, vmax + 1.0];
        let cal = Calibration::default()
            .with_fill_value(fill)
            .with_valid_range(vmin, vmax)
            .with_scale_factor(2.0)
            .with_add_offset(1.0);
        apply_stages(&mut values, &cal.stages(&VariableDescriptor::default()));

        assert!(values[0].is_nan());
        assert!(values[1].is_nan());
        assert_eq!(values[2], vmin * 2.0 + 1.0);
        assert_eq!(values[3], vmax * 2.0 + 1.0);
        assert!(values[4].is_nan());
    }

    #[test]
    fn test_no_parameters_is_identity() {
        let mut values = vec![1.0, 2.0, 3.0];
        apply_stages(&mut values, &Calibration::default().stages(&VariableDescriptor::default()));
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_fill_mask() {
        assert_eq!(fill_mask(&[1.0, -1.0, 3.0], Some(-1.0)), vec![false, true, false]);
        assert_eq!(fill_mask(&[1.0, -1.0, 3.0], None), vec![false; 3]);
    }
}
