//! Scale-then-offset conversion of raw device units into display units.

use crate::models::{Series, VariableSpec};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitTransform {
    pub scale: f64,
    pub offset: f64,
}

impl Default for UnitTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl UnitTransform {
    pub fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0)
    }

    /// Transform configured by a catalog entry; missing fields default to 1 and 0.
    pub fn for_spec(spec: &VariableSpec) -> Self {
        Self::new(spec.scale.unwrap_or(1.0), spec.offset.unwrap_or(0.0))
    }

    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.offset == 0.0
    }

    /// `value * scale + offset`; non-finite values are left as they are.
    pub fn apply_value(&self, value: f64) -> f64 {
        if value.is_finite() {
            value * self.scale + self.offset
        } else {
            value
        }
    }

    pub fn apply(&self, series: Series) -> Series {
        if self.is_identity() {
            return series;
        }
        series.map_values(|v| self.apply_value(v))
    }
}
