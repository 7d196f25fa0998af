//! Variable catalog: display metadata for known variable codes.
//!
//! A catalog file maps each code to `{displayName, unit?, scale?, offset?,
//! precision?}`. The short keys used by the device firmware's web page
//! (`n`, `u`, `m`, `d`) are accepted as aliases. Iteration follows
//! declaration order.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, PipelineResult};

/// Display metadata for one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableSpec {
    pub code: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

impl VariableSpec {
    pub fn new(code: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display_name: display_name.into(),
            unit: None,
            scale: None,
            offset: None,
            precision: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Chart label: display name followed by the unit in parentheses.
    pub fn label(&self) -> String {
        match self.unit.as_deref() {
            Some(unit) if !unit.is_empty() => format!("{} ({})", self.display_name, unit),
            _ => self.display_name.clone(),
        }
    }
}

/// One catalog file entry; the code is the key it is declared under.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntry {
    #[serde(default, alias = "n")]
    display_name: Option<String>,
    #[serde(default, alias = "u")]
    unit: Option<String>,
    #[serde(default, alias = "m")]
    scale: Option<f64>,
    #[serde(default)]
    offset: Option<f64>,
    #[serde(default, alias = "d")]
    precision: Option<u32>,
}

impl CatalogEntry {
    fn into_spec(self, code: &str) -> VariableSpec {
        VariableSpec {
            code: code.to_string(),
            display_name: self.display_name.unwrap_or_else(|| code.to_string()),
            unit: self.unit,
            scale: self.scale,
            offset: self.offset,
            precision: self.precision,
        }
    }
}

/// Ordered table of known variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableCatalog {
    specs: Vec<VariableSpec>,
}

impl VariableCatalog {
    /// Create a catalog from specs in the given order.
    ///
    /// A code declared twice keeps its first position and its last metadata.
    pub fn new(specs: Vec<VariableSpec>) -> Self {
        let mut catalog = Self::default();
        for spec in specs {
            catalog.insert(spec);
        }
        catalog
    }

    fn insert(&mut self, spec: VariableSpec) {
        match self.specs.iter_mut().find(|s| s.code == spec.code) {
            Some(existing) => *existing = spec,
            None => self.specs.push(spec),
        }
    }

    /// Catalog of the VE.Direct charge controller and inverter fields.
    pub fn ve_direct() -> Self {
        Self::new(vec![
            VariableSpec::new("V", "battery voltage")
                .with_unit("V")
                .with_scale(0.001)
                .with_precision(5),
            VariableSpec::new("VPV", "panel voltage")
                .with_unit("V")
                .with_scale(0.001)
                .with_precision(5),
            VariableSpec::new("PPV", "panel power")
                .with_unit("W")
                .with_precision(5),
            VariableSpec::new("I", "current")
                .with_unit("A")
                .with_scale(0.001)
                .with_precision(5),
            VariableSpec::new("T", "temperature")
                .with_unit("°C")
                .with_precision(3),
            VariableSpec::new("P", "power").with_unit("W").with_precision(5),
            VariableSpec::new("AC_OUT_V", "AC Volts")
                .with_unit("V")
                .with_scale(0.01)
                .with_precision(5),
            VariableSpec::new("AC_OUT_I", "AC Amps")
                .with_unit("A")
                .with_scale(0.1)
                .with_precision(5),
            VariableSpec::new("AC_OUT_S", "AC Power")
                .with_unit("VA")
                .with_precision(5),
            // Register reads report centi-Kelvin.
            VariableSpec::new("battery temperature", "battery temperature")
                .with_unit("°C")
                .with_scale(0.01)
                .with_offset(-273.15)
                .with_precision(2),
            VariableSpec::new("charger internal temperature", "charger temperature")
                .with_unit("°C")
                .with_scale(0.01)
                .with_precision(2),
        ])
    }

    /// Parse a catalog from TOML, one table per variable code.
    pub fn from_toml_str(content: &str) -> PipelineResult<Self> {
        let table: toml::Table = toml::from_str(content)
            .map_err(|e| PipelineError::Catalog(format!("Failed to parse TOML catalog: {}", e)))?;

        let mut specs = Vec::with_capacity(table.len());
        for (code, value) in table {
            let entry: CatalogEntry = value.try_into().map_err(|e| {
                PipelineError::Catalog(format!("Invalid catalog entry '{}': {}", code, e))
            })?;
            specs.push(entry.into_spec(&code));
        }
        Ok(Self::new(specs))
    }

    /// Parse a catalog from a JSON object keyed by variable code.
    pub fn from_json_str(content: &str) -> PipelineResult<Self> {
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(content)
            .map_err(|e| PipelineError::Catalog(format!("Failed to parse JSON catalog: {}", e)))?;

        let mut specs = Vec::with_capacity(object.len());
        for (code, value) in object {
            let entry: CatalogEntry = serde_json::from_value(value).map_err(|e| {
                PipelineError::Catalog(format!("Invalid catalog entry '{}': {}", code, e))
            })?;
            specs.push(entry.into_spec(&code));
        }
        Ok(Self::new(specs))
    }

    /// Load a catalog file, choosing the format from its extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Catalog(format!("Failed to read catalog {}: {}", path.display(), e))
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "toml" => Self::from_toml_str(&content),
            "json" => Self::from_json_str(&content),
            other => Err(PipelineError::Catalog(format!(
                "Unsupported catalog format: '{}'",
                other
            ))),
        }
    }

    pub fn get(&self, code: &str) -> Option<&VariableSpec> {
        self.specs.iter().find(|s| s.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VariableSpec> {
        self.specs.iter()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|s| s.code.as_str())
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
