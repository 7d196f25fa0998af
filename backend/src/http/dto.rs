//! Data Transfer Objects for the HTTP API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{Payload, PlotOptions, RenderPlan, VariableSpec};

pub use crate::models::RenderOutput;

/// Request body for plan creation: the archive payload plus optional options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanRequest {
    pub d: Vec<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<PlotOptions>,
}

impl PlanRequest {
    pub fn into_parts(self) -> (Payload, Option<PlotOptions>) {
        (Payload { d: self.d }, self.options)
    }
}

/// Response for a single-variable plan; `plan` is null when the series is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariablePlanResponse {
    pub code: String,
    pub plan: Option<RenderPlan>,
}

/// Catalog listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    /// Variables in declaration order
    pub variables: Vec<VariableSpec>,
    pub total: usize,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Number of catalogued variables
    pub variables: usize,
}
