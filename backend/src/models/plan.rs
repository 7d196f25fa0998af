use serde::{Deserialize, Serialize};

use super::series::Series;
use super::time::{TimeBounds, Timestamp};

/// Value range of a series, for axis labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSummary {
    pub min: f64,
    pub max: f64,
    pub last: f64,
}

/// Axis labels and bounds handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisHints {
    pub left_label: String,
    pub right_label: String,
    pub min_x: Timestamp,
    pub max_x: Timestamp,
    /// Formatted `[min, max, last]`, present only for variables with a precision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_labels: Option<[String; 3]>,
}

/// Fully prepared chart input for one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan {
    pub code: String,
    pub label: String,
    pub series: Series,
    pub axis_hints: AxisHints,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<RangeSummary>,
}

/// A variable whose sub-pipeline failed; other variables were still planned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableFailure {
    pub code: String,
    pub error: String,
    pub message: String,
}

/// Result of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOutput {
    /// Plans in catalog order.
    pub plans: Vec<RenderPlan>,
    /// Timestamp range over every merged snapshot.
    pub bounds: TimeBounds,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<VariableFailure>,
}

impl RenderOutput {
    pub fn plan(&self, code: &str) -> Option<&RenderPlan> {
        self.plans.iter().find(|p| p.code == code)
    }

    pub fn codes(&self) -> Vec<&str> {
        self.plans.iter().map(|p| p.code.as_str()).collect()
    }
}
