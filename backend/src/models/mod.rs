//! Data model for the series-assembly pipeline.

pub mod catalog;
pub mod options;
pub mod plan;
pub mod record;
pub mod series;
pub mod time;

pub use catalog::{VariableCatalog, VariableSpec};
pub use options::{EligibilityPolicy, PlotOptions, TimeWindow};
pub use plan::{AxisHints, RangeSummary, RenderOutput, RenderPlan, VariableFailure};
pub use record::{Payload, SnapshotRecord};
pub use series::{Series, SeriesPoint};
pub use time::{TimeBounds, Timestamp, TIMESTAMP_KEY};
