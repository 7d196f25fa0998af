//! Pipeline stages and their orchestration.
//!
//! Each stage lives in its own module and can be used on its own.
//! [`RenderPlanBuilder`] chains them into render plans for a whole catalog.

pub mod extract;
pub mod format;
pub mod gap_trim;
pub mod merge;
pub mod range_summary;
pub mod render_plan;
pub mod transform;

pub use extract::SeriesExtractor;
pub use format::{
    LocalTimeFormatter, NumberFormatter, SignificantDigits, TimeFormatter, UtcTimeFormatter,
};
pub use gap_trim::GapTrimmer;
pub use merge::{dataset_bounds, merge_payload, merge_snapshots, MergedSnapshot, MergedState};
pub use range_summary::summarize;
pub use render_plan::RenderPlanBuilder;
pub use transform::UnitTransform;
