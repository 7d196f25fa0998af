//! # veplot
//!
//! Series assembly for charting sparse device telemetry.
//!
//! Archive records report only changed fields. This crate turns such a record
//! stream into per-variable render plans: carried-forward state, the points of
//! one variable inside a time window, a trimmed tail after the last large gap,
//! display units, and axis and range labels ready for a chart widget.
//!
//! ## Architecture
//!
//! - [`models`]: records, series, the variable catalog, options and plans
//! - [`services`]: one module per pipeline stage, plus the [`RenderPlanBuilder`]
//!   that chains them
//! - [`config`]: TOML configuration with environment overrides
//! - [`http`]: axum REST surface (`http-server` feature)
//!
//! ## Example
//!
//! ```
//! use veplot::models::{SnapshotRecord, VariableCatalog};
//! use veplot::RenderPlanBuilder;
//!
//! let catalog = VariableCatalog::ve_direct();
//! let records = vec![
//!     SnapshotRecord::new(0).with("V", 12500.0),
//!     SnapshotRecord::new(1000).with("V", 12600.0),
//! ];
//! let output = RenderPlanBuilder::new(&catalog).build(&records).unwrap();
//! assert_eq!(output.codes(), vec!["V"]);
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use error::{PipelineError, PipelineResult};
pub use services::RenderPlanBuilder;
