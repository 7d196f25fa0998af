//! Render plan assembly.
//!
//! Records are merged once; every catalog variable admitted by the options
//! then runs through its own stage chain:
//!
//! ```text
//! SeriesExtractor -> GapTrimmer -> UnitTransform -> RangeSummary
//! ```
//!
//! A failure in one variable's chain is recorded in
//! [`RenderOutput::failures`] and does not stop the others.

use log::{debug, warn};

use super::extract::SeriesExtractor;
use super::format::{NumberFormatter, SignificantDigits, TimeFormatter, UtcTimeFormatter};
use super::gap_trim::GapTrimmer;
use super::merge::{dataset_bounds, merge_payload, merge_snapshots, MergedSnapshot};
use super::range_summary::{summarize, validate_precision};
use super::transform::UnitTransform;
use crate::error::{PipelineError, PipelineResult};
use crate::models::{
    AxisHints, Payload, PlotOptions, RenderOutput, RenderPlan, SnapshotRecord, TimeBounds,
    TimeWindow, VariableCatalog, VariableFailure, VariableSpec,
};

static DEFAULT_TIME_FORMATTER: UtcTimeFormatter = UtcTimeFormatter;
static DEFAULT_NUMBER_FORMATTER: SignificantDigits = SignificantDigits;

/// Builds render plans for every eligible catalog variable.
pub struct RenderPlanBuilder<'a> {
    catalog: &'a VariableCatalog,
    options: PlotOptions,
    time_formatter: &'a dyn TimeFormatter,
    number_formatter: &'a dyn NumberFormatter,
}

impl<'a> RenderPlanBuilder<'a> {
    /// Builder with default options, UTC time labels and significant-digit numbers.
    pub fn new(catalog: &'a VariableCatalog) -> Self {
        Self {
            catalog,
            options: PlotOptions::default(),
            time_formatter: &DEFAULT_TIME_FORMATTER,
            number_formatter: &DEFAULT_NUMBER_FORMATTER,
        }
    }

    pub fn with_options(mut self, options: PlotOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_time_formatter(mut self, formatter: &'a dyn TimeFormatter) -> Self {
        self.time_formatter = formatter;
        self
    }

    pub fn with_number_formatter(mut self, formatter: &'a dyn NumberFormatter) -> Self {
        self.number_formatter = formatter;
        self
    }

    pub fn options(&self) -> &PlotOptions {
        &self.options
    }

    /// Plan every admitted variable from typed records.
    pub fn build(&self, records: &[SnapshotRecord]) -> PipelineResult<RenderOutput> {
        // Options are checked before any data is touched.
        let stages = StageConfig::from_options(&self.options)?;
        let snapshots = merge_snapshots(records)?;
        self.build_from_snapshots(&snapshots, stages)
    }

    /// Plan every admitted variable from a raw `{d: [...]}` payload.
    pub fn build_payload(&self, payload: &Payload) -> PipelineResult<RenderOutput> {
        let stages = StageConfig::from_options(&self.options)?;
        let snapshots = merge_payload(payload)?;
        self.build_from_snapshots(&snapshots, stages)
    }

    /// Plan a single catalog variable; `Ok(None)` when its series is empty.
    ///
    /// The allow-list in the options is not consulted.
    pub fn build_variable(
        &self,
        records: &[SnapshotRecord],
        code: &str,
    ) -> PipelineResult<Option<RenderPlan>> {
        let spec = self
            .catalog
            .get(code)
            .ok_or_else(|| PipelineError::unknown_variable(code))?;
        let stages = StageConfig::from_options(&self.options)?;
        let snapshots = merge_snapshots(records)?;
        let bounds = dataset_bounds(&snapshots)?;
        self.pipeline(&snapshots, stages, bounds)?.run(spec)
    }

    fn build_from_snapshots(
        &self,
        snapshots: &[MergedSnapshot],
        stages: StageConfig,
    ) -> PipelineResult<RenderOutput> {
        let bounds = dataset_bounds(snapshots)?;
        let pipeline = self.pipeline(snapshots, stages, bounds)?;

        if let Some(codes) = &self.options.plotvars {
            for code in codes.iter().filter(|c| !self.catalog.contains(c)) {
                debug!("plotvars entry {} is not in the catalog", code);
            }
        }

        let mut plans = Vec::new();
        let mut failures = Vec::new();
        for spec in self.catalog.iter().filter(|s| self.options.allows(&s.code)) {
            match pipeline.run(spec) {
                Ok(Some(plan)) => plans.push(plan),
                Ok(None) => debug!("{}: empty series, no plan", spec.code),
                Err(e) => {
                    warn!("{}: skipped: {}", spec.code, e);
                    failures.push(VariableFailure {
                        code: spec.code.clone(),
                        error: e.code().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        debug!(
            "planned {} variables over {} snapshots spanning {} ms ({} failed)",
            plans.len(),
            snapshots.len(),
            bounds.span(),
            failures.len()
        );
        Ok(RenderOutput {
            plans,
            bounds,
            failures,
        })
    }

    fn pipeline<'s>(
        &'s self,
        snapshots: &'s [MergedSnapshot],
        stages: StageConfig,
        bounds: TimeBounds,
    ) -> PipelineResult<VariablePipeline<'s>> {
        let extractor = SeriesExtractor::new(snapshots)
            .with_window(stages.window)?
            .with_eligibility(self.options.eligibility());
        Ok(VariablePipeline {
            extractor,
            trimmer: stages.trimmer,
            bounds,
            time_formatter: self.time_formatter,
            number_formatter: self.number_formatter,
        })
    }
}

/// Validated, variable-independent stage settings.
#[derive(Debug, Clone, Copy)]
struct StageConfig {
    window: TimeWindow,
    trimmer: GapTrimmer,
}

impl StageConfig {
    fn from_options(options: &PlotOptions) -> PipelineResult<Self> {
        Ok(Self {
            window: options.window()?,
            trimmer: GapTrimmer::new(options.maxgap)?,
        })
    }
}

/// Per-variable stage chain sharing one set of merged snapshots.
struct VariablePipeline<'s> {
    extractor: SeriesExtractor<'s>,
    trimmer: GapTrimmer,
    bounds: TimeBounds,
    time_formatter: &'s dyn TimeFormatter,
    number_formatter: &'s dyn NumberFormatter,
}

impl VariablePipeline<'_> {
    fn run(&self, spec: &VariableSpec) -> PipelineResult<Option<RenderPlan>> {
        let series = self.trimmer.trim(self.extractor.extract(&spec.code));
        if series.is_empty() {
            return Ok(None);
        }
        let precision = spec
            .precision
            .map(|p| validate_precision(&spec.code, p))
            .transpose()?;
        let series = UnitTransform::for_spec(spec).apply(series);

        // Trimmed series start at their own first point.
        let min_x = if self.trimmer.is_enabled() {
            series.first().map_or(self.bounds.min, |p| p.t)
        } else {
            self.bounds.min
        };
        let max_x = self.bounds.max;

        let (summary, range_labels) = match precision {
            Some(digits) => {
                let raw = summarize(&series, None)?;
                let labels = [raw.min, raw.max, raw.last]
                    .map(|v| self.number_formatter.format(v, Some(digits)));
                (Some(raw.rounded(digits)), Some(labels))
            }
            None => (None, None),
        };

        Ok(Some(RenderPlan {
            code: spec.code.clone(),
            label: spec.label(),
            series,
            axis_hints: AxisHints {
                left_label: self.time_formatter.format(min_x),
                right_label: self.time_formatter.format(max_x),
                min_x,
                max_x,
                range_labels,
            },
            summary,
        }))
    }
}
