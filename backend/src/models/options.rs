use serde::{Deserialize, Serialize};

use super::time::Timestamp;
use crate::error::{PipelineError, PipelineResult};

/// Which variables the extractor considers present in the dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityPolicy {
    /// Only variables with a value in the first merged snapshot.
    ///
    /// Variables that start reporting mid-stream are dropped.
    #[default]
    FirstSnapshot,
    /// Any variable with a value in at least one merged snapshot.
    AnySnapshot,
}

/// Inclusive timestamp window; a missing bound is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmin: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmax: Option<Timestamp>,
}

impl TimeWindow {
    /// Create a window, rejecting `tmin > tmax`.
    pub fn new(tmin: Option<Timestamp>, tmax: Option<Timestamp>) -> PipelineResult<Self> {
        let window = Self { tmin, tmax };
        window.validate()?;
        Ok(window)
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> PipelineResult<()> {
        match (self.tmin, self.tmax) {
            (Some(tmin), Some(tmax)) if tmin > tmax => {
                Err(PipelineError::InvalidWindow { tmin, tmax })
            }
            _ => Ok(()),
        }
    }

    pub fn contains(&self, t: Timestamp) -> bool {
        self.tmin.map_or(true, |min| t >= min) && self.tmax.map_or(true, |max| t <= max)
    }
}

/// Options accepted by the pipeline entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotOptions {
    /// Allow-list of variable codes; catalog order still decides output order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plotvars: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmin: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmax: Option<Timestamp>,
    /// Gap threshold in timestamp units (milliseconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxgap: Option<i64>,
    /// Unset means [`EligibilityPolicy::default`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<EligibilityPolicy>,
}

impl PlotOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plotvars<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plotvars = Some(codes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_window(mut self, tmin: Option<Timestamp>, tmax: Option<Timestamp>) -> Self {
        self.tmin = tmin;
        self.tmax = tmax;
        self
    }

    pub fn with_maxgap(mut self, maxgap: i64) -> Self {
        self.maxgap = Some(maxgap);
        self
    }

    pub fn with_eligibility(mut self, eligibility: EligibilityPolicy) -> Self {
        self.eligibility = Some(eligibility);
        self
    }

    /// The validated time window.
    pub fn window(&self) -> PipelineResult<TimeWindow> {
        TimeWindow::new(self.tmin, self.tmax)
    }

    /// Whether the allow-list admits `code`. No allow-list admits everything.
    pub fn allows(&self, code: &str) -> bool {
        self.plotvars
            .as_ref()
            .map_or(true, |codes| codes.iter().any(|c| c == code))
    }

    /// The eligibility policy in effect.
    pub fn eligibility(&self) -> EligibilityPolicy {
        self.eligibility.unwrap_or_default()
    }

    /// Fill every unset field from `defaults`.
    ///
    /// The window is filled as a unit: a request that sets either bound
    /// keeps both of its own bounds.
    pub fn or_defaults(self, defaults: &PlotOptions) -> Self {
        let (tmin, tmax) = if self.tmin.is_some() || self.tmax.is_some() {
            (self.tmin, self.tmax)
        } else {
            (defaults.tmin, defaults.tmax)
        };
        Self {
            plotvars: self.plotvars.or_else(|| defaults.plotvars.clone()),
            tmin,
            tmax,
            maxgap: self.maxgap.or(defaults.maxgap),
            eligibility: self.eligibility.or(defaults.eligibility),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_rejects_inverted_bounds() {
        let err = TimeWindow::new(Some(2000), Some(1000)).unwrap_err();
        assert_eq!(err, PipelineError::InvalidWindow { tmin: 2000, tmax: 1000 });
        assert!(TimeWindow::new(Some(1000), Some(1000)).is_ok());
    }

    #[test]
    fn test_window_contains_is_inclusive() {
        let window = TimeWindow::new(Some(1000), Some(2000)).unwrap();
        assert!(!window.contains(999));
        assert!(window.contains(1000));
        assert!(window.contains(2000));
        assert!(!window.contains(2001));
    }

    #[test]
    fn test_window_half_open() {
        let window = TimeWindow::new(None, Some(0)).unwrap();
        assert!(window.contains(-5));
        assert!(!window.contains(1));
        assert!(TimeWindow::unbounded().contains(i64::MIN));
    }

    #[test]
    fn test_allows() {
        assert!(PlotOptions::new().allows("V"));
        let opts = PlotOptions::new().with_plotvars(["V", "I"]);
        assert!(opts.allows("I"));
        assert!(!opts.allows("P"));
    }

    #[test]
    fn test_deserialize_wire_format() {
        let opts: PlotOptions =
            serde_json::from_str(r#"{"plotvars": ["V"], "tmin": 10, "maxgap": 5000}"#).unwrap();
        assert_eq!(opts.plotvars, Some(vec!["V".to_string()]));
        assert_eq!(opts.tmin, Some(10));
        assert_eq!(opts.tmax, None);
        assert_eq!(opts.maxgap, Some(5000));
        assert_eq!(opts.eligibility, None);
        assert_eq!(opts.eligibility(), EligibilityPolicy::FirstSnapshot);

        let opts: PlotOptions = serde_json::from_str(r#"{"eligibility": "any_snapshot"}"#).unwrap();
        assert_eq!(opts.eligibility(), EligibilityPolicy::AnySnapshot);
    }

    #[test]
    fn test_or_defaults() {
        let defaults = PlotOptions::new()
            .with_maxgap(60_000)
            .with_plotvars(["V"])
            .with_eligibility(EligibilityPolicy::AnySnapshot);
        let merged = PlotOptions::new().with_window(Some(5), None).or_defaults(&defaults);

        assert_eq!(merged.tmin, Some(5));
        assert_eq!(merged.maxgap, Some(60_000));
        assert_eq!(merged.plotvars, Some(vec!["V".to_string()]));
        assert_eq!(merged.eligibility(), EligibilityPolicy::AnySnapshot);
    }

    #[test]
    fn test_explicit_first_snapshot_overrides_default() {
        let defaults = PlotOptions::new().with_eligibility(EligibilityPolicy::AnySnapshot);
        let request: PlotOptions =
            serde_json::from_str(r#"{"eligibility": "first_snapshot"}"#).unwrap();

        let merged = request.or_defaults(&defaults);
        assert_eq!(merged.eligibility(), EligibilityPolicy::FirstSnapshot);
    }

    #[test]
    fn test_window_defaults_fill_as_a_unit() {
        let defaults = PlotOptions::new().with_window(Some(5000), Some(9000));

        let merged = PlotOptions::new().with_window(None, Some(1000)).or_defaults(&defaults);
        assert_eq!((merged.tmin, merged.tmax), (None, Some(1000)));
        assert!(merged.window().is_ok());

        let merged = PlotOptions::new().or_defaults(&defaults);
        assert_eq!((merged.tmin, merged.tmax), (Some(5000), Some(9000)));
    }
}
