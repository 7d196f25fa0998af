//! Single-variable series extraction from merged snapshots.

use log::debug;

use super::merge::MergedSnapshot;
use crate::error::PipelineResult;
use crate::models::{EligibilityPolicy, Series, TimeWindow};

/// Pulls one variable's `(timestamp, value)` pairs out of merged snapshots.
#[derive(Debug, Clone)]
pub struct SeriesExtractor<'a> {
    snapshots: &'a [MergedSnapshot],
    window: TimeWindow,
    eligibility: EligibilityPolicy,
}

impl<'a> SeriesExtractor<'a> {
    /// Extractor over the whole dataset with the default eligibility policy.
    pub fn new(snapshots: &'a [MergedSnapshot]) -> Self {
        Self {
            snapshots,
            window: TimeWindow::unbounded(),
            eligibility: EligibilityPolicy::default(),
        }
    }

    /// Restrict extraction to `window`; inverted windows are rejected.
    pub fn with_window(mut self, window: TimeWindow) -> PipelineResult<Self> {
        window.validate()?;
        self.window = window;
        Ok(self)
    }

    pub fn with_eligibility(mut self, eligibility: EligibilityPolicy) -> Self {
        self.eligibility = eligibility;
        self
    }

    /// Whether `code` is extracted at all under the eligibility policy.
    ///
    /// Eligibility looks at the whole dataset, before the window is applied.
    pub fn is_eligible(&self, code: &str) -> bool {
        match self.eligibility {
            EligibilityPolicy::FirstSnapshot => {
                self.snapshots.first().is_some_and(|s| s.has(code))
            }
            EligibilityPolicy::AnySnapshot => self.snapshots.iter().any(|s| s.has(code)),
        }
    }

    /// Series for `code`: one point per in-window snapshot where it has a value.
    pub fn extract(&self, code: &str) -> Series {
        if !self.is_eligible(code) {
            debug!("{} not eligible under {:?}", code, self.eligibility);
            return Series::new();
        }

        self.snapshots
            .iter()
            .filter(|s| self.window.contains(s.timestamp))
            .filter_map(|s| s.get(code).map(|v| (s.timestamp, v)))
            .fold(Series::new(), |mut series, (t, v)| {
                series.push(t, v);
                series
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::models::SnapshotRecord;
    use crate::services::merge::merge_snapshots;

    fn snapshots(records: &[SnapshotRecord]) -> Vec<MergedSnapshot> {
        merge_snapshots(records).unwrap()
    }

    #[test]
    fn test_extract_carried_values() {
        let merged = snapshots(&[
            SnapshotRecord::new(0).with("V", 1.0),
            SnapshotRecord::new(10),
            SnapshotRecord::new(20).with("V", 3.0),
        ]);
        let series = SeriesExtractor::new(&merged).extract("V");
        let values: Vec<_> = series.iter().map(|p| (p.t, p.value)).collect();
        assert_eq!(values, vec![(0, 1.0), (10, 1.0), (20, 3.0)]);
    }

    #[test]
    fn test_extract_window() {
        let merged = snapshots(&[
            SnapshotRecord::new(0).with("V", 1.0),
            SnapshotRecord::new(1000).with("V", 2.0),
            SnapshotRecord::new(2000).with("V", 3.0),
            SnapshotRecord::new(3000).with("V", 4.0),
        ]);
        let window = TimeWindow::new(Some(1000), Some(2000)).unwrap();
        let series = SeriesExtractor::new(&merged)
            .with_window(window)
            .unwrap()
            .extract("V");
        let ts: Vec<_> = series.iter().map(|p| p.t).collect();
        assert_eq!(ts, vec![1000, 2000]);
    }

    #[test]
    fn test_extract_rejects_inverted_window() {
        let merged = snapshots(&[SnapshotRecord::new(0).with("V", 1.0)]);
        let window = TimeWindow {
            tmin: Some(5),
            tmax: Some(1),
        };
        let err = SeriesExtractor::new(&merged).with_window(window).unwrap_err();
        assert_eq!(err, PipelineError::InvalidWindow { tmin: 5, tmax: 1 });
    }

    #[test]
    fn test_absent_from_first_snapshot_is_empty() {
        let merged = snapshots(&[SnapshotRecord::new(0), SnapshotRecord::new(1000).with("V", 5.0)]);
        let extractor = SeriesExtractor::new(&merged);
        assert!(!extractor.is_eligible("V"));
        assert!(extractor.extract("V").is_empty());
    }

    #[test]
    fn test_any_snapshot_policy_picks_up_late_variables() {
        let merged = snapshots(&[SnapshotRecord::new(0), SnapshotRecord::new(1000).with("V", 5.0)]);
        let series = SeriesExtractor::new(&merged)
            .with_eligibility(EligibilityPolicy::AnySnapshot)
            .extract("V");
        assert_eq!(series.len(), 1);
        assert_eq!(series.first().unwrap().t, 1000);
    }

    #[test]
    fn test_eligibility_ignores_window() {
        let merged = snapshots(&[
            SnapshotRecord::new(0).with("V", 1.0),
            SnapshotRecord::new(1000).with("V", 2.0),
        ]);
        let window = TimeWindow::new(Some(500), None).unwrap();
        let series = SeriesExtractor::new(&merged)
            .with_window(window)
            .unwrap()
            .extract("V");
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_cleared_values_are_skipped() {
        let merged = snapshots(&[
            SnapshotRecord::new(0).with("V", 1.0),
            SnapshotRecord::new(1).with_null("V"),
            SnapshotRecord::new(2).with("V", 2.0),
        ]);
        let ts: Vec<_> = SeriesExtractor::new(&merged).extract("V").iter().map(|p| p.t).collect();
        assert_eq!(ts, vec![0, 2]);
    }
}
