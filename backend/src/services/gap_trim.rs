//! Drop the stale leading run of a series that precedes a large time gap.
//!
//! Archives often hold a few points from weeks ago followed by current data.
//! Scanning backward from the newest point, the series is cut at the most
//! recent gap larger than `maxgap`; only the points after that gap remain.

use log::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::models::{Series, SeriesPoint};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GapTrimmer {
    maxgap: Option<i64>,
}

impl GapTrimmer {
    /// `None` disables trimming; negative thresholds are rejected.
    pub fn new(maxgap: Option<i64>) -> PipelineResult<Self> {
        if let Some(gap) = maxgap {
            if gap < 0 {
                return Err(PipelineError::InvalidMaxGap { maxgap: gap });
            }
        }
        Ok(Self { maxgap })
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.maxgap.is_some()
    }

    pub fn maxgap(&self) -> Option<i64> {
        self.maxgap
    }

    /// Return the suffix of `series` after its most recent oversized gap.
    pub fn trim(&self, series: Series) -> Series {
        let Some(maxgap) = self.maxgap else {
            return series;
        };
        match cut_index(series.points(), maxgap) {
            Some(index) => {
                debug!(
                    "gap trim dropped {} of {} points (maxgap {})",
                    index,
                    series.len(),
                    maxgap
                );
                series.split_off_suffix(index)
            }
            None => series,
        }
    }
}

/// Index of the first point kept, or `None` when no gap exceeds `maxgap`.
fn cut_index(points: &[SeriesPoint], maxgap: i64) -> Option<usize> {
    points
        .windows(2)
        .rposition(|pair| pair[1].t.saturating_sub(pair[0].t) > maxgap)
        .map(|i| i + 1)
}
