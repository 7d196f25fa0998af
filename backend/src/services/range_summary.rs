use crate::error::{PipelineError, PipelineResult};
use crate::models::{RangeSummary, Series};

use super::format::{round_significant, MAX_PRECISION};

/// Check a significant digit count for `code`.
pub fn validate_precision(code: &str, precision: u32) -> PipelineResult<u32> {
    if (1..=MAX_PRECISION).contains(&precision) {
        Ok(precision)
    } else {
        Err(PipelineError::InvalidPrecision {
            code: code.to_string(),
            precision,
            max: MAX_PRECISION,
        })
    }
}

impl RangeSummary {
    /// Raw min, max and last value of a non-empty series.
    ///
    /// NaN values never replace a running min or max.
    pub fn of(series: &Series) -> PipelineResult<Self> {
        let first = series
            .first()
            .ok_or_else(|| PipelineError::empty_input("cannot summarize an empty series"))?;

        let init = Self {
            min: first.value,
            max: first.value,
            last: first.value,
        };
        Ok(series.iter().skip(1).fold(init, |acc, p| Self {
            min: if p.value < acc.min { p.value } else { acc.min },
            max: if p.value > acc.max { p.value } else { acc.max },
            last: p.value,
        }))
    }

    /// Each field rounded to `digits` significant digits.
    pub fn rounded(&self, digits: u32) -> Self {
        Self {
            min: round_significant(self.min, digits),
            max: round_significant(self.max, digits),
            last: round_significant(self.last, digits),
        }
    }
}

/// Summarize a series, rounding when a precision is given.
pub fn summarize(series: &Series, precision: Option<u32>) -> PipelineResult<RangeSummary> {
    let raw = RangeSummary::of(series)?;
    Ok(match precision {
        Some(digits) => raw.rounded(digits),
        None => raw,
    })
}
