use serde::{Deserialize, Serialize};

use super::time::{TimeBounds, Timestamp};

/// One `(timestamp, value)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub t: Timestamp,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(t: Timestamp, value: f64) -> Self {
        Self { t, value }
    }
}

/// Chronological series for one variable.
///
/// Points keep input record order; the series is never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series(Vec<SeriesPoint>);

impl Series {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_points(points: Vec<SeriesPoint>) -> Self {
        Self(points)
    }

    pub fn push(&mut self, t: Timestamp, value: f64) {
        self.0.push(SeriesPoint::new(t, value));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SeriesPoint> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&SeriesPoint> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&SeriesPoint> {
        self.0.last()
    }

    pub fn into_points(self) -> Vec<SeriesPoint> {
        self.0
    }

    /// Keep the points from `index` onward.
    pub fn split_off_suffix(mut self, index: usize) -> Self {
        Self(self.0.split_off(index.min(self.0.len())))
    }

    /// Rewrite every value, leaving timestamps alone.
    pub fn map_values<F: Fn(f64) -> f64>(self, f: F) -> Self {
        Self(
            self.0
                .into_iter()
                .map(|p| SeriesPoint::new(p.t, f(p.value)))
                .collect(),
        )
    }

    pub fn time_bounds(&self) -> Option<TimeBounds> {
        TimeBounds::covering(self.0.iter().map(|p| p.t))
    }
}

impl FromIterator<SeriesPoint> for Series {
    fn from_iter<I: IntoIterator<Item = SeriesPoint>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a SeriesPoint;
    type IntoIter = std::slice::Iter<'a, SeriesPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
