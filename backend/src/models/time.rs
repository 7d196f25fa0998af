use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Epoch milliseconds, as carried in the `_t` field of every record.
pub type Timestamp = i64;

/// Reserved record key holding the timestamp.
pub const TIMESTAMP_KEY: &str = "_t";

/// Convert a timestamp to chrono DateTime<Utc>.
///
/// Returns `None` when the value is outside chrono's representable range.
pub fn to_datetime(t: Timestamp) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp_millis(t)
}

/// Interpret a JSON value as a timestamp.
///
/// Integers are taken as-is, floats are truncated toward zero and decimal
/// strings are parsed. Anything else is rejected.
pub fn coerce_timestamp(value: &Value) -> Option<Timestamp> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok()))
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                    .map(|f| f.trunc() as i64)
            }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Inclusive `[min, max]` range of timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBounds {
    pub min: Timestamp,
    pub max: Timestamp,
}

impl TimeBounds {
    pub fn new(min: Timestamp, max: Timestamp) -> Self {
        Self { min, max }
    }

    /// Smallest bounds covering every timestamp, or `None` for no timestamps.
    pub fn covering<I: IntoIterator<Item = Timestamp>>(timestamps: I) -> Option<Self> {
        timestamps.into_iter().fold(None, |bounds, t| {
            Some(match bounds {
                None => Self::new(t, t),
                Some(b) => Self::new(b.min.min(t), b.max.max(t)),
            })
        })
    }

    pub fn span(&self) -> i64 {
        self.max.saturating_sub(self.min)
    }
}
