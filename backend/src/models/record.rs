//! Sparse telemetry records and the `{d: [...]}` payload that carries them.
//!
//! The first record of a payload is usually a full device state; later records
//! only hold the fields that changed. Every record carries its own `_t`.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::time::{coerce_timestamp, Timestamp, TIMESTAMP_KEY};
use crate::error::{PipelineError, PipelineResult};

/// One sparse reading.
///
/// A field mapped to `Some(v)` sets the variable; a field mapped to `None`
/// came in as JSON `null` and clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRecord {
    pub timestamp: Timestamp,
    pub fields: BTreeMap<String, Option<f64>>,
}

impl SnapshotRecord {
    /// Create a record with no fields.
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            fields: BTreeMap::new(),
        }
    }

    /// Set a field.
    pub fn with(mut self, code: impl Into<String>, value: f64) -> Self {
        self.fields.insert(code.into(), Some(value));
        self
    }

    /// Clear a field, as a JSON `null` would.
    pub fn with_null(mut self, code: impl Into<String>) -> Self {
        self.fields.insert(code.into(), None);
        self
    }

    /// Build a record from one JSON object of the payload.
    ///
    /// `index` is the record's position in the payload and only feeds error
    /// messages. Fields that are neither numbers, numeric strings nor `null`
    /// are not plottable and are dropped.
    pub fn from_json(index: usize, object: &Map<String, Value>) -> PipelineResult<Self> {
        let raw_t = object
            .get(TIMESTAMP_KEY)
            .ok_or(PipelineError::MissingTimestamp { index })?;
        let timestamp = coerce_timestamp(raw_t).ok_or_else(|| PipelineError::InvalidTimestamp {
            index,
            value: raw_t.to_string(),
        })?;

        let mut fields = BTreeMap::new();
        for (key, value) in object {
            if key == TIMESTAMP_KEY {
                continue;
            }
            match coerce_value(value) {
                Some(parsed) => {
                    fields.insert(key.clone(), parsed);
                }
                None => debug!("record {}: skipping non-numeric field {}={}", index, key, value),
            }
        }

        Ok(Self { timestamp, fields })
    }

    /// Overlay this record's fields onto a running state.
    pub fn overlay(&self, state: &mut BTreeMap<String, f64>) {
        for (code, value) in &self.fields {
            match value {
                Some(v) => {
                    state.insert(code.clone(), *v);
                }
                None => {
                    state.remove(code);
                }
            }
        }
    }
}

/// `Some(Some(v))` for a value, `Some(None)` for `null`, `None` for a field
/// that cannot be plotted.
fn coerce_value(value: &Value) -> Option<Option<f64>> {
    match value {
        Value::Null => Some(None),
        Value::Number(n) => n.as_f64().map(Some),
        Value::String(s) => s.trim().parse::<f64>().ok().map(Some),
        _ => None,
    }
}

/// Input payload as produced by the device archive: `{ "d": [record, ...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Payload {
    pub d: Vec<Map<String, Value>>,
}

impl Payload {
    /// Parse a payload from a JSON string.
    pub fn from_json_str(json: &str) -> PipelineResult<Self> {
        serde_json::from_str(json).map_err(|e| PipelineError::Payload(e.to_string()))
    }

    /// Convert every raw record, failing on the first record without a
    /// usable timestamp.
    pub fn records(&self) -> PipelineResult<Vec<SnapshotRecord>> {
        self.d
            .iter()
            .enumerate()
            .map(|(index, object)| SnapshotRecord::from_json(index, object))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.d.len()
    }

    pub fn is_empty(&self) -> bool {
        self.d.is_empty()
    }
}
