//! Carry-forward merge of sparse records into full-state snapshots.

use std::collections::BTreeMap;

use log::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::models::{Payload, SnapshotRecord, TimeBounds, Timestamp};

/// Latest known value of every variable set so far.
pub type MergedState = BTreeMap<String, f64>;

/// Cumulative state after folding records `0..=i`, tagged with record `i`'s timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSnapshot {
    pub timestamp: Timestamp,
    pub state: MergedState,
}

impl MergedSnapshot {
    pub fn get(&self, code: &str) -> Option<f64> {
        self.state.get(code).copied()
    }

    pub fn has(&self, code: &str) -> bool {
        self.state.contains_key(code)
    }
}

/// Fold records into one merged snapshot per record.
///
/// Each snapshot is built from a copy of the previous one with the record's
/// fields laid over it, so earlier snapshots never change.
pub fn merge_snapshots(records: &[SnapshotRecord]) -> PipelineResult<Vec<MergedSnapshot>> {
    if records.is_empty() {
        return Err(PipelineError::empty_input("no snapshot records"));
    }

    let snapshots = records.iter().fold(
        Vec::with_capacity(records.len()),
        |mut snapshots: Vec<MergedSnapshot>, record| {
            let mut state = snapshots
                .last()
                .map(|prev| prev.state.clone())
                .unwrap_or_default();
            record.overlay(&mut state);
            snapshots.push(MergedSnapshot {
                timestamp: record.timestamp,
                state,
            });
            snapshots
        },
    );

    debug!(
        "merged {} records, {} variables in final state",
        snapshots.len(),
        snapshots.last().map_or(0, |s| s.state.len())
    );
    Ok(snapshots)
}

/// Parse and merge a raw payload.
pub fn merge_payload(payload: &Payload) -> PipelineResult<Vec<MergedSnapshot>> {
    if payload.is_empty() {
        return Err(PipelineError::empty_input("payload contains no records"));
    }
    merge_snapshots(&payload.records()?)
}

/// Dataset-wide timestamp range over every merged snapshot.
pub fn dataset_bounds(snapshots: &[MergedSnapshot]) -> PipelineResult<TimeBounds> {
    TimeBounds::covering(snapshots.iter().map(|s| s.timestamp))
        .ok_or_else(|| PipelineError::empty_input("no merged snapshots"))
}
