//! Portable capture of a relaxation run for persistence and transport.
//!
//! A [`TrajectorySnapshot`] holds everything a report or plot needs after the
//! engine is gone: the configuration, the final S1 and S2, the full
//! trajectory and the window count. The random source is not captured, so a
//! snapshot cannot resume a run.
//!
//! Deserialising a snapshot re-validates both simplex vectors, so a tampered
//! file cannot smuggle a non-normalised state back in.
//!
//! # no_std
//!
//! This module requires the `serde` feature and only needs `alloc`.

use alloc::vec::Vec;

use rand::Rng;

use crate::engine::{EngineConfig, MeasurementRecord, RelaxationEngine};
use crate::simplex::SimplexVector;
use crate::summary::RunSummary;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u16 = 1;

/// A serialisable capture of a [`RelaxationEngine`].
///
/// # Example
///
/// ```rust,ignore
/// use gate_dynamics::snapshot::TrajectorySnapshot;
///
/// let snapshot = TrajectorySnapshot::from_engine(&engine);
/// let json = serde_json::to_string(&snapshot).unwrap();
/// let restored: TrajectorySnapshot = serde_json::from_str(&json).unwrap();
/// ```
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct TrajectorySnapshot {
    /// Format version, [`SNAPSHOT_VERSION`] for newly created snapshots.
    pub version: u16,
    /// Configuration the run was built with.
    pub config: EngineConfig,
    /// S1 at snapshot time.
    pub s1: SimplexVector,
    /// S2 at snapshot time.
    pub s2: SimplexVector,
    /// Opportunity windows opened so far.
    pub windows_triggered: u64,
    /// Every record so far, in iteration order.
    pub trajectory: Vec<MeasurementRecord>,
}

impl TrajectorySnapshot {
    /// Capture the current state of `engine`.
    pub fn from_engine<R: Rng>(engine: &RelaxationEngine<R>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            config: engine.config().clone(),
            s1: engine.s1().clone(),
            s2: engine.s2().clone(),
            windows_triggered: engine.windows_triggered(),
            trajectory: engine.trajectory().to_vec(),
        }
    }

    /// Number of trajectory records.
    pub fn record_count(&self) -> usize {
        self.trajectory.len()
    }

    /// Look up the record for `iteration`, if it was reached.
    pub fn find_record(&self, iteration: usize) -> Option<&MeasurementRecord> {
        self.trajectory.get(iteration).filter(|r| r.iteration == iteration)
    }

    /// Recompute the run summary from the captured trajectory.
    pub fn summary(&self) -> RunSummary {
        RunSummary::from_trajectory(&self.trajectory, self.windows_triggered)
    }
}
