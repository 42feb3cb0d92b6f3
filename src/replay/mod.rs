//! Run replays
//!
//! A replay is sampled state, not an input log: the recorder keeps a
//! snapshot every few fixed steps plus a sparse event list, and the player
//! interpolates between bracketing snapshots for display.

pub mod format;
pub mod playback;
pub mod recorder;

use thiserror::Error;

pub use format::{
    ReplayData, ReplayEvent, ReplaySnapshot, ReplayVec2, SnapshotCoin, SnapshotDrone,
    SnapshotPlayer, SnapshotRunState, UpgradeReveal,
};
pub use playback::{PlaybackStep, ReplayFrame, ReplayPlayer, sample};
pub use recorder::ReplayRecorder;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("replay has no snapshots")]
    NoSnapshots,
    #[error("unsupported replay version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("replay json: {0}")]
    Json(#[from] serde_json::Error),
}
