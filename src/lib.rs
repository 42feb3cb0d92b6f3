//! Sling Survivor - launch, survive, upgrade
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, AI, weapons, collisions, progression)
//! - `content`: Static definition tables (upgrades, weapons, evolutions, tiers, artifacts)
//! - `replay`: Snapshot/event recording and interpolated playback
//! - `rng`: Seeded per-run random source
//! - `timestep`: Fixed-timestep accumulator loop
//! - `tuning`: Data-driven game balance
//! - `input`: Thrust axis and launch gesture helpers
//! - `services`: Leaderboard and blob-store boundary

pub mod content;
pub mod input;
pub mod replay;
pub mod rng;
pub mod services;
pub mod sim;
pub mod timestep;
pub mod tuning;

pub use rng::Rng;
pub use timestep::FixedTimestepLoop;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;
    /// Real frame deltas are clamped to this before accumulation (tab-suspend gaps)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Replay snapshot cadence, in fixed steps (~15 Hz at 60 Hz)
    pub const SNAPSHOT_EVERY_N_STEPS: u64 = 4;
    /// Replay file format version
    pub const REPLAY_VERSION: u32 = 1;

    /// Number of upgrade choices offered per level-up
    pub const UPGRADE_CHOICE_COUNT: usize = 3;
}

/// Unit direction for an angle in radians (east = 0, y down)
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Angle of a vector in radians
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Linear interpolation between two scalars
#[inline]
pub fn lerp(a: f32, b: f32, f: f32) -> f32 {
    a + (b - a) * f
}
