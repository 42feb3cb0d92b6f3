//! Interpolated replay playback
//!
//! Numeric fields tween between the two snapshots around the playback time;
//! flags, counters and entity identity snap to the later one. Times outside
//! the recorded span clamp to the nearest end.

use std::collections::BTreeMap;

use super::ReplayError;
use super::format::{
    ReplayData, ReplayEvent, ReplaySnapshot, ReplayVec2, SnapshotCoin, SnapshotDrone,
    SnapshotPlayer, SnapshotRunState,
};
use crate::lerp;

/// Reconstructed state at one playback time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayFrame {
    pub t: f32,
    pub player: SnapshotPlayer,
    pub drones: Vec<SnapshotDrone>,
    pub coins: Vec<SnapshotCoin>,
    pub run_state: SnapshotRunState,
}

impl ReplayFrame {
    fn from_snapshot(t: f32, s: &ReplaySnapshot) -> Self {
        Self {
            t,
            player: s.player.clone(),
            drones: s.drones.clone(),
            coins: s.coins.clone(),
            run_state: s.run_state.clone(),
        }
    }
}

fn lerp_vec(a: ReplayVec2, b: ReplayVec2, f: f32) -> ReplayVec2 {
    ReplayVec2 {
        x: lerp(a.x, b.x, f),
        y: lerp(a.y, b.y, f),
    }
}

/// State at time `t`; `None` only for an empty snapshot list
pub fn sample(snapshots: &[ReplaySnapshot], t: f32) -> Option<ReplayFrame> {
    let first = snapshots.first()?;
    let last = snapshots.last()?;
    if t.is_nan() {
        return Some(ReplayFrame::from_snapshot(first.t, first));
    }
    if t <= first.t {
        return Some(ReplayFrame::from_snapshot(t, first));
    }
    if t >= last.t {
        return Some(ReplayFrame::from_snapshot(t, last));
    }

    // first.t < t < last.t, so the split lands strictly inside the list
    let i = snapshots.partition_point(|s| s.t <= t);
    let (a, b) = (&snapshots[i - 1], &snapshots[i]);
    let span = b.t - a.t;
    let f = if span > 0.0 { (t - a.t) / span } else { 1.0 };

    let player = SnapshotPlayer {
        pos: lerp_vec(a.player.pos, b.player.pos, f),
        vel: lerp_vec(a.player.vel, b.player.vel, f),
        launched: b.player.launched,
        boost: lerp(a.player.boost, b.player.boost, f),
        hp: lerp(a.player.hp, b.player.hp, f),
        kills: b.player.kills,
    };

    let prev_drones: BTreeMap<u32, &SnapshotDrone> = a.drones.iter().map(|d| (d.id, d)).collect();
    let drones = b
        .drones
        .iter()
        .map(|d| match prev_drones.get(&d.id) {
            Some(prev) => SnapshotDrone {
                pos: lerp_vec(prev.pos, d.pos, f),
                vel: lerp_vec(prev.vel, d.vel, f),
                ..d.clone()
            },
            None => d.clone(),
        })
        .collect();

    let prev_coins: BTreeMap<u32, &SnapshotCoin> = a.coins.iter().map(|c| (c.id, c)).collect();
    let coins = b
        .coins
        .iter()
        .map(|c| match prev_coins.get(&c.id) {
            Some(prev) => SnapshotCoin {
                pos: lerp_vec(prev.pos, c.pos, f),
                ..c.clone()
            },
            None => c.clone(),
        })
        .collect();

    let (ra, rb) = (&a.run_state, &b.run_state);
    let run_state = SnapshotRunState {
        scrap: lerp(ra.scrap, rb.scrap, f),
        gold: lerp(ra.gold, rb.gold, f),
        total_gold_earned: lerp(ra.total_gold_earned, rb.total_gold_earned, f),
        total_scrap: lerp(ra.total_scrap, rb.total_scrap, f),
        total_distance_m: lerp(ra.total_distance_m, rb.total_distance_m, f),
        round: rb.round,
        level: rb.level,
        distance_m: lerp(ra.distance_m, rb.distance_m, f),
        round_toll: rb.round_toll,
        rockets_remaining: rb.rockets_remaining,
    };

    Some(ReplayFrame {
        t,
        player,
        drones,
        coins,
        run_state,
    })
}

/// Result of advancing playback by one real frame
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackStep {
    pub frame: ReplayFrame,
    /// Events whose timestamps were crossed, in stored order
    pub events: Vec<ReplayEvent>,
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct ReplayPlayer {
    data: ReplayData,
    time: f32,
    speed: f32,
    event_index: usize,
    finished: bool,
}

impl ReplayPlayer {
    /// Refuses replays with nothing to interpolate
    pub fn new(data: ReplayData) -> Result<Self, ReplayError> {
        if data.snapshots.is_empty() {
            return Err(ReplayError::NoSnapshots);
        }
        log::info!(
            "replay loaded: seed {}, {} snapshots, {} events, {:.1}s",
            data.seed,
            data.snapshots.len(),
            data.events.len(),
            data.duration
        );
        Ok(Self {
            data,
            time: 0.0,
            speed: 1.0,
            event_index: 0,
            finished: false,
        })
    }

    pub fn data(&self) -> &ReplayData {
        &self.data
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn duration(&self) -> f32 {
        self.data.duration
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Playback multiplier (the UI toggles 1x and 2x); non-positive values are ignored
    pub fn set_speed(&mut self, speed: f32) {
        if speed > 0.0 {
            self.speed = speed;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Interpolated state at any time; out-of-range times clamp
    pub fn frame_at(&self, t: f32) -> ReplayFrame {
        // snapshots are non-empty by construction
        sample(&self.data.snapshots, t).unwrap_or_default()
    }

    /// Move playback forward by `dt` real seconds (scaled by the speed).
    ///
    /// Playback finishes once it reaches the duration or crosses a
    /// `game_over` event; later calls return the final frame and no events.
    pub fn advance(&mut self, dt: f32) -> PlaybackStep {
        if self.finished {
            return PlaybackStep {
                frame: self.frame_at(self.time),
                events: Vec::new(),
                finished: true,
            };
        }

        self.time += dt.max(0.0) * self.speed;

        let mut crossed = Vec::new();
        while let Some(ev) = self.data.events.get(self.event_index) {
            if ev.t() > self.time {
                break;
            }
            self.event_index += 1;
            crossed.push(ev.clone());
            if matches!(ev, ReplayEvent::GameOver { .. }) {
                self.finished = true;
                break;
            }
        }
        if self.time >= self.data.duration {
            self.finished = true;
        }

        PlaybackStep {
            frame: self.frame_at(self.time),
            events: crossed,
            finished: self.finished,
        }
    }

    /// Back to the start, keeping the speed
    pub fn restart(&mut self) {
        self.time = 0.0;
        self.event_index = 0;
        self.finished = false;
    }
}
