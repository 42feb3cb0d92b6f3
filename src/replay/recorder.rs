//! Replay recording
//!
//! Observes the simulation from outside; it never mutates game state.

use super::format::{
    ReplayData, ReplayEvent, ReplaySnapshot, SnapshotCoin, SnapshotDrone, SnapshotPlayer,
    SnapshotRunState,
};
use crate::consts::{REPLAY_VERSION, SNAPSHOT_EVERY_N_STEPS};
use crate::content::upgrades::UpgradeChoice;
use crate::sim::{GameEvent, GameState};
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct ReplayRecorder {
    seed: u64,
    fixed_dt: f32,
    snapshots: Vec<ReplaySnapshot>,
    events: Vec<ReplayEvent>,
    step_count: u64,
}

impl ReplayRecorder {
    pub fn new(seed: u64, fixed_dt: f32) -> Self {
        Self {
            seed,
            fixed_dt,
            snapshots: Vec::new(),
            events: Vec::new(),
            step_count: 0,
        }
    }

    /// Call once per fixed step; keeps every Nth step as a snapshot
    pub fn record_snapshot(&mut self, t: f32, state: &GameState, tuning: &Tuning) {
        self.step_count += 1;
        if self.step_count % SNAPSHOT_EVERY_N_STEPS != 0 {
            return;
        }
        self.snapshots.push(capture(t, state, tuning));
    }

    pub fn record_event(&mut self, event: ReplayEvent) {
        self.events.push(event);
    }

    /// Translate simulation events; ones with no replay counterpart are skipped
    pub fn record_game_events(&mut self, t: f32, events: &[GameEvent]) {
        for event in events {
            let mapped = match *event {
                GameEvent::Launched { vel } => ReplayEvent::Launch { t, vel: vel.into() },
                GameEvent::Kill { drone_id, pos, .. } => ReplayEvent::Kill {
                    t,
                    drone_id: Some(drone_id),
                    pos: Some(pos.into()),
                },
                GameEvent::CoinCollected { coin_id } => ReplayEvent::CoinCollect { t, coin_id },
                _ => continue,
            };
            self.events.push(mapped);
        }
    }

    pub fn record_upgrade_display(&mut self, t: f32, choices: &[UpgradeChoice]) {
        self.events.push(ReplayEvent::UpgradeDisplay {
            t,
            choice_ids: choices.iter().map(|c| c.def.id.to_string()).collect(),
        });
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Everything recorded so far, as a replay file
    pub fn to_replay(&self) -> ReplayData {
        ReplayData {
            version: REPLAY_VERSION,
            seed: self.seed,
            fixed_dt: self.fixed_dt,
            duration: self.snapshots.last().map_or(0.0, |s| s.t),
            snapshots: self.snapshots.clone(),
            events: self.events.clone(),
        }
    }
}

fn capture(t: f32, state: &GameState, tuning: &Tuning) -> ReplaySnapshot {
    let p = &state.player;
    let run = &state.run;
    ReplaySnapshot {
        t,
        player: SnapshotPlayer {
            pos: p.pos.into(),
            vel: p.vel.into(),
            launched: p.launched,
            boost: p.boost,
            hp: p.hp,
            kills: p.kills,
        },
        drones: state
            .drones
            .iter()
            .filter(|d| d.alive)
            .map(|d| SnapshotDrone {
                id: d.id,
                pos: d.pos.into(),
                vel: d.vel.into(),
                hp: d.hp,
                kind: d.kind,
                elite: d.elite,
            })
            .collect(),
        coins: state
            .coins
            .iter()
            .map(|c| SnapshotCoin {
                id: c.id,
                pos: c.pos.into(),
                alive: c.alive,
            })
            .collect(),
        run_state: SnapshotRunState {
            scrap: run.scrap as f32,
            gold: run.gold as f32,
            total_gold_earned: run.total_gold_earned as f32,
            total_scrap: run.total_scrap as f32,
            total_distance_m: run.total_distance_m,
            round: run.round,
            level: run.level,
            distance_m: state.distance_m(tuning),
            round_toll: run.round_toll,
            rockets_remaining: run.rockets_remaining,
        },
    }
}
