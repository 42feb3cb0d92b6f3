//! Sling Survivor - headless driver
//!
//! Plays one seeded run on autopilot through the fixed-timestep loop, drains
//! level-ups by taking the first offer, and writes the run's replay as JSON.
//!
//! Usage: `sling-survivor [seed] [replay.json]`

use std::error::Error;

use glam::Vec2;

use sling_survivor::consts::{SIM_DT, UPGRADE_CHOICE_COUNT};
use sling_survivor::input::{LaunchGesture, TickInput};
use sling_survivor::replay::{ReplayEvent, ReplayRecorder};
use sling_survivor::services::{
    LeaderboardEntry, LeaderboardService, LocalLeaderboard, MemoryBlobStore, upload_replay,
};
use sling_survivor::sim::{
    GameState, RocketOutcome, RunSummary, apply_upgrade_choice, offer_upgrades,
    resolve_rocket_end, roll_merchant_stock, terrain_height, tick,
};
use sling_survivor::{FixedTimestepLoop, Tuning};

const DEFAULT_SEED: u64 = 20240601;
const DEFAULT_OUT: &str = "replay.json";
/// Hard stop for a run that never ends (20 minutes of simulation)
const MAX_FRAMES: u32 = 60 * 60 * 20;
const MERCHANT_SLOTS: usize = 3;

struct Driver {
    tuning: Tuning,
    state: GameState,
    recorder: ReplayRecorder,
    /// Run seconds, paused time excluded
    time: f32,
    summary: Option<RunSummary>,
}

impl Driver {
    fn new(seed: u64, tuning: Tuning) -> Self {
        let state = GameState::new(seed, &tuning);
        let recorder = ReplayRecorder::new(seed, tuning.sim.fixed_dt);
        Self {
            tuning,
            state,
            recorder,
            time: 0.0,
            summary: None,
        }
    }

    /// Pull back and release, then hold the nose up while boost lasts
    fn autopilot(&self) -> TickInput {
        let player = &self.state.player;
        if !player.launched {
            let lift = 90.0 + 10.0 * self.state.run.rockets_remaining as f32;
            return TickInput {
                thrust: Vec2::ZERO,
                launch: Some(LaunchGesture {
                    anchor: Vec2::ZERO,
                    release: Vec2::new(-190.0, lift),
                }),
            };
        }

        let ground = terrain_height(player.pos.x, &self.tuning.terrain);
        let mut thrust = Vec2::ZERO;
        if player.vel.x < 320.0 {
            thrust.x = 1.0;
        }
        if player.pos.y > ground - 140.0 || player.vel.y > 200.0 {
            thrust.y = -1.0;
        }
        TickInput { thrust, launch: None }
    }

    fn step(&mut self, dt: f32) {
        if self.summary.is_some() {
            return;
        }
        let input = self.autopilot();
        let ended = tick(&mut self.state, &self.tuning, &input, dt);
        self.time += dt;

        self.recorder.record_snapshot(self.time, &self.state, &self.tuning);
        let events = self.state.take_events();
        self.recorder.record_game_events(self.time, &events);

        if ended {
            self.end_rocket();
        }
    }

    fn drain_upgrades(&mut self) {
        loop {
            let choices = offer_upgrades(&mut self.state.run, UPGRADE_CHOICE_COUNT);
            let Some(first) = choices.first() else {
                break;
            };
            let picked = first.def.id;
            self.recorder.record_upgrade_display(self.time, &choices);
            self.recorder.record_event(ReplayEvent::UpgradePick {
                t: self.time,
                index: 0,
                picked_id: picked.to_string(),
            });
            if let Some(evo) = apply_upgrade_choice(&mut self.state.run, picked, &self.tuning) {
                log::info!("evolved into {}", evo.def.name);
            }
        }
    }

    fn visit_merchant(&mut self) {
        let run = &mut self.state.run;
        let stock = roll_merchant_stock(run, MERCHANT_SLOTS);
        let Some(def) = stock.iter().find(|d| d.gold_cost <= run.gold) else {
            log::debug!("merchant: nothing affordable with {} gold", run.gold);
            return;
        };
        if let Err(e) = run.purchase_artifact(def.id, &self.tuning) {
            log::warn!("merchant: {e}");
        }
    }

    fn end_rocket(&mut self) {
        self.drain_upgrades();

        let distance_m = self.state.rocket_distance_m;
        match resolve_rocket_end(&mut self.state.run, &self.tuning, distance_m) {
            RocketOutcome::RoundComplete { .. } => {
                self.recorder.record_event(ReplayEvent::RoundComplete { t: self.time });
                self.visit_merchant();
                self.state.reset_rocket(&self.tuning);
            }
            RocketOutcome::RocketLost { .. } => {
                self.state.reset_rocket(&self.tuning);
            }
            RocketOutcome::GameOver(summary) => {
                self.recorder.record_event(ReplayEvent::GameOver { t: self.time });
                self.summary = Some(summary);
            }
        }
    }
}

fn run(seed: u64, out: &str) -> Result<(), Box<dyn Error>> {
    let tuning = Tuning::default();
    let mut lp = FixedTimestepLoop::new(tuning.sim.fixed_dt, tuning.sim.max_substeps);
    let mut driver = Driver::new(seed, tuning);

    let mut frames = 0;
    while driver.summary.is_none() && frames < MAX_FRAMES {
        lp.frame(SIM_DT, |dt| driver.step(dt), |_| {});
        frames += 1;
    }

    let summary = match driver.summary.take() {
        Some(summary) => summary,
        None => {
            log::warn!("run still going after {frames} frames; stopping");
            RunSummary::from_run(&driver.state.run, "???")
        }
    };

    let replay = driver.recorder.to_replay();
    std::fs::write(out, replay.to_json()?)?;
    log::info!(
        "replay written to {out}: {} snapshots, {} events, {:.1}s",
        replay.snapshots.len(),
        replay.events.len(),
        replay.duration
    );

    let mut store = MemoryBlobStore::new();
    let url = upload_replay(&mut store, &replay)?;
    let mut board = LocalLeaderboard::new();
    match board.submit(LeaderboardEntry::from_summary(summary.clone(), Some(url))) {
        Ok(rank) => log::info!("leaderboard rank #{rank}"),
        Err(e) => log::info!("no leaderboard entry: {e}"),
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_SEED);
    let out = args.next().unwrap_or_else(|| DEFAULT_OUT.to_string());
    log::info!("Sling Survivor (headless) seed {seed}");

    if let Err(e) = run(seed, &out) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
