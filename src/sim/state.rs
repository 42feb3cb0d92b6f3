//! Game state aggregate
//!
//! `GameState` pairs the run (which survives rockets) with the per-rocket
//! world: the player, every transient entity collection and the spawner
//! clocks. `reset_rocket` throws the world away and keeps the run.

use glam::Vec2;

use super::entities::{Asteroid, Drone, EnemyBullet, EntityIds, Player, Projectile, WorldCoin};
use super::progression::TierTracker;
use super::run_state::RunState;
use super::spawner::{AsteroidSpawner, CoinField, EnemySpawner};
use super::weapons::WeaponSystem;
use crate::tuning::Tuning;

/// Discrete things that happened during a tick, for recorders and UI
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Launched { vel: Vec2 },
    Kill { drone_id: u32, pos: Vec2, elite: bool },
    CoinCollected { coin_id: u32 },
    LevelUp { level: u32 },
    TierChanged { tier_id: &'static str },
    /// Hull gone or stalled out
    RocketEnded,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub run: RunState,
    pub player: Player,
    /// Sorted by id; spawners only append
    pub drones: Vec<Drone>,
    pub asteroids: Vec<Asteroid>,
    pub bullets: Vec<EnemyBullet>,
    pub coins: Vec<WorldCoin>,
    pub projectiles: Vec<Projectile>,
    pub enemy_spawner: EnemySpawner,
    pub asteroid_spawner: AsteroidSpawner,
    pub coin_field: CoinField,
    pub weapons: WeaponSystem,
    pub tier: TierTracker,
    pub ids: EntityIds,
    /// Simulation tick counter (paused ticks excluded)
    pub time_ticks: u64,
    /// Furthest distance reached by the current rocket
    pub rocket_distance_m: f32,
    /// Events of the latest unpaused tick; cleared when the next one starts
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let run = RunState::new(seed, tuning);
        let player = Player::new(run.player_stats(), tuning);
        Self {
            run,
            player,
            drones: Vec::new(),
            asteroids: Vec::new(),
            bullets: Vec::new(),
            coins: Vec::new(),
            projectiles: Vec::new(),
            enemy_spawner: EnemySpawner::default(),
            asteroid_spawner: AsteroidSpawner::default(),
            coin_field: CoinField::new(tuning),
            weapons: WeaponSystem::default(),
            tier: TierTracker::default(),
            ids: EntityIds::default(),
            time_ticks: 0,
            rocket_distance_m: 0.0,
            events: Vec::new(),
        }
    }

    /// Fresh player and an empty world for the next rocket; the run is kept
    pub fn reset_rocket(&mut self, tuning: &Tuning) {
        self.player = Player::new(self.run.player_stats(), tuning);
        self.drones.clear();
        self.asteroids.clear();
        self.bullets.clear();
        self.coins.clear();
        self.projectiles.clear();
        self.enemy_spawner = EnemySpawner::default();
        self.asteroid_spawner = AsteroidSpawner::default();
        self.coin_field = CoinField::new(tuning);
        self.weapons.reset();
        self.tier = TierTracker::default();
        self.rocket_distance_m = 0.0;
        log::debug!("rocket reset, {} left", self.run.rockets_remaining);
    }

    /// Current distance of the player from the launcher, in meters
    pub fn distance_m(&self, tuning: &Tuning) -> f32 {
        tuning.distance_m(self.player.pos.x)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn clear_events(&mut self) {
        self.events.clear();
    }

    /// What the latest tick produced
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Hand over the latest tick's events, leaving the queue empty
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop dead entities once every system has read them
    pub fn compact(&mut self) {
        self.drones.retain(|d| d.alive);
        self.asteroids.retain(|a| a.alive);
        self.bullets.retain(|b| b.alive);
        self.coins.retain(|c| c.alive);
        self.projectiles.retain(|p| p.alive);
    }
}
