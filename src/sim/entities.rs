//! Entity types
//!
//! Transient entities carry an `alive` flag; systems only flip it, and the
//! tick compacts dead entries out once every system has run.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::run_state::DerivedPlayerStats;
use crate::tuning::Tuning;

/// The launched craft. Recreated for every rocket.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub boost: f32,
    /// Seconds of extra drag remaining after a contact
    pub drag_debuff_timer: f32,
    pub launched: bool,
    pub stall_timer: f32,
    pub kills: u32,
    pub hits: u32,
}

impl Player {
    /// Fresh player sitting at the launcher anchor
    pub fn new(stats: &DerivedPlayerStats, tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.launcher.origin_x, tuning.launcher.origin_y),
            vel: Vec2::ZERO,
            radius: tuning.player.radius,
            hp: stats.hp_max,
            boost: stats.boost_max,
            drag_debuff_timer: 0.0,
            launched: false,
            stall_timer: 0.0,
            kills: 0,
            hits: 0,
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DroneKind {
    Chaser,
    Shooter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drone {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub speed: f32,
    pub kind: DroneKind,
    pub elite: bool,
    pub alive: bool,
    /// Shooters only; counts down to the next shot
    pub shoot_timer: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub size: SizeClass,
    pub sprite_variant: u32,
    pub rotation: f32,
    pub spin: f32,
    pub scrap_reward: u32,
    pub alive: bool,
}

/// Shooter projectile aimed at the player
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyBullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub speed_retain: f32,
    pub drag_debuff_sec: f32,
    pub ttl: f32,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorldCoin {
    pub id: u32,
    pub pos: Vec2,
    /// Render-only bob offset
    pub bob_phase: f32,
    pub alive: bool,
}

/// Player-fired shot
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub ttl: f32,
    pub piercing: bool,
    pub pierce_left: u32,
    /// Targets already damaged by this shot
    pub hit_ids: Vec<u32>,
    pub alive: bool,
}

/// Monotonic id source shared by every entity kind in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Circle overlap, touching counts
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let rr = ra + rb;
    a.distance_squared(b) <= rr * rr
}
