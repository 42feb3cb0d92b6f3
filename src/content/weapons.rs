//! Weapon base stats

use serde::{Deserialize, Serialize};

/// How a weapon picks its firing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    /// Closest alive enemy within range
    Nearest,
    /// Opposite the player's velocity
    Rear,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeaponDef {
    pub id: &'static str,
    pub name: &'static str,
    pub tags: &'static [&'static str],
    pub base_cooldown: f32,
    pub base_damage: f32,
    pub base_projectile_speed: f32,
    pub base_range: f32,
    pub base_extra_shots: u32,
    pub target_mode: TargetMode,
    pub projectile_life: f32,
    pub base_pierce_count: u32,
}

impl WeaponDef {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(&tag)
    }
}

pub const AUTO_CANNON: &str = "auto_cannon";
pub const REAR_BLASTER: &str = "rear_blaster";
pub const RAIL_CANNON: &str = "rail_cannon";

/// Loadout every run starts with
pub const STARTING_LOADOUT: &[&str] = &[AUTO_CANNON];

pub static WEAPON_DEFS: &[WeaponDef] = &[
    WeaponDef {
        id: AUTO_CANNON,
        name: "Auto-Cannon",
        tags: &["ballistic", "auto"],
        base_cooldown: 0.35,
        base_damage: 10.0,
        base_projectile_speed: 900.0,
        base_range: 520.0,
        base_extra_shots: 0,
        target_mode: TargetMode::Nearest,
        projectile_life: 1.2,
        base_pierce_count: 0,
    },
    WeaponDef {
        id: REAR_BLASTER,
        name: "Rear Blaster",
        tags: &["ballistic", "rear"],
        base_cooldown: 0.6,
        base_damage: 8.0,
        base_projectile_speed: 700.0,
        base_range: 400.0,
        base_extra_shots: 0,
        target_mode: TargetMode::Rear,
        projectile_life: 1.0,
        base_pierce_count: 0,
    },
    WeaponDef {
        id: RAIL_CANNON,
        name: "Rail Cannon",
        tags: &["ballistic", "auto", "piercing", "rail"],
        base_cooldown: 0.75,
        base_damage: 40.0,
        base_projectile_speed: 1400.0,
        base_range: 700.0,
        base_extra_shots: 0,
        target_mode: TargetMode::Nearest,
        projectile_life: 1.0,
        base_pierce_count: 5,
    },
];

pub fn weapon_def(id: &str) -> Option<&'static WeaponDef> {
    WEAPON_DEFS.iter().find(|w| w.id == id)
}
