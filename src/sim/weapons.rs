//! Auto-firing weapons
//!
//! Each loadout weapon has its own cooldown clock. A weapon with no valid
//! target keeps its clock at zero and fires the first tick one appears.

use std::collections::BTreeMap;

use glam::Vec2;

use super::entities::{Drone, EntityIds, Player, Projectile};
use super::run_state::{DerivedWeaponStats, RunState};
use crate::content::weapons::TargetMode;
use crate::tuning::WeaponTuning;
use crate::{angle_of, direction_from_angle};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeaponSystem {
    cooldowns: BTreeMap<&'static str, f32>,
}

impl WeaponSystem {
    pub fn cooldown(&self, weapon_id: &str) -> f32 {
        self.cooldowns.get(weapon_id).copied().unwrap_or(0.0)
    }

    pub fn reset(&mut self) {
        self.cooldowns.clear();
    }

    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        run: &RunState,
        player: &Player,
        drones: &[Drone],
        projectiles: &mut Vec<Projectile>,
        tuning: &WeaponTuning,
        ids: &mut EntityIds,
        dt: f32,
    ) {
        if !player.launched {
            return;
        }

        for &weapon_id in &run.weapon_loadout {
            let Some(stats) = run.weapon_stats(weapon_id) else {
                continue;
            };

            let cd = self.cooldowns.entry(weapon_id).or_insert(0.0);
            *cd = (*cd - dt).max(0.0);
            if *cd > 0.0 {
                continue;
            }

            let dir = match stats.target_mode {
                TargetMode::Nearest => nearest_target(player.pos, drones, stats.range)
                    .map(|d| (d.pos - player.pos).normalize_or_zero()),
                TargetMode::Rear => rear_direction(player.vel, tuning.rear_min_speed),
            };
            let Some(dir) = dir else {
                continue;
            };

            emit_volley(player.pos, dir, stats, tuning, ids, projectiles);
            *cd = stats.fire_cooldown;
        }
    }
}

/// Closest live drone within `range` of `from`
pub fn nearest_target(from: Vec2, drones: &[Drone], range: f32) -> Option<&Drone> {
    let mut best: Option<(&Drone, f32)> = None;
    for d in drones.iter().filter(|d| d.alive) {
        let dist = from.distance(d.pos);
        if dist > range {
            continue;
        }
        if best.is_none_or(|(_, b)| dist < b) {
            best = Some((d, dist));
        }
    }
    best.map(|(d, _)| d)
}

/// Opposite the velocity, once moving faster than `min_speed`
pub fn rear_direction(vel: Vec2, min_speed: f32) -> Option<Vec2> {
    let speed = vel.length();
    if speed < min_speed || speed == 0.0 {
        return None;
    }
    Some(-vel / speed)
}

fn emit_volley(
    origin: Vec2,
    dir: Vec2,
    stats: &DerivedWeaponStats,
    tuning: &WeaponTuning,
    ids: &mut EntityIds,
    projectiles: &mut Vec<Projectile>,
) {
    let total = 1 + stats.extra_shots;
    let base_angle = angle_of(dir);

    for i in 0..total {
        let offset = (i as f32 - (total - 1) as f32 / 2.0) * tuning.spread;
        let shot_dir = direction_from_angle(base_angle + offset);
        projectiles.push(Projectile {
            id: ids.next_id(),
            pos: origin,
            vel: shot_dir * stats.projectile_speed,
            radius: tuning.projectile_radius,
            damage: stats.damage,
            ttl: stats.projectile_life,
            piercing: stats.pierce_count > 0,
            pierce_left: stats.pierce_count,
            hit_ids: Vec::new(),
            alive: true,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::content::weapons::{AUTO_CANNON, REAR_BLASTER};
    use crate::sim::entities::DroneKind;
    use crate::tuning::Tuning;

    fn setup() -> (Tuning, RunState, Player) {
        let tuning = Tuning::default();
        let run = RunState::new(4, &tuning);
        let mut player = Player::new(run.player_stats(), &tuning);
        player.pos = Vec2::ZERO;
        player.launched = true;
        (tuning, run, player)
    }

    fn drone_at(id: u32, pos: Vec2) -> Drone {
        Drone {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: 14.0,
            hp: 20.0,
            speed: 0.0,
            kind: DroneKind::Chaser,
            elite: false,
            alive: true,
            shoot_timer: 0.0,
        }
    }

    #[test]
    fn test_fires_at_nearest_in_range() {
        let (tuning, run, player) = setup();
        let drones = vec![drone_at(1, Vec2::new(300.0, 0.0)), drone_at(2, Vec2::new(0.0, 100.0))];
        let mut projectiles = Vec::new();
        let mut ids = EntityIds::default();
        let mut weapons = WeaponSystem::default();
        weapons.update(&run, &player, &drones, &mut projectiles, &tuning.weapon, &mut ids, SIM_DT);

        assert_eq!(projectiles.len(), 1);
        assert!(projectiles[0].vel.y > 0.0);
        assert!(projectiles[0].vel.x.abs() < 1e-3);
        let stats = run.weapon_stats(AUTO_CANNON).unwrap();
        assert_eq!(weapons.cooldown(AUTO_CANNON), stats.fire_cooldown);
    }

    #[test]
    fn test_out_of_range_holds_fire() {
        let (tuning, run, player) = setup();
        let range = run.weapon_stats(AUTO_CANNON).unwrap().range;
        let drones = vec![drone_at(1, Vec2::new(range + 1.0, 0.0))];
        let mut projectiles = Vec::new();
        let mut ids = EntityIds::default();
        let mut weapons = WeaponSystem::default();
        weapons.update(&run, &player, &drones, &mut projectiles, &tuning.weapon, &mut ids, SIM_DT);
        assert!(projectiles.is_empty());
        assert_eq!(weapons.cooldown(AUTO_CANNON), 0.0);
    }

    #[test]
    fn test_cooldown_gates_refire() {
        let (tuning, run, player) = setup();
        let drones = vec![drone_at(1, Vec2::new(200.0, 0.0))];
        let mut projectiles = Vec::new();
        let mut ids = EntityIds::default();
        let mut weapons = WeaponSystem::default();
        for _ in 0..3 {
            weapons.update(&run, &player, &drones, &mut projectiles, &tuning.weapon, &mut ids, SIM_DT);
        }
        assert_eq!(projectiles.len(), 1);
    }

    #[test]
    fn test_extra_shots_fan_around_target() {
        let (tuning, mut run, player) = setup();
        run.apply_upgrade("extra_shot", &tuning);
        run.apply_upgrade("extra_shot", &tuning);
        let drones = vec![drone_at(1, Vec2::new(200.0, 0.0))];
        let mut projectiles = Vec::new();
        let mut ids = EntityIds::default();
        let mut weapons = WeaponSystem::default();
        weapons.update(&run, &player, &drones, &mut projectiles, &tuning.weapon, &mut ids, SIM_DT);

        assert_eq!(projectiles.len(), 3);
        let angles: Vec<f32> = projectiles.iter().map(|p| angle_of(p.vel)).collect();
        assert!((angles[0] + tuning.weapon.spread).abs() < 1e-4);
        assert!(angles[1].abs() < 1e-4);
        assert!((angles[2] - tuning.weapon.spread).abs() < 1e-4);
    }

    #[test]
    fn test_rear_fires_against_velocity() {
        let (tuning, mut run, mut player) = setup();
        run.apply_upgrade("rear_blaster_unlock", &tuning);
        player.vel = Vec2::new(400.0, 0.0);
        let mut projectiles = Vec::new();
        let mut ids = EntityIds::default();
        let mut weapons = WeaponSystem::default();
        weapons.update(&run, &player, &[], &mut projectiles, &tuning.weapon, &mut ids, SIM_DT);

        assert_eq!(projectiles.len(), 1);
        assert!(projectiles[0].vel.x < 0.0);
        assert!(weapons.cooldown(REAR_BLASTER) > 0.0);
    }

    #[test]
    fn test_rear_skips_when_slow() {
        assert!(rear_direction(Vec2::new(5.0, 0.0), 20.0).is_none());
        assert!(rear_direction(Vec2::ZERO, 0.0).is_none());
        assert_eq!(rear_direction(Vec2::new(0.0, 50.0), 20.0), Some(Vec2::new(0.0, -1.0)));
    }
}
