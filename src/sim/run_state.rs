//! Run aggregate and derived-stat recomputation
//!
//! `RunState` owns everything that survives across rockets within one run.
//! The derived caches are private: they are only ever rebuilt from the
//! applied upgrades, artifacts and loadout by `recompute_stats`.

use std::collections::{BTreeMap, BTreeSet};

use crate::content::artifacts::{ArtifactEffect, EMERGENCY_FUEL_BOOST, artifact_def};
use crate::content::upgrades::{PlayerStat, Special, UpgradeEffect, WeaponMods, upgrade_def};
use crate::content::weapons::{REAR_BLASTER, STARTING_LOADOUT, TargetMode, weapon_def};
use crate::rng::Rng;
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedPlayerStats {
    pub hp_max: f32,
    pub boost_max: f32,
    pub boost_drain_per_sec: f32,
    pub boost_regen_per_sec: f32,
    pub boost_auto_regen: bool,
    pub thrust_accel: f32,
    pub stall_speed: f32,
    pub stall_time: f32,
    pub contact_speed_retain: f32,
    pub drag_debuff_sec: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedWeaponStats {
    pub id: &'static str,
    pub fire_cooldown: f32,
    pub range: f32,
    pub projectile_speed: f32,
    pub damage: f32,
    pub extra_shots: u32,
    pub target_mode: TargetMode,
    pub projectile_life: f32,
    pub pierce_count: u32,
}

/// Fold stat upgrades (and stat-affecting artifacts) over the tuning base values
pub fn derive_player_stats(
    applied_upgrades: &BTreeMap<&'static str, u32>,
    applied_artifacts: &BTreeSet<&'static str>,
    tuning: &Tuning,
) -> DerivedPlayerStats {
    let mut adds: BTreeMap<PlayerStat, f32> = BTreeMap::new();
    let mut mults: BTreeMap<PlayerStat, f32> = BTreeMap::new();
    let mut auto_regen = tuning.player.boost_auto_regen;

    for (&id, &count) in applied_upgrades {
        let Some(def) = upgrade_def(id) else {
            continue;
        };
        for _ in 0..count {
            match def.effect {
                UpgradeEffect::StatAdd { stat, amount } => {
                    *adds.entry(stat).or_insert(0.0) += amount;
                }
                UpgradeEffect::StatMult { stat, multiplier } => {
                    *mults.entry(stat).or_insert(1.0) *= multiplier;
                }
                UpgradeEffect::Special(Special::BoostAutoRegen) => auto_regen = true,
                UpgradeEffect::Special(Special::UnlockRearBlaster) => {}
                UpgradeEffect::WeaponMod { .. } => {}
            }
        }
    }

    for &id in applied_artifacts {
        if artifact_def(id).is_some_and(|def| def.effect == ArtifactEffect::EmergencyFuel) {
            *adds.entry(PlayerStat::BoostMax).or_insert(0.0) += EMERGENCY_FUEL_BOOST;
        }
    }

    let d = |stat: PlayerStat, base: f32| {
        (base + adds.get(&stat).copied().unwrap_or(0.0)) * mults.get(&stat).copied().unwrap_or(1.0)
    };

    DerivedPlayerStats {
        hp_max: d(PlayerStat::HpMax, tuning.player.hp_max),
        boost_max: d(PlayerStat::BoostMax, tuning.player.boost_max),
        boost_drain_per_sec: d(PlayerStat::BoostDrainPerSec, tuning.player.boost_drain_per_sec),
        boost_regen_per_sec: d(PlayerStat::BoostRegenPerSec, tuning.player.boost_regen_per_sec),
        boost_auto_regen: auto_regen,
        thrust_accel: d(PlayerStat::ThrustAccel, tuning.player.thrust_accel),
        stall_speed: d(PlayerStat::StallSpeed, tuning.player.stall_speed),
        stall_time: d(PlayerStat::StallTime, tuning.player.stall_time),
        contact_speed_retain: d(PlayerStat::ContactSpeedRetain, tuning.enemy.contact_speed_retain),
        drag_debuff_sec: d(PlayerStat::DragDebuffSec, tuning.enemy.drag_debuff_sec),
    }
}

/// Fold weapon mods into per-weapon stats. Untagged mods apply to every weapon.
pub fn derive_weapon_stats(
    applied_upgrades: &BTreeMap<&'static str, u32>,
    loadout: &[&'static str],
) -> BTreeMap<&'static str, DerivedWeaponStats> {
    let mut mods: Vec<(Option<&'static str>, WeaponMods)> = Vec::new();
    for (&id, &count) in applied_upgrades {
        if let Some(UpgradeEffect::WeaponMod { tag, mods: m }) = upgrade_def(id).map(|d| d.effect) {
            for _ in 0..count {
                mods.push((tag, m));
            }
        }
    }

    let mut result = BTreeMap::new();
    for &weapon_id in loadout {
        let Some(wdef) = weapon_def(weapon_id) else {
            continue;
        };

        let mut total = WeaponMods::IDENTITY;
        for (tag, m) in &mods {
            if tag.is_some_and(|t| !wdef.has_tag(t)) {
                continue;
            }
            total.cooldown_mult *= m.cooldown_mult;
            total.damage_mult *= m.damage_mult;
            total.damage_add += m.damage_add;
            total.projectile_speed_mult *= m.projectile_speed_mult;
            total.range_mult *= m.range_mult;
            total.extra_shots_add += m.extra_shots_add;
        }

        result.insert(
            weapon_id,
            DerivedWeaponStats {
                id: wdef.id,
                fire_cooldown: wdef.base_cooldown * total.cooldown_mult,
                range: wdef.base_range * total.range_mult,
                projectile_speed: wdef.base_projectile_speed * total.projectile_speed_mult,
                damage: (wdef.base_damage + total.damage_add) * total.damage_mult,
                extra_shots: wdef.base_extra_shots + total.extra_shots_add,
                target_mode: wdef.target_mode,
                projectile_life: wdef.projectile_life,
                pierce_count: wdef.base_pierce_count,
            },
        );
    }
    result
}

/// Mutable state for one play session
#[derive(Debug, Clone)]
pub struct RunState {
    /// Seed the run was started with, stored in replays
    pub seed: u64,
    /// The only random source for spawns, rolls and offers
    pub rng: Rng,

    /// 1-based; bumped each time a toll is paid
    pub round: u32,
    /// Rockets left this round, including the one in flight
    pub rockets_remaining: u32,
    /// Unbanked scrap for the current round; converted at round end
    pub scrap: u32,
    /// Spendable merchant currency
    pub gold: u32,
    pub total_gold_earned: u32,
    /// Lifetime scrap, never reduced by tolls
    pub total_scrap: u32,
    /// Scrap needed to clear the current round
    pub round_toll: u32,

    /// XP banked toward the next level
    pub xp: f32,
    /// Cost of the next level; grows by `level_scale` each level
    pub xp_to_next_level: f32,
    pub level: u32,
    /// Levels gained but not yet turned into upgrade offers
    pub pending_level_ups: u32,
    pub total_kills: u32,
    /// Sum of each rocket's furthest distance
    pub total_distance_m: f32,
    /// Furthest single-rocket distance this run
    pub best_distance_m: f32,

    /// Upgrade id to stack count
    pub applied_upgrades: BTreeMap<&'static str, u32>,
    /// Evolutions already performed; each fires at most once
    pub applied_evolutions: BTreeSet<&'static str>,
    pub applied_artifacts: BTreeSet<&'static str>,
    /// Weapon ids in firing order; evolutions swap entries in place
    pub weapon_loadout: Vec<&'static str>,

    /// Cooperative gate: no timer advances while set
    pub paused: bool,

    /// Cached derivations; only `recompute_stats` writes these
    player_stats: DerivedPlayerStats,
    weapon_stats: BTreeMap<&'static str, DerivedWeaponStats>,
}

impl RunState {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let applied_upgrades = BTreeMap::new();
        let applied_artifacts = BTreeSet::new();
        let weapon_loadout = STARTING_LOADOUT.to_vec();
        Self {
            seed,
            rng: Rng::new(seed),
            round: 1,
            rockets_remaining: tuning.rounds.starting_rockets,
            scrap: 0,
            gold: 0,
            total_gold_earned: 0,
            total_scrap: 0,
            round_toll: tuning.rounds.base_toll,
            xp: 0.0,
            xp_to_next_level: tuning.xp.base_to_level,
            level: 0,
            pending_level_ups: 0,
            total_kills: 0,
            total_distance_m: 0.0,
            best_distance_m: 0.0,
            player_stats: derive_player_stats(&applied_upgrades, &applied_artifacts, tuning),
            weapon_stats: derive_weapon_stats(&applied_upgrades, &weapon_loadout),
            applied_upgrades,
            applied_evolutions: BTreeSet::new(),
            applied_artifacts,
            weapon_loadout,
            paused: false,
        }
    }

    pub fn player_stats(&self) -> &DerivedPlayerStats {
        &self.player_stats
    }

    pub fn weapon_stats(&self, weapon_id: &str) -> Option<&DerivedWeaponStats> {
        self.weapon_stats.get(weapon_id)
    }

    pub fn all_weapon_stats(&self) -> &BTreeMap<&'static str, DerivedWeaponStats> {
        &self.weapon_stats
    }

    pub fn upgrade_stacks(&self, id: &str) -> u32 {
        self.applied_upgrades.get(id).copied().unwrap_or(0)
    }

    pub fn has_artifact(&self, id: &str) -> bool {
        self.applied_artifacts.contains(id)
    }

    /// Rebuild both derived caches from the applied state
    pub fn recompute_stats(&mut self, tuning: &Tuning) {
        self.player_stats =
            derive_player_stats(&self.applied_upgrades, &self.applied_artifacts, tuning);
        self.weapon_stats = derive_weapon_stats(&self.applied_upgrades, &self.weapon_loadout);
    }

    /// Add one stack of an upgrade. Unknown ids are ignored and return false.
    pub fn apply_upgrade(&mut self, id: &str, tuning: &Tuning) -> bool {
        let Some(def) = upgrade_def(id) else {
            log::warn!("ignoring unknown upgrade `{id}`");
            return false;
        };
        *self.applied_upgrades.entry(def.id).or_insert(0) += 1;

        if def.effect == UpgradeEffect::Special(Special::UnlockRearBlaster)
            && !self.weapon_loadout.contains(&REAR_BLASTER)
        {
            self.weapon_loadout.push(REAR_BLASTER);
        }

        self.recompute_stats(tuning);
        log::info!("upgrade applied: {} (x{})", def.id, self.upgrade_stacks(def.id));
        true
    }

    /// Record gold income, keeping the lifetime total in step
    pub fn add_gold(&mut self, amount: u32) {
        self.gold += amount;
        self.total_gold_earned += amount;
    }

    /// Record scrap income, keeping the lifetime total in step
    pub fn add_scrap(&mut self, amount: u32) {
        self.scrap += amount;
        self.total_scrap += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::weapons::AUTO_CANNON;

    #[test]
    fn test_fresh_run_uses_tuning_base() {
        let tuning = Tuning::default();
        let run = RunState::new(7, &tuning);
        let ps = run.player_stats();
        assert_eq!(ps.hp_max, tuning.player.hp_max);
        assert_eq!(ps.boost_max, tuning.player.boost_max);
        assert_eq!(ps.contact_speed_retain, tuning.enemy.contact_speed_retain);
        assert_eq!(run.weapon_loadout, vec![AUTO_CANNON]);
        assert_eq!(run.round_toll, tuning.rounds.base_toll);
        assert!(run.weapon_stats(AUTO_CANNON).is_some());
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let tuning = Tuning::default();
        let mut run = RunState::new(1, &tuning);
        for id in ["thrust_power_up", "thrust_power_up", "fire_rate_up", "hull_plating"] {
            run.apply_upgrade(id, &tuning);
        }
        let first = (run.player_stats().clone(), run.all_weapon_stats().clone());
        run.recompute_stats(&tuning);
        let second = (run.player_stats().clone(), run.all_weapon_stats().clone());
        assert_eq!(first, second);
        assert_eq!(
            first.0.thrust_accel.to_bits(),
            second.0.thrust_accel.to_bits()
        );
    }

    #[test]
    fn test_add_and_mult_fold() {
        let tuning = Tuning::default();
        let mut run = RunState::new(1, &tuning);
        run.apply_upgrade("hull_plating", &tuning);
        run.apply_upgrade("hull_plating", &tuning);
        assert_eq!(run.player_stats().hp_max, tuning.player.hp_max + 40.0);

        run.apply_upgrade("thrust_power_up", &tuning);
        let expected = tuning.player.thrust_accel * 1.12;
        assert!((run.player_stats().thrust_accel - expected).abs() < 1e-3);
    }

    #[test]
    fn test_tagged_weapon_mod_scoped() {
        let tuning = Tuning::default();
        let mut run = RunState::new(1, &tuning);
        run.apply_upgrade("rear_blaster_unlock", &tuning);
        run.apply_upgrade("cannon_damage_up", &tuning);

        let auto = weapon_def(AUTO_CANNON).unwrap();
        let rear = weapon_def(REAR_BLASTER).unwrap();
        assert_eq!(run.weapon_stats(AUTO_CANNON).unwrap().damage, auto.base_damage + 4.0);
        assert_eq!(run.weapon_stats(REAR_BLASTER).unwrap().damage, rear.base_damage);
    }

    #[test]
    fn test_global_weapon_mod_hits_all() {
        let tuning = Tuning::default();
        let mut run = RunState::new(1, &tuning);
        run.apply_upgrade("rear_blaster_unlock", &tuning);
        run.apply_upgrade("fire_rate_up", &tuning);
        for id in [AUTO_CANNON, REAR_BLASTER] {
            let base = weapon_def(id).unwrap().base_cooldown;
            let cd = run.weapon_stats(id).unwrap().fire_cooldown;
            assert!((cd - base * 0.9).abs() < 1e-6);
        }
    }

    #[test]
    fn test_unlock_special_extends_loadout_once() {
        let tuning = Tuning::default();
        let mut run = RunState::new(1, &tuning);
        run.apply_upgrade("rear_blaster_unlock", &tuning);
        run.apply_upgrade("rear_blaster_unlock", &tuning);
        assert_eq!(run.weapon_loadout, vec![AUTO_CANNON, REAR_BLASTER]);
    }

    #[test]
    fn test_auto_regen_special() {
        let tuning = Tuning::default();
        let mut run = RunState::new(1, &tuning);
        assert!(!run.player_stats().boost_auto_regen);
        run.apply_upgrade("boost_auto_regen", &tuning);
        assert!(run.player_stats().boost_auto_regen);
    }

    #[test]
    fn test_emergency_fuel_artifact_adds_boost() {
        let tuning = Tuning::default();
        let mut run = RunState::new(1, &tuning);
        run.applied_artifacts.insert("emergency_fuel");
        run.recompute_stats(&tuning);
        assert_eq!(run.player_stats().boost_max, tuning.player.boost_max + EMERGENCY_FUEL_BOOST);
    }

    #[test]
    fn test_unknown_upgrade_ignored() {
        let tuning = Tuning::default();
        let mut run = RunState::new(1, &tuning);
        assert!(!run.apply_upgrade("warp_drive", &tuning));
        assert!(run.applied_upgrades.is_empty());
    }
}
