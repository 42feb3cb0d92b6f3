//! Data-driven game balance
//!
//! One immutable value passed explicitly to every system. `Default` is the
//! shipped balance; `from_json` overlays a partial document on top of it so
//! tests and experiments can swap individual knobs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimTuning {
    pub fixed_dt: f32,
    pub max_substeps: u32,
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            fixed_dt: SIM_DT,
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    /// px/s², positive y is down
    pub gravity: f32,
    /// Fraction of velocity removed per fixed step
    pub air_drag: f32,
    /// Extra drag per step while the contact debuff is active
    pub debuff_drag: f32,
    pub ground_friction: f32,
    pub bounce: f32,
    pub px_per_meter: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            gravity: 900.0,
            air_drag: 0.02,
            debuff_drag: 0.08,
            ground_friction: 0.12,
            bounce: 0.15,
            px_per_meter: 10.0,
        }
    }
}

/// Closed-form ground profile: base height plus three sinusoids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainTuning {
    pub base_y: f32,
    /// (amplitude, frequency, phase) per wave
    pub waves: [(f32, f32, f32); 3],
}

impl Default for TerrainTuning {
    fn default() -> Self {
        Self {
            base_y: 620.0,
            waves: [(40.0, 0.0021, 0.0), (22.0, 0.0057, 1.3), (9.0, 0.013, 0.4)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub radius: f32,
    pub hp_max: f32,
    pub boost_max: f32,
    pub boost_drain_per_sec: f32,
    pub boost_regen_per_sec: f32,
    pub boost_auto_regen: bool,
    pub thrust_accel: f32,
    pub stall_speed: f32,
    pub stall_time: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: 18.0,
            hp_max: 100.0,
            boost_max: 100.0,
            boost_drain_per_sec: 14.0,
            boost_regen_per_sec: 8.0,
            boost_auto_regen: false,
            thrust_accel: 1400.0,
            stall_speed: 35.0,
            stall_time: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherTuning {
    pub origin_x: f32,
    pub origin_y: f32,
    pub max_pull_dist: f32,
    /// Pulls shorter than this are treated as a cancelled drag
    pub min_pull_dist: f32,
    pub power_min: f32,
    pub power_max: f32,
    /// Pixels of pull -> launch speed
    pub power_scale: f32,
}

impl Default for LauncherTuning {
    fn default() -> Self {
        Self {
            origin_x: 200.0,
            origin_y: 420.0,
            max_pull_dist: 220.0,
            min_pull_dist: 6.0,
            power_min: 400.0,
            power_max: 1600.0,
            power_scale: 7.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub spawn_every_sec: f32,
    pub min_spawn_interval: f32,
    /// Interval reduction per km travelled
    pub interval_shrink_per_km: f32,
    pub max_alive_base: u32,
    /// Live cap grows with sqrt(km)
    pub max_alive_per_sqrt_km: f32,
    pub max_alive_cap: u32,
    pub spawn_ahead_min: f32,
    pub spawn_ahead_range: f32,
    pub spawn_above_min: f32,
    pub spawn_above_range: f32,
    pub drone_speed: f32,
    pub drone_hp: f32,
    pub drone_radius: f32,
    pub contact_speed_retain: f32,
    pub drag_debuff_sec: f32,
    pub contact_damage: f32,
    /// Fraction of the separation vector applied to a drone after contact
    pub contact_push: f32,
    pub cull_behind: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            spawn_every_sec: 2.0,
            min_spawn_interval: 0.7,
            interval_shrink_per_km: 0.35,
            max_alive_base: 8,
            max_alive_per_sqrt_km: 4.0,
            max_alive_cap: 20,
            spawn_ahead_min: 600.0,
            spawn_ahead_range: 400.0,
            spawn_above_min: 200.0,
            spawn_above_range: 250.0,
            drone_speed: 220.0,
            drone_hp: 20.0,
            drone_radius: 14.0,
            contact_speed_retain: 0.75,
            drag_debuff_sec: 0.75,
            contact_damage: 2.0,
            contact_push: 0.2,
            cull_behind: 1200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterTuning {
    /// Shooters never spawn before this distance
    pub min_distance_m: f32,
    pub base_chance: f32,
    pub speed: f32,
    pub hp: f32,
    pub standoff_min: f32,
    pub standoff_max: f32,
    pub fire_range: f32,
    pub fire_cooldown: f32,
}

impl Default for ShooterTuning {
    fn default() -> Self {
        Self {
            min_distance_m: 250.0,
            base_chance: 0.2,
            speed: 160.0,
            hp: 16.0,
            standoff_min: 260.0,
            standoff_max: 380.0,
            fire_range: 520.0,
            fire_cooldown: 2.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EliteTuning {
    /// Every Nth enemy spawn is elite
    pub every_n_spawns: u32,
    pub hp_mult: f32,
    pub speed_mult: f32,
    pub radius_mult: f32,
    pub contact_damage_mult: f32,
}

impl Default for EliteTuning {
    fn default() -> Self {
        Self {
            every_n_spawns: 10,
            hp_mult: 2.5,
            speed_mult: 1.25,
            radius_mult: 1.35,
            contact_damage_mult: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletTuning {
    pub speed: f32,
    pub damage: f32,
    pub radius: f32,
    pub ttl: f32,
    pub speed_retain: f32,
    pub drag_debuff_sec: f32,
}

impl Default for BulletTuning {
    fn default() -> Self {
        Self {
            speed: 420.0,
            damage: 6.0,
            radius: 6.0,
            ttl: 3.0,
            speed_retain: 0.85,
            drag_debuff_sec: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidClassTuning {
    pub radius: f32,
    pub hp: f32,
    pub scrap_reward: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidTuning {
    /// Seconds between pulses at density 1.0
    pub base_spawn_interval: f32,
    pub max_alive: usize,
    /// Size roll thresholds: below `small_below` is small, below `medium_below` medium
    pub small_below: f32,
    pub medium_below: f32,
    pub small: AsteroidClassTuning,
    pub medium: AsteroidClassTuning,
    pub large: AsteroidClassTuning,
    pub contact_damage: f32,
    pub sprite_variants: u32,
    pub spawn_ahead_min: f32,
    pub spawn_ahead_range: f32,
    /// Per-asteroid x jitter so a pulse does not form a column
    pub spawn_jitter: f32,
    pub spawn_above_min: f32,
    pub spawn_above_range: f32,
    /// Leftward drift speed range (px/s)
    pub drift_min: f32,
    pub drift_range: f32,
    /// Max spin (rad/s) either way
    pub max_spin: f32,
    pub cull_behind: f32,
}

impl Default for AsteroidTuning {
    fn default() -> Self {
        Self {
            base_spawn_interval: 3.0,
            max_alive: 12,
            small_below: 0.5,
            medium_below: 0.85,
            small: AsteroidClassTuning {
                radius: 14.0,
                hp: 15.0,
                scrap_reward: 2,
            },
            medium: AsteroidClassTuning {
                radius: 22.0,
                hp: 35.0,
                scrap_reward: 4,
            },
            large: AsteroidClassTuning {
                radius: 34.0,
                hp: 70.0,
                scrap_reward: 8,
            },
            contact_damage: 4.0,
            sprite_variants: 6,
            spawn_ahead_min: 600.0,
            spawn_ahead_range: 500.0,
            spawn_jitter: 120.0,
            spawn_above_min: 200.0,
            spawn_above_range: 280.0,
            drift_min: 25.0,
            drift_range: 35.0,
            max_spin: 0.4,
            cull_behind: 1200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    pub projectile_radius: f32,
    /// Angular spacing between multi-shot projectiles (radians)
    pub spread: f32,
    /// Rear weapons skip firing below this speed
    pub rear_min_speed: f32,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            projectile_radius: 4.0,
            spread: 0.12,
            rear_min_speed: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XpTuning {
    pub per_km: f32,
    pub per_kill: f32,
    pub base_to_level: f32,
    pub level_scale: f32,
}

impl Default for XpTuning {
    fn default() -> Self {
        Self {
            per_km: 100.0,
            per_kill: 5.0,
            base_to_level: 20.0,
            level_scale: 1.35,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapTuning {
    pub per_kill: f32,
}

impl Default for ScrapTuning {
    fn default() -> Self {
        Self { per_kill: 5.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoldTuning {
    pub scrap_to_gold_rate: f32,
    pub rocket_bonus: u32,
}

impl Default for GoldTuning {
    fn default() -> Self {
        Self {
            scrap_to_gold_rate: 0.5,
            rocket_bonus: 25,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundTuning {
    pub starting_rockets: u32,
    pub base_toll: u32,
    pub toll_scale: f32,
}

impl Default for RoundTuning {
    fn default() -> Self {
        Self {
            starting_rockets: 3,
            base_toll: 50,
            toll_scale: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinTuning {
    pub view_ahead: f32,
    pub first_cluster_offset: f32,
    pub cluster_min: u32,
    pub cluster_max: u32,
    pub spacing_min: u32,
    pub spacing_max: u32,
    pub cluster_gap: f32,
    pub height_min: f32,
    pub height_range: f32,
    pub pickup_radius: f32,
    pub gold_per_pickup: f32,
    pub cull_behind: f32,
}

impl Default for CoinTuning {
    fn default() -> Self {
        Self {
            view_ahead: 1200.0,
            first_cluster_offset: 500.0,
            cluster_min: 3,
            cluster_max: 6,
            spacing_min: 400,
            spacing_max: 900,
            cluster_gap: 45.0,
            height_min: 120.0,
            height_range: 130.0,
            pickup_radius: 10.0,
            gold_per_pickup: 1.0,
            cull_behind: 800.0,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub sim: SimTuning,
    pub world: WorldTuning,
    pub terrain: TerrainTuning,
    pub player: PlayerTuning,
    pub launcher: LauncherTuning,
    pub enemy: EnemyTuning,
    pub shooter: ShooterTuning,
    pub elite: EliteTuning,
    pub bullet: BulletTuning,
    pub asteroid: AsteroidTuning,
    pub weapon: WeaponTuning,
    pub xp: XpTuning,
    pub scrap: ScrapTuning,
    pub gold: GoldTuning,
    pub rounds: RoundTuning,
    pub coins: CoinTuning,
}

impl Tuning {
    /// Overlay a (possibly partial) JSON document on the defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |field, reason| Err(TuningError::Invalid { field, reason });
        if self.sim.fixed_dt <= 0.0 {
            return invalid("sim.fixed_dt", "must be positive");
        }
        if self.sim.max_substeps == 0 {
            return invalid("sim.max_substeps", "must be at least 1");
        }
        if self.player.stall_time <= 0.0 {
            return invalid("player.stall_time", "must be positive");
        }
        if self.launcher.power_min > self.launcher.power_max {
            return invalid("launcher.power_min", "must not exceed power_max");
        }
        if !self.world.px_per_meter.is_finite() || self.world.px_per_meter <= 0.0 {
            return invalid("world.px_per_meter", "must be positive");
        }
        if self.xp.base_to_level.is_nan() || self.xp.base_to_level < 1.0 {
            return invalid("xp.base_to_level", "must be at least 1.0");
        }
        if self.xp.level_scale < 1.0 {
            return invalid("xp.level_scale", "must be at least 1.0");
        }
        if self.coins.cluster_min > self.coins.cluster_max {
            return invalid("coins.cluster_min", "must not exceed cluster_max");
        }
        if self.coins.spacing_min > self.coins.spacing_max {
            return invalid("coins.spacing_min", "must not exceed spacing_max");
        }
        Ok(())
    }

    /// Distance in meters for a world x position
    pub fn distance_m(&self, x: f32) -> f32 {
        ((x - self.launcher.origin_x) / self.world.px_per_meter).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_overlays_defaults() {
        let tuning = Tuning::from_json(r#"{ "world": { "gravity": 450.0 } }"#).unwrap();
        assert_eq!(tuning.world.gravity, 450.0);
        assert_eq!(tuning.world.air_drag, WorldTuning::default().air_drag);
        assert_eq!(tuning.player, PlayerTuning::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Tuning::from_json(r#"{ "sim": { "fixed_dt": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "sim.fixed_dt", .. }));

        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Json(_)));
    }

    #[test]
    fn test_zero_cost_levels_rejected() {
        for json in [r#"{ "xp": { "base_to_level": 0.3 } }"#, r#"{ "xp": { "base_to_level": 0.0 } }"#] {
            let err = Tuning::from_json(json).unwrap_err();
            assert!(matches!(err, TuningError::Invalid { field: "xp.base_to_level", .. }));
        }
        assert!(Tuning::from_json(r#"{ "xp": { "base_to_level": 1.0 } }"#).is_ok());
    }

    #[test]
    fn test_non_positive_meter_scale_rejected() {
        for json in [r#"{ "world": { "px_per_meter": 0.0 } }"#, r#"{ "world": { "px_per_meter": -10.0 } }"#] {
            let err = Tuning::from_json(json).unwrap_err();
            assert!(matches!(err, TuningError::Invalid { field: "world.px_per_meter", .. }));
        }
    }

    #[test]
    fn test_distance_is_clamped_at_origin() {
        let tuning = Tuning::default();
        assert_eq!(tuning.distance_m(tuning.launcher.origin_x - 500.0), 0.0);
        assert_eq!(tuning.distance_m(tuning.launcher.origin_x + 1000.0), 100.0);
    }
}
