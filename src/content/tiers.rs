//! Distance-gated difficulty tiers
//!
//! The active tier is the one with the highest start distance not beyond the
//! current distance.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierReward {
    pub scrap_mult: f32,
    pub coin_gold_mult: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierDifficulty {
    pub enemy_hp_mult: f32,
    pub enemy_speed_mult: f32,
    pub shooter_chance_add: f32,
    pub elite_chance_add: f32,
}

/// Colours are 0xRRGGBB, consumed by the renderer only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierVisuals {
    pub ground_color: u32,
    pub ground_stroke: u32,
    pub accent_color: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierEnvironment {
    /// 0 disables obstacles; pulse interval = base interval / density
    pub asteroid_density: f32,
    pub asteroid_min_per_pulse: u32,
    pub asteroid_max_per_pulse: u32,
    /// Extra height (px) for coin clusters
    pub coin_height_lift: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TierDef {
    pub id: &'static str,
    pub name: &'static str,
    pub short_label: &'static str,
    pub start_meters: f32,
    pub reward: TierReward,
    pub difficulty: TierDifficulty,
    pub visuals: TierVisuals,
    pub environment: TierEnvironment,
}

pub static TIER_DEFS: &[TierDef] = &[
    TierDef {
        id: "T0",
        name: "Low Orbit",
        short_label: "T0",
        start_meters: 0.0,
        reward: TierReward {
            scrap_mult: 1.0,
            coin_gold_mult: 1.0,
        },
        difficulty: TierDifficulty {
            enemy_hp_mult: 1.0,
            enemy_speed_mult: 1.0,
            shooter_chance_add: 0.0,
            elite_chance_add: 0.0,
        },
        visuals: TierVisuals {
            ground_color: 0x1b2a3a,
            ground_stroke: 0x2d4a5e,
            accent_color: 0x6688aa,
        },
        environment: TierEnvironment {
            asteroid_density: 0.0,
            asteroid_min_per_pulse: 1,
            asteroid_max_per_pulse: 1,
            coin_height_lift: 0.0,
        },
    },
    TierDef {
        id: "T1",
        name: "Debris Field",
        short_label: "T1",
        start_meters: 1000.0,
        reward: TierReward {
            scrap_mult: 1.25,
            coin_gold_mult: 1.25,
        },
        difficulty: TierDifficulty {
            enemy_hp_mult: 1.2,
            enemy_speed_mult: 1.05,
            shooter_chance_add: 0.05,
            elite_chance_add: 0.0,
        },
        visuals: TierVisuals {
            ground_color: 0x1f2a2a,
            ground_stroke: 0x33554a,
            accent_color: 0x55cc88,
        },
        environment: TierEnvironment {
            asteroid_density: 0.25,
            asteroid_min_per_pulse: 1,
            asteroid_max_per_pulse: 2,
            coin_height_lift: 0.0,
        },
    },
    TierDef {
        id: "T2",
        name: "Asteroid Belt",
        short_label: "T2",
        start_meters: 2000.0,
        reward: TierReward {
            scrap_mult: 1.5,
            coin_gold_mult: 1.5,
        },
        difficulty: TierDifficulty {
            enemy_hp_mult: 1.45,
            enemy_speed_mult: 1.1,
            shooter_chance_add: 0.1,
            elite_chance_add: 0.02,
        },
        visuals: TierVisuals {
            ground_color: 0x2a1f2a,
            ground_stroke: 0x553355,
            accent_color: 0xcc66aa,
        },
        environment: TierEnvironment {
            asteroid_density: 0.35,
            asteroid_min_per_pulse: 1,
            asteroid_max_per_pulse: 3,
            coin_height_lift: 18.0,
        },
    },
    TierDef {
        id: "T3",
        name: "Deep Space",
        short_label: "T3",
        start_meters: 3000.0,
        reward: TierReward {
            scrap_mult: 2.0,
            coin_gold_mult: 2.0,
        },
        difficulty: TierDifficulty {
            enemy_hp_mult: 1.85,
            enemy_speed_mult: 1.15,
            shooter_chance_add: 0.15,
            elite_chance_add: 0.05,
        },
        visuals: TierVisuals {
            ground_color: 0x2a1a1a,
            ground_stroke: 0x553333,
            accent_color: 0xff6644,
        },
        environment: TierEnvironment {
            asteroid_density: 0.45,
            asteroid_min_per_pulse: 2,
            asteroid_max_per_pulse: 4,
            coin_height_lift: 18.0,
        },
    },
];

pub fn tier_for_distance(distance_m: f32) -> &'static TierDef {
    let mut result = &TIER_DEFS[0];
    for tier in TIER_DEFS {
        if distance_m >= tier.start_meters {
            result = tier;
        }
    }
    result
}
