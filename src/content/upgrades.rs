//! Upgrade definitions and the level-up offer pool
//!
//! Effects are a closed sum type so stat derivation can match exhaustively.
//! Offers are drawn by repeated weighted sampling without replacement from the
//! run's RNG.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::weapons::REAR_BLASTER;
use crate::rng::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
}

impl Rarity {
    /// Default sampling weight
    pub fn weight(&self) -> u32 {
        match self {
            Rarity::Common => 100,
            Rarity::Rare => 40,
            Rarity::Epic => 10,
        }
    }
}

/// Player stats that upgrades can add to or multiply
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStat {
    HpMax,
    BoostMax,
    BoostDrainPerSec,
    BoostRegenPerSec,
    ThrustAccel,
    StallSpeed,
    StallTime,
    ContactSpeedRetain,
    DragDebuffSec,
}

/// Weapon modifiers; multiplicative fields fold by product, additive by sum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponMods {
    pub cooldown_mult: f32,
    pub damage_mult: f32,
    pub damage_add: f32,
    pub projectile_speed_mult: f32,
    pub range_mult: f32,
    pub extra_shots_add: u32,
}

impl WeaponMods {
    pub const IDENTITY: WeaponMods = WeaponMods {
        cooldown_mult: 1.0,
        damage_mult: 1.0,
        damage_add: 0.0,
        projectile_speed_mult: 1.0,
        range_mult: 1.0,
        extra_shots_add: 0,
    };
}

impl Default for WeaponMods {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Named one-off effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Special {
    BoostAutoRegen,
    UnlockRearBlaster,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpgradeEffect {
    StatAdd { stat: PlayerStat, amount: f32 },
    StatMult { stat: PlayerStat, multiplier: f32 },
    /// `tag: None` applies to every weapon in the loadout
    WeaponMod {
        tag: Option<&'static str>,
        mods: WeaponMods,
    },
    Special(Special),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Upgrade(&'static str),
    Weapon(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    pub stackable: bool,
    /// Hard cap on stacks; `None` = unlimited (if stackable)
    pub max_stacks: Option<u32>,
    /// Overrides the rarity weight
    pub pick_weight: Option<u32>,
    /// All must hold
    pub requires: &'static [Requirement],
    /// Any applied excludes this upgrade
    pub excludes: &'static [&'static str],
    pub effect: UpgradeEffect,
}

impl UpgradeDef {
    pub fn weight(&self) -> u32 {
        self.pick_weight.unwrap_or_else(|| self.rarity.weight())
    }
}

/// One offered choice
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeChoice {
    pub def: &'static UpgradeDef,
    pub current_stacks: u32,
}

const fn stat_add(stat: PlayerStat, amount: f32) -> UpgradeEffect {
    UpgradeEffect::StatAdd { stat, amount }
}

const fn stat_mult(stat: PlayerStat, multiplier: f32) -> UpgradeEffect {
    UpgradeEffect::StatMult { stat, multiplier }
}

pub static UPGRADE_DEFS: &[UpgradeDef] = &[
    UpgradeDef {
        id: "thrust_power_up",
        name: "Thrust Power",
        description: "+12% thrust acceleration.",
        rarity: Rarity::Common,
        stackable: true,
        max_stacks: Some(5),
        pick_weight: None,
        requires: &[],
        excludes: &[],
        effect: stat_mult(PlayerStat::ThrustAccel, 1.12),
    },
    UpgradeDef {
        id: "boost_max_up",
        name: "Bigger Tanks",
        description: "+20 boost capacity.",
        rarity: Rarity::Common,
        stackable: true,
        max_stacks: Some(5),
        pick_weight: None,
        requires: &[],
        excludes: &[],
        effect: stat_add(PlayerStat::BoostMax, 20.0),
    },
    UpgradeDef {
        id: "boost_efficiency",
        name: "Efficient Burn",
        description: "Boost drains 15% slower.",
        rarity: Rarity::Rare,
        stackable: true,
        max_stacks: Some(3),
        pick_weight: None,
        requires: &[],
        excludes: &[],
        effect: stat_mult(PlayerStat::BoostDrainPerSec, 0.85),
    },
    UpgradeDef {
        id: "boost_auto_regen",
        name: "Ram Scoop",
        description: "Boost regenerates while coasting.",
        rarity: Rarity::Rare,
        stackable: false,
        max_stacks: None,
        pick_weight: None,
        requires: &[],
        excludes: &[],
        effect: UpgradeEffect::Special(Special::BoostAutoRegen),
    },
    UpgradeDef {
        id: "boost_regen_up",
        name: "Scoop Intake",
        description: "+3 boost regenerated per second.",
        rarity: Rarity::Common,
        stackable: true,
        max_stacks: Some(4),
        pick_weight: None,
        requires: &[Requirement::Upgrade("boost_auto_regen")],
        excludes: &[],
        effect: stat_add(PlayerStat::BoostRegenPerSec, 3.0),
    },
    UpgradeDef {
        id: "hull_plating",
        name: "Hull Plating",
        description: "+20 max hull.",
        rarity: Rarity::Common,
        stackable: true,
        max_stacks: Some(5),
        pick_weight: None,
        requires: &[],
        excludes: &["glass_cannon"],
        effect: stat_add(PlayerStat::HpMax, 20.0),
    },
    UpgradeDef {
        id: "stall_tolerance",
        name: "Glide Fins",
        description: "+0.5s before a stall ends the rocket.",
        rarity: Rarity::Rare,
        stackable: true,
        max_stacks: Some(3),
        pick_weight: None,
        requires: &[],
        excludes: &[],
        effect: stat_add(PlayerStat::StallTime, 0.5),
    },
    UpgradeDef {
        id: "low_stall",
        name: "Trim Tabs",
        description: "Stall speed threshold -15%.",
        rarity: Rarity::Rare,
        stackable: true,
        max_stacks: Some(3),
        pick_weight: None,
        requires: &[],
        excludes: &[],
        effect: stat_mult(PlayerStat::StallSpeed, 0.85),
    },
    UpgradeDef {
        id: "deflector",
        name: "Deflector",
        description: "Keep 5% more speed on contact.",
        rarity: Rarity::Rare,
        stackable: true,
        max_stacks: Some(3),
        pick_weight: None,
        requires: &[],
        excludes: &[],
        effect: stat_add(PlayerStat::ContactSpeedRetain, 0.05),
    },
    UpgradeDef {
        id: "shock_dampers",
        name: "Shock Dampers",
        description: "Contact drag lasts 20% shorter.",
        rarity: Rarity::Common,
        stackable: true,
        max_stacks: Some(3),
        pick_weight: None,
        requires: &[],
        excludes: &[],
        effect: stat_mult(PlayerStat::DragDebuffSec, 0.8),
    },
    UpgradeDef {
        id: "cannon_damage_up",
        name: "Heavy Rounds",
        description: "+4 damage for auto-targeting weapons.",
        rarity: Rarity::Common,
        stackable: true,
        max_stacks: Some(5),
        pick_weight: None,
        requires: &[],
        excludes: &[],
        effect: UpgradeEffect::WeaponMod {
            tag: Some("auto"),
            mods: WeaponMods {
                damage_add: 4.0,
                ..WeaponMods::IDENTITY
            },
        },
    },
    UpgradeDef {
        id: "fire_rate_up",
        name: "Rapid Loader",
        description: "All weapons fire 10% faster.",
        rarity: Rarity::Common,
        stackable: true,
        max_stacks: Some(5),
        pick_weight: None,
        requires: &[],
        excludes: &[],
        effect: UpgradeEffect::WeaponMod {
            tag: None,
            mods: WeaponMods {
                cooldown_mult: 0.9,
                ..WeaponMods::IDENTITY
            },
        },
    },
    UpgradeDef {
        id: "projectile_speed_up",
        name: "Muzzle Boost",
        description: "+15% projectile speed, +5% range.",
        rarity: Rarity::Common,
        stackable: true,
        max_stacks: Some(3),
        pick_weight: None,
        requires: &[],
        excludes: &[],
        effect: UpgradeEffect::WeaponMod {
            tag: None,
            mods: WeaponMods {
                projectile_speed_mult: 1.15,
                range_mult: 1.05,
                ..WeaponMods::IDENTITY
            },
        },
    },
    UpgradeDef {
        id: "long_range_optics",
        name: "Long-Range Optics",
        description: "+25% range for auto-targeting weapons.",
        rarity: Rarity::Rare,
        stackable: false,
        max_stacks: None,
        pick_weight: None,
        requires: &[Requirement::Upgrade("projectile_speed_up")],
        excludes: &[],
        effect: UpgradeEffect::WeaponMod {
            tag: Some("auto"),
            mods: WeaponMods {
                range_mult: 1.25,
                ..WeaponMods::IDENTITY
            },
        },
    },
    UpgradeDef {
        id: "extra_shot",
        name: "Split Barrel",
        description: "+1 projectile per volley for auto-targeting weapons.",
        rarity: Rarity::Epic,
        stackable: true,
        max_stacks: Some(2),
        pick_weight: None,
        requires: &[],
        excludes: &[],
        effect: UpgradeEffect::WeaponMod {
            tag: Some("auto"),
            mods: WeaponMods {
                extra_shots_add: 1,
                ..WeaponMods::IDENTITY
            },
        },
    },
    UpgradeDef {
        id: "rear_blaster_unlock",
        name: "Rear Blaster",
        description: "Adds a blaster that fires behind you.",
        rarity: Rarity::Rare,
        stackable: false,
        max_stacks: None,
        pick_weight: Some(60),
        requires: &[],
        excludes: &[],
        effect: UpgradeEffect::Special(Special::UnlockRearBlaster),
    },
    UpgradeDef {
        id: "rear_damage_up",
        name: "Afterburner Rounds",
        description: "Rear weapons deal 25% more damage.",
        rarity: Rarity::Common,
        stackable: true,
        max_stacks: Some(3),
        pick_weight: None,
        requires: &[Requirement::Weapon(REAR_BLASTER)],
        excludes: &[],
        effect: UpgradeEffect::WeaponMod {
            tag: Some("rear"),
            mods: WeaponMods {
                damage_mult: 1.25,
                ..WeaponMods::IDENTITY
            },
        },
    },
    UpgradeDef {
        id: "glass_cannon",
        name: "Glass Cannon",
        description: "All weapons deal 40% more damage. No hull plating.",
        rarity: Rarity::Epic,
        stackable: false,
        max_stacks: None,
        pick_weight: None,
        requires: &[],
        excludes: &["hull_plating"],
        effect: UpgradeEffect::WeaponMod {
            tag: None,
            mods: WeaponMods {
                damage_mult: 1.4,
                ..WeaponMods::IDENTITY
            },
        },
    },
];

pub fn upgrade_def(id: &str) -> Option<&'static UpgradeDef> {
    UPGRADE_DEFS.iter().find(|d| d.id == id)
}

fn stacks_of(applied: &BTreeMap<&'static str, u32>, id: &str) -> u32 {
    applied.get(id).copied().unwrap_or(0)
}

/// Whether the stack, prerequisite and exclusion gates pass for `def`
pub fn is_available(
    def: &UpgradeDef,
    applied: &BTreeMap<&'static str, u32>,
    loadout: &[&'static str],
) -> bool {
    let stacks = stacks_of(applied, def.id);
    if !def.stackable && stacks > 0 {
        return false;
    }
    if def.max_stacks.is_some_and(|max| stacks >= max) {
        return false;
    }
    if def.excludes.iter().any(|ex| stacks_of(applied, ex) > 0) {
        return false;
    }
    def.requires.iter().all(|req| match req {
        Requirement::Upgrade(id) => stacks_of(applied, id) > 0,
        Requirement::Weapon(id) => loadout.contains(id),
    })
}

/// Every upgrade currently eligible for an offer, in table order
pub fn available_upgrades(
    applied: &BTreeMap<&'static str, u32>,
    loadout: &[&'static str],
) -> Vec<&'static UpgradeDef> {
    UPGRADE_DEFS
        .iter()
        .filter(|def| is_available(def, applied, loadout))
        .collect()
}

/// Draw up to `count` distinct choices, weighted, without replacement.
///
/// An exhausted pool yields an empty list; callers treat that as "nothing to
/// offer" rather than an error.
pub fn roll_upgrade_choices(
    rng: &mut Rng,
    applied: &BTreeMap<&'static str, u32>,
    count: usize,
    loadout: &[&'static str],
) -> Vec<UpgradeChoice> {
    let mut remaining = available_upgrades(applied, loadout);
    let mut picks = Vec::with_capacity(count.min(remaining.len()));

    while picks.len() < count && !remaining.is_empty() {
        let total: u32 = remaining.iter().map(|d| d.weight()).sum();
        let mut roll = rng.next_float() * total as f32;
        let mut idx = remaining.len() - 1;
        for (i, def) in remaining.iter().enumerate() {
            roll -= def.weight() as f32;
            if roll <= 0.0 {
                idx = i;
                break;
            }
        }
        let def = remaining.remove(idx);
        picks.push(UpgradeChoice {
            def,
            current_stacks: stacks_of(applied, def.id),
        });
    }

    picks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::weapons::STARTING_LOADOUT;

    fn applied_with(entries: &[(&'static str, u32)]) -> BTreeMap<&'static str, u32> {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_ids_are_unique() {
        for (i, a) in UPGRADE_DEFS.iter().enumerate() {
            for b in &UPGRADE_DEFS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_three_unique_choices() {
        let mut rng = Rng::new(42);
        let choices = roll_upgrade_choices(&mut rng, &BTreeMap::new(), 3, STARTING_LOADOUT);
        assert_eq!(choices.len(), 3);
        assert_ne!(choices[0].def.id, choices[1].def.id);
        assert_ne!(choices[0].def.id, choices[2].def.id);
        assert_ne!(choices[1].def.id, choices[2].def.id);
    }

    #[test]
    fn test_same_seed_same_offer() {
        let applied = BTreeMap::new();
        let a = roll_upgrade_choices(&mut Rng::new(100), &applied, 3, STARTING_LOADOUT);
        let b = roll_upgrade_choices(&mut Rng::new(100), &applied, 3, STARTING_LOADOUT);
        let ids = |c: &[UpgradeChoice]| c.iter().map(|c| c.def.id).collect::<Vec<_>>();
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn test_non_stackable_leaves_pool_once_applied() {
        let applied = applied_with(&[("rear_blaster_unlock", 1)]);
        let pool = available_upgrades(&applied, STARTING_LOADOUT);
        assert!(!pool.iter().any(|d| d.id == "rear_blaster_unlock"));
    }

    #[test]
    fn test_stackable_below_cap_stays_at_cap_leaves() {
        let cap = upgrade_def("extra_shot").and_then(|d| d.max_stacks).unwrap();

        let below = applied_with(&[("extra_shot", cap - 1)]);
        assert!(available_upgrades(&below, STARTING_LOADOUT).iter().any(|d| d.id == "extra_shot"));

        let at_cap = applied_with(&[("extra_shot", cap)]);
        assert!(!available_upgrades(&at_cap, STARTING_LOADOUT).iter().any(|d| d.id == "extra_shot"));
    }

    #[test]
    fn test_prerequisites_and_exclusions() {
        let empty = BTreeMap::new();
        let pool = available_upgrades(&empty, STARTING_LOADOUT);
        assert!(!pool.iter().any(|d| d.id == "rear_damage_up"));
        assert!(!pool.iter().any(|d| d.id == "boost_regen_up"));

        let pool = available_upgrades(&empty, &["auto_cannon", REAR_BLASTER]);
        assert!(pool.iter().any(|d| d.id == "rear_damage_up"));

        let plated = applied_with(&[("hull_plating", 1)]);
        assert!(!available_upgrades(&plated, STARTING_LOADOUT).iter().any(|d| d.id == "glass_cannon"));
    }

    #[test]
    fn test_current_stacks_reported() {
        let applied = applied_with(&[("boost_max_up", 3)]);
        let mut rng = Rng::new(55);
        let choices = roll_upgrade_choices(&mut rng, &applied, UPGRADE_DEFS.len(), STARTING_LOADOUT);
        let boost = choices.iter().find(|c| c.def.id == "boost_max_up").unwrap();
        assert_eq!(boost.current_stacks, 3);
    }

    #[test]
    fn test_exhausted_pool_is_empty() {
        let mut applied = BTreeMap::new();
        for def in UPGRADE_DEFS {
            applied.insert(def.id, def.max_stacks.unwrap_or(1));
        }
        let mut rng = Rng::new(1);
        assert!(roll_upgrade_choices(&mut rng, &applied, 3, STARTING_LOADOUT).is_empty());
    }

    #[test]
    fn test_weighting_favors_common_over_epic() {
        let applied = BTreeMap::new();
        let mut common = 0;
        let mut epic = 0;
        for seed in 0..500 {
            let mut rng = Rng::new(seed);
            for choice in roll_upgrade_choices(&mut rng, &applied, 1, STARTING_LOADOUT) {
                match choice.def.rarity {
                    Rarity::Common => common += 1,
                    Rarity::Epic => epic += 1,
                    Rarity::Rare => {}
                }
            }
        }
        assert!(common > epic);
    }
}
