//! Immutable content tables
//!
//! Pure data plus small lookups. Nothing here holds run state.

pub mod artifacts;
pub mod evolutions;
pub mod tiers;
pub mod upgrades;
pub mod weapons;

pub use artifacts::{ARTIFACT_DEFS, ArtifactDef, ArtifactEffect, artifact_def};
pub use evolutions::{EVOLUTION_DEFS, EvolutionDef, evolution_def};
pub use tiers::{TIER_DEFS, TierDef, tier_for_distance};
pub use upgrades::{
    PlayerStat, Rarity, Requirement, Special, UPGRADE_DEFS, UpgradeChoice, UpgradeDef,
    UpgradeEffect, WeaponMods, available_upgrades, roll_upgrade_choices, upgrade_def,
};
pub use weapons::{STARTING_LOADOUT, TargetMode, WEAPON_DEFS, WeaponDef, weapon_def};
