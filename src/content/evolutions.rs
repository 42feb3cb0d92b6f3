//! Weapon evolutions: upgrade-count gated, one-time weapon swaps

use super::weapons::{AUTO_CANNON, RAIL_CANNON};

#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub source_weapon: &'static str,
    pub result_weapon: &'static str,
    /// (upgrade id, minimum stacks); all must be met
    pub requires_upgrades: &'static [(&'static str, u32)],
    pub one_time: bool,
}

pub static EVOLUTION_DEFS: &[EvolutionDef] = &[EvolutionDef {
    id: "auto_to_rail",
    name: "Rail Cannon",
    description: "Auto-Cannon evolves into Rail Cannon with piercing shots.",
    source_weapon: AUTO_CANNON,
    result_weapon: RAIL_CANNON,
    requires_upgrades: &[
        ("extra_shot", 1),
        ("projectile_speed_up", 1),
        ("cannon_damage_up", 1),
    ],
    one_time: true,
}];

pub fn evolution_def(id: &str) -> Option<&'static EvolutionDef> {
    EVOLUTION_DEFS.iter().find(|e| e.id == id)
}
