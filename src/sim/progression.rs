//! Leveling, upgrade offers, weapon evolution and tier tracking

use super::run_state::RunState;
use crate::content::evolutions::{EVOLUTION_DEFS, EvolutionDef};
use crate::content::tiers::{TierDef, tier_for_distance};
use crate::content::upgrades::{UpgradeChoice, roll_upgrade_choices};
use crate::tuning::Tuning;

/// Convert banked XP into levels; may fire several times for one burst.
///
/// Returns the number of levels gained.
pub fn check_level_up(run: &mut RunState, tuning: &Tuning) -> u32 {
    let mut gained = 0;
    // A cost below one XP would never drain the bank
    run.xp_to_next_level = run.xp_to_next_level.max(1.0);
    while run.xp >= run.xp_to_next_level {
        run.xp -= run.xp_to_next_level;
        run.level += 1;
        run.pending_level_ups += 1;
        run.xp_to_next_level = (run.xp_to_next_level * tuning.xp.level_scale).round().max(1.0);
        gained += 1;
    }
    if gained > 0 {
        log::info!("level {} reached ({} pending)", run.level, run.pending_level_ups);
    }
    gained
}

/// Drain one pending level-up into an offer.
///
/// No pending level-ups gives an empty offer. An exhausted pool also gives an
/// empty offer and clears the rest of the queue so nothing waits on it. A
/// non-empty offer pauses the run until a choice is applied.
pub fn offer_upgrades(run: &mut RunState, count: usize) -> Vec<UpgradeChoice> {
    if run.pending_level_ups == 0 {
        return Vec::new();
    }
    run.pending_level_ups -= 1;

    let choices = roll_upgrade_choices(
        &mut run.rng,
        &run.applied_upgrades,
        count,
        &run.weapon_loadout,
    );
    if choices.is_empty() {
        log::debug!("upgrade pool exhausted; dropping {} pending", run.pending_level_ups);
        run.pending_level_ups = 0;
        return choices;
    }

    run.paused = true;
    choices
}

/// One weapon swap performed by an evolution
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionResult {
    pub def: &'static EvolutionDef,
}

/// Apply a picked upgrade, unpause, then run the evolution check
pub fn apply_upgrade_choice(run: &mut RunState, upgrade_id: &str, tuning: &Tuning) -> Option<EvolutionResult> {
    run.apply_upgrade(upgrade_id, tuning);
    run.paused = false;
    check_evolutions(run, tuning)
}

/// First evolution whose gates all pass swaps its weapon; at most one per call
pub fn check_evolutions(run: &mut RunState, tuning: &Tuning) -> Option<EvolutionResult> {
    for evo in EVOLUTION_DEFS {
        if evo.one_time && run.applied_evolutions.contains(evo.id) {
            continue;
        }
        let Some(slot) = run.weapon_loadout.iter().position(|&w| w == evo.source_weapon) else {
            continue;
        };
        let met = evo
            .requires_upgrades
            .iter()
            .all(|&(id, min)| run.upgrade_stacks(id) >= min);
        if !met {
            continue;
        }

        run.weapon_loadout[slot] = evo.result_weapon;
        run.applied_evolutions.insert(evo.id);
        run.recompute_stats(tuning);
        log::info!("evolution: {} -> {}", evo.source_weapon, evo.result_weapon);
        return Some(EvolutionResult { def: evo });
    }
    None
}

/// Active tier plus a flag raised for the single tick a boundary is crossed
#[derive(Debug, Clone, PartialEq)]
pub struct TierTracker {
    current: &'static TierDef,
    just_changed: bool,
}

impl Default for TierTracker {
    fn default() -> Self {
        Self {
            current: tier_for_distance(0.0),
            just_changed: false,
        }
    }
}

impl TierTracker {
    pub fn update(&mut self, distance_m: f32) {
        let next = tier_for_distance(distance_m);
        self.just_changed = next.id != self.current.id;
        if self.just_changed {
            log::info!("entering {} - {}", next.short_label, next.name);
        }
        self.current = next;
    }

    pub fn current(&self) -> &'static TierDef {
        self.current
    }

    pub fn just_changed(&self) -> bool {
        self.just_changed
    }
}
