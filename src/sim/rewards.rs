//! Reward accrual: scrap, gold, XP and distance counters

use super::collision::CollisionOutcome;
use super::run_state::RunState;
use crate::content::artifacts::{GOLDEN_THRUSTERS_MULT, SCRAP_MAGNET_MULT};
use crate::content::tiers::TierDef;
use crate::tuning::Tuning;

/// XP and distance for forward progress this tick (never negative)
pub fn accrue_distance(run: &mut RunState, delta_m: f32, tuning: &Tuning) {
    if delta_m <= 0.0 {
        return;
    }
    run.xp += delta_m * tuning.xp.per_km / 1000.0;
    run.total_distance_m += delta_m;
}

/// Gold for one coin pickup under the active tier and artifacts
pub fn coin_gold(run: &RunState, tier: &TierDef, tuning: &Tuning) -> u32 {
    let mut gain = tuning.coins.gold_per_pickup * tier.reward.coin_gold_mult;
    if run.has_artifact("golden_thrusters") {
        gain *= GOLDEN_THRUSTERS_MULT;
    }
    gain.round() as u32
}

/// Fold one collision pass into the run's currencies and XP
pub fn accrue_combat(run: &mut RunState, outcome: &CollisionOutcome, tier: &TierDef, tuning: &Tuning) {
    let kills = outcome.kills.len() as u32;
    if kills > 0 {
        let mut scrap = kills as f32 * tuning.scrap.per_kill * tier.reward.scrap_mult;
        if run.has_artifact("scrap_magnet") {
            scrap *= SCRAP_MAGNET_MULT;
        }
        run.add_scrap(scrap.round() as u32);
        run.xp += kills as f32 * tuning.xp.per_kill;
        run.total_kills += kills;
    }

    if outcome.asteroid_scrap > 0 {
        let scrap = outcome.asteroid_scrap as f32 * tier.reward.scrap_mult;
        run.add_scrap(scrap.round() as u32);
    }

    for _ in &outcome.coins_collected {
        let gold = coin_gold(run, tier, tuning);
        run.add_gold(gold);
    }
}
