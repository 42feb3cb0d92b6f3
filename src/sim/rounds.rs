//! Rocket-end resolution: toll payment, rocket loss, game over

use serde::{Deserialize, Serialize};

use super::run_state::RunState;
use crate::tuning::Tuning;

/// End-of-run build and stats, stored with leaderboard entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub initials: String,
    pub distance_m: f32,
    pub scrap: u32,
    pub gold: u32,
    pub round: u32,
    pub total_kills: u32,
    pub level: u32,
    /// (upgrade id, stacks)
    pub upgrades: Vec<(String, u32)>,
    pub evolutions: Vec<String>,
    pub artifacts: Vec<String>,
}

impl RunSummary {
    pub fn from_run(run: &RunState, initials: &str) -> Self {
        Self {
            initials: initials.to_string(),
            distance_m: run.best_distance_m,
            scrap: run.scrap,
            gold: run.gold,
            round: run.round,
            total_kills: run.total_kills,
            level: run.level,
            upgrades: run
                .applied_upgrades
                .iter()
                .map(|(&id, &n)| (id.to_string(), n))
                .collect(),
            evolutions: run.applied_evolutions.iter().map(|s| s.to_string()).collect(),
            artifacts: run.applied_artifacts.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RocketOutcome {
    /// Toll met: scrap converted, next round begins
    RoundComplete { toll_paid: u32, gold_earned: u32 },
    /// Toll unmet but rockets remain
    RocketLost { rockets_remaining: u32 },
    /// Last rocket spent without meeting the toll
    GameOver(RunSummary),
}

/// Settle a finished rocket against the round toll.
///
/// `distance_m` is how far this rocket got; it feeds the run's best distance.
pub fn resolve_rocket_end(run: &mut RunState, tuning: &Tuning, distance_m: f32) -> RocketOutcome {
    run.best_distance_m = run.best_distance_m.max(distance_m);

    if run.scrap >= run.round_toll {
        let toll_paid = run.round_toll;
        let excess = run.scrap - toll_paid;
        let from_scrap = (excess as f32 * tuning.gold.scrap_to_gold_rate).floor() as u32;
        let from_rockets = run.rockets_remaining * tuning.gold.rocket_bonus;
        let gold_earned = from_scrap + from_rockets;
        run.add_gold(gold_earned);

        run.scrap = 0;
        run.round += 1;
        run.rockets_remaining = tuning.rounds.starting_rockets + u32::from(run.has_artifact("extra_rocket"));
        run.round_toll = (toll_paid as f32 * tuning.rounds.toll_scale).round() as u32;

        log::info!(
            "round {} complete: toll {toll_paid}, +{gold_earned} gold, next toll {}",
            run.round - 1,
            run.round_toll
        );
        return RocketOutcome::RoundComplete { toll_paid, gold_earned };
    }

    run.rockets_remaining = run.rockets_remaining.saturating_sub(1);
    if run.rockets_remaining > 0 {
        log::info!("rocket lost, {} left", run.rockets_remaining);
        return RocketOutcome::RocketLost {
            rockets_remaining: run.rockets_remaining,
        };
    }

    log::info!("game over at {:.0} m", run.best_distance_m);
    RocketOutcome::GameOver(RunSummary::from_run(run, "???"))
}
