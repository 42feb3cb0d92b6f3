//! Between-round merchant: artifact stock and purchases

use thiserror::Error;

use super::run_state::RunState;
use crate::content::artifacts::{ARTIFACT_DEFS, ArtifactDef, ArtifactEffect, artifact_def};
use crate::tuning::Tuning;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShopError {
    #[error("unknown artifact `{0}`")]
    UnknownArtifact(String),
    #[error("artifact `{0}` already owned")]
    AlreadyOwned(&'static str),
    #[error("not enough gold: costs {cost}, have {gold}")]
    InsufficientGold { cost: u32, gold: u32 },
}

impl RunState {
    /// Buy an artifact with gold. Stats are rebuilt on success.
    pub fn purchase_artifact(&mut self, id: &str, tuning: &Tuning) -> Result<(), ShopError> {
        let def = artifact_def(id).ok_or_else(|| ShopError::UnknownArtifact(id.to_string()))?;
        if self.has_artifact(def.id) {
            return Err(ShopError::AlreadyOwned(def.id));
        }
        if self.gold < def.gold_cost {
            return Err(ShopError::InsufficientGold {
                cost: def.gold_cost,
                gold: self.gold,
            });
        }

        self.gold -= def.gold_cost;
        self.applied_artifacts.insert(def.id);
        if def.effect == ArtifactEffect::ExtraRocket {
            self.rockets_remaining += 1;
        }
        self.recompute_stats(tuning);
        log::info!("purchased {} for {} gold", def.name, def.gold_cost);
        Ok(())
    }
}

/// Unowned artifacts in run-RNG order, at most `count`
pub fn roll_merchant_stock(run: &mut RunState, count: usize) -> Vec<&'static ArtifactDef> {
    let unowned: Vec<&'static ArtifactDef> = ARTIFACT_DEFS
        .iter()
        .filter(|a| !run.has_artifact(a.id))
        .collect();
    let mut stock = run.rng.shuffle(&unowned);
    stock.truncate(count);
    stock
}
