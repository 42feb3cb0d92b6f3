//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded run RNG only
//! - Stable iteration order (entities are appended in id order)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod entities;
pub mod launcher;
pub mod physics;
pub mod progression;
pub mod rewards;
pub mod rounds;
pub mod run_state;
pub mod shop;
pub mod spawner;
pub mod stall;
pub mod state;
pub mod tick;
pub mod weapons;

pub use collision::{CollisionOutcome, KillRecord};
pub use entities::{
    Asteroid, Drone, DroneKind, EnemyBullet, EntityIds, Player, Projectile, SizeClass, WorldCoin,
};
pub use physics::terrain_height;
pub use progression::{
    EvolutionResult, TierTracker, apply_upgrade_choice, check_evolutions, check_level_up,
    offer_upgrades,
};
pub use rounds::{RocketOutcome, RunSummary, resolve_rocket_end};
pub use run_state::{DerivedPlayerStats, DerivedWeaponStats, RunState};
pub use shop::{ShopError, roll_merchant_stock};
pub use state::{GameEvent, GameState};
pub use tick::tick;
