//! Fixed timestep simulation tick
//!
//! Systems run in one fixed order every tick: launcher, thrust, physics,
//! tier, spawners, AI, weapons, collisions, rewards, leveling, stall. Dead
//! entities are compacted only after all of them have run.

use super::state::{GameEvent, GameState};
use super::{ai, collision, launcher, physics, progression, rewards, stall};
use crate::input::TickInput;
use crate::tuning::Tuning;

/// Advance the game state by one fixed timestep.
///
/// Returns true on the tick the current rocket ends. A paused run does not
/// advance at all. Each unpaused tick starts with an empty event queue, so
/// callers read or take the events before the next tick.
pub fn tick(state: &mut GameState, tuning: &Tuning, input: &TickInput, dt: f32) -> bool {
    if state.run.paused {
        return false;
    }
    state.time_ticks += 1;
    state.clear_events();

    if let Some(gesture) = &input.launch {
        if launcher::apply_launch(&mut state.player, gesture, &tuning.launcher) {
            let vel = state.player.vel;
            state.push_event(GameEvent::Launched { vel });
        }
    }
    if !state.player.launched {
        return false;
    }

    launcher::apply_thrust(&mut state.player, state.run.player_stats(), input.thrust, dt);
    physics::step_player(&mut state.player, tuning, dt);

    let distance_m = state.distance_m(tuning);
    if distance_m > state.rocket_distance_m {
        rewards::accrue_distance(&mut state.run, distance_m - state.rocket_distance_m, tuning);
        state.rocket_distance_m = distance_m;
        state.run.best_distance_m = state.run.best_distance_m.max(distance_m);
    }

    state.tier.update(distance_m);
    let tier = state.tier.current();
    if state.tier.just_changed() {
        state.push_event(GameEvent::TierChanged { tier_id: tier.id });
    }

    state.enemy_spawner.update(
        &mut state.drones,
        &state.player,
        distance_m,
        tier,
        tuning,
        &mut state.run.rng,
        &mut state.ids,
        dt,
    );
    state.asteroid_spawner.update(
        &mut state.asteroids,
        &state.player,
        tier,
        tuning,
        &mut state.run.rng,
        &mut state.ids,
        dt,
    );
    state.coin_field.update(
        &mut state.coins,
        &state.player,
        tier,
        tuning,
        &mut state.run.rng,
        &mut state.ids,
    );

    ai::update_drones(&mut state.drones, &mut state.bullets, &state.player, tuning, &mut state.ids, dt);
    ai::drift_asteroids(&mut state.asteroids, dt);

    state.weapons.update(
        &state.run,
        &state.player,
        &state.drones,
        &mut state.projectiles,
        &tuning.weapon,
        &mut state.ids,
        dt,
    );

    let outcome = collision::update(
        &mut state.player,
        &mut state.drones,
        &mut state.asteroids,
        &mut state.projectiles,
        &mut state.bullets,
        &mut state.coins,
        state.run.player_stats(),
        tuning,
        dt,
    );

    rewards::accrue_combat(&mut state.run, &outcome, tier, tuning);
    for k in &outcome.kills {
        state.push_event(GameEvent::Kill {
            drone_id: k.id,
            pos: k.pos,
            elite: k.elite,
        });
    }
    for &coin_id in &outcome.coins_collected {
        state.push_event(GameEvent::CoinCollected { coin_id });
    }

    if progression::check_level_up(&mut state.run, tuning) > 0 {
        let level = state.run.level;
        state.push_event(GameEvent::LevelUp { level });
    }

    let ended = stall::check_stall(&mut state.player, state.run.player_stats(), dt);

    state.compact();

    if ended {
        log::info!(
            "rocket ended at {:.0} m (hp {:.0}, {} kills)",
            state.rocket_distance_m,
            state.player.hp,
            state.player.kills
        );
        state.push_event(GameEvent::RocketEnded);
    }
    ended
}
