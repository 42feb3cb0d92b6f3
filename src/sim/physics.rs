//! World physics and terrain
//!
//! Terrain is a closed-form height field, so any x can be queried without
//! state (spawn placement, rendering ahead of the camera).

use super::entities::Player;
use crate::tuning::{TerrainTuning, Tuning};

/// Ground surface y at world x (y grows downward)
pub fn terrain_height(x: f32, terrain: &TerrainTuning) -> f32 {
    terrain
        .waves
        .iter()
        .fold(terrain.base_y, |y, &(amp, freq, phase)| {
            y + (x * freq + phase).sin() * amp
        })
}

/// Integrate a launched player by one fixed step
pub fn step_player(player: &mut Player, tuning: &Tuning, dt: f32) {
    let world = &tuning.world;

    player.vel.y += world.gravity * dt;

    // Drag is proportional per step; a contact debuff adds to it
    let drag = world.air_drag
        + if player.drag_debuff_timer > 0.0 {
            world.debuff_drag
        } else {
            0.0
        };
    player.vel *= (1.0 - drag).max(0.0);

    player.pos += player.vel * dt;

    let ground = terrain_height(player.pos.x, &tuning.terrain);
    if player.pos.y + player.radius > ground {
        player.pos.y = ground - player.radius;
        if player.vel.y > 0.0 {
            player.vel.y = -player.vel.y * world.bounce;
        }
        player.vel.x *= 1.0 - world.ground_friction;
    }

    player.drag_debuff_timer = (player.drag_debuff_timer - dt).max(0.0);
}
