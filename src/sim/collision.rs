//! Collision resolution
//!
//! Circle overlap only. Responses are velocity damping and a small push, not
//! impulse resolution. Systems here only clear `alive`; the tick compacts
//! afterwards.

use glam::Vec2;

use super::entities::{
    Asteroid, Drone, EnemyBullet, Player, Projectile, WorldCoin, circles_overlap,
};
use super::run_state::DerivedPlayerStats;
use crate::tuning::Tuning;

/// A drone destroyed this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KillRecord {
    pub id: u32,
    pub pos: Vec2,
    pub elite: bool,
}

/// What one collision pass produced, for reward accrual and replay events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionOutcome {
    pub kills: Vec<KillRecord>,
    pub asteroids_destroyed: u32,
    /// Unscaled scrap from destroyed asteroids
    pub asteroid_scrap: u32,
    pub coins_collected: Vec<u32>,
    pub player_hits: u32,
}

/// Move and age shots; expired ones die
pub fn advance_projectiles(projectiles: &mut [Projectile], dt: f32) {
    for p in projectiles.iter_mut().filter(|p| p.alive) {
        p.ttl -= dt;
        if p.ttl <= 0.0 {
            p.alive = false;
            continue;
        }
        p.pos += p.vel * dt;
    }
}

pub fn advance_bullets(bullets: &mut [EnemyBullet], dt: f32) {
    for b in bullets.iter_mut().filter(|b| b.alive) {
        b.ttl -= dt;
        if b.ttl <= 0.0 {
            b.alive = false;
            continue;
        }
        b.pos += b.vel * dt;
    }
}

/// Register a hit of `p` on target `id`; false if the shot cannot hit it.
///
/// A piercing shot remembers each target and is consumed once its budget is
/// spent. Anything else is consumed by its first hit.
fn strike(p: &mut Projectile, id: u32, pos: Vec2, radius: f32) -> bool {
    if !p.alive || p.hit_ids.contains(&id) || !circles_overlap(p.pos, p.radius, pos, radius) {
        return false;
    }
    if p.piercing && p.pierce_left > 0 {
        p.hit_ids.push(id);
        p.pierce_left -= 1;
        if p.pierce_left == 0 {
            p.alive = false;
        }
    } else {
        p.alive = false;
    }
    true
}

/// Player shots against drones, then asteroids
pub fn resolve_projectile_hits(
    projectiles: &mut [Projectile],
    drones: &mut [Drone],
    asteroids: &mut [Asteroid],
    outcome: &mut CollisionOutcome,
) {
    for p in projectiles.iter_mut() {
        for d in drones.iter_mut().filter(|d| d.alive) {
            if !strike(p, d.id, d.pos, d.radius) {
                continue;
            }
            d.hp -= p.damage;
            if d.hp <= 0.0 {
                d.alive = false;
                outcome.kills.push(KillRecord {
                    id: d.id,
                    pos: d.pos,
                    elite: d.elite,
                });
            }
            if !p.alive {
                break;
            }
        }

        for a in asteroids.iter_mut().filter(|a| a.alive) {
            if !strike(p, a.id, a.pos, a.radius) {
                continue;
            }
            a.hp -= p.damage;
            if a.hp <= 0.0 {
                a.alive = false;
                outcome.asteroids_destroyed += 1;
                outcome.asteroid_scrap += a.scrap_reward;
            }
            if !p.alive {
                break;
            }
        }
    }
}

fn contact(player: &mut Player, stats: &DerivedPlayerStats, damage: f32) {
    player.vel *= stats.contact_speed_retain;
    player.drag_debuff_timer = player.drag_debuff_timer.max(stats.drag_debuff_sec);
    player.hp = (player.hp - damage).max(0.0);
    player.hits += 1;
}

/// Drone and asteroid bodies against the player
pub fn resolve_body_contacts(
    player: &mut Player,
    drones: &mut [Drone],
    asteroids: &mut [Asteroid],
    stats: &DerivedPlayerStats,
    tuning: &Tuning,
    outcome: &mut CollisionOutcome,
) {
    let push = tuning.enemy.contact_push;

    for d in drones.iter_mut().filter(|d| d.alive) {
        if !circles_overlap(player.pos, player.radius, d.pos, d.radius) {
            continue;
        }
        let damage = if d.elite {
            tuning.enemy.contact_damage * tuning.elite.contact_damage_mult
        } else {
            tuning.enemy.contact_damage
        };
        contact(player, stats, damage);
        outcome.player_hits += 1;
        d.pos += (d.pos - player.pos) * push;
    }

    for a in asteroids.iter_mut().filter(|a| a.alive) {
        if !circles_overlap(player.pos, player.radius, a.pos, a.radius) {
            continue;
        }
        contact(player, stats, tuning.asteroid.contact_damage);
        outcome.player_hits += 1;
        a.pos += (a.pos - player.pos) * push;
    }
}

/// Enemy bullets against the player, using each bullet's own payload
pub fn resolve_bullet_hits(player: &mut Player, bullets: &mut [EnemyBullet], outcome: &mut CollisionOutcome) {
    for b in bullets.iter_mut().filter(|b| b.alive) {
        if !circles_overlap(player.pos, player.radius, b.pos, b.radius) {
            continue;
        }
        player.vel *= b.speed_retain;
        player.drag_debuff_timer = player.drag_debuff_timer.max(b.drag_debuff_sec);
        player.hp = (player.hp - b.damage).max(0.0);
        player.hits += 1;
        outcome.player_hits += 1;
        b.alive = false;
    }
}

/// Coins within reach of the player
pub fn collect_coins(player: &Player, coins: &mut [WorldCoin], tuning: &Tuning, outcome: &mut CollisionOutcome) {
    let reach = player.radius + tuning.coins.pickup_radius;
    for c in coins.iter_mut().filter(|c| c.alive) {
        if player.pos.distance_squared(c.pos) <= reach * reach {
            c.alive = false;
            outcome.coins_collected.push(c.id);
        }
    }
}

/// Full collision pass for one tick
#[allow(clippy::too_many_arguments)]
pub fn update(
    player: &mut Player,
    drones: &mut [Drone],
    asteroids: &mut [Asteroid],
    projectiles: &mut [Projectile],
    bullets: &mut [EnemyBullet],
    coins: &mut [WorldCoin],
    stats: &DerivedPlayerStats,
    tuning: &Tuning,
    dt: f32,
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();

    advance_projectiles(projectiles, dt);
    advance_bullets(bullets, dt);

    resolve_projectile_hits(projectiles, drones, asteroids, &mut outcome);
    player.kills += outcome.kills.len() as u32;

    if player.launched {
        resolve_body_contacts(player, drones, asteroids, stats, tuning, &mut outcome);
        resolve_bullet_hits(player, bullets, &mut outcome);
        collect_coins(player, coins, tuning, &mut outcome);
    }

    outcome
}
