//! Enemy, asteroid and coin spawners
//!
//! All randomness comes from the run RNG passed in; the draw order inside each
//! spawn is fixed so a seed reproduces the same world.

use glam::Vec2;

use super::entities::{Asteroid, Drone, DroneKind, EntityIds, Player, SizeClass, WorldCoin};
use super::physics::terrain_height;
use crate::content::tiers::TierDef;
use crate::rng::Rng;
use crate::tuning::Tuning;

/// Timed drone spawner; faster and denser with distance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnemySpawner {
    /// Launched seconds since the last spawn
    timer: f32,
    /// Spawns this rocket; every Nth one is forced elite
    spawn_count: u32,
}

impl EnemySpawner {
    /// Seconds between spawns at a distance
    pub fn interval(distance_m: f32, tuning: &Tuning) -> f32 {
        let e = &tuning.enemy;
        let km = distance_m / 1000.0;
        (e.spawn_every_sec - e.interval_shrink_per_km * km).max(e.min_spawn_interval)
    }

    /// Live-drone ceiling at a distance; grows with sqrt(km) up to a hard cap
    pub fn max_alive(distance_m: f32, tuning: &Tuning) -> usize {
        let e = &tuning.enemy;
        let km = (distance_m / 1000.0).max(0.0);
        let grown = e.max_alive_base + (e.max_alive_per_sqrt_km * km.sqrt()).floor() as u32;
        grown.min(e.max_alive_cap) as usize
    }

    pub fn spawn_count(&self) -> u32 {
        self.spawn_count
    }

    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        drones: &mut Vec<Drone>,
        player: &Player,
        distance_m: f32,
        tier: &TierDef,
        tuning: &Tuning,
        rng: &mut Rng,
        ids: &mut EntityIds,
        dt: f32,
    ) {
        if !player.launched {
            return;
        }

        for d in drones.iter_mut() {
            if d.alive && d.pos.x < player.pos.x - tuning.enemy.cull_behind {
                d.alive = false;
            }
        }

        self.timer += dt;
        if drones.iter().filter(|d| d.alive).count() >= Self::max_alive(distance_m, tuning) {
            return;
        }
        if self.timer < Self::interval(distance_m, tuning) {
            return;
        }
        self.timer = 0.0;

        let drone = self.spawn(player, distance_m, tier, tuning, rng, ids);
        drones.push(drone);
    }

    fn spawn(
        &mut self,
        player: &Player,
        distance_m: f32,
        tier: &TierDef,
        tuning: &Tuning,
        rng: &mut Rng,
        ids: &mut EntityIds,
    ) -> Drone {
        let (e, s, el) = (&tuning.enemy, &tuning.shooter, &tuning.elite);
        self.spawn_count += 1;

        let kind_roll = rng.next_float();
        let kind = if distance_m >= s.min_distance_m
            && kind_roll < s.base_chance + tier.difficulty.shooter_chance_add
        {
            DroneKind::Shooter
        } else {
            DroneKind::Chaser
        };

        let elite_roll = rng.next_float();
        let elite = (el.every_n_spawns > 0 && self.spawn_count % el.every_n_spawns == 0)
            || elite_roll < tier.difficulty.elite_chance_add;

        let x = player.pos.x + e.spawn_ahead_min + rng.next_float() * e.spawn_ahead_range;
        let y = player.pos.y - e.spawn_above_min - rng.next_float() * e.spawn_above_range;

        let (base_hp, base_speed) = match kind {
            DroneKind::Chaser => (e.drone_hp, e.drone_speed),
            DroneKind::Shooter => (s.hp, s.speed),
        };
        let (hp_mult, speed_mult, radius_mult) = if elite {
            (el.hp_mult, el.speed_mult, el.radius_mult)
        } else {
            (1.0, 1.0, 1.0)
        };

        let shoot_timer = match kind {
            DroneKind::Shooter => s.fire_cooldown * (0.5 + rng.next_float() * 0.5),
            DroneKind::Chaser => 0.0,
        };

        Drone {
            id: ids.next_id(),
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            radius: e.drone_radius * radius_mult,
            hp: base_hp * tier.difficulty.enemy_hp_mult * hp_mult,
            speed: base_speed * tier.difficulty.enemy_speed_mult * speed_mult,
            kind,
            elite,
            alive: true,
            shoot_timer,
        }
    }
}

/// Pulse spawner for drifting obstacles; idle while the tier density is zero
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AsteroidSpawner {
    /// Seconds since the last pulse
    timer: f32,
}

impl AsteroidSpawner {
    pub fn size_for_roll(roll: f32, tuning: &Tuning) -> SizeClass {
        if roll < tuning.asteroid.small_below {
            SizeClass::Small
        } else if roll < tuning.asteroid.medium_below {
            SizeClass::Medium
        } else {
            SizeClass::Large
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        asteroids: &mut Vec<Asteroid>,
        player: &Player,
        tier: &TierDef,
        tuning: &Tuning,
        rng: &mut Rng,
        ids: &mut EntityIds,
        dt: f32,
    ) {
        if !player.launched {
            return;
        }
        let a = &tuning.asteroid;

        for ast in asteroids.iter_mut() {
            if ast.alive && ast.pos.x < player.pos.x - a.cull_behind {
                ast.alive = false;
            }
        }

        let density = tier.environment.asteroid_density;
        if density <= 0.0 {
            self.timer = 0.0;
            return;
        }
        if asteroids.iter().filter(|ast| ast.alive).count() >= a.max_alive {
            return;
        }

        self.timer += dt;
        if self.timer < a.base_spawn_interval / density {
            return;
        }
        self.timer = 0.0;

        let env = &tier.environment;
        let spread = env.asteroid_max_per_pulse.saturating_sub(env.asteroid_min_per_pulse) + 1;
        let count = env.asteroid_min_per_pulse + rng.next_int(spread);

        for _ in 0..count {
            if asteroids.iter().filter(|ast| ast.alive).count() >= a.max_alive {
                break;
            }
            let asteroid = Self::spawn(player, tier, tuning, rng, ids);
            asteroids.push(asteroid);
        }
    }

    fn spawn(player: &Player, tier: &TierDef, tuning: &Tuning, rng: &mut Rng, ids: &mut EntityIds) -> Asteroid {
        let a = &tuning.asteroid;
        let size = Self::size_for_roll(rng.next_float(), tuning);
        let class = match size {
            SizeClass::Small => &a.small,
            SizeClass::Medium => &a.medium,
            SizeClass::Large => &a.large,
        };
        let sprite_variant = rng.next_int(a.sprite_variants);

        let x = player.pos.x
            + a.spawn_ahead_min
            + rng.next_float() * a.spawn_ahead_range
            + (rng.next_float() - 0.5) * a.spawn_jitter;
        let y = player.pos.y - a.spawn_above_min - rng.next_float() * a.spawn_above_range;

        let drift = a.drift_min + rng.next_float() * a.drift_range;
        let vel = Vec2::new(-drift, (rng.next_float() - 0.5) * 40.0);
        let spin = (rng.next_float() - 0.5) * 2.0 * a.max_spin;
        let rotation = rng.next_float() * std::f32::consts::TAU;

        Asteroid {
            id: ids.next_id(),
            pos: Vec2::new(x, y),
            vel,
            radius: class.radius,
            hp: (class.hp * tier.difficulty.enemy_hp_mult).round(),
            size,
            sprite_variant,
            rotation,
            spin,
            scrap_reward: class.scrap_reward,
            alive: true,
        }
    }
}

/// Lays coin clusters out ahead of the player at randomized spacing
#[derive(Debug, Clone, PartialEq)]
pub struct CoinField {
    /// World x where the next cluster starts
    next_cluster_x: f32,
}

impl CoinField {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            next_cluster_x: tuning.launcher.origin_x + tuning.coins.first_cluster_offset,
        }
    }

    pub fn next_cluster_x(&self) -> f32 {
        self.next_cluster_x
    }

    pub fn update(
        &mut self,
        coins: &mut Vec<WorldCoin>,
        player: &Player,
        tier: &TierDef,
        tuning: &Tuning,
        rng: &mut Rng,
        ids: &mut EntityIds,
    ) {
        let c = &tuning.coins;

        let view_ahead = player.pos.x + c.view_ahead;
        while self.next_cluster_x < view_ahead {
            let base_x = self.next_cluster_x;
            let ground = terrain_height(base_x, &tuning.terrain);
            let base_y = ground
                - c.height_min
                - rng.next_float() * c.height_range
                - tier.environment.coin_height_lift;
            let count = c.cluster_min + rng.next_int(c.cluster_max - c.cluster_min + 1);

            for i in 0..count {
                let x = base_x + (i as f32 - count as f32 / 2.0) * c.cluster_gap;
                let y = base_y + (i as f32 * 0.8).sin() * 30.0;
                coins.push(WorldCoin {
                    id: ids.next_id(),
                    pos: Vec2::new(x, y),
                    bob_phase: rng.next_float() * std::f32::consts::TAU,
                    alive: true,
                });
            }

            // Spacing is at least 1 px so the loop always advances
            let spacing = c.spacing_min + rng.next_int(c.spacing_max - c.spacing_min);
            self.next_cluster_x += spacing.max(1) as f32;
        }

        for coin in coins.iter_mut() {
            if coin.alive && coin.pos.x < player.pos.x - c.cull_behind {
                coin.alive = false;
            }
        }
    }
}
