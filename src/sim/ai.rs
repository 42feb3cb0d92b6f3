//! Enemy behaviour and obstacle drift

use glam::Vec2;

use super::entities::{Asteroid, Drone, DroneKind, EnemyBullet, EntityIds, Player};
use crate::tuning::Tuning;

/// Steer and move every live drone; shooters may fire
pub fn update_drones(
    drones: &mut [Drone],
    bullets: &mut Vec<EnemyBullet>,
    player: &Player,
    tuning: &Tuning,
    ids: &mut EntityIds,
    dt: f32,
) {
    if !player.launched {
        return;
    }
    let s = &tuning.shooter;

    for d in drones.iter_mut().filter(|d| d.alive) {
        let to_player = player.pos - d.pos;
        let dist = to_player.length();
        let dir = to_player.normalize_or_zero();

        match d.kind {
            DroneKind::Chaser => {
                d.vel = dir * d.speed;
            }
            DroneKind::Shooter => {
                d.vel = if dist > s.standoff_max {
                    dir * d.speed
                } else if dist < s.standoff_min {
                    -dir * d.speed
                } else {
                    // Strafe; alternate sides by id so a pack spreads out
                    let side = if d.id % 2 == 0 { 1.0 } else { -1.0 };
                    dir.perp() * d.speed * side
                };

                d.shoot_timer -= dt;
                if d.shoot_timer <= 0.0 {
                    if dist <= s.fire_range {
                        bullets.push(fire_bullet(d.pos, dir, tuning, ids));
                        d.shoot_timer = s.fire_cooldown;
                    } else {
                        d.shoot_timer = 0.0;
                    }
                }
            }
        }

        d.pos += d.vel * dt;
    }
}

fn fire_bullet(from: Vec2, dir: Vec2, tuning: &Tuning, ids: &mut EntityIds) -> EnemyBullet {
    let b = &tuning.bullet;
    EnemyBullet {
        id: ids.next_id(),
        pos: from,
        vel: dir * b.speed,
        radius: b.radius,
        damage: b.damage,
        speed_retain: b.speed_retain,
        drag_debuff_sec: b.drag_debuff_sec,
        ttl: b.ttl,
        alive: true,
    }
}

/// Asteroids have no AI: they drift and spin
pub fn drift_asteroids(asteroids: &mut [Asteroid], dt: f32) {
    for a in asteroids.iter_mut().filter(|a| a.alive) {
        a.pos += a.vel * dt;
        a.rotation += a.spin * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::run_state::RunState;

    fn setup() -> (Tuning, Player) {
        let tuning = Tuning::default();
        let run = RunState::new(1, &tuning);
        let mut player = Player::new(run.player_stats(), &tuning);
        player.pos = Vec2::ZERO;
        player.launched = true;
        (tuning, player)
    }

    fn drone(id: u32, kind: DroneKind, pos: Vec2) -> Drone {
        Drone {
            id,
            pos,
            vel: Vec2::ZERO,
            radius: 14.0,
            hp: 20.0,
            speed: 100.0,
            kind,
            elite: false,
            alive: true,
            shoot_timer: 1.0,
        }
    }

    #[test]
    fn test_chaser_pursues() {
        let (tuning, player) = setup();
        let mut drones = vec![drone(1, DroneKind::Chaser, Vec2::new(300.0, 0.0))];
        let mut bullets = Vec::new();
        let mut ids = EntityIds::default();
        update_drones(&mut drones, &mut bullets, &player, &tuning, &mut ids, SIM_DT);
        assert!((drones[0].vel - Vec2::new(-100.0, 0.0)).length() < 1e-4);
        assert!(drones[0].pos.x < 300.0);
    }

    #[test]
    fn test_shooter_keeps_standoff_band() {
        let (tuning, player) = setup();
        let s = &tuning.shooter;
        let far = Vec2::new(s.standoff_max + 100.0, 0.0);
        let near = Vec2::new(s.standoff_min - 100.0, 0.0);
        let mid = Vec2::new((s.standoff_min + s.standoff_max) / 2.0, 0.0);
        let mut drones = vec![
            drone(1, DroneKind::Shooter, far),
            drone(2, DroneKind::Shooter, near),
            drone(3, DroneKind::Shooter, mid),
        ];
        let mut bullets = Vec::new();
        let mut ids = EntityIds::default();
        update_drones(&mut drones, &mut bullets, &player, &tuning, &mut ids, SIM_DT);
        assert!(drones[0].vel.x < 0.0);
        assert!(drones[1].vel.x > 0.0);
        assert!(drones[2].vel.x.abs() < 1e-4);
        assert!(drones[2].vel.y.abs() > 0.0);
    }

    #[test]
    fn test_shooter_fires_in_range_on_expiry() {
        let (tuning, player) = setup();
        let mut shooter = drone(1, DroneKind::Shooter, Vec2::new(300.0, 0.0));
        shooter.shoot_timer = SIM_DT * 0.5;
        let mut drones = vec![shooter];
        let mut bullets = Vec::new();
        let mut ids = EntityIds::default();
        update_drones(&mut drones, &mut bullets, &player, &tuning, &mut ids, SIM_DT);
        assert_eq!(bullets.len(), 1);
        assert!(bullets[0].vel.x < 0.0);
        assert_eq!(drones[0].shoot_timer, tuning.shooter.fire_cooldown);
    }

    #[test]
    fn test_shooter_holds_fire_out_of_range() {
        let (tuning, player) = setup();
        let mut shooter = drone(1, DroneKind::Shooter, Vec2::new(tuning.shooter.fire_range + 50.0, 0.0));
        shooter.shoot_timer = 0.0;
        let mut drones = vec![shooter];
        let mut bullets = Vec::new();
        let mut ids = EntityIds::default();
        update_drones(&mut drones, &mut bullets, &player, &tuning, &mut ids, SIM_DT);
        assert!(bullets.is_empty());
        assert_eq!(drones[0].shoot_timer, 0.0);
    }

    #[test]
    fn test_asteroid_drift() {
        let mut asteroids = vec![Asteroid {
            id: 1,
            pos: Vec2::ZERO,
            vel: Vec2::new(-30.0, 0.0),
            radius: 14.0,
            hp: 15.0,
            size: crate::sim::entities::SizeClass::Small,
            sprite_variant: 0,
            rotation: 0.0,
            spin: 0.5,
            scrap_reward: 2,
            alive: true,
        }];
        drift_asteroids(&mut asteroids, 1.0);
        assert_eq!(asteroids[0].pos, Vec2::new(-30.0, 0.0));
        assert_eq!(asteroids[0].rotation, 0.5);
    }
}
