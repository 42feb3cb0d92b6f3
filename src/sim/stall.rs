//! Stall and death detection

use super::entities::Player;
use super::run_state::DerivedPlayerStats;

/// Advance the stall timer; true once the rocket is over (hull gone or
/// stalled for the derived stall time)
pub fn check_stall(player: &mut Player, stats: &DerivedPlayerStats, dt: f32) -> bool {
    if !player.launched {
        return false;
    }

    if player.speed() < stats.stall_speed {
        player.stall_timer += dt;
    } else {
        player.stall_timer = 0.0;
    }

    player.hp <= 0.0 || player.stall_timer >= stats.stall_time
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::run_state::RunState;
    use crate::tuning::Tuning;
    use glam::Vec2;

    #[test]
    fn test_trips_exactly_when_timer_crosses() {
        let tuning = Tuning::default();
        let run = RunState::new(1, &tuning);
        let stats = run.player_stats();
        let mut player = Player::new(stats, &tuning);
        player.launched = true;
        player.vel = Vec2::new(stats.stall_speed * 0.5, 0.0);

        let mut expected_tick = 0;
        let mut t = 0.0f32;
        while t < stats.stall_time {
            t += SIM_DT;
            expected_tick += 1;
        }

        for tick in 1..=expected_tick {
            let ended = check_stall(&mut player, stats, SIM_DT);
            assert_eq!(ended, tick == expected_tick, "tick {tick}");
        }
    }

    #[test]
    fn test_speed_resets_timer() {
        let tuning = Tuning::default();
        let run = RunState::new(1, &tuning);
        let stats = run.player_stats();
        let mut player = Player::new(stats, &tuning);
        player.launched = true;
        player.stall_timer = stats.stall_time - 0.01;
        player.vel = Vec2::new(stats.stall_speed + 1.0, 0.0);
        assert!(!check_stall(&mut player, stats, SIM_DT));
        assert_eq!(player.stall_timer, 0.0);
    }

    #[test]
    fn test_dead_hull_ends_rocket() {
        let tuning = Tuning::default();
        let run = RunState::new(1, &tuning);
        let stats = run.player_stats();
        let mut player = Player::new(stats, &tuning);
        player.launched = true;
        player.vel = Vec2::new(500.0, 0.0);
        player.hp = 0.0;
        assert!(check_stall(&mut player, stats, SIM_DT));
    }

    #[test]
    fn test_unlaunched_never_stalls() {
        let tuning = Tuning::default();
        let run = RunState::new(1, &tuning);
        let mut player = Player::new(run.player_stats(), &tuning);
        for _ in 0..1000 {
            assert!(!check_stall(&mut player, run.player_stats(), SIM_DT));
        }
    }
}
