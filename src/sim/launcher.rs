//! Slingshot launch and boost thrust

use glam::Vec2;

use super::entities::Player;
use super::run_state::DerivedPlayerStats;
use crate::input::{LaunchGesture, clamp_axis};
use crate::tuning::LauncherTuning;

/// Launch an unlaunched player from a released drag.
///
/// Returns true if the player launched. Short pulls are swallowed without a
/// launch; the gesture counts as consumed either way.
pub fn apply_launch(player: &mut Player, gesture: &LaunchGesture, launcher: &LauncherTuning) -> bool {
    if player.launched {
        return false;
    }

    let pull = gesture.pull();
    let dist = pull.length();
    if dist < launcher.min_pull_dist {
        return false;
    }

    let clamped = dist.min(launcher.max_pull_dist);
    let power = (clamped * launcher.power_scale).clamp(launcher.power_min, launcher.power_max);
    player.vel = pull / dist * power;
    player.launched = true;
    log::info!("launched at {:.0} px/s", power);
    true
}

/// Apply thrust from the axis, draining boost; regenerate while idle if
/// auto-regen is unlocked
pub fn apply_thrust(player: &mut Player, stats: &DerivedPlayerStats, axis: Vec2, dt: f32) {
    if !player.launched {
        return;
    }

    let axis = clamp_axis(axis);
    let wants_thrust = axis != Vec2::ZERO;
    if wants_thrust && player.boost > 0.0 {
        player.vel += axis * stats.thrust_accel * dt;
        player.boost = (player.boost - stats.boost_drain_per_sec * dt).max(0.0);
    } else if !wants_thrust && stats.boost_auto_regen {
        player.boost = (player.boost + stats.boost_regen_per_sec * dt).min(stats.boost_max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::run_state::RunState;
    use crate::tuning::Tuning;

    fn fresh() -> (Tuning, RunState, Player) {
        let tuning = Tuning::default();
        let run = RunState::new(9, &tuning);
        let player = Player::new(run.player_stats(), &tuning);
        (tuning, run, player)
    }

    #[test]
    fn test_launch_direction_and_power() {
        let (tuning, _, mut player) = fresh();
        let gesture = LaunchGesture {
            anchor: Vec2::new(100.0, 100.0),
            release: Vec2::new(0.0, 100.0),
        };
        assert!(apply_launch(&mut player, &gesture, &tuning.launcher));
        assert!(player.launched);
        let expected = (100.0 * tuning.launcher.power_scale)
            .clamp(tuning.launcher.power_min, tuning.launcher.power_max);
        assert!((player.vel - Vec2::new(expected, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_pull_clamped_to_max_power() {
        let (tuning, _, mut player) = fresh();
        let gesture = LaunchGesture {
            anchor: Vec2::ZERO,
            release: Vec2::new(0.0, 5000.0),
        };
        apply_launch(&mut player, &gesture, &tuning.launcher);
        let l = &tuning.launcher;
        let expected = (l.max_pull_dist * l.power_scale).clamp(l.power_min, l.power_max);
        assert!((player.speed() - expected).abs() < 1e-2);
        assert!(player.vel.y < 0.0);
    }

    #[test]
    fn test_tiny_pull_ignored() {
        let (tuning, _, mut player) = fresh();
        let gesture = LaunchGesture {
            anchor: Vec2::ZERO,
            release: Vec2::new(3.0, 0.0),
        };
        assert!(!apply_launch(&mut player, &gesture, &tuning.launcher));
        assert!(!player.launched);
        assert_eq!(player.vel, Vec2::ZERO);
    }

    #[test]
    fn test_launch_only_once() {
        let (tuning, _, mut player) = fresh();
        let gesture = LaunchGesture {
            anchor: Vec2::ZERO,
            release: Vec2::new(-100.0, 0.0),
        };
        assert!(apply_launch(&mut player, &gesture, &tuning.launcher));
        let vel = player.vel;
        assert!(!apply_launch(&mut player, &gesture, &tuning.launcher));
        assert_eq!(player.vel, vel);
    }

    #[test]
    fn test_thrust_drains_boost() {
        let (_, run, mut player) = fresh();
        player.launched = true;
        let stats = run.player_stats();
        apply_thrust(&mut player, stats, Vec2::X, 0.5);
        assert!((player.vel.x - stats.thrust_accel * 0.5).abs() < 1e-3);
        assert!((player.boost - (stats.boost_max - stats.boost_drain_per_sec * 0.5)).abs() < 1e-3);
    }

    #[test]
    fn test_no_thrust_without_boost() {
        let (_, run, mut player) = fresh();
        player.launched = true;
        player.boost = 0.0;
        apply_thrust(&mut player, run.player_stats(), Vec2::Y, 0.5);
        assert_eq!(player.vel, Vec2::ZERO);
    }

    #[test]
    fn test_idle_regen_capped() {
        let (tuning, mut run, mut player) = fresh();
        run.apply_upgrade("boost_auto_regen", &tuning);
        player.launched = true;
        player.boost = run.player_stats().boost_max - 1.0;
        apply_thrust(&mut player, run.player_stats(), Vec2::ZERO, 10.0);
        assert_eq!(player.boost, run.player_stats().boost_max);
    }
}
