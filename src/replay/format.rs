//! Replay file format
//!
//! JSON with camelCase fields and snake_case event tags:
//! `{version, seed, fixedDt, duration, snapshots[], events[]}`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ReplayError;
use crate::consts::REPLAY_VERSION;
use crate::sim::DroneKind;

/// Plain `{x, y}` point as stored in the file
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayVec2 {
    pub x: f32,
    pub y: f32,
}

impl From<Vec2> for ReplayVec2 {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<ReplayVec2> for Vec2 {
    fn from(v: ReplayVec2) -> Self {
        Vec2::new(v.x, v.y)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPlayer {
    pub pos: ReplayVec2,
    pub vel: ReplayVec2,
    pub launched: bool,
    pub boost: f32,
    pub hp: f32,
    pub kills: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDrone {
    pub id: u32,
    pub pos: ReplayVec2,
    pub vel: ReplayVec2,
    pub hp: f32,
    #[serde(rename = "type")]
    pub kind: DroneKind,
    pub elite: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotCoin {
    pub id: u32,
    pub pos: ReplayVec2,
    pub alive: bool,
}

/// Run counters. Currency fields are floats so playback can tween them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRunState {
    pub scrap: f32,
    pub gold: f32,
    #[serde(default)]
    pub total_gold_earned: f32,
    #[serde(default)]
    pub total_scrap: f32,
    #[serde(default)]
    pub total_distance_m: f32,
    pub round: u32,
    pub level: u32,
    pub distance_m: f32,
    #[serde(default)]
    pub round_toll: u32,
    #[serde(default)]
    pub rockets_remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySnapshot {
    pub t: f32,
    pub player: SnapshotPlayer,
    pub drones: Vec<SnapshotDrone>,
    pub coins: Vec<SnapshotCoin>,
    pub run_state: SnapshotRunState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    Launch {
        t: f32,
        vel: ReplayVec2,
    },
    #[serde(rename_all = "camelCase")]
    Kill {
        t: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        drone_id: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pos: Option<ReplayVec2>,
    },
    #[serde(rename_all = "camelCase")]
    CoinCollect {
        t: f32,
        coin_id: u32,
    },
    #[serde(rename_all = "camelCase")]
    UpgradeDisplay {
        t: f32,
        choice_ids: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    UpgradePick {
        t: f32,
        index: u32,
        picked_id: String,
    },
    RoundComplete {
        t: f32,
    },
    GameOver {
        t: f32,
    },
}

impl ReplayEvent {
    /// Timestamp in run seconds
    pub fn t(&self) -> f32 {
        match *self {
            ReplayEvent::Launch { t, .. }
            | ReplayEvent::Kill { t, .. }
            | ReplayEvent::CoinCollect { t, .. }
            | ReplayEvent::UpgradeDisplay { t, .. }
            | ReplayEvent::UpgradePick { t, .. }
            | ReplayEvent::RoundComplete { t }
            | ReplayEvent::GameOver { t } => t,
        }
    }
}

/// One upgrade screen as it should be re-shown during playback
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeReveal {
    pub show_at: f32,
    pub choice_ids: Vec<String>,
    pub picked_index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayData {
    pub version: u32,
    pub seed: u64,
    pub fixed_dt: f32,
    /// Timestamp of the last snapshot
    #[serde(default)]
    pub duration: f32,
    pub snapshots: Vec<ReplaySnapshot>,
    pub events: Vec<ReplayEvent>,
}

impl ReplayData {
    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and validate; a replay with nothing to play is rejected
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        let data: ReplayData = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    pub fn validate(&self) -> Result<(), ReplayError> {
        if self.version != REPLAY_VERSION {
            return Err(ReplayError::UnsupportedVersion {
                found: self.version,
                expected: REPLAY_VERSION,
            });
        }
        if self.snapshots.is_empty() {
            return Err(ReplayError::NoSnapshots);
        }
        Ok(())
    }

    /// Furthest distance seen in any snapshot
    pub fn max_distance_m(&self) -> f32 {
        self.snapshots
            .iter()
            .map(|s| s.run_state.distance_m)
            .fold(0.0, f32::max)
    }

    /// Pair each upgrade display with its pick, by order. A display with no
    /// recorded pick shows the first choice as picked.
    pub fn upgrade_reveals(&self) -> Vec<UpgradeReveal> {
        let mut picks = self.events.iter().filter_map(|e| match e {
            ReplayEvent::UpgradePick { index, .. } => Some(*index),
            _ => None,
        });
        self.events
            .iter()
            .filter_map(|e| match e {
                ReplayEvent::UpgradeDisplay { t, choice_ids } => Some((*t, choice_ids)),
                _ => None,
            })
            .map(|(t, choice_ids)| UpgradeReveal {
                show_at: t,
                choice_ids: choice_ids.clone(),
                picked_index: picks.next().unwrap_or(0),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> ReplayData {
        ReplayData {
            version: REPLAY_VERSION,
            seed: 42,
            fixed_dt: 0.015625,
            duration: 0.0,
            snapshots: vec![ReplaySnapshot {
                t: 0.0,
                player: SnapshotPlayer::default(),
                drones: vec![SnapshotDrone {
                    id: 3,
                    pos: ReplayVec2 { x: 1.0, y: 2.0 },
                    vel: ReplayVec2::default(),
                    hp: 20.0,
                    kind: DroneKind::Shooter,
                    elite: true,
                }],
                coins: Vec::new(),
                run_state: SnapshotRunState::default(),
            }],
            events: vec![
                ReplayEvent::Kill {
                    t: 0.5,
                    drone_id: Some(3),
                    pos: None,
                },
                ReplayEvent::GameOver { t: 1.0 },
            ],
        }
    }

    #[test]
    fn test_json_field_names() {
        let json = minimal().to_json().unwrap();
        assert!(json.contains("\"fixedDt\""));
        assert!(json.contains("\"runState\""));
        assert!(json.contains("\"rocketsRemaining\""));
        assert!(json.contains("\"type\":\"shooter\""));
        assert!(json.contains("{\"type\":\"kill\",\"t\":0.5,\"droneId\":3}"));
        assert!(json.contains("{\"type\":\"game_over\",\"t\":1.0}"));
        assert_eq!(ReplayData::from_json(&json).unwrap(), minimal());
    }

    #[test]
    fn test_reads_older_run_state() {
        let json = r#"{"version":1,"seed":7,"fixedDt":0.016666668,
            "snapshots":[{"t":0,"player":{"pos":{"x":0,"y":0},"vel":{"x":0,"y":0},
            "launched":false,"boost":100,"hp":100,"kills":0},"drones":[],"coins":[],
            "runState":{"scrap":0,"gold":0,"round":1,"level":0,"distanceM":0}}],
            "events":[{"type":"coin_collect","t":0.2,"coinId":9}]}"#;
        let data = ReplayData::from_json(json).unwrap();
        assert_eq!(data.duration, 0.0);
        assert_eq!(data.events[0], ReplayEvent::CoinCollect { t: 0.2, coin_id: 9 });
    }

    #[test]
    fn test_validation() {
        let mut data = minimal();
        data.snapshots.clear();
        assert!(matches!(data.validate(), Err(ReplayError::NoSnapshots)));

        let mut data = minimal();
        data.version = 2;
        let json = data.to_json().unwrap();
        assert!(matches!(
            ReplayData::from_json(&json),
            Err(ReplayError::UnsupportedVersion { found: 2, expected: 1 })
        ));
        assert!(matches!(ReplayData::from_json("{"), Err(ReplayError::Json(_))));
    }

    #[test]
    fn test_upgrade_reveals_pair_in_order() {
        let mut data = minimal();
        let ids = |a: &str| vec![a.to_string(), "b".to_string(), "c".to_string()];
        data.events = vec![
            ReplayEvent::UpgradeDisplay { t: 1.0, choice_ids: ids("a") },
            ReplayEvent::UpgradePick { t: 1.0, index: 2, picked_id: "c".into() },
            ReplayEvent::UpgradeDisplay { t: 4.0, choice_ids: ids("x") },
        ];
        let reveals = data.upgrade_reveals();
        assert_eq!(reveals.len(), 2);
        assert_eq!(reveals[0].picked_index, 2);
        assert_eq!(reveals[1].show_at, 4.0);
        assert_eq!(reveals[1].choice_ids[0], "x");
        assert_eq!(reveals[1].picked_index, 0);
    }
}
