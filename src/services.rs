//! Leaderboard and replay storage boundary
//!
//! The game only hands plain summaries and `ReplayData` across these traits;
//! transports live behind them. The local implementations keep everything
//! in process and serialize to JSON for whatever storage the host offers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::replay::{ReplayData, ReplayError};
use crate::sim::RunSummary;

/// Maximum number of leaderboard entries to keep
pub const MAX_LEADERBOARD_ENTRIES: usize = 10;

/// Maximum number of replays kept on the local shelf
pub const MAX_LOCAL_REPLAYS: usize = 5;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("rejected: {0}")]
    Rejected(String),
    #[error(transparent)]
    Replay(#[from] ReplayError),
}

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub initials: String,
    pub distance_m: f32,
    pub summary: RunSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay_url: Option<String>,
}

impl LeaderboardEntry {
    pub fn from_summary(summary: RunSummary, replay_url: Option<String>) -> Self {
        Self {
            initials: summary.initials.clone(),
            distance_m: summary.distance_m,
            summary,
            replay_url,
        }
    }
}

pub trait LeaderboardService {
    /// Submit a finished run; returns the 1-indexed rank achieved
    fn submit(&mut self, entry: LeaderboardEntry) -> Result<usize, ServiceError>;
    /// Entries ranked best first
    fn query(&self) -> Vec<LeaderboardEntry>;
}

pub trait BlobStore {
    /// Store bytes and return the url they can be fetched from
    fn upload(&mut self, bytes: Vec<u8>) -> Result<String, ServiceError>;
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ServiceError>;
}

/// Serialize and upload a replay
pub fn upload_replay(store: &mut dyn BlobStore, replay: &ReplayData) -> Result<String, ServiceError> {
    let json = replay.to_json()?;
    store.upload(json.into_bytes())
}

/// Fetch and validate a replay
pub fn fetch_replay(store: &dyn BlobStore, url: &str) -> Result<ReplayData, ServiceError> {
    let bytes = store.fetch(url)?;
    let json = String::from_utf8(bytes).map_err(|e| ServiceError::Rejected(e.to_string()))?;
    Ok(ReplayData::from_json(&json)?)
}

/// Top runs by distance, kept in process
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalLeaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl LocalLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero never qualifies; otherwise a free slot or beating the last entry
    pub fn qualifies(&self, distance_m: f32) -> bool {
        if distance_m <= 0.0 {
            return false;
        }
        if self.entries.len() < MAX_LEADERBOARD_ENTRIES {
            return true;
        }
        self.entries.last().is_none_or(|e| distance_m > e.distance_m)
    }

    /// Rank a distance would achieve (1-indexed), if it qualifies
    pub fn potential_rank(&self, distance_m: f32) -> Option<usize> {
        if !self.qualifies(distance_m) {
            return None;
        }
        let pos = self.entries.iter().position(|e| distance_m > e.distance_m);
        Some(pos.unwrap_or(self.entries.len()) + 1)
    }

    pub fn top_distance(&self) -> Option<f32> {
        self.entries.first().map(|e| e.distance_m)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut board: LocalLeaderboard = serde_json::from_str(json)?;
        board
            .entries
            .sort_by(|a, b| b.distance_m.total_cmp(&a.distance_m));
        board.entries.truncate(MAX_LEADERBOARD_ENTRIES);
        Ok(board)
    }
}

impl LeaderboardService for LocalLeaderboard {
    fn submit(&mut self, entry: LeaderboardEntry) -> Result<usize, ServiceError> {
        let Some(rank) = self.potential_rank(entry.distance_m) else {
            return Err(ServiceError::Rejected(format!(
                "{:.0} m does not place",
                entry.distance_m
            )));
        };
        log::info!("leaderboard: {} placed #{rank} at {:.0} m", entry.initials, entry.distance_m);
        self.entries.insert(rank - 1, entry);
        self.entries.truncate(MAX_LEADERBOARD_ENTRIES);
        Ok(rank)
    }

    fn query(&self) -> Vec<LeaderboardEntry> {
        self.entries.clone()
    }
}

/// Blob store backed by a map; urls are `mem://replays/<n>.json`
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: BTreeMap<String, Vec<u8>>,
    next: u64,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    fn upload(&mut self, bytes: Vec<u8>) -> Result<String, ServiceError> {
        if bytes.is_empty() {
            return Err(ServiceError::Rejected("empty upload".into()));
        }
        self.next += 1;
        let url = format!("mem://replays/{}.json", self.next);
        self.blobs.insert(url.clone(), bytes);
        Ok(url)
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, ServiceError> {
        self.blobs
            .get(url)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(url.to_string()))
    }
}

/// Listing row for a locally saved replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalReplayMeta {
    pub id: u64,
    /// Host clock, milliseconds
    pub saved_at: u64,
    pub distance_m: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ShelfEntry {
    #[serde(flatten)]
    meta: LocalReplayMeta,
    replay: ReplayData,
}

/// The player's own last few replays
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalReplayShelf {
    entries: Vec<ShelfEntry>,
    next_id: u64,
}

impl LocalReplayShelf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a replay, dropping the oldest past the cap. Replays with no
    /// snapshots are not saved.
    pub fn save(&mut self, replay: ReplayData, distance_m: f32, saved_at: u64) -> Option<u64> {
        if replay.snapshots.is_empty() {
            log::warn!("not saving a replay with no snapshots");
            return None;
        }
        self.next_id += 1;
        let id = self.next_id;
        self.entries.push(ShelfEntry {
            meta: LocalReplayMeta {
                id,
                saved_at,
                distance_m,
            },
            replay,
        });
        self.entries.sort_by(|a, b| b.meta.saved_at.cmp(&a.meta.saved_at));
        self.entries.truncate(MAX_LOCAL_REPLAYS);
        Some(id)
    }

    /// Metadata only, newest first
    pub fn list(&self) -> Vec<LocalReplayMeta> {
        self.entries.iter().map(|e| e.meta.clone()).collect()
    }

    pub fn get(&self, id: u64) -> Option<&ReplayData> {
        self.entries
            .iter()
            .find(|e| e.meta.id == id)
            .map(|e| &e.replay)
            .filter(|r| !r.snapshots.is_empty())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::replay::ReplayRecorder;
    use crate::sim::GameState;
    use crate::tuning::Tuning;

    fn summary(initials: &str, distance_m: f32) -> RunSummary {
        RunSummary {
            initials: initials.into(),
            distance_m,
            scrap: 0,
            gold: 0,
            round: 1,
            total_kills: 0,
            level: 0,
            upgrades: Vec::new(),
            evolutions: Vec::new(),
            artifacts: Vec::new(),
        }
    }

    fn entry(initials: &str, distance_m: f32) -> LeaderboardEntry {
        LeaderboardEntry::from_summary(summary(initials, distance_m), None)
    }

    fn recorded_replay() -> ReplayData {
        let tuning = Tuning::default();
        let state = GameState::new(3, &tuning);
        let mut rec = ReplayRecorder::new(3, SIM_DT);
        for step in 1..=8 {
            rec.record_snapshot(step as f32 * SIM_DT, &state, &tuning);
        }
        rec.to_replay()
    }

    #[test]
    fn test_leaderboard_ranks_descending() {
        let mut board = LocalLeaderboard::new();
        assert_eq!(board.submit(entry("AAA", 100.0)).unwrap(), 1);
        assert_eq!(board.submit(entry("BBB", 300.0)).unwrap(), 1);
        assert_eq!(board.submit(entry("CCC", 200.0)).unwrap(), 2);
        let names: Vec<String> = board.query().into_iter().map(|e| e.initials).collect();
        assert_eq!(names, vec!["BBB", "CCC", "AAA"]);
        assert_eq!(board.top_distance(), Some(300.0));
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut board = LocalLeaderboard::new();
        assert!(!board.qualifies(0.0));
        assert!(matches!(board.submit(entry("ZZZ", 0.0)), Err(ServiceError::Rejected(_))));
    }

    #[test]
    fn test_full_board_keeps_top_ten() {
        let mut board = LocalLeaderboard::new();
        for i in 1..=MAX_LEADERBOARD_ENTRIES {
            board.submit(entry("AAA", i as f32 * 10.0)).unwrap();
        }
        assert!(!board.qualifies(10.0));
        assert_eq!(board.potential_rank(55.0), Some(6));
        board.submit(entry("NEW", 55.0)).unwrap();
        assert_eq!(board.entries.len(), MAX_LEADERBOARD_ENTRIES);
        assert_eq!(board.entries.last().map(|e| e.distance_m), Some(20.0));

        let restored = LocalLeaderboard::from_json(&board.to_json().unwrap()).unwrap();
        assert_eq!(restored.entries, board.entries);
    }

    #[test]
    fn test_blob_round_trip_and_missing() {
        let mut store = MemoryBlobStore::new();
        let replay = recorded_replay();
        let url = upload_replay(&mut store, &replay).unwrap();
        assert_eq!(fetch_replay(&store, &url).unwrap(), replay);
        assert!(matches!(
            fetch_replay(&store, "mem://replays/99.json"),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn test_blob_rejects_empty_replay() {
        let mut store = MemoryBlobStore::new();
        let url = store.upload(b"{}".to_vec()).unwrap();
        assert!(matches!(fetch_replay(&store, &url), Err(ServiceError::Replay(_))));
    }

    #[test]
    fn test_shelf_keeps_newest_five() {
        let mut shelf = LocalReplayShelf::new();
        let replay = recorded_replay();
        let mut ids = Vec::new();
        for saved_at in 0..7u64 {
            ids.push(shelf.save(replay.clone(), saved_at as f32, saved_at * 1000).unwrap());
        }
        let listed = shelf.list();
        assert_eq!(listed.len(), MAX_LOCAL_REPLAYS);
        assert_eq!(listed[0].saved_at, 6000);
        assert!(shelf.get(ids[0]).is_none());
        assert!(shelf.get(ids[6]).is_some());

        let restored = LocalReplayShelf::from_json(&shelf.to_json().unwrap()).unwrap();
        assert_eq!(restored.list(), listed);
    }

    #[test]
    fn test_shelf_refuses_empty_replay() {
        let mut shelf = LocalReplayShelf::new();
        let mut replay = recorded_replay();
        replay.snapshots.clear();
        assert!(shelf.save(replay, 10.0, 1).is_none());
        assert!(shelf.list().is_empty());
    }
}
