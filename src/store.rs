//! Leaderboard persistence keyed by player name.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::GameResult;
use crate::game::ScoreDelta;

pub trait ScoreStore {
    fn add_points(&mut self, player_name: &str, points: i32) -> GameResult<()>;

    /// Apply a whole round of deltas. Either every delta lands or none does.
    fn apply(&mut self, deltas: &[ScoreDelta]) -> GameResult<()>;

    fn clear(&mut self) -> GameResult<()>;

    /// Every entry, highest score first (ties by name)
    fn list_all(&self) -> Vec<(String, i32)>;

    fn points(&self, player_name: &str) -> i32 {
        self.list_all()
            .into_iter()
            .find(|(name, _)| name == player_name)
            .map(|(_, points)| points)
            .unwrap_or(0)
    }
}

fn add_deltas(scores: &mut BTreeMap<String, i32>, deltas: &[ScoreDelta]) {
    for delta in deltas {
        *scores.entry(delta.name.clone()).or_insert(0) += delta.points;
    }
}

fn sorted_entries(scores: &BTreeMap<String, i32>) -> Vec<(String, i32)> {
    let mut entries: Vec<(String, i32)> = scores
        .iter()
        .map(|(name, points)| (name.clone(), *points))
        .collect();
    // BTreeMap already yields names in order, so a stable sort keeps ties alphabetical
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryScoreStore {
    scores: BTreeMap<String, i32>,
}

impl ScoreStore for InMemoryScoreStore {
    fn add_points(&mut self, player_name: &str, points: i32) -> GameResult<()> {
        *self.scores.entry(player_name.to_string()).or_insert(0) += points;
        Ok(())
    }

    fn apply(&mut self, deltas: &[ScoreDelta]) -> GameResult<()> {
        add_deltas(&mut self.scores, deltas);
        Ok(())
    }

    fn clear(&mut self) -> GameResult<()> {
        self.scores.clear();
        Ok(())
    }

    fn list_all(&self) -> Vec<(String, i32)> {
        sorted_entries(&self.scores)
    }

    fn points(&self, player_name: &str) -> i32 {
        self.scores.get(player_name).copied().unwrap_or(0)
    }
}

/// Scores kept as a flat `{"name": points}` JSON object, rewritten after
/// every change
#[derive(Debug, Clone)]
pub struct JsonFileScoreStore {
    path: PathBuf,
    scores: BTreeMap<String, i32>,
}

impl JsonFileScoreStore {
    /// Loads the file if it exists. A missing file starts an empty board.
    pub fn open(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref().to_path_buf();
        let scores = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), entries = scores.len(), "loaded scores");
        Ok(Self { path, scores })
    }

    /// Write `scores` to disk and only then adopt them, so a failed write
    /// leaves the board as it was
    fn commit(&mut self, scores: BTreeMap<String, i32>) -> GameResult<()> {
        let json = serde_json::to_string_pretty(&scores)?;
        fs::write(&self.path, json).map_err(|err| {
            warn!(path = %self.path.display(), %err, "failed to save scores");
            err
        })?;
        self.scores = scores;
        Ok(())
    }
}

impl ScoreStore for JsonFileScoreStore {
    fn add_points(&mut self, player_name: &str, points: i32) -> GameResult<()> {
        self.apply(&[ScoreDelta {
            name: player_name.to_string(),
            points,
        }])
    }

    fn apply(&mut self, deltas: &[ScoreDelta]) -> GameResult<()> {
        let mut scores = self.scores.clone();
        add_deltas(&mut scores, deltas);
        self.commit(scores)
    }

    fn clear(&mut self) -> GameResult<()> {
        self.commit(BTreeMap::new())
    }

    fn list_all(&self) -> Vec<(String, i32)> {
        sorted_entries(&self.scores)
    }

    fn points(&self, player_name: &str) -> i32 {
        self.scores.get(player_name).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_accumulates_by_name() {
        let mut store = InMemoryScoreStore::default();
        store.add_points("Alex", 1).unwrap();
        store.add_points("Bo", 2).unwrap();
        store.add_points("Alex", 2).unwrap();
        store.add_points("Cy", 2).unwrap();
        assert_eq!(
            store.list_all(),
            vec![
                ("Alex".to_string(), 3),
                ("Bo".to_string(), 2),
                ("Cy".to_string(), 2)
            ]
        );
        store.clear().unwrap();
        assert!(store.list_all().is_empty());
        assert_eq!(store.points("Alex"), 0);
    }

    #[test]
    fn test_json_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");

        let mut store = JsonFileScoreStore::open(&path).unwrap();
        assert!(store.list_all().is_empty());
        store.add_points("Alex", 2).unwrap();
        store.add_points("Bo", 1).unwrap();

        let reopened = JsonFileScoreStore::open(&path).unwrap();
        assert_eq!(reopened.points("Alex"), 2);
        assert_eq!(reopened.list_all()[0], ("Alex".to_string(), 2));

        let mut reopened = reopened;
        reopened.clear().unwrap();
        assert!(JsonFileScoreStore::open(&path).unwrap().list_all().is_empty());
    }

    #[test]
    fn test_json_store_keeps_board_when_save_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_yet").join("scores.json");
        let mut store = JsonFileScoreStore::open(&path).unwrap();

        let round = vec![
            ScoreDelta {
                name: "Alex".to_string(),
                points: 1,
            },
            ScoreDelta {
                name: "Bo".to_string(),
                points: 1,
            },
        ];
        assert!(store.apply(&round).is_err());
        assert!(store.add_points("Cy", 2).is_err());
        assert!(store.list_all().is_empty());

        fs::create_dir(dir.path().join("not_yet")).unwrap();
        store.apply(&round).unwrap();
        assert_eq!(store.points("Alex"), 1);
        assert_eq!(store.points("Bo"), 1);
        assert_eq!(JsonFileScoreStore::open(&path).unwrap().points("Alex"), 1);
    }

    #[test]
    fn test_json_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        fs::write(&path, "not json").unwrap();
        assert!(JsonFileScoreStore::open(&path).is_err());
    }
}
