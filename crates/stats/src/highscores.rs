//! Capped, score-sorted high score table

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::SessionGame;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub id: Uuid,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    /// Unix ms
    pub date: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
}

impl HighScore {
    pub fn from_game(game: &SessionGame, player_name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            score: game.score,
            level: game.level,
            lines: game.lines,
            date: game.timestamp,
            player_name,
        }
    }
}

/// Highest score first; among equal scores the newest entry ranks higher,
/// so overflow evicts the oldest of the lowest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScoreTable {
    capacity: usize,
    entries: Vec<HighScore>,
}

impl HighScoreTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity + 1),
        }
    }

    /// Rebuild from persisted entries, restoring order and the cap.
    pub fn from_entries(capacity: usize, entries: Vec<HighScore>) -> Self {
        let mut table = Self { capacity, entries };
        table.normalize();
        table
    }

    fn normalize(&mut self) {
        self.entries
            .sort_by(|a, b| b.score.cmp(&a.score).then(b.date.cmp(&a.date)));
        self.entries.truncate(self.capacity);
    }

    /// Would this score make the table?
    pub fn qualifies(&self, score: u32) -> bool {
        self.entries.len() < self.capacity
            || self.entries.last().is_some_and(|lowest| score >= lowest.score)
    }

    /// Insert and return the 1-based rank, or `None` when it did not make the cut.
    pub fn insert(&mut self, entry: HighScore) -> Option<usize> {
        if self.capacity == 0 || !self.qualifies(entry.score) {
            return None;
        }
        let id = entry.id;
        self.entries.push(entry);
        self.normalize();
        self.entries.iter().position(|e| e.id == id).map(|i| i + 1)
    }

    pub fn entries(&self) -> &[HighScore] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<HighScore> {
        self.entries
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn best(&self) -> Option<&HighScore> {
        self.entries.first()
    }
}
