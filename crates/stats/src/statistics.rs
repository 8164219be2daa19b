//! Cumulative lifetime totals

use serde::{Deserialize, Serialize};

use crate::types::SessionGame;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameStatistics {
    pub games_played: u32,
    pub total_score: u64,
    pub total_lines: u64,
    pub total_tetrises: u64,
    pub total_play_time_ms: u64,
    pub best_score: u32,
    pub highest_level: u32,
    /// Games reset before reaching game over
    pub abandoned_games: u32,
    /// Reserved; never computed
    pub best_streak: u32,
}

impl GameStatistics {
    /// Fold a finished game into the totals.
    pub fn record(&mut self, game: &SessionGame) {
        self.games_played = self.games_played.saturating_add(1);
        self.add_totals(game);
        self.best_score = self.best_score.max(game.score);
        self.highest_level = self.highest_level.max(game.level);
    }

    /// Fold a game that was reset before game over.
    ///
    /// Its score, lines and play time still count toward the lifetime totals,
    /// but it is not a played game and never sets a best score.
    pub fn record_abandoned(&mut self, game: &SessionGame) {
        self.abandoned_games = self.abandoned_games.saturating_add(1);
        self.add_totals(game);
    }

    fn add_totals(&mut self, game: &SessionGame) {
        self.total_score = self.total_score.saturating_add(game.score as u64);
        self.total_lines = self.total_lines.saturating_add(game.lines as u64);
        self.total_tetrises = self.total_tetrises.saturating_add(game.tetrises as u64);
        self.total_play_time_ms = self.total_play_time_ms.saturating_add(game.duration_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(score: u32, level: u32) -> SessionGame {
        SessionGame {
            score,
            level,
            lines: 12,
            tetrises: 1,
            timestamp: 0,
            duration_ms: 60_000,
        }
    }

    #[test]
    fn record_tracks_bests_and_totals() {
        let mut stats = GameStatistics::default();
        stats.record(&game(1200, 2));
        stats.record(&game(800, 4));

        assert_eq!(stats.games_played, 2);
        assert_eq!(stats.total_score, 2000);
        assert_eq!(stats.total_lines, 24);
        assert_eq!(stats.total_tetrises, 2);
        assert_eq!(stats.total_play_time_ms, 120_000);
        assert_eq!(stats.best_score, 1200);
        assert_eq!(stats.highest_level, 4);
        assert_eq!(stats.best_streak, 0);
    }

    #[test]
    fn abandoned_game_counts_toward_totals_only() {
        let mut stats = GameStatistics::default();
        stats.record_abandoned(&game(5000, 9));

        assert_eq!(stats.games_played, 0);
        assert_eq!(stats.abandoned_games, 1);
        assert_eq!(stats.total_score, 5000);
        assert_eq!(stats.best_score, 0);
        assert_eq!(stats.highest_level, 0);
    }
}
