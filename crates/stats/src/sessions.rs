//! Play sessions - spans of continuous play split by an inactivity timeout

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::SessionGame;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub id: Uuid,
    /// Unix ms when the first game of the session started
    pub start_time: u64,
    /// Unix ms when the last game of the session ended
    pub end_time: u64,
    pub games: Vec<SessionGame>,
}

impl GameSession {
    pub fn open(game: SessionGame) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_time: game_start(&game),
            end_time: game.timestamp,
            games: vec![game],
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_time.saturating_sub(self.start_time)
    }
}

fn game_start(game: &SessionGame) -> u64 {
    game.timestamp.saturating_sub(game.duration_ms)
}

/// Append `game` to the latest session, or open a new one when the idle gap
/// between that session's end and this game's start exceeds `timeout_ms`.
///
/// Returns true when a new session was opened.
pub fn append_game(sessions: &mut Vec<GameSession>, game: SessionGame, timeout_ms: u64) -> bool {
    match sessions.last_mut() {
        Some(last) if game_start(&game).saturating_sub(last.end_time) <= timeout_ms => {
            last.end_time = last.end_time.max(game.timestamp);
            last.games.push(game);
            false
        }
        _ => {
            sessions.push(GameSession::open(game));
            true
        }
    }
}
