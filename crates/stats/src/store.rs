//! The statistics store: owns sessions, high scores, lifetime totals and
//! settings, and writes them through a [`Storage`] backend on every change.

use thiserror::Error;

use crate::analytics::{self, EnhancedStatistics, Period};
use crate::highscores::{HighScore, HighScoreTable};
use crate::sessions::{append_game, GameSession};
use crate::settings::{Settings, SettingsError, SettingsPatch};
use crate::statistics::GameStatistics;
use crate::storage::{PersistedState, Storage, StorageError, STATE_VERSION};
use crate::types::{SessionGame, HIGH_SCORE_CAPACITY, SESSION_TIMEOUT_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    pub high_score_capacity: usize,
    /// Idle time after which the next game opens a new session
    pub session_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            high_score_capacity: HIGH_SCORE_CAPACITY,
            session_timeout_ms: SESSION_TIMEOUT_MS,
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut problems = Vec::new();
        if self.high_score_capacity == 0 {
            problems.push("high score capacity must be at least 1".to_string());
        }
        if self.session_timeout_ms == 0 {
            problems.push("session timeout must be positive".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(StoreError::InvalidConfig(problems.join("; ")))
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// What recording a finished game changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOutcome {
    /// 1-based position in the high score table, if it made the cut
    pub rank: Option<usize>,
    pub new_session: bool,
}

pub struct StatsStore<S: Storage> {
    storage: S,
    config: StoreConfig,
    settings: Settings,
    statistics: GameStatistics,
    sessions: Vec<GameSession>,
    high_scores: HighScoreTable,
}

impl<S: Storage> StatsStore<S> {
    /// Load saved state through `storage`.
    pub fn open(storage: S, config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        let state = storage.load()?;
        tracing::info!(
            games = state.statistics.games_played,
            sessions = state.sessions.len(),
            high_scores = state.high_scores.len(),
            "loaded saved statistics"
        );
        Ok(Self {
            storage,
            config,
            settings: state.settings,
            statistics: state.statistics,
            sessions: state.sessions,
            high_scores: HighScoreTable::from_entries(config.high_score_capacity, state.high_scores),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn statistics(&self) -> &GameStatistics {
        &self.statistics
    }

    pub fn sessions(&self) -> &[GameSession] {
        &self.sessions
    }

    pub fn high_scores(&self) -> &[HighScore] {
        self.high_scores.entries()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Append a finished game to its session, the high scores and the totals.
    ///
    /// In-memory state is updated even when saving fails.
    pub fn record_game(&mut self, game: SessionGame) -> Result<RecordOutcome, StoreError> {
        self.statistics.record(&game);
        let new_session = append_game(&mut self.sessions, game, self.config.session_timeout_ms);
        if new_session {
            tracing::info!(at = game.timestamp, "opened new play session");
        }
        let player = Some(self.settings.player_name.clone());
        let rank = self.high_scores.insert(HighScore::from_game(&game, player));
        tracing::info!(
            score = game.score,
            level = game.level,
            lines = game.lines,
            rank = ?rank,
            "game recorded"
        );

        self.persist()?;
        Ok(RecordOutcome { rank, new_session })
    }

    /// Count a game reset before game over toward the lifetime totals only.
    pub fn record_abandoned(&mut self, game: SessionGame) -> Result<(), StoreError> {
        self.statistics.record_abandoned(&game);
        tracing::debug!(score = game.score, "abandoned game counted");
        self.persist()
    }

    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Result<&Settings, StoreError> {
        self.settings = self.settings.apply(patch)?;
        self.persist()?;
        Ok(&self.settings)
    }

    /// Forget everything, in memory and in storage.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.settings = Settings::default();
        self.statistics = GameStatistics::default();
        self.sessions.clear();
        self.high_scores = HighScoreTable::new(self.config.high_score_capacity);
        self.storage.clear()?;
        tracing::info!("cleared saved statistics");
        Ok(())
    }

    pub fn enhanced(&self, period: Period, now_ms: u64) -> EnhancedStatistics {
        analytics::compute(
            &self.statistics,
            &self.sessions,
            self.high_scores.entries(),
            period,
            now_ms,
        )
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        let state = PersistedState {
            version: STATE_VERSION,
            settings: self.settings.clone(),
            high_scores: self.high_scores.entries().to_vec(),
            statistics: self.statistics.clone(),
            sessions: self.sessions.clone(),
        };
        self.storage.save(&state)?;
        Ok(())
    }
}
