//! Game loop - the timing authority for one player
//!
//! ```text
//! Idle ──start──▶ Running ──pause──▶ Paused
//!                   │    ◀──resume──
//!                   ▼
//!                GameOver ──reset──▶ Running (fresh game)
//! ```
//!
//! `reset` is accepted in every state and always lands in `Running`.
//!
//! Ticks and commands both take `&mut self`, so they can never interleave.
//! Gameplay commands outside `Running` are rejected silently.

use blockfall_core::{ConfigError, GameConfig, GameSnapshot, GameState};

use crate::clock::Clock;
use crate::types::{GameCommand, GameEvent, SessionGame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Paused,
    GameOver,
}

pub struct GameLoop<C: Clock> {
    config: GameConfig,
    state: GameState,
    loop_state: LoopState,
    clock: C,
    /// Time carried toward the next gravity step
    accumulator_ms: u32,
    started_at: u64,
    paused_since: Option<u64>,
    paused_total_ms: u64,
    events: Vec<GameEvent>,
}

impl<C: Clock> GameLoop<C> {
    /// Validate `config` and prepare a game; nothing moves until [`start`](Self::start).
    pub fn new(config: GameConfig, seed: u32, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_state(GameState::new(config, seed), clock))
    }

    /// Drive an existing game state.
    pub fn from_state(state: GameState, clock: C) -> Self {
        let started_at = clock.now_ms();
        Self {
            config: *state.config(),
            state,
            loop_state: LoopState::Idle,
            clock,
            accumulator_ms: 0,
            started_at,
            paused_since: None,
            paused_total_ms: 0,
            events: Vec::new(),
        }
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Idle → Running. No-op in any other state.
    pub fn start(&mut self) -> bool {
        if self.loop_state != LoopState::Idle {
            return false;
        }
        self.started_at = self.clock.now_ms();
        self.loop_state = LoopState::Running;
        tracing::debug!(seed = self.state.seed(), "game started");
        self.sync();
        true
    }

    /// One gravity step.
    pub fn tick(&mut self) -> bool {
        if self.loop_state != LoopState::Running {
            return false;
        }
        let changed = self.state.gravity_step();
        self.sync();
        changed
    }

    /// Feed wall time; runs one tick per full drop interval.
    ///
    /// The interval is re-read after every tick, so a level up speeds up the
    /// remaining steps of the same call. Does nothing unless running.
    pub fn advance(&mut self, elapsed_ms: u32) {
        if self.loop_state != LoopState::Running {
            return;
        }
        self.state.advance_effects(elapsed_ms);
        self.accumulator_ms = self.accumulator_ms.saturating_add(elapsed_ms);
        while self.loop_state == LoopState::Running {
            let interval = self.state.drop_interval_ms().max(1);
            if self.accumulator_ms < interval {
                break;
            }
            self.accumulator_ms -= interval;
            self.tick();
        }
    }

    /// Apply one command. Returns whether anything changed.
    pub fn dispatch(&mut self, command: GameCommand) -> bool {
        match command {
            GameCommand::Reset => {
                self.reset();
                true
            }
            GameCommand::Pause => self.pause(),
            GameCommand::Resume => self.resume(),
            _ if self.loop_state != LoopState::Running => false,
            GameCommand::MoveLeft => self.apply(|s| s.move_piece(-1)),
            GameCommand::MoveRight => self.apply(|s| s.move_piece(1)),
            GameCommand::SoftDrop => self.apply(GameState::soft_drop),
            GameCommand::HardDrop => self.apply(GameState::hard_drop),
            GameCommand::Rotate => self.apply(GameState::rotate),
        }
    }

    fn apply(&mut self, f: impl FnOnce(&mut GameState) -> bool) -> bool {
        let changed = f(&mut self.state);
        self.sync();
        changed
    }

    fn pause(&mut self) -> bool {
        if self.loop_state != LoopState::Running {
            return false;
        }
        self.state.set_paused(true);
        self.paused_since = Some(self.clock.now_ms());
        self.loop_state = LoopState::Paused;
        true
    }

    fn resume(&mut self) -> bool {
        if self.loop_state != LoopState::Paused {
            return false;
        }
        self.state.set_paused(false);
        if let Some(since) = self.paused_since.take() {
            self.paused_total_ms += self.clock.now_ms().saturating_sub(since);
        }
        self.loop_state = LoopState::Running;
        true
    }

    /// Replace the game with a fresh one and run it.
    ///
    /// The new seed comes from the old game's RNG state, so a session of
    /// resets is still reproducible from the first seed.
    pub fn reset(&mut self) {
        let seed = self.state.successor_seed();
        self.state = GameState::new(self.config, seed);
        self.accumulator_ms = 0;
        self.started_at = self.clock.now_ms();
        self.paused_since = None;
        self.paused_total_ms = 0;
        self.loop_state = LoopState::Running;
        tracing::debug!(seed, "game reset");
        self.sync();
    }

    /// Record of a game that would be thrown away by a reset right now:
    /// one that is still in progress and has placed at least one piece.
    pub fn abandoned_record(&self) -> Option<SessionGame> {
        let in_progress = matches!(self.loop_state, LoopState::Running | LoopState::Paused);
        (in_progress && self.state.pieces_placed() > 0).then(|| self.current_record())
    }

    /// Record of the current game as of now
    pub fn current_record(&self) -> SessionGame {
        let now = self.clock.now_ms();
        self.state.to_record(now, self.play_time_ms(now))
    }

    fn play_time_ms(&self, now: u64) -> u64 {
        let paused_now = self
            .paused_since
            .map_or(0, |since| now.saturating_sub(since));
        now.saturating_sub(self.started_at)
            .saturating_sub(self.paused_total_ms + paused_now)
    }

    /// Collect game events and detect the game-over transition.
    fn sync(&mut self) {
        self.events.extend(self.state.drain_events());
        if self.state.is_game_over() && self.loop_state != LoopState::GameOver {
            self.loop_state = LoopState::GameOver;
            let record = self.current_record();
            tracing::info!(
                score = record.score,
                level = record.level,
                lines = record.lines,
                "game over"
            );
            self.events.push(GameEvent::GameOver(record));
        }
    }
}
