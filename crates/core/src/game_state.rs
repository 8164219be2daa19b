//! Game state module - one game from first spawn to game over
//!
//! Ties together the board, the piece queue, the collision rules, line clears
//! and scoring. Every mutation goes through a command-style method that
//! returns whether anything changed; rejected moves leave the state untouched.
//! Timing lives in the game loop: here a gravity step is just a function call.

use crate::board::Board;
use crate::collision::{self, is_legal};
use crate::config::GameConfig;
use crate::effects::LineEffectState;
use crate::line_clear::process_lock;
use crate::pieces::Tetromino;
use crate::rng::{PieceQueue, SimpleRng};
use crate::scoring::{drop_bonus, drop_interval_ms, score_lock, DropKind};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{GameEvent, PieceKind, SessionGame};

/// Salt so the effect RNG never mirrors the piece sequence
const EFFECT_SEED_SALT: u32 = 0x9E37_79B9;

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    active: Option<Tetromino>,
    next: Option<PieceKind>,
    queue: PieceQueue,
    effect_rng: SimpleRng,
    seed: u32,
    score: u32,
    level: u32,
    lines: u32,
    tetrises: u32,
    pieces_placed: u32,
    drop_interval_ms: u32,
    line_effect: LineEffectState,
    paused: bool,
    game_over: bool,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh game: empty board, a falling piece and a queued next piece.
    ///
    /// `config` is expected to be validated already.
    pub fn new(config: GameConfig, seed: u32) -> Self {
        let mut queue = PieceQueue::new(seed);
        let first = queue.draw();
        let next = queue.draw();
        let board = Board::new(config.board_width, config.board_height);
        let active = Tetromino::spawn(first, config.board_width);
        Self::assemble(config, board, active, next, queue, seed)
    }

    /// Game resumed from an arbitrary position.
    ///
    /// The falling piece is placed exactly as given. If that placement is
    /// illegal the game starts out over.
    pub fn from_parts(
        config: GameConfig,
        board: Board,
        active: Tetromino,
        next: PieceKind,
        seed: u32,
    ) -> Self {
        Self::assemble(config, board, active, next, PieceQueue::new(seed), seed)
    }

    fn assemble(
        config: GameConfig,
        board: Board,
        active: Tetromino,
        next: PieceKind,
        queue: PieceQueue,
        seed: u32,
    ) -> Self {
        let level = config.levels.start_level;
        let game_over = !is_legal(&board, &active);
        Self {
            drop_interval_ms: drop_interval_ms(&config.timing, level),
            config,
            board,
            active: (!game_over).then_some(active),
            next: Some(next),
            queue,
            effect_rng: SimpleRng::new(seed ^ EFFECT_SEED_SALT),
            seed,
            score: 0,
            level,
            lines: 0,
            tetrises: 0,
            pieces_placed: 0,
            line_effect: LineEffectState::default(),
            paused: false,
            game_over,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn next(&self) -> Option<PieceKind> {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn tetrises(&self) -> u32 {
        self.tetrises
    }

    pub fn pieces_placed(&self) -> u32 {
        self.pieces_placed
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    pub fn line_effect(&self) -> &LineEffectState {
        &self.line_effect
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Seed this game was created with
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Seed for the game that follows this one, derived from the RNG state
    pub fn successor_seed(&self) -> u32 {
        self.queue.seed()
    }

    fn playable(&self) -> bool {
        !self.paused && !self.game_over
    }

    /// Shift the falling piece one column.
    pub fn move_piece(&mut self, dx: i8) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };
        match collision::try_shift(&self.board, &piece, dx, 0) {
            Some(moved) => {
                self.active = Some(moved);
                true
            }
            None => false,
        }
    }

    /// Rotate clockwise in place, or do nothing if blocked.
    pub fn rotate(&mut self) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };
        match collision::try_rotate(&self.board, &piece) {
            Some(rotated) if rotated != piece => {
                self.active = Some(rotated);
                true
            }
            _ => false,
        }
    }

    /// Player-driven step down. Earns the soft drop bonus; locks when the
    /// piece is already resting.
    pub fn soft_drop(&mut self) -> bool {
        self.step_down(Some(DropKind::Soft))
    }

    /// Automatic step down from the gravity timer.
    pub fn gravity_step(&mut self) -> bool {
        self.step_down(None)
    }

    fn step_down(&mut self, bonus: Option<DropKind>) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };
        match collision::try_shift(&self.board, &piece, 0, 1) {
            Some(moved) => {
                self.active = Some(moved);
                if let Some(kind) = bonus {
                    self.add_points(drop_bonus(&self.config.scoring, kind, 1));
                }
            }
            None => self.lock_active(),
        }
        true
    }

    /// Drop straight to the landing row, award the hard drop bonus and lock.
    pub fn hard_drop(&mut self) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };
        let distance = collision::drop_distance(&self.board, &piece);
        self.active = Some(piece.shifted(0, distance as i8));
        self.add_points(drop_bonus(&self.config.scoring, DropKind::Hard, distance));
        self.lock_active();
        true
    }

    /// Returns true when the paused flag actually changed.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        if self.game_over || self.paused == paused {
            return false;
        }
        self.paused = paused;
        true
    }

    pub fn advance_effects(&mut self, elapsed_ms: u32) {
        self.line_effect.advance(elapsed_ms);
    }

    /// Events emitted since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Landing row of the falling piece
    pub fn ghost_y(&self) -> Option<i8> {
        self.active
            .map(|piece| collision::ghost(&self.board, &piece).y)
    }

    fn add_points(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    fn lock_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        let result = process_lock(&mut self.board, &piece);
        self.pieces_placed += 1;
        self.events.push(GameEvent::PieceLocked { kind: piece.kind });

        if result.lines_cleared > 0 {
            self.line_effect.trigger(
                &result.rows,
                self.board.width(),
                piece.kind,
                self.config.timing.line_effect_ms,
                &mut self.effect_rng,
            );
            if result.is_tetris() {
                self.tetrises += 1;
            }
            self.events.push(GameEvent::LineClear(result.to_event()));
        }

        let outcome = score_lock(&self.config, result.lines_cleared, self.lines, self.level);
        self.add_points(outcome.points);
        self.lines = outcome.total_lines;
        if let Some(level_up) = outcome.level_up {
            self.level = outcome.level;
            self.drop_interval_ms = drop_interval_ms(&self.config.timing, self.level);
            tracing::debug!(
                from = level_up.previous_level,
                to = level_up.current_level,
                interval_ms = self.drop_interval_ms,
                "level up"
            );
            self.events.push(GameEvent::LevelUp(level_up));
        }

        self.spawn_next();
    }

    fn spawn_next(&mut self) {
        let Some(kind) = self.next.take() else {
            panic!("next piece missing during lock: the piece queue was not refilled");
        };
        self.next = Some(self.queue.draw());

        let piece = Tetromino::spawn(kind, self.board.width());
        if is_legal(&self.board, &piece) {
            self.active = Some(piece);
        } else {
            self.game_over = true;
            tracing::debug!(
                score = self.score,
                level = self.level,
                lines = self.lines,
                "spawn blocked, game over"
            );
        }
    }

    /// Final record of this game
    pub fn to_record(&self, timestamp: u64, duration_ms: u64) -> SessionGame {
        SessionGame {
            score: self.score,
            level: self.level,
            lines: self.lines,
            tetrises: self.tetrises,
            timestamp,
            duration_ms,
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            width: self.board.width(),
            height: self.board.height(),
            board: self.board.cells().to_vec(),
            active: self.active.map(ActiveSnapshot::from),
            ghost_y: self.ghost_y(),
            next: self.next,
            score: self.score,
            level: self.level,
            lines: self.lines,
            tetrises: self.tetrises,
            pieces_placed: self.pieces_placed,
            drop_interval_ms: self.drop_interval_ms,
            paused: self.paused,
            game_over: self.game_over,
            line_effect: self.line_effect.clone(),
            seed: self.seed,
        }
    }
}
