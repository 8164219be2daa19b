//! Engine configuration - scoring table, level curve, gravity timing, board size
//!
//! `GameConfig::default()` carries the classic constants from `crate::types`.
//! Overrides come in as a [`GameConfigPatch`] (every field optional, usually
//! read from a JSON file) that is merged explicitly and validated before any
//! engine is constructed. Validation reports every violated constraint at once.

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::types::{
    BOARD_HEIGHT, BOARD_WIDTH, DROP_INTERVAL_MULTIPLIER, HARD_DROP_POINTS,
    INITIAL_DROP_INTERVAL_MS, LINES_PER_LEVEL, LINE_EFFECT_MS, LINE_SCORES, MAX_LEVEL,
    MIN_DROP_INTERVAL_MS, SOFT_DROP_POINTS,
};

/// Smallest and largest supported board side, in cells
pub const MIN_BOARD_SIDE: u8 = 4;
pub const MAX_BOARD_SIDE: u8 = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    /// Points by number of lines cleared; index 0 is always 0
    pub line_scores: [u32; 5],
    pub soft_drop_points: u32,
    pub hard_drop_points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelConfig {
    pub lines_per_level: u32,
    pub start_level: u32,
    pub max_level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingConfig {
    pub initial_drop_interval_ms: u32,
    pub drop_interval_multiplier: f64,
    pub min_drop_interval_ms: u32,
    pub line_effect_ms: u32,
}

/// Complete engine configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    pub board_width: u8,
    pub board_height: u8,
    pub scoring: ScoringConfig,
    pub levels: LevelConfig,
    pub timing: TimingConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            scoring: ScoringConfig {
                line_scores: LINE_SCORES,
                soft_drop_points: SOFT_DROP_POINTS,
                hard_drop_points: HARD_DROP_POINTS,
            },
            levels: LevelConfig {
                lines_per_level: LINES_PER_LEVEL,
                start_level: 1,
                max_level: MAX_LEVEL,
            },
            timing: TimingConfig {
                initial_drop_interval_ms: INITIAL_DROP_INTERVAL_MS,
                drop_interval_multiplier: DROP_INTERVAL_MULTIPLIER,
                min_drop_interval_ms: MIN_DROP_INTERVAL_MS,
                line_effect_ms: LINE_EFFECT_MS,
            },
        }
    }
}

/// Partial configuration override.
///
/// `line_scores` lists single, double, triple and tetris points in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfigPatch {
    pub board_width: Option<u8>,
    pub board_height: Option<u8>,
    pub line_scores: Option<[u32; 4]>,
    pub soft_drop_points: Option<u32>,
    pub hard_drop_points: Option<u32>,
    pub lines_per_level: Option<u32>,
    pub start_level: Option<u32>,
    pub max_level: Option<u32>,
    pub initial_drop_interval_ms: Option<u32>,
    pub drop_interval_multiplier: Option<f64>,
    pub min_drop_interval_ms: Option<u32>,
    pub line_effect_ms: Option<u32>,
}

/// A single broken configuration rule.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigViolation {
    BoardWidth(u8),
    BoardHeight(u8),
    ZeroSingleScore,
    ScoreOrder {
        lines: usize,
        points: u32,
        previous: u32,
    },
    ZeroLinesPerLevel,
    StartLevel {
        start: u32,
        max: u32,
    },
    DropMultiplier(f64),
    ZeroMinDropInterval,
    DropIntervalOrder {
        min: u32,
        initial: u32,
    },
}

impl fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigViolation::BoardWidth(w) => write!(
                f,
                "board width {} outside {}..={}",
                w, MIN_BOARD_SIDE, MAX_BOARD_SIDE
            ),
            ConfigViolation::BoardHeight(h) => write!(
                f,
                "board height {} outside {}..={}",
                h, MIN_BOARD_SIDE, MAX_BOARD_SIDE
            ),
            ConfigViolation::ZeroSingleScore => write!(f, "single line score must be positive"),
            ConfigViolation::ScoreOrder {
                lines,
                points,
                previous,
            } => write!(
                f,
                "{}-line score {} must exceed {}-line score {}",
                lines,
                points,
                lines - 1,
                previous
            ),
            ConfigViolation::ZeroLinesPerLevel => write!(f, "lines per level must be at least 1"),
            ConfigViolation::StartLevel { start, max } => {
                write!(f, "start level {} must be within 1..={}", start, max)
            }
            ConfigViolation::DropMultiplier(m) => {
                write!(f, "drop interval multiplier {} must be in (0, 1]", m)
            }
            ConfigViolation::ZeroMinDropInterval => {
                write!(f, "minimum drop interval must be positive")
            }
            ConfigViolation::DropIntervalOrder { min, initial } => write!(
                f,
                "minimum drop interval {}ms exceeds initial interval {}ms",
                min, initial
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {}", join_violations(.0))]
    Invalid(Vec<ConfigViolation>),

    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

fn join_violations(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl GameConfig {
    /// Collect every violated constraint.
    pub fn violations(&self) -> Vec<ConfigViolation> {
        let mut out = Vec::new();
        let side = MIN_BOARD_SIDE..=MAX_BOARD_SIDE;

        if !side.contains(&self.board_width) {
            out.push(ConfigViolation::BoardWidth(self.board_width));
        }
        if !side.contains(&self.board_height) {
            out.push(ConfigViolation::BoardHeight(self.board_height));
        }

        let scores = &self.scoring.line_scores;
        if scores[1] == 0 {
            out.push(ConfigViolation::ZeroSingleScore);
        }
        for lines in 2..scores.len() {
            if scores[lines] <= scores[lines - 1] {
                out.push(ConfigViolation::ScoreOrder {
                    lines,
                    points: scores[lines],
                    previous: scores[lines - 1],
                });
            }
        }

        let levels = &self.levels;
        if levels.lines_per_level == 0 {
            out.push(ConfigViolation::ZeroLinesPerLevel);
        }
        if levels.start_level == 0 || levels.start_level > levels.max_level {
            out.push(ConfigViolation::StartLevel {
                start: levels.start_level,
                max: levels.max_level,
            });
        }

        let timing = &self.timing;
        let m = timing.drop_interval_multiplier;
        if !m.is_finite() || m <= 0.0 || m > 1.0 {
            out.push(ConfigViolation::DropMultiplier(m));
        }
        if timing.min_drop_interval_ms == 0 {
            out.push(ConfigViolation::ZeroMinDropInterval);
        }
        if timing.min_drop_interval_ms > timing.initial_drop_interval_ms {
            out.push(ConfigViolation::DropIntervalOrder {
                min: timing.min_drop_interval_ms,
                initial: timing.initial_drop_interval_ms,
            });
        }

        out
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(violations))
        }
    }

    /// Merge a patch over this configuration without validating.
    pub fn merge(&self, patch: &GameConfigPatch) -> GameConfig {
        let mut out = *self;
        if let Some(w) = patch.board_width {
            out.board_width = w;
        }
        if let Some(h) = patch.board_height {
            out.board_height = h;
        }
        if let Some([single, double, triple, tetris]) = patch.line_scores {
            out.scoring.line_scores = [0, single, double, triple, tetris];
        }
        if let Some(p) = patch.soft_drop_points {
            out.scoring.soft_drop_points = p;
        }
        if let Some(p) = patch.hard_drop_points {
            out.scoring.hard_drop_points = p;
        }
        if let Some(n) = patch.lines_per_level {
            out.levels.lines_per_level = n;
        }
        if let Some(level) = patch.start_level {
            out.levels.start_level = level;
        }
        if let Some(level) = patch.max_level {
            out.levels.max_level = level;
        }
        if let Some(ms) = patch.initial_drop_interval_ms {
            out.timing.initial_drop_interval_ms = ms;
        }
        if let Some(m) = patch.drop_interval_multiplier {
            out.timing.drop_interval_multiplier = m;
        }
        if let Some(ms) = patch.min_drop_interval_ms {
            out.timing.min_drop_interval_ms = ms;
        }
        if let Some(ms) = patch.line_effect_ms {
            out.timing.line_effect_ms = ms;
        }
        out
    }

    /// Merge a patch and validate the result.
    pub fn apply(&self, patch: &GameConfigPatch) -> Result<GameConfig, ConfigError> {
        let merged = self.merge(patch);
        merged.validate()?;
        Ok(merged)
    }

    /// Defaults overridden by a JSON patch file.
    pub fn load(path: impl AsRef<Path>) -> Result<GameConfig, ConfigError> {
        GameConfig::default().apply(&GameConfigPatch::load(path)?)
    }
}

impl GameConfigPatch {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a patch file without merging it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Use `level` as the start level unless the patch names one itself.
    /// The fallback is kept within `1..=max_level` of the patched rules.
    pub fn with_default_start_level(mut self, level: u32) -> Self {
        if self.start_level.is_none() {
            let max = self
                .max_level
                .unwrap_or(GameConfig::default().levels.max_level);
            self.start_level = Some(level.min(max).max(1));
        }
        self
    }
}
