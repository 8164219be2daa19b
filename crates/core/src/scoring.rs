//! Scoring module - line clear points, drop bonuses, levels and gravity
//!
//! Everything here is a pure function of the configuration plus the numbers
//! passed in. Line points are multiplied by the level in effect *before* the
//! clear is counted, so a clear that levels you up scores at the old level.

use crate::config::{GameConfig, LevelConfig, ScoringConfig, TimingConfig};
use crate::types::LevelUpEvent;

/// How a piece was pushed down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    Soft,
    Hard,
}

/// Score calculation result for a single lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreOutcome {
    /// Line clear points awarded for this lock
    pub points: u32,
    /// Cumulative lines after this lock
    pub total_lines: u32,
    /// Level after this lock
    pub level: u32,
    pub level_up: Option<LevelUpEvent>,
}

/// Points for clearing `lines` rows at `level`
/// lines: number of lines cleared (0-4)
pub fn line_clear_score(scoring: &ScoringConfig, lines: u8, level: u32) -> u32 {
    match scoring.line_scores.get(lines as usize) {
        Some(&base) => base.saturating_mul(level),
        None => 0,
    }
}

/// Flat bonus for a drop of `cells` rows
pub fn drop_bonus(scoring: &ScoringConfig, kind: DropKind, cells: u32) -> u32 {
    let per_cell = match kind {
        DropKind::Soft => scoring.soft_drop_points,
        DropKind::Hard => scoring.hard_drop_points,
    };
    per_cell.saturating_mul(cells)
}

/// Level reached after `total_lines` cumulative lines
///
/// `1 + lines / N`, never below the configured start level and never above the cap.
///
/// ```
/// use blockfall_core::config::GameConfig;
/// use blockfall_core::scoring::level_for_lines;
///
/// let levels = GameConfig::default().levels;
/// assert_eq!(level_for_lines(&levels, 0), 1);
/// assert_eq!(level_for_lines(&levels, 19), 2);
/// assert_eq!(level_for_lines(&levels, 10_000), 20);
/// ```
pub fn level_for_lines(levels: &LevelConfig, total_lines: u32) -> u32 {
    let earned = 1 + total_lines / levels.lines_per_level.max(1);
    earned.max(levels.start_level).min(levels.max_level)
}

/// Gravity period for a level: `initial * multiplier^(level - 1)`, floored
pub fn drop_interval_ms(timing: &TimingConfig, level: u32) -> u32 {
    let exponent = level.saturating_sub(1) as i32;
    let raw = timing.initial_drop_interval_ms as f64
        * timing.drop_interval_multiplier.powi(exponent);
    let floor = timing.min_drop_interval_ms;
    if !raw.is_finite() || raw <= floor as f64 {
        return floor;
    }
    (raw.round() as u32).clamp(floor, timing.initial_drop_interval_ms)
}

/// Score a lock that cleared `lines` rows on top of `prior_lines`
pub fn score_lock(config: &GameConfig, lines: u8, prior_lines: u32, level: u32) -> ScoreOutcome {
    let points = line_clear_score(&config.scoring, lines, level);
    let total_lines = prior_lines.saturating_add(lines as u32);
    let next_level = level_for_lines(&config.levels, total_lines).max(level);
    ScoreOutcome {
        points,
        total_lines,
        level: next_level,
        level_up: (next_level > level).then_some(LevelUpEvent {
            previous_level: level,
            current_level: next_level,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_clear_table() {
        let scoring = GameConfig::default().scoring;
        assert_eq!(line_clear_score(&scoring, 0, 5), 0);
        assert_eq!(line_clear_score(&scoring, 1, 1), 100);
        assert_eq!(line_clear_score(&scoring, 2, 1), 300);
        assert_eq!(line_clear_score(&scoring, 3, 2), 1000);
        assert_eq!(line_clear_score(&scoring, 4, 3), 2400);
        assert_eq!(line_clear_score(&scoring, 5, 3), 0);
    }

    #[test]
    fn test_drop_bonus() {
        let scoring = GameConfig::default().scoring;
        assert_eq!(drop_bonus(&scoring, DropKind::Soft, 1), 1);
        assert_eq!(drop_bonus(&scoring, DropKind::Hard, 17), 34);
        assert_eq!(drop_bonus(&scoring, DropKind::Hard, 0), 0);
    }

    #[test]
    fn test_level_respects_start_level() {
        let mut levels = GameConfig::default().levels;
        levels.start_level = 5;
        assert_eq!(level_for_lines(&levels, 0), 5);
        assert_eq!(level_for_lines(&levels, 45), 5);
        assert_eq!(level_for_lines(&levels, 50), 6);
    }

    #[test]
    fn test_drop_interval_decay_and_floor() {
        let timing = GameConfig::default().timing;
        assert_eq!(drop_interval_ms(&timing, 1), 1000);
        assert_eq!(drop_interval_ms(&timing, 2), 850);
        assert_eq!(drop_interval_ms(&timing, 5), 522);
        assert_eq!(drop_interval_ms(&timing, 20), 100);

        let mut previous = u32::MAX;
        for level in 1..=40 {
            let interval = drop_interval_ms(&timing, level);
            assert!(interval <= previous);
            assert!(interval >= timing.min_drop_interval_ms);
            previous = interval;
        }
    }

    #[test]
    fn test_score_lock_uses_pre_clear_level() {
        let config = GameConfig::default();
        let outcome = score_lock(&config, 2, 9, 1);
        assert_eq!(outcome.points, 300);
        assert_eq!(outcome.total_lines, 11);
        assert_eq!(outcome.level, 2);
        assert_eq!(
            outcome.level_up,
            Some(LevelUpEvent {
                previous_level: 1,
                current_level: 2
            })
        );

        let quiet = score_lock(&config, 0, 11, 2);
        assert_eq!(
            quiet,
            ScoreOutcome {
                points: 0,
                total_lines: 11,
                level: 2,
                level_up: None
            }
        );
    }
}
