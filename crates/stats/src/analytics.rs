//! Period-filtered analytics over recorded play
//!
//! Every function here is total: empty input yields the documented default
//! (0, or 1 for the favorite level, or 100 for consistency) and never NaN.
//!
//! | Metric            | Formula                                             | Empty / degenerate |
//! |-------------------|-----------------------------------------------------|--------------------|
//! | efficiency        | lines / (play seconds / 60)                         | 0                  |
//! | consistency       | 100 - stddev / mean * 100, clamped to 0..=100       | 100                |
//! | favorite level    | most frequent game level, lower level on ties       | 1                  |
//! | tetris rate       | tetrises * 4 / lines * 100                          | 0                  |
//! | improvement trend | % change of mean score, first half to second half   | 0                  |

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::highscores::HighScore;
use crate::sessions::GameSession;
use crate::statistics::GameStatistics;
use crate::types::{SessionGame, DAY_MS};

/// Time window used to scope statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Period {
    Today,
    ThisWeek,
    ThisMonth,
    #[default]
    AllTime,
}

impl Period {
    pub const ALL: [Period; 4] = [
        Period::Today,
        Period::ThisWeek,
        Period::ThisMonth,
        Period::AllTime,
    ];

    /// Window length in days; 0 means unbounded
    pub fn days(&self) -> u64 {
        match self {
            Period::Today => 1,
            Period::ThisWeek => 7,
            Period::ThisMonth => 30,
            Period::AllTime => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Today => "Today",
            Period::ThisWeek => "This Week",
            Period::ThisMonth => "This Month",
            Period::AllTime => "All Time",
        }
    }

    /// Earliest included timestamp, or `None` for no filtering
    pub fn cutoff(&self, now_ms: u64) -> Option<u64> {
        match self.days() {
            0 => None,
            days => Some(now_ms.saturating_sub(days * DAY_MS)),
        }
    }

    /// Whether `timestamp` falls inside the window. Sessions are judged by
    /// their `start_time` alone, so one that began before the cutoff stays
    /// out even when its later games finished inside the window.
    pub fn includes(&self, timestamp: u64, now_ms: u64) -> bool {
        self.cutoff(now_ms).map_or(true, |cutoff| timestamp >= cutoff)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown period `{0}` (expected today, week, month or all)")]
pub struct PeriodParseError(pub String);

impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "today" | "day" => Ok(Period::Today),
            "week" | "thisweek" => Ok(Period::ThisWeek),
            "month" | "thismonth" => Ok(Period::ThisMonth),
            "all" | "alltime" => Ok(Period::AllTime),
            _ => Err(PeriodParseError(s.to_string())),
        }
    }
}

/// Derived statistics for one period; always recomputed, never stored
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedStatistics {
    pub period: Period,
    pub games_played: usize,
    pub sessions: usize,
    pub total_score: u64,
    pub average_score: f64,
    pub best_score: u32,
    pub total_lines: u64,
    pub total_tetrises: u64,
    pub play_time_ms: u64,
    pub average_session_ms: u64,
    /// Lines per minute
    pub efficiency: f64,
    pub consistency: f64,
    pub favorite_level: u32,
    pub tetris_rate: f64,
    pub improvement_trend: f64,
    pub best_streak: u32,
    pub top_scores: Vec<HighScore>,
    pub lifetime: GameStatistics,
}

/// Sessions whose `start_time` is inside the window. A session is kept or
/// dropped whole.
pub fn filter_sessions(sessions: &[GameSession], period: Period, now_ms: u64) -> Vec<&GameSession> {
    sessions
        .iter()
        .filter(|s| period.includes(s.start_time, now_ms))
        .collect()
}

pub fn filter_high_scores(scores: &[HighScore], period: Period, now_ms: u64) -> Vec<HighScore> {
    scores
        .iter()
        .filter(|h| period.includes(h.date, now_ms))
        .cloned()
        .collect()
}

pub fn efficiency(total_lines: u64, play_time_ms: u64) -> f64 {
    if play_time_ms == 0 {
        return 0.0;
    }
    let minutes = play_time_ms as f64 / 1000.0 / 60.0;
    total_lines as f64 / minutes
}

pub fn consistency(scores: &[u32]) -> f64 {
    if scores.len() < 2 {
        return 100.0;
    }
    let n = scores.len() as f64;
    let mean = scores.iter().map(|&s| s as f64).sum::<f64>() / n;
    if mean == 0.0 {
        return 100.0;
    }
    let variance = scores
        .iter()
        .map(|&s| {
            let d = s as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (100.0 - variance.sqrt() / mean * 100.0).clamp(0.0, 100.0)
}

pub fn favorite_level<'a>(games: impl IntoIterator<Item = &'a SessionGame>) -> u32 {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for game in games {
        *counts.entry(game.level).or_default() += 1;
    }
    let mut favorite = None;
    for (level, count) in counts {
        match favorite {
            Some((_, best)) if count <= best => {}
            _ => favorite = Some((level, count)),
        }
    }
    favorite.map_or(1, |(level, _)| level)
}

pub fn tetris_rate(tetrises: u64, total_lines: u64) -> f64 {
    if total_lines == 0 {
        return 0.0;
    }
    tetrises as f64 * 400.0 / total_lines as f64
}

/// Percentage change from the mean of the first `n / 2` scores to the mean
/// of the rest. Scores must be in chronological order.
pub fn improvement_trend(scores: &[u32]) -> f64 {
    if scores.len() < 2 {
        return 0.0;
    }
    let (first, second) = scores.split_at(scores.len() / 2);
    let mean = |xs: &[u32]| xs.iter().map(|&s| s as f64).sum::<f64>() / xs.len() as f64;
    let before = mean(first);
    if before == 0.0 {
        return 0.0;
    }
    (mean(second) - before) / before * 100.0
}

/// Compute all analytics for `period` as seen at `now_ms`.
pub fn compute(
    lifetime: &GameStatistics,
    sessions: &[GameSession],
    high_scores: &[HighScore],
    period: Period,
    now_ms: u64,
) -> EnhancedStatistics {
    let sessions = filter_sessions(sessions, period, now_ms);

    let mut games: Vec<&SessionGame> = sessions.iter().flat_map(|s| s.games.iter()).collect();
    games.sort_by_key(|g| g.timestamp);
    let scores: Vec<u32> = games.iter().map(|g| g.score).collect();

    let total_score: u64 = scores.iter().map(|&s| s as u64).sum();
    let total_lines: u64 = games.iter().map(|g| g.lines as u64).sum();
    let total_tetrises: u64 = games.iter().map(|g| g.tetrises as u64).sum();
    let play_time_ms: u64 = sessions.iter().map(|s| s.duration_ms()).sum();

    let average_score = if games.is_empty() {
        0.0
    } else {
        total_score as f64 / games.len() as f64
    };
    let average_session_ms = if sessions.is_empty() {
        0
    } else {
        play_time_ms / sessions.len() as u64
    };

    EnhancedStatistics {
        period,
        games_played: games.len(),
        sessions: sessions.len(),
        total_score,
        average_score,
        best_score: scores.iter().copied().max().unwrap_or(0),
        total_lines,
        total_tetrises,
        play_time_ms,
        average_session_ms,
        efficiency: efficiency(total_lines, play_time_ms),
        consistency: consistency(&scores),
        favorite_level: favorite_level(games.iter().copied()),
        tetris_rate: tetris_rate(total_tetrises, total_lines),
        improvement_trend: improvement_trend(&scores),
        best_streak: lifetime.best_streak,
        top_scores: filter_high_scores(high_scores, period, now_ms),
        lifetime: lifetime.clone(),
    }
}
