//! Plain-text reports for the `stats` and `scores` subcommands.

use std::fmt::Write;

use crate::stats::{EnhancedStatistics, HighScore};

/// `1h 02m 03s`, `4m 05s` or `7s`
pub fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    let (h, m, s) = (secs / 3600, (secs / 60) % 60, secs % 60);
    if h > 0 {
        format!("{h}h {m:02}m {s:02}s")
    } else if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}

/// UTC calendar date of a Unix millisecond timestamp, `YYYY-MM-DD`.
pub fn format_date(ms: u64) -> String {
    // Days-to-civil conversion on the proleptic Gregorian calendar.
    let z = (ms / 86_400_000) as i64 + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    format!("{year:04}-{month:02}-{day:02}")
}

pub fn stats_lines(stats: &EnhancedStatistics) -> Vec<String> {
    let mut lines = vec![format!("Statistics: {}", stats.period), String::new()];
    let mut row = |label: &str, value: String| lines.push(format!("  {label:<18}{value}"));

    row("Games played", stats.games_played.to_string());
    row("Sessions", stats.sessions.to_string());
    row("Total score", stats.total_score.to_string());
    row("Average score", format!("{:.0}", stats.average_score));
    row("Best score", stats.best_score.to_string());
    row("Lines", stats.total_lines.to_string());
    row("Tetrises", stats.total_tetrises.to_string());
    row("Play time", format_duration(stats.play_time_ms));
    row("Avg session", format_duration(stats.average_session_ms));
    row("Efficiency", format!("{:.1} lines/min", stats.efficiency));
    row("Consistency", format!("{:.1}%", stats.consistency));
    row("Favorite level", stats.favorite_level.to_string());
    row("Tetris rate", format!("{:.1}%", stats.tetris_rate));
    row("Trend", format!("{:+.1}%", stats.improvement_trend));

    let life = &stats.lifetime;
    lines.push(String::new());
    lines.push(format!(
        "Lifetime: {} games ({} abandoned), {} lines, best {} at level {}",
        life.games_played, life.abandoned_games, life.total_lines, life.best_score, life.highest_level
    ));
    lines
}

pub fn high_score_lines(scores: &[HighScore]) -> Vec<String> {
    if scores.is_empty() {
        return vec!["No high scores yet.".to_string()];
    }
    let mut lines = vec![format!(
        "{:>3}  {:>8}  {:>5}  {:>5}  {:<10}  {}",
        "#", "SCORE", "LEVEL", "LINES", "DATE", "PLAYER"
    )];
    for (rank, entry) in scores.iter().enumerate() {
        let mut line = String::new();
        let _ = write!(
            line,
            "{:>3}  {:>8}  {:>5}  {:>5}  {:<10}  {}",
            rank + 1,
            entry.score,
            entry.level,
            entry.lines,
            format_date(entry.date),
            entry.player_name.as_deref().unwrap_or("-")
        );
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{MemoryStorage, Period, StatsStore, StoreConfig};
    use crate::types::SessionGame;

    #[test]
    fn durations_pick_the_largest_unit() {
        assert_eq!(format_duration(7_400), "7s");
        assert_eq!(format_duration(245_000), "4m 05s");
        assert_eq!(format_duration(3_723_000), "1h 02m 03s");
    }

    #[test]
    fn dates_are_utc_calendar_days() {
        assert_eq!(format_date(0), "1970-01-01");
        // 2024-02-29T12:00:00Z
        assert_eq!(format_date(1_709_208_000_000), "2024-02-29");
    }

    #[test]
    fn reports_show_recorded_games() {
        let mut store = StatsStore::open(MemoryStorage::new(), StoreConfig::default()).unwrap();
        store
            .record_game(SessionGame {
                score: 4200,
                level: 3,
                lines: 24,
                tetrises: 1,
                timestamp: 1_709_208_000_000,
                duration_ms: 120_000,
            })
            .unwrap();

        let stats = store.enhanced(Period::AllTime, 1_709_208_000_000);
        let text = stats_lines(&stats).join("\n");
        assert!(text.contains("Games played      1"));
        assert!(text.contains("Play time         2m 00s"));

        let table = high_score_lines(store.high_scores());
        assert_eq!(table.len(), 2);
        assert!(table[1].contains("4200"));
        assert!(table[1].contains("2024-02-29"));
        assert!(table[1].ends_with("Player"));
    }

    #[test]
    fn empty_table_says_so() {
        assert_eq!(high_score_lines(&[]), vec!["No high scores yet.".to_string()]);
    }
}
