//! Statistics and persistence, end to end through `StatsStore`

use blockfall::stats::{
    JsonFileStorage, MemoryStorage, Period, SettingsPatch, StatsStore, Storage, StoreConfig,
};
use blockfall::types::{SessionGame, DAY_MS};

const NOW: u64 = 1_760_000_000_000;
const MINUTE: u64 = 60_000;

fn game(score: u32, level: u32, lines: u32, tetrises: u32, timestamp: u64) -> SessionGame {
    SessionGame {
        score,
        level,
        lines,
        tetrises,
        timestamp,
        duration_ms: 5 * MINUTE,
    }
}

fn store_with(games: &[SessionGame]) -> StatsStore<MemoryStorage> {
    let mut store = StatsStore::open(MemoryStorage::new(), StoreConfig::default()).unwrap();
    for g in games {
        store.record_game(*g).unwrap();
    }
    store
}

#[test]
fn identical_scores_are_fully_consistent() {
    let store = store_with(&[
        game(1000, 2, 10, 0, NOW - 30 * MINUTE),
        game(1000, 2, 10, 0, NOW - 20 * MINUTE),
        game(1000, 2, 10, 0, NOW - 10 * MINUTE),
    ]);
    let stats = store.enhanced(Period::AllTime, NOW);
    assert_eq!(stats.consistency, 100.0);
    assert_eq!(stats.average_score, 1000.0);
}

#[test]
fn spread_scores_are_less_consistent() {
    let store = store_with(&[
        game(500, 1, 5, 0, NOW - 30 * MINUTE),
        game(1500, 3, 15, 1, NOW - 20 * MINUTE),
        game(1000, 2, 10, 0, NOW - 10 * MINUTE),
    ]);
    let stats = store.enhanced(Period::AllTime, NOW);
    assert!(stats.consistency < 100.0);
    assert!(stats.consistency > 0.0);
    // Mean of the first game vs the last two: 500 -> 1250.
    assert!((stats.improvement_trend - 150.0).abs() < 1e-9);
}

#[test]
fn today_excludes_a_session_from_two_days_ago() {
    let store = store_with(&[
        game(4000, 5, 40, 2, NOW - 2 * DAY_MS),
        game(800, 1, 8, 0, NOW - 10 * MINUTE),
    ]);
    assert_eq!(store.sessions().len(), 2);

    let today = store.enhanced(Period::Today, NOW);
    assert_eq!(today.games_played, 1);
    assert_eq!(today.sessions, 1);
    assert_eq!(today.total_score, 800);
    assert_eq!(today.best_score, 800);
    assert_eq!(today.total_lines, 8);
    assert_eq!(today.total_tetrises, 0);
    assert_eq!(today.top_scores.len(), 1);

    let all = store.enhanced(Period::AllTime, NOW);
    assert_eq!(all.games_played, 2);
    assert_eq!(all.total_score, 4800);
    assert_eq!(all.best_score, 4000);
    assert_eq!(all.top_scores.len(), 2);
}

#[test]
fn empty_history_yields_defaults() {
    let store = store_with(&[]);
    for period in Period::ALL {
        let stats = store.enhanced(period, NOW);
        assert_eq!(stats.games_played, 0);
        assert_eq!(stats.efficiency, 0.0);
        assert_eq!(stats.consistency, 100.0);
        assert_eq!(stats.favorite_level, 1);
        assert_eq!(stats.tetris_rate, 0.0);
        assert_eq!(stats.improvement_trend, 0.0);
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.best_streak, 0);
    }
}

#[test]
fn efficiency_and_tetris_rate_use_session_time_and_lines() {
    // Two games in one session: 10 minutes of play, 40 lines, 5 tetrises.
    let store = store_with(&[
        game(3000, 4, 20, 3, NOW - 20 * MINUTE),
        game(2000, 4, 20, 2, NOW - 15 * MINUTE),
    ]);
    let stats = store.enhanced(Period::AllTime, NOW);
    assert_eq!(stats.sessions, 1);
    assert_eq!(stats.play_time_ms, 10 * MINUTE);
    assert!((stats.efficiency - 4.0).abs() < 1e-9);
    assert!((stats.tetris_rate - 50.0).abs() < 1e-9);
    assert_eq!(stats.favorite_level, 4);
}

#[test]
fn json_file_storage_survives_reopen() {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    let dir = std::env::temp_dir().join(format!("blockfall-it-{}-{nanos}", std::process::id()));
    let storage = JsonFileStorage::in_dir(&dir);

    {
        let mut store = StatsStore::open(storage.clone(), StoreConfig::default()).unwrap();
        store
            .update_settings(&SettingsPatch {
                player_name: Some("Grace".to_string()),
                ..SettingsPatch::default()
            })
            .unwrap();
        store.record_game(game(2500, 3, 21, 1, NOW)).unwrap();
    }

    let text = std::fs::read_to_string(storage.path()).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(doc["version"], 1);
    assert_eq!(doc["settings"]["player_name"], "Grace");
    assert_eq!(doc["high_scores"][0]["score"], 2500);

    let mut reopened = StatsStore::open(storage, StoreConfig::default()).unwrap();
    assert_eq!(reopened.settings().player_name, "Grace");
    assert_eq!(reopened.statistics().games_played, 1);
    assert_eq!(reopened.high_scores()[0].player_name.as_deref(), Some("Grace"));
    assert_eq!(reopened.sessions().len(), 1);

    reopened.clear().unwrap();
    assert!(reopened.storage().load().unwrap().high_scores.is_empty());
    let _ = std::fs::remove_dir_all(&dir);
}
