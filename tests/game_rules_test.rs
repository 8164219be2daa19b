//! Game rule scenarios and properties, driven through the public engine API

use blockfall::core::scoring::level_for_lines;
use blockfall::core::{Board, GameConfig, GameState, SimpleRng, Tetromino};
use blockfall::engine::{GameLoop, LoopState, ManualClock};
use blockfall::types::{GameCommand, GameEvent, PieceKind, Rotation};

fn config_at_level(level: u32) -> GameConfig {
    let mut config = GameConfig::default();
    config.levels.start_level = level;
    config
}

/// Vertical bar filling column 9 of rows 16..=19
fn bar_into_right_well() -> Tetromino {
    Tetromino::new(PieceKind::I, Rotation::East, 7, 16)
}

fn assert_active_is_legal(state: &GameState) {
    let Some(active) = state.active() else {
        return;
    };
    let board = state.board();
    for (x, y) in active.cells() {
        assert!(x >= 0 && x < board.width() as i8, "column {x} out of bounds");
        assert!(y < board.height() as i8, "row {y} below the floor");
        if y >= 0 {
            assert_eq!(board.get(x, y), Some(None), "overlap at ({x}, {y})");
        }
    }
}

const GAMEPLAY: [GameCommand; 5] = [
    GameCommand::MoveLeft,
    GameCommand::MoveRight,
    GameCommand::SoftDrop,
    GameCommand::HardDrop,
    GameCommand::Rotate,
];

#[test]
fn single_line_scores_100_times_level() {
    let board = Board::from_rows(10, 20, &["ZZZZZZZZZ."]);
    let mut state = GameState::from_parts(config_at_level(1), board, bar_into_right_well(), PieceKind::T, 5);

    // The bar cannot fall, so the gravity step locks it without a drop bonus.
    assert!(state.gravity_step());

    assert_eq!(state.score(), 100);
    assert_eq!(state.lines(), 1);
    assert_eq!(state.tetrises(), 0);
    assert_eq!(state.board().filled_count(), 3);

    let events = state.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::LineClear(clear) if clear.lines_cleared == 1 && clear.rows_cleared == vec![19]
    )));
}

#[test]
fn tetris_at_level_three_scores_2400() {
    let rows = ["JJJJJJJJJ."; 4];
    let board = Board::from_rows(10, 20, &rows);
    let mut state = GameState::from_parts(config_at_level(3), board, bar_into_right_well(), PieceKind::O, 5);

    assert!(state.gravity_step());

    assert_eq!(state.score(), 2400);
    assert_eq!(state.lines(), 4);
    assert_eq!(state.tetrises(), 1);
    assert_eq!(state.level(), 3);
    assert_eq!(state.board().filled_count(), 0);
    assert!(state.line_effect().shaking);
    assert_eq!(state.line_effect().flashing_lines, vec![16, 17, 18, 19]);
}

#[test]
fn blocked_spawn_ends_the_game_with_a_record() {
    let mut board = Board::new(10, 20);
    for x in 3..7 {
        board.set(x, 0, Some(PieceKind::S));
        board.set(x, 1, Some(PieceKind::S));
    }
    let square = Tetromino::new(PieceKind::O, Rotation::North, -1, 18);
    let state = GameState::from_parts(GameConfig::default(), board, square, PieceKind::T, 9);

    let clock = ManualClock::new(50_000);
    let mut game = GameLoop::from_state(state, clock.clone());
    game.start();
    clock.advance(4_000);
    assert!(game.dispatch(GameCommand::HardDrop));

    assert_eq!(game.loop_state(), LoopState::GameOver);
    let record = game
        .drain_events()
        .into_iter()
        .find_map(|e| match e {
            GameEvent::GameOver(record) => Some(record),
            _ => None,
        })
        .expect("game over record");
    assert_eq!(record.score, game.state().score());
    assert_eq!(record.level, 1);
    assert_eq!(record.lines, 0);
    assert_eq!(record.timestamp, 54_000);
    assert_eq!(record.duration_ms, 4_000);
}

#[test]
fn random_play_never_overlaps_and_score_never_drops() {
    for seed in [1, 42, 777, 2024] {
        let mut game = GameLoop::new(GameConfig::default(), seed, ManualClock::new(0)).unwrap();
        game.start();
        let mut rng = SimpleRng::new(seed.wrapping_mul(31));
        let mut last_score = 0;

        for _ in 0..2_000 {
            if game.loop_state() == LoopState::GameOver {
                break;
            }
            match rng.next_range(8) {
                n @ 0..=4 => {
                    game.dispatch(GAMEPLAY[n as usize]);
                }
                _ => game.advance(rng.next_range(1_500)),
            }
            assert_active_is_legal(game.state());
            assert!(game.state().score() >= last_score);
            last_score = game.state().score();
        }
    }
}

#[test]
fn same_seed_and_commands_give_same_game() {
    let play = || {
        let mut game = GameLoop::new(GameConfig::default(), 99, ManualClock::new(0)).unwrap();
        game.start();
        for i in 0..300 {
            game.dispatch(GAMEPLAY[i % GAMEPLAY.len()]);
            game.advance(250);
        }
        game.snapshot()
    };
    assert_eq!(play(), play());
}

#[test]
fn level_follows_cleared_lines() {
    let config = GameConfig::default();
    for lines in 0..400 {
        assert_eq!(level_for_lines(&config.levels, lines), (1 + lines / 10).min(20));
    }
}

#[test]
fn pause_twice_and_resume_twice_change_nothing() {
    let mut game = GameLoop::new(GameConfig::default(), 6, ManualClock::new(0)).unwrap();
    game.start();
    game.dispatch(GameCommand::HardDrop);

    game.dispatch(GameCommand::Pause);
    let paused = game.snapshot();
    assert!(!game.dispatch(GameCommand::Pause));
    assert_eq!(game.snapshot(), paused);

    game.dispatch(GameCommand::Resume);
    let running = game.snapshot();
    assert!(!game.dispatch(GameCommand::Resume));
    assert_eq!(game.snapshot(), running);
}

#[test]
fn config_patch_from_json_changes_the_rules() {
    let json = r#"{ "board_width": 8, "lines_per_level": 5, "line_scores": [40, 100, 300, 1200] }"#;
    let patch = blockfall::core::GameConfigPatch::from_json(json).unwrap();
    let config = GameConfig::default().apply(&patch).unwrap();

    assert_eq!(config.board_width, 8);
    assert_eq!(config.levels.lines_per_level, 5);
    assert_eq!(config.scoring.line_scores, [0, 40, 100, 300, 1200]);

    let state = GameState::new(config, 1);
    assert_eq!(state.board().width(), 8);
}

#[test]
fn invalid_patch_lists_every_problem() {
    let json = r#"{ "board_width": 2, "drop_interval_multiplier": 1.5 }"#;
    let patch = blockfall::core::GameConfigPatch::from_json(json).unwrap();
    let err = GameConfig::default().apply(&patch).unwrap_err().to_string();
    assert!(err.contains("width"), "{err}");
    assert!(err.contains("multiplier"), "{err}");
}

#[test]
fn config_file_start_level_wins_over_saved_setting() {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    let path = std::env::temp_dir().join(format!("blockfall-rules-{}-{nanos}.json", std::process::id()));

    std::fs::write(&path, r#"{ "start_level": 1 }"#).unwrap();
    let explicit = blockfall::core::GameConfigPatch::load(&path).unwrap().with_default_start_level(5);
    assert_eq!(GameConfig::default().apply(&explicit).unwrap().levels.start_level, 1);

    std::fs::write(&path, r#"{ "lines_per_level": 5 }"#).unwrap();
    let silent = blockfall::core::GameConfigPatch::load(&path).unwrap().with_default_start_level(5);
    assert_eq!(GameConfig::default().apply(&silent).unwrap().levels.start_level, 5);

    let _ = std::fs::remove_file(&path);
}
