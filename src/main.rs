//! Blockfall terminal runner (default binary).
//!
//! `play` is the gameplay entrypoint: crossterm for input and the
//! framebuffer-based renderer for output. The other subcommands print
//! statistics reports or edit the saved settings and exit.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use crossterm::event::{self, Event};
use tracing_subscriber::filter::LevelFilter;

use blockfall::core::{GameConfig, GameConfigPatch};
use blockfall::engine::{Arcade, Audio, Clock, GameLoop, LoopState, SystemClock};
use blockfall::input::{map_key, InputIntent};
use blockfall::stats::{JsonFileStorage, Period, Settings, SettingsPatch, StatsStore, StoreConfig};
use blockfall::term::{
    high_score_lines, stats_lines, FrameBuffer, GameView, PanelExtras, TerminalRenderer, Viewport,
};
use blockfall::types::GameCommand;

/// Upper bound on one frame; input is polled until then.
const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(name = "blockfall", version, about = "Falling-block puzzle game with session statistics")]
struct Cli {
    /// JSON file with game rule overrides
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the saved scores, statistics and settings
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Seed for the piece sequence (random when omitted)
    #[arg(long)]
    seed: Option<u32>,

    /// Write logs here instead of the default location
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// More logging; repeat for more detail
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play in the terminal (default)
    Play,
    /// Show analytics for a time window
    Stats {
        /// today, week, month or all
        #[arg(long, default_value = "all")]
        period: Period,
    },
    /// Show the high score table
    Scores,
    /// Show or change the saved settings
    Settings {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        sound: Option<bool>,
        #[arg(long)]
        volume: Option<u8>,
        #[arg(long)]
        start_level: Option<u32>,
        #[arg(long)]
        show_next: Option<bool>,
    },
    /// Delete all saved data
    ClearData {
        /// Required; there is no undo
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    let command = cli.command.unwrap_or(Command::Play);

    // The game owns the terminal, so logs go to a file while playing.
    let log_file = match (&command, &cli.log_file) {
        (_, Some(path)) => Some(path.clone()),
        (Command::Play, None) => Some(data_dir.join("blockfall.log")),
        _ => None,
    };
    init_logging(cli.verbose, log_file.as_deref())?;

    let storage = JsonFileStorage::in_dir(&data_dir);
    tracing::debug!(path = %storage.path().display(), "opening data file");
    let mut store = StatsStore::open(storage, StoreConfig::default())
        .with_context(|| format!("failed to load saved data from {}", data_dir.display()))?;

    match command {
        Command::Play => {
            let config = game_config(cli.config.as_deref(), store.settings())?;
            let seed = cli.seed.unwrap_or_else(rand::random);
            play(config, seed, store)
        }
        Command::Stats { period } => {
            let stats = store.enhanced(period, SystemClock.now_ms());
            for line in stats_lines(&stats) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Scores => {
            for line in high_score_lines(store.high_scores()) {
                println!("{line}");
            }
            Ok(())
        }
        Command::Settings {
            name,
            sound,
            volume,
            start_level,
            show_next,
        } => {
            let patch = SettingsPatch {
                player_name: name,
                sound_enabled: sound,
                volume,
                start_level,
                show_next,
            };
            let settings = store.update_settings(&patch)?;
            println!("player:      {}", settings.player_name);
            println!("sound:       {} (volume {})", settings.sound.enabled, settings.sound.volume);
            println!("start level: {}", settings.start_level);
            println!("show next:   {}", settings.show_next);
            Ok(())
        }
        Command::ClearData { yes } => {
            if !yes {
                bail!("refusing to delete saved data without --yes");
            }
            store.clear()?;
            println!("Saved data cleared.");
            Ok(())
        }
    }
}

fn init_logging(verbose: u8, file: Option<&Path>) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let builder = tracing_subscriber::fmt().with_max_level(level).with_target(false);
    match file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            let file = File::create(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

/// Rules from `--config` over the defaults. The saved start level applies
/// unless the file names one of its own.
fn game_config(path: Option<&Path>, settings: &Settings) -> Result<GameConfig> {
    let patch = match path {
        Some(path) => GameConfigPatch::load(path)
            .with_context(|| format!("invalid game config {}", path.display()))?,
        None => GameConfigPatch::default(),
    };
    let patch = patch.with_default_start_level(settings.start_level);
    GameConfig::default()
        .apply(&patch)
        .context("invalid game rules")
}

/// `$XDG_DATA_HOME/blockfall`, else `~/.local/share/blockfall`.
fn default_data_dir() -> PathBuf {
    let base = match std::env::var_os("XDG_DATA_HOME") {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local").join("share"))
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    base.join("blockfall")
}

fn play(config: GameConfig, seed: u32, store: StatsStore<JsonFileStorage>) -> Result<()> {
    let settings = store.settings().clone();
    let game = GameLoop::new(config, seed, SystemClock)?;
    let mut arcade = Arcade::new(game, store, Audio::from_settings(&settings.sound));
    tracing::info!(seed, "starting game");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut arcade, &settings);

    // Always try to restore terminal state.
    let _ = term.exit();
    arcade.quit();
    result
}

fn run(
    term: &mut TerminalRenderer,
    arcade: &mut Arcade<JsonFileStorage, SystemClock>,
    settings: &Settings,
) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut last_frame = Instant::now();
    arcade.start();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let extras = PanelExtras {
            player_name: Some(&settings.player_name),
            best_score: Some(arcade.store().statistics().best_score),
            show_next: settings.show_next,
        };
        view.render_into(&arcade.snapshot(), extras, Viewport::new(w, h), &mut fb);
        let drawn = term.draw_swap(&mut fb)?;
        if drawn.cleared {
            tracing::debug!(width = w, height = h, "full redraw");
        }

        // Input with timeout until the next frame.
        let timeout = FRAME.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match map_key(key) {
                    Some(InputIntent::Quit) => return Ok(()),
                    Some(InputIntent::TogglePause) => {
                        let command = if arcade.loop_state() == LoopState::Paused {
                            GameCommand::Resume
                        } else {
                            GameCommand::Pause
                        };
                        arcade.dispatch(command);
                    }
                    Some(InputIntent::Command(command)) => {
                        arcade.dispatch(command);
                    }
                    None => {}
                },
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Feed the loop the wall time since the last frame.
        let now = Instant::now();
        let elapsed = now.duration_since(last_frame).as_millis().min(u32::MAX as u128) as u32;
        last_frame = now;
        arcade.advance(elapsed);
        arcade.drain_events();
    }
}
