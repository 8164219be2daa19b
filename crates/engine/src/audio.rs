//! Audio cue points
//!
//! The engine only decides *when* a sound should play. Backends are a closed
//! set of variants injected by the host; none of them reach into game state.

use std::io::Write;

use blockfall_stats::SoundSettings;

use crate::types::GameEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    Lock,
    LineClear,
    Tetris,
    LevelUp,
    GameOver,
}

impl SoundCue {
    pub fn for_event(event: &GameEvent) -> Option<SoundCue> {
        match event {
            GameEvent::PieceLocked { .. } => Some(SoundCue::Lock),
            GameEvent::LineClear(clear) if clear.is_tetris() => Some(SoundCue::Tetris),
            GameEvent::LineClear(clear) if clear.lines_cleared > 0 => Some(SoundCue::LineClear),
            GameEvent::LineClear(_) => None,
            GameEvent::LevelUp(_) => Some(SoundCue::LevelUp),
            GameEvent::GameOver(_) => Some(SoundCue::GameOver),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Audio {
    #[default]
    Muted,
    /// Terminal bell on the big moments: tetris, level up, game over
    Bell,
    /// Keeps every cue, for tests and replays
    Recording(Vec<SoundCue>),
}

impl Audio {
    pub fn from_settings(sound: &SoundSettings) -> Self {
        if sound.enabled && sound.volume > 0 {
            Audio::Bell
        } else {
            Audio::Muted
        }
    }

    pub fn play(&mut self, cue: SoundCue) {
        match self {
            Audio::Muted => {}
            Audio::Bell => {
                if matches!(cue, SoundCue::Tetris | SoundCue::LevelUp | SoundCue::GameOver) {
                    let mut out = std::io::stdout();
                    let _ = out.write_all(b"\x07").and_then(|_| out.flush());
                }
            }
            Audio::Recording(cues) => cues.push(cue),
        }
    }

    pub fn recorded(&self) -> &[SoundCue] {
        match self {
            Audio::Recording(cues) => cues,
            _ => &[],
        }
    }
}
