//! Player settings with a typed patch and explicit validation

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_VOLUME: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundSettings {
    pub enabled: bool,
    /// 0..=100
    pub volume: u8,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 70,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player_name: String,
    pub sound: SoundSettings,
    pub start_level: u32,
    pub show_next: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_name: "Player".to_string(),
            sound: SoundSettings::default(),
            start_level: 1,
            show_next: true,
        }
    }
}

/// Partial update; `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsPatch {
    pub player_name: Option<String>,
    pub sound_enabled: Option<bool>,
    pub volume: Option<u8>,
    pub start_level: Option<u32>,
    pub show_next: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsViolation {
    BlankPlayerName,
    Volume(u8),
    StartLevel(u32),
}

impl fmt::Display for SettingsViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsViolation::BlankPlayerName => write!(f, "player name must not be blank"),
            SettingsViolation::Volume(v) => {
                write!(f, "volume {} exceeds {}", v, MAX_VOLUME)
            }
            SettingsViolation::StartLevel(level) => {
                write!(f, "start level {} must be at least 1", level)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Invalid(Vec<SettingsViolation>),
}

impl Settings {
    pub fn violations(&self) -> Vec<SettingsViolation> {
        let mut out = Vec::new();
        if self.player_name.trim().is_empty() {
            out.push(SettingsViolation::BlankPlayerName);
        }
        if self.sound.volume > MAX_VOLUME {
            out.push(SettingsViolation::Volume(self.sound.volume));
        }
        if self.start_level == 0 {
            out.push(SettingsViolation::StartLevel(self.start_level));
        }
        out
    }

    pub fn merge(&self, patch: &SettingsPatch) -> Settings {
        let mut out = self.clone();
        if let Some(name) = &patch.player_name {
            out.player_name = name.trim().to_string();
        }
        if let Some(enabled) = patch.sound_enabled {
            out.sound.enabled = enabled;
        }
        if let Some(volume) = patch.volume {
            out.sound.volume = volume;
        }
        if let Some(level) = patch.start_level {
            out.start_level = level;
        }
        if let Some(show) = patch.show_next {
            out.show_next = show;
        }
        out
    }

    /// Merge and validate; the original is untouched on error.
    pub fn apply(&self, patch: &SettingsPatch) -> Result<Settings, SettingsError> {
        let merged = self.merge(patch);
        let violations = merged.violations();
        if violations.is_empty() {
            Ok(merged)
        } else {
            Err(SettingsError::Invalid(violations))
        }
    }
}
