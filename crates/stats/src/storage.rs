//! Persistence adapter: load / save / clear of everything the stats layer owns
//!
//! The store never touches the filesystem directly; it talks to a [`Storage`]
//! backend. [`JsonFileStorage`] is what the binary uses, [`MemoryStorage`]
//! keeps tests and throwaway engines off the disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::highscores::HighScore;
use crate::sessions::GameSession;
use crate::settings::Settings;
use crate::statistics::GameStatistics;

pub const STATE_VERSION: u32 = 1;
pub const DEFAULT_FILE_NAME: &str = "blockfall.json";

/// Everything persisted between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub version: u32,
    pub settings: Settings,
    pub high_scores: Vec<HighScore>,
    pub statistics: GameStatistics,
    pub sessions: Vec<GameSession>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            settings: Settings::default(),
            high_scores: Vec::new(),
            statistics: GameStatistics::default(),
            sessions: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt saved data: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("saved data version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

pub trait Storage {
    /// Saved state, or defaults when nothing has been saved yet
    fn load(&self) -> Result<PersistedState, StorageError>;
    fn save(&mut self, state: &PersistedState) -> Result<(), StorageError>;
    fn clear(&mut self) -> Result<(), StorageError>;
}

fn decode(text: &str) -> Result<PersistedState, StorageError> {
    let state: PersistedState = serde_json::from_str(text)?;
    if state.version > STATE_VERSION {
        return Err(StorageError::UnsupportedVersion {
            found: state.version,
            supported: STATE_VERSION,
        });
    }
    Ok(state)
}

/// Pretty-printed JSON in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/blockfall.json`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<PersistedState, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => decode(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PersistedState::default()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&mut self, state: &PersistedState) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(state)?;

        // Write then rename: readers only ever see a complete document.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Keeps the serialized JSON in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    json: Option<String>,
    saves: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves
    pub fn saves(&self) -> usize {
        self.saves
    }

    pub fn raw(&self) -> Option<&str> {
        self.json.as_deref()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<PersistedState, StorageError> {
        match &self.json {
            Some(text) => decode(text),
            None => Ok(PersistedState::default()),
        }
    }

    fn save(&mut self, state: &PersistedState) -> Result<(), StorageError> {
        self.json = Some(serde_json::to_string(state)?);
        self.saves += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.json = None;
        Ok(())
    }
}
