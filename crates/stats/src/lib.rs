//! Session and statistics layer
//!
//! Consumes finalized [`SessionGame`](types::SessionGame) records, never the
//! live game. Records flow in through [`StatsStore::record_game`]; analytics
//! come out of [`StatsStore::enhanced`] for a [`Period`].
//!
//! ```
//! use blockfall_stats::{MemoryStorage, Period, StatsStore, StoreConfig};
//! use blockfall_stats::types::SessionGame;
//!
//! let mut store = StatsStore::open(MemoryStorage::new(), StoreConfig::default()).unwrap();
//! for (i, score) in [1000, 1000, 1000].into_iter().enumerate() {
//!     let game = SessionGame {
//!         score,
//!         level: 2,
//!         lines: 10,
//!         tetrises: 0,
//!         timestamp: 60_000 * (i as u64 + 1),
//!         duration_ms: 60_000,
//!     };
//!     store.record_game(game).unwrap();
//! }
//!
//! let stats = store.enhanced(Period::AllTime, 10 * 60_000);
//! assert_eq!(stats.games_played, 3);
//! assert_eq!(stats.consistency, 100.0);
//! assert_eq!(stats.favorite_level, 2);
//! ```

pub mod analytics;
pub mod highscores;
pub mod sessions;
pub mod settings;
pub mod statistics;
pub mod storage;
pub mod store;

pub use blockfall_types as types;

pub use analytics::{EnhancedStatistics, Period, PeriodParseError};
pub use highscores::{HighScore, HighScoreTable};
pub use sessions::GameSession;
pub use settings::{Settings, SettingsError, SettingsPatch, SoundSettings};
pub use statistics::GameStatistics;
pub use storage::{JsonFileStorage, MemoryStorage, PersistedState, Storage, StorageError};
pub use store::{RecordOutcome, StatsStore, StoreConfig, StoreError};
