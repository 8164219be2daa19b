//! Game loop and host wiring
//!
//! [`GameLoop`] owns one [`GameState`](blockfall_core::GameState) and is the
//! only thing that advances it. [`Arcade`] sits on top and forwards finished
//! games to a [`StatsStore`](blockfall_stats::StatsStore).

pub mod arcade;
pub mod audio;
pub mod clock;
pub mod game_loop;

pub use blockfall_types as types;

pub use arcade::Arcade;
pub use audio::{Audio, SoundCue};
pub use clock::{Clock, ManualClock, SystemClock};
pub use game_loop::{GameLoop, LoopState};
