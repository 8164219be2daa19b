//! Arcade host - wires a game loop to the statistics store and audio
//!
//! The loop never reads the store back. Finished games go in as
//! [`SessionGame`] records; a reset of a game in progress is counted toward
//! the lifetime totals. Saving failures are logged and play goes on.

use blockfall_core::GameSnapshot;
use blockfall_stats::{EnhancedStatistics, Period, RecordOutcome, StatsStore, Storage};

use crate::audio::{Audio, SoundCue};
use crate::clock::Clock;
use crate::game_loop::{GameLoop, LoopState};
use crate::types::{GameCommand, GameEvent, SessionGame};

pub struct Arcade<S: Storage, C: Clock> {
    game: GameLoop<C>,
    store: StatsStore<S>,
    audio: Audio,
    last_record: Option<(SessionGame, RecordOutcome)>,
    events: Vec<GameEvent>,
}

impl<S: Storage, C: Clock> Arcade<S, C> {
    pub fn new(game: GameLoop<C>, store: StatsStore<S>, audio: Audio) -> Self {
        Self {
            game,
            store,
            audio,
            last_record: None,
            events: Vec::new(),
        }
    }

    pub fn game(&self) -> &GameLoop<C> {
        &self.game
    }

    pub fn store(&self) -> &StatsStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut StatsStore<S> {
        &mut self.store
    }

    pub fn audio(&self) -> &Audio {
        &self.audio
    }

    pub fn loop_state(&self) -> LoopState {
        self.game.loop_state()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.game.snapshot()
    }

    /// The most recently recorded finished game and where it ranked
    pub fn last_record(&self) -> Option<&(SessionGame, RecordOutcome)> {
        self.last_record.as_ref()
    }

    pub fn start(&mut self) -> bool {
        let started = self.game.start();
        self.route();
        started
    }

    pub fn advance(&mut self, elapsed_ms: u32) {
        self.game.advance(elapsed_ms);
        self.route();
    }

    pub fn dispatch(&mut self, command: GameCommand) -> bool {
        if command == GameCommand::Reset {
            self.count_abandoned();
            self.last_record = None;
        }
        let changed = self.game.dispatch(command);
        self.route();
        changed
    }

    /// The player is leaving. A game in progress is counted like a reset.
    pub fn quit(&mut self) {
        self.count_abandoned();
    }

    fn count_abandoned(&mut self) {
        if let Some(record) = self.game.abandoned_record() {
            if let Err(e) = self.store.record_abandoned(record) {
                tracing::warn!(error = %e, "failed to save abandoned game");
            }
        }
    }

    /// Game events since the last drain, for the UI
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn enhanced(&self, period: Period) -> EnhancedStatistics {
        self.store.enhanced(period, self.game.clock().now_ms())
    }

    fn route(&mut self) {
        for event in self.game.drain_events() {
            if let Some(cue) = SoundCue::for_event(&event) {
                self.audio.play(cue);
            }
            if let GameEvent::GameOver(record) = &event {
                match self.store.record_game(*record) {
                    Ok(outcome) => self.last_record = Some((*record, outcome)),
                    Err(e) => tracing::warn!(error = %e, "failed to save finished game"),
                }
            }
            self.events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use blockfall_core::GameConfig;
    use blockfall_stats::{MemoryStorage, StoreConfig};

    fn arcade() -> Arcade<MemoryStorage, ManualClock> {
        let clock = ManualClock::new(1_700_000_000_000);
        let game = GameLoop::new(GameConfig::default(), 21, clock).unwrap();
        let store = StatsStore::open(MemoryStorage::new(), StoreConfig::default()).unwrap();
        Arcade::new(game, store, Audio::Recording(Vec::new()))
    }

    fn play_until_over(arcade: &mut Arcade<MemoryStorage, ManualClock>) {
        for _ in 0..500 {
            if arcade.loop_state() == LoopState::GameOver {
                return;
            }
            arcade.dispatch(GameCommand::HardDrop);
        }
        panic!("stack never topped out");
    }

    #[test]
    fn game_over_is_recorded_once() {
        let mut arcade = arcade();
        arcade.start();
        play_until_over(&mut arcade);

        let (record, outcome) = *arcade.last_record().unwrap();
        assert_eq!(outcome.rank, Some(1));
        assert_eq!(arcade.store().statistics().games_played, 1);
        assert_eq!(arcade.store().sessions()[0].games, vec![record]);
        assert_eq!(arcade.audio().recorded().last(), Some(&SoundCue::GameOver));

        // Further commands do not record again.
        arcade.dispatch(GameCommand::HardDrop);
        arcade.advance(10_000);
        assert_eq!(arcade.store().statistics().games_played, 1);
    }

    #[test]
    fn reset_mid_game_counts_toward_totals() {
        let mut arcade = arcade();
        arcade.start();
        arcade.dispatch(GameCommand::HardDrop);
        let score = arcade.snapshot().score;
        assert!(score > 0);

        assert!(arcade.dispatch(GameCommand::Reset));
        let stats = arcade.store().statistics();
        assert_eq!(stats.games_played, 0);
        assert_eq!(stats.abandoned_games, 1);
        assert_eq!(stats.total_score, score as u64);
        assert!(arcade.store().sessions().is_empty());
        assert_eq!(arcade.snapshot().score, 0);
    }

    #[test]
    fn quitting_before_the_first_lock_records_nothing() {
        let mut arcade = arcade();
        arcade.start();
        arcade.quit();
        assert_eq!(arcade.store().statistics().abandoned_games, 0);
        assert_eq!(arcade.store().storage().saves(), 0);
    }

    #[test]
    fn reset_after_game_over_does_not_double_count() {
        let mut arcade = arcade();
        arcade.start();
        play_until_over(&mut arcade);
        arcade.dispatch(GameCommand::Reset);

        let stats = arcade.store().statistics();
        assert_eq!(stats.games_played, 1);
        assert_eq!(stats.abandoned_games, 0);
        assert_eq!(arcade.loop_state(), LoopState::Running);
    }
}
