//! One running game: an engine, its store, and the commands a UI may issue.
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::ElementId;
use crate::constants::PRIMORDIAL_COUNT;
use crate::engine::{CombineReport, DiscoveryEngine};
use crate::error::GameError;
use crate::hints::{Hint, pick_hint};
use crate::progress::{CompletionSummary, progress_percent};
use crate::sound::{SoundEvent, SoundSink};
use crate::store::DiscoveryStore;
use crate::{GameStorage, Renderer};

/// Everything the presentation layer is allowed to ask for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    Combine { first: ElementId, second: ElementId },
    Save,
    Load,
    NewGame,
    Hint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The slot was empty; the store is unchanged.
    NothingToLoad,
    /// The store was replaced. Lists fields the blob was missing.
    Loaded { defaulted: Vec<&'static str> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Combined(CombineReport),
    Saved,
    Loaded(LoadOutcome),
    /// The store was reset; carries the slot clearing failure, if any.
    NewGame { clear_error: Option<GameError> },
    Hint(Option<Hint>),
}

pub struct GameSession<'c, S, A, R>
where
    S: GameStorage,
    A: SoundSink,
    R: Renderer,
{
    engine: DiscoveryEngine<'c, S, A, R>,
    store: DiscoveryStore,
    rng: ChaCha20Rng,
    resumed: bool,
}

impl<'c, S, A, R> GameSession<'c, S, A, R>
where
    S: GameStorage,
    A: SoundSink,
    R: Renderer,
{
    /// Start from a fresh store. `seed` drives hint picking.
    pub fn new(engine: DiscoveryEngine<'c, S, A, R>, seed: u64) -> Self {
        let store = DiscoveryStore::new(engine.catalog());
        Self {
            engine,
            store,
            rng: ChaCha20Rng::seed_from_u64(seed),
            resumed: false,
        }
    }

    /// Start from the save slot when it holds real progress, otherwise fresh.
    /// Read or parse failures fall back to a fresh store.
    pub fn resume(engine: DiscoveryEngine<'c, S, A, R>, seed: u64) -> Self {
        let mut session = Self::new(engine, seed);
        match session.engine.load() {
            Ok(Some(restored)) if restored.store.discovered_count() > PRIMORDIAL_COUNT => {
                log::info!(
                    "resuming saved game with {} elements",
                    restored.store.discovered_count()
                );
                session.store = restored.store;
                session.resumed = true;
            }
            Ok(_) => log::debug!("no saved progress to resume"),
            Err(err) => log::warn!("starting fresh, saved game unusable: {err}"),
        }
        session.engine.render(&session.store);
        session
    }

    pub const fn store(&self) -> &DiscoveryStore {
        &self.store
    }

    pub const fn engine(&self) -> &DiscoveryEngine<'c, S, A, R> {
        &self.engine
    }

    pub const fn engine_mut(&mut self) -> &mut DiscoveryEngine<'c, S, A, R> {
        &mut self.engine
    }

    /// Whether this session picked up a saved game at start.
    pub const fn was_resumed(&self) -> bool {
        self.resumed
    }

    pub fn into_store(self) -> DiscoveryStore {
        self.store
    }

    /// Run one command.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying command.
    pub fn dispatch(&mut self, command: Command) -> Result<CommandOutcome, GameError> {
        match command {
            Command::Combine { first, second } => {
                self.combine(&first, &second).map(CommandOutcome::Combined)
            }
            Command::Save => self.save().map(|()| CommandOutcome::Saved),
            Command::Load => self.load().map(CommandOutcome::Loaded),
            Command::NewGame => Ok(CommandOutcome::NewGame {
                clear_error: self.new_game().err(),
            }),
            Command::Hint => Ok(CommandOutcome::Hint(self.hint())),
        }
    }

    /// # Errors
    ///
    /// Returns [`GameError::InvalidInput`] for an undiscovered id.
    pub fn combine(&mut self, first: &str, second: &str) -> Result<CombineReport, GameError> {
        self.engine.attempt_combine(&mut self.store, first, second)
    }

    /// Explicit save.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PersistenceWriteFailure`] if the slot cannot be written.
    pub fn save(&self) -> Result<(), GameError> {
        self.engine.save(&self.store)?;
        self.engine.play(SoundEvent::Success);
        Ok(())
    }

    /// Replace the store with the saved game, if there is one.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::CorruptState`] or
    /// [`GameError::PersistenceReadFailure`]; the store is unchanged on error.
    pub fn load(&mut self) -> Result<LoadOutcome, GameError> {
        let Some(restored) = self.engine.load()? else {
            return Ok(LoadOutcome::NothingToLoad);
        };
        self.store = restored.store;
        self.engine.render(&self.store);
        self.engine.play(SoundEvent::Success);
        Ok(LoadOutcome::Loaded {
            defaulted: restored.defaulted,
        })
    }

    /// Reset to the primordial elements and clear the slot.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PersistenceWriteFailure`] if the slot could not be
    /// cleared. The reset has happened either way.
    pub fn new_game(&mut self) -> Result<(), GameError> {
        let cleared = self.engine.clear_slot();
        self.store = DiscoveryStore::new(self.engine.catalog());
        self.engine.render(&self.store);
        self.engine.play(SoundEvent::Success);
        cleared
    }

    pub fn hint(&mut self) -> Option<Hint> {
        pick_hint(
            self.engine.catalog(),
            &self.store,
            self.engine.config().resolution,
            &mut self.rng,
        )
    }

    pub fn progress(&self) -> f64 {
        progress_percent(&self.store, self.engine.catalog())
    }

    pub fn summary(&self) -> CompletionSummary {
        CompletionSummary::from_store(&self.store, self.engine.catalog())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::catalog;
    use crate::memory::{MemoryStorage, RenderLog};
    use crate::sound::{Silent, SoundLog};

    fn session(storage: &MemoryStorage) -> GameSession<'static, &MemoryStorage, Silent, Silent> {
        GameSession::new(DiscoveryEngine::new(catalog(), storage, Silent, Silent), 7)
    }

    #[test]
    fn save_then_load_restores_progress() {
        let storage = MemoryStorage::new();
        let mut game = session(&storage);
        game.combine("fire", "air").unwrap();
        game.save().unwrap();
        let saved = game.store().clone();

        game.new_game().unwrap();
        assert!(storage.raw("godCreatorSave").is_none());
        game.combine("earth", "water").unwrap();
        game.save().unwrap();
        assert!(matches!(game.load().unwrap(), LoadOutcome::Loaded { .. }));
        assert_ne!(game.store(), &saved);
        assert!(game.store().contains("sea"));
    }

    #[test]
    fn load_without_save_leaves_store_alone() {
        let storage = MemoryStorage::new();
        let mut game = session(&storage);
        game.combine("fire", "air").unwrap();
        storage.delete_save("godCreatorSave").unwrap();
        let before = game.store().clone();
        assert_eq!(game.load().unwrap(), LoadOutcome::NothingToLoad);
        assert_eq!(game.store(), &before);
    }

    #[test]
    fn corrupt_load_keeps_current_store() {
        let storage = MemoryStorage::new();
        let mut game = session(&storage);
        game.combine("fire", "air").unwrap();
        storage.insert_raw("godCreatorSave", "[]");
        let before = game.store().clone();
        assert!(matches!(game.load(), Err(GameError::CorruptState(_))));
        assert_eq!(game.store(), &before);
    }

    #[test]
    fn new_game_resets_even_when_clearing_fails() {
        let storage = MemoryStorage::new();
        let sounds = SoundLog::new();
        let renders = RenderLog::new();
        let engine = DiscoveryEngine::new(catalog(), &storage, &sounds, &renders);
        let mut game = GameSession::new(engine, 1);
        game.combine("fire", "air").unwrap();
        sounds.take();
        storage.set_fail_writes(true);
        let outcome = game.dispatch(Command::NewGame).unwrap();
        assert!(matches!(
            outcome,
            CommandOutcome::NewGame {
                clear_error: Some(GameError::PersistenceWriteFailure(_))
            }
        ));
        assert_eq!(game.store(), &DiscoveryStore::new(catalog()));
        assert_eq!(sounds.take(), vec![SoundEvent::Success]);
        assert_eq!(renders.frames(), 2);
    }

    #[test]
    fn resume_requires_more_than_primordial_elements() {
        let storage = MemoryStorage::new();
        let mut first = session(&storage);
        first.save().unwrap();
        let resumed = GameSession::resume(
            DiscoveryEngine::new(catalog(), &storage, Silent, Silent),
            2,
        );
        assert!(!resumed.was_resumed());

        first.combine("fire", "air").unwrap();
        let resumed = GameSession::resume(
            DiscoveryEngine::new(catalog(), &storage, Silent, Silent),
            2,
        );
        assert!(resumed.was_resumed());
        assert!(resumed.store().contains("light"));
    }

    #[test]
    fn resume_falls_back_on_garbage() {
        let storage = MemoryStorage::new();
        storage.insert_raw("godCreatorSave", "not json");
        let game = GameSession::resume(
            DiscoveryEngine::new(catalog(), &storage, Silent, Silent),
            3,
        );
        assert!(!game.was_resumed());
        assert_eq!(game.store(), &DiscoveryStore::new(catalog()));
    }

    #[test]
    fn dispatch_routes_combine_and_hint() {
        let storage = MemoryStorage::new();
        let mut game = session(&storage);
        let outcome = game
            .dispatch(Command::Combine {
                first: "water".into(),
                second: "earth".into(),
            })
            .unwrap();
        let CommandOutcome::Combined(report) = outcome else {
            panic!("expected a combine report");
        };
        assert_eq!(report.outcome.element().unwrap().id, "sea");
        let CommandOutcome::Hint(Some(hint)) = game.dispatch(Command::Hint).unwrap() else {
            panic!("expected a hint");
        };
        assert!(!game.store().contains(&hint.result_id));
        assert_eq!(game.progress(), 100.0 * game.summary().found as f64 / 43.0);
    }
}
