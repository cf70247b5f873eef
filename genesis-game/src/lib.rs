//! Genesis Discovery Engine
//!
//! Platform-agnostic core of the Genesis creation puzzle: the player combines
//! known elements pairwise and the engine resolves each pair against a static
//! combination table, advancing the days of creation as new elements appear.
//! Rendering, audio and storage are reached only through the ports below.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod hints;
pub mod memory;
pub mod progress;
pub mod session;
pub mod snapshot;
pub mod sound;
pub mod store;

use std::collections::BTreeMap;

// Re-export commonly used types
pub use catalog::{
    Catalog, CatalogError, Category, CombinationRule, ElementId, ElementRecord, PairKey, Quote,
    catalog,
};
pub use config::{EngineConfig, ParseResolutionError, Resolution};
pub use constants::{DEFAULT_SAVE_SLOT, FIRST_DAY, LAST_DAY, MAJOR_ELEMENTS, PRIMORDIAL_COUNT};
pub use engine::{CombineOutcome, CombineReport, DiscoveryEngine, PairMatch, resolve_pair};
pub use error::GameError;
pub use hints::{Hint, available_hints, pick_hint};
pub use memory::{MemoryStorage, MemoryStorageError, RenderLog};
pub use progress::{CompletionSummary, is_complete, missing_major_elements, progress_percent};
pub use session::{Command, CommandOutcome, GameSession, LoadOutcome};
pub use snapshot::{Restored, SavedGame, restore, restore_with_report, snapshot};
pub use sound::{AudioSettings, GatedSink, Silent, SoundEvent, SoundLog, SoundSink};
pub use store::DiscoveryStore;

/// Trait for abstracting save/load operations on the single save slot.
/// Platform-specific implementations should provide this
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Write a serialized game under `save_name`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be written.
    fn save_game(&self, save_name: &str, blob: &str) -> Result<(), Self::Error>;

    /// Read the blob stored under `save_name`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read.
    fn load_game(&self, save_name: &str) -> Result<Option<String>, Self::Error>;

    /// Delete saved game
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error>;
}

impl<T: GameStorage + ?Sized> GameStorage for &T {
    type Error = T::Error;

    fn save_game(&self, save_name: &str, blob: &str) -> Result<(), Self::Error> {
        (**self).save_game(save_name, blob)
    }

    fn load_game(&self, save_name: &str) -> Result<Option<String>, Self::Error> {
        (**self).load_game(save_name)
    }

    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error> {
        (**self).delete_save(save_name)
    }
}

/// Presentation port: redraw the element palette from the known set.
pub trait Renderer {
    fn render(&self, discovered: &BTreeMap<ElementId, ElementRecord>);
}

impl<T: Renderer + ?Sized> Renderer for &T {
    fn render(&self, discovered: &BTreeMap<ElementId, ElementRecord>) {
        (**self).render(discovered);
    }
}

impl Renderer for Silent {
    fn render(&self, _discovered: &BTreeMap<ElementId, ElementRecord>) {}
}
