//! Discovery engine: resolves pairs and applies their effects to a store.
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CombinationRule, ElementRecord, PairKey, Quote};
use crate::config::{EngineConfig, Resolution};
use crate::error::GameError;
use crate::progress::is_complete;
use crate::snapshot::{Restored, restore_with_report, snapshot};
use crate::sound::{SoundEvent, SoundSink};
use crate::store::DiscoveryStore;
use crate::{GameStorage, Renderer};

/// How a pair of inputs lines up with the table for a given store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairMatch<'a> {
    /// No rule is defined for the pair.
    None,
    /// The winning rule's result is already known.
    Known(&'a CombinationRule),
    /// The winning rule would discover something new.
    Undiscovered(&'a CombinationRule),
}

impl<'a> PairMatch<'a> {
    #[must_use]
    pub const fn rule(self) -> Option<&'a CombinationRule> {
        match self {
            Self::None => None,
            Self::Known(rule) | Self::Undiscovered(rule) => Some(rule),
        }
    }
}

/// Resolve `{first, second}` against the table without touching the store.
#[must_use]
pub fn resolve_pair<'a>(
    catalog: &'a Catalog,
    store: &DiscoveryStore,
    resolution: Resolution,
    first: &str,
    second: &str,
) -> PairMatch<'a> {
    let mut candidates = catalog
        .combinations
        .iter()
        .filter(|rule| rule.matches(first, second));
    let Some(head) = candidates.next() else {
        return PairMatch::None;
    };
    if !store.contains(&head.result.id) {
        return PairMatch::Undiscovered(head);
    }
    match resolution {
        Resolution::FirstDefined => PairMatch::Known(head),
        Resolution::FirstUndiscovered => candidates
            .find(|rule| !store.contains(&rule.result.id))
            .map_or(PairMatch::Known(head), PairMatch::Undiscovered),
    }
}

/// What a combine attempt produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "element", rename_all = "camelCase")]
pub enum CombineOutcome {
    NoMatch,
    AlreadyKnown(ElementRecord),
    NewDiscovery(ElementRecord),
}

impl CombineOutcome {
    #[must_use]
    pub const fn element(&self) -> Option<&ElementRecord> {
        match self {
            Self::NoMatch => None,
            Self::AlreadyKnown(record) | Self::NewDiscovery(record) => Some(record),
        }
    }

    #[must_use]
    pub const fn is_new_discovery(&self) -> bool {
        matches!(self, Self::NewDiscovery(_))
    }
}

/// Everything the caller needs to present one combine attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineReport {
    pub outcome: CombineOutcome,
    pub pair: PairKey,
    /// Day the session moved to, when the discovery advanced it.
    pub day_advanced: Option<u8>,
    /// Set only on the attempt that flipped the completion latch.
    pub completed: bool,
    /// Citation attached to the newly discovered element.
    pub quote: Option<Quote>,
    /// Auto-save failure; the in-memory discovery stands regardless.
    pub autosave_error: Option<GameError>,
}

impl CombineReport {
    fn new(outcome: CombineOutcome, pair: PairKey) -> Self {
        Self {
            outcome,
            pair,
            day_advanced: None,
            completed: false,
            quote: None,
            autosave_error: None,
        }
    }
}

/// Stateless engine over a read-only catalog and three injected ports.
pub struct DiscoveryEngine<'c, S, A, R>
where
    S: GameStorage,
    A: SoundSink,
    R: Renderer,
{
    catalog: &'c Catalog,
    config: EngineConfig,
    storage: S,
    sound: A,
    renderer: R,
}

impl<'c, S, A, R> DiscoveryEngine<'c, S, A, R>
where
    S: GameStorage,
    A: SoundSink,
    R: Renderer,
{
    /// Create an engine with the default configuration.
    pub fn new(catalog: &'c Catalog, storage: S, sound: A, renderer: R) -> Self {
        Self {
            catalog,
            config: EngineConfig::default(),
            storage,
            sound,
            renderer,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub const fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub const fn sound(&self) -> &A {
        &self.sound
    }

    pub const fn sound_mut(&mut self) -> &mut A {
        &mut self.sound
    }

    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Pure lookup under the configured resolution.
    pub fn resolve(&self, store: &DiscoveryStore, first: &str, second: &str) -> PairMatch<'c> {
        resolve_pair(self.catalog, store, self.config.resolution, first, second)
    }

    /// Combine two discovered elements and apply the result to `store`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidInput`] if either id is not discovered;
    /// the store is left untouched in that case.
    pub fn attempt_combine(
        &self,
        store: &mut DiscoveryStore,
        first: &str,
        second: &str,
    ) -> Result<CombineReport, GameError> {
        for id in [first, second] {
            if !store.contains(id) {
                return Err(GameError::InvalidInput { id: id.to_string() });
            }
        }
        let pair = PairKey::new(first, second);

        let rule = match self.resolve(store, first, second) {
            PairMatch::None => {
                log::debug!("no rule for {pair}");
                self.sound.play(SoundEvent::Failure);
                self.sound.play(SoundEvent::Combine);
                return Ok(CombineReport::new(CombineOutcome::NoMatch, pair));
            }
            PairMatch::Known(rule) => {
                log::debug!("{pair} resolves to known `{}`", rule.result.id);
                store.record_attempt();
                self.sound.play(SoundEvent::Combine);
                return Ok(CombineReport::new(
                    CombineOutcome::AlreadyKnown(rule.result.clone()),
                    pair,
                ));
            }
            PairMatch::Undiscovered(rule) => rule,
        };

        store.record_attempt();
        let record = rule.result.clone();
        let day_advanced = store.record_discovery(record.clone(), rule.pair_key());
        let completed = is_complete(store) && store.latch_complete();
        log::info!(
            "discovered `{}` ({}) from {pair}",
            record.id,
            record.english_name
        );
        if let Some(day) = day_advanced {
            log::info!("creation advanced to day {day}");
        }
        if completed {
            log::info!(
                "creation complete after {} combinations",
                store.attempts()
            );
        }

        self.renderer.render(store.discovered());
        self.sound.play(SoundEvent::Discovery);
        if day_advanced.is_some() {
            self.sound.play(SoundEvent::DayTransition);
        }
        if completed {
            self.sound.play(SoundEvent::Completion);
        }
        self.sound.play(SoundEvent::Combine);

        let mut report = CombineReport::new(CombineOutcome::NewDiscovery(record), pair);
        report.day_advanced = day_advanced;
        report.completed = completed;
        report.quote = self.catalog.quote_for(&rule.result.id).cloned();
        if store.discovered_count() > self.config.autosave_min_elements {
            report.autosave_error = self.save(store).err();
        }
        Ok(report)
    }

    /// Snapshot `store` into the configured slot.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PersistenceWriteFailure`] if serialization or the
    /// storage write fails.
    pub fn save(&self, store: &DiscoveryStore) -> Result<(), GameError> {
        let blob = snapshot(store, Utc::now())
            .to_json()
            .map_err(|err| GameError::PersistenceWriteFailure(err.to_string()))?;
        self.storage
            .save_game(&self.config.save_slot, &blob)
            .map_err(|err| {
                log::warn!("saving to `{}` failed: {err}", self.config.save_slot);
                GameError::PersistenceWriteFailure(err.to_string())
            })
    }

    /// Raw blob currently in the slot.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PersistenceReadFailure`] if the storage read fails.
    pub fn read_slot(&self) -> Result<Option<String>, GameError> {
        self.storage
            .load_game(&self.config.save_slot)
            .map_err(|err| {
                log::warn!("reading `{}` failed: {err}", self.config.save_slot);
                GameError::PersistenceReadFailure(err.to_string())
            })
    }

    /// Restore the slot into a new store. `Ok(None)` when the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PersistenceReadFailure`] if the read fails and
    /// [`GameError::CorruptState`] if the blob is not a saved game.
    pub fn load(&self) -> Result<Option<Restored>, GameError> {
        let Some(blob) = self.read_slot()? else {
            return Ok(None);
        };
        restore_with_report(self.catalog, &blob)
            .map(Some)
            .inspect_err(|err| log::warn!("ignoring saved game: {err}"))
    }

    /// Remove the slot.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PersistenceWriteFailure`] if the delete fails.
    pub fn clear_slot(&self) -> Result<(), GameError> {
        self.storage
            .delete_save(&self.config.save_slot)
            .map_err(|err| {
                log::warn!("clearing `{}` failed: {err}", self.config.save_slot);
                GameError::PersistenceWriteFailure(err.to_string())
            })
    }

    pub fn play(&self, event: SoundEvent) {
        self.sound.play(event);
    }

    pub fn render(&self, store: &DiscoveryStore) {
        self.renderer.render(store.discovered());
    }
}
