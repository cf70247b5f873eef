//! Discovery store: everything one session knows.
use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::{Catalog, ElementId, ElementRecord, PairKey};
use crate::constants::{FIRST_DAY, LAST_DAY};

/// Mutable state of a single game session.
///
/// Only the engine mutates a live store; restore and new game replace it
/// wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryStore {
    discovered: BTreeMap<ElementId, ElementRecord>,
    found_combinations: BTreeSet<PairKey>,
    current_day: u8,
    attempts: u32,
    complete: bool,
}

impl DiscoveryStore {
    /// Fresh store seeded with the catalog's primordial elements.
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        let discovered = catalog
            .primordial
            .iter()
            .map(|element| (element.id.clone(), element.clone()))
            .collect();
        Self {
            discovered,
            found_combinations: BTreeSet::new(),
            current_day: FIRST_DAY,
            attempts: 0,
            complete: false,
        }
    }

    /// Rebuild a store from persisted parts, re-seeding any missing primordial
    /// element and clamping the day into range.
    pub(crate) fn from_parts(
        catalog: &Catalog,
        discovered: BTreeMap<ElementId, ElementRecord>,
        found_combinations: BTreeSet<PairKey>,
        current_day: u8,
        attempts: u32,
        complete: bool,
    ) -> Self {
        let mut store = Self::new(catalog);
        store.discovered.extend(discovered);
        store.found_combinations = found_combinations;
        store.current_day = current_day.clamp(FIRST_DAY, LAST_DAY);
        store.attempts = attempts;
        store.complete = complete;
        store
    }

    #[must_use]
    pub const fn discovered(&self) -> &BTreeMap<ElementId, ElementRecord> {
        &self.discovered
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.discovered.contains_key(id)
    }

    #[must_use]
    pub fn element(&self, id: &str) -> Option<&ElementRecord> {
        self.discovered.get(id)
    }

    #[must_use]
    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    #[must_use]
    pub const fn found_combinations(&self) -> &BTreeSet<PairKey> {
        &self.found_combinations
    }

    #[must_use]
    pub fn found_count(&self) -> usize {
        self.found_combinations.len()
    }

    #[must_use]
    pub const fn current_day(&self) -> u8 {
        self.current_day
    }

    /// Number of matched combine attempts, persisted as `combinations`.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.complete
    }

    pub(crate) const fn record_attempt(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }

    /// Insert a new element and its pair key. Returns the new day when the
    /// element's day moved the session forward.
    pub(crate) fn record_discovery(&mut self, record: ElementRecord, key: PairKey) -> Option<u8> {
        let day = record.discovered_day;
        self.discovered.insert(record.id.clone(), record);
        self.found_combinations.insert(key);
        if day > self.current_day {
            self.current_day = day;
            Some(day)
        } else {
            None
        }
    }

    /// Set the completion latch. Returns `true` only on the first call.
    pub(crate) const fn latch_complete(&mut self) -> bool {
        if self.complete {
            return false;
        }
        self.complete = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::catalog;

    #[test]
    fn fresh_store_holds_only_primordial_elements() {
        let store = DiscoveryStore::new(catalog());
        assert_eq!(store.discovered_count(), 4);
        for id in ["air", "water", "earth", "fire"] {
            assert!(store.contains(id), "missing {id}");
        }
        assert_eq!(store.current_day(), 1);
        assert_eq!(store.attempts(), 0);
        assert_eq!(store.found_count(), 0);
        assert!(!store.is_complete());
    }

    #[test]
    fn day_only_moves_forward() {
        let table = catalog();
        let mut store = DiscoveryStore::new(table);
        let sea = table.element("sea").unwrap().clone();
        assert_eq!(
            store.record_discovery(sea, PairKey::new("earth", "water")),
            Some(3)
        );
        let light = table.element("light").unwrap().clone();
        assert_eq!(store.record_discovery(light, PairKey::new("air", "fire")), None);
        assert_eq!(store.current_day(), 3);
        assert_eq!(store.found_count(), 2);
    }

    #[test]
    fn latch_fires_once() {
        let mut store = DiscoveryStore::new(catalog());
        assert!(store.latch_complete());
        assert!(!store.latch_complete());
        assert!(store.is_complete());
    }

    #[test]
    fn from_parts_restores_primordial_and_clamps_day() {
        let table = catalog();
        let store = DiscoveryStore::from_parts(
            table,
            BTreeMap::new(),
            BTreeSet::new(),
            12,
            3,
            false,
        );
        assert_eq!(store.discovered_count(), 4);
        assert_eq!(store.current_day(), LAST_DAY);
        assert_eq!(store.attempts(), 3);
    }
}
