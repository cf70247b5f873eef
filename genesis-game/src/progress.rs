//! Progression tracking: completion check and progress bar.
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::constants::MAJOR_ELEMENTS;
use crate::store::DiscoveryStore;

/// True once every major element has been discovered.
#[must_use]
pub fn is_complete(store: &DiscoveryStore) -> bool {
    MAJOR_ELEMENTS.iter().all(|id| store.contains(id))
}

/// Share of table rules whose pair has produced a discovery, in `0.0..=100.0`.
///
/// An empty table reports `0.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn progress_percent(store: &DiscoveryStore, catalog: &Catalog) -> f64 {
    let total = catalog.rule_count();
    if total == 0 {
        return 0.0;
    }
    100.0 * store.found_count() as f64 / total as f64
}

/// Major elements still missing, in canonical order.
#[must_use]
pub fn missing_major_elements(store: &DiscoveryStore) -> Vec<&'static str> {
    MAJOR_ELEMENTS
        .iter()
        .copied()
        .filter(|id| !store.contains(id))
        .collect()
}

/// Stats shown on the completion screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionSummary {
    pub elements: usize,
    pub found: usize,
    pub total: usize,
    pub day: u8,
}

impl CompletionSummary {
    #[must_use]
    pub fn from_store(store: &DiscoveryStore, catalog: &Catalog) -> Self {
        Self {
            elements: store.discovered_count(),
            found: store.found_count(),
            total: catalog.rule_count(),
            day: store.current_day(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PairKey, catalog};

    #[test]
    fn fresh_store_is_at_zero() {
        let table = catalog();
        let store = DiscoveryStore::new(table);
        assert_eq!(progress_percent(&store, table), 0.0);
        assert!(!is_complete(&store));
        assert_eq!(missing_major_elements(&store).len(), MAJOR_ELEMENTS.len());
    }

    #[test]
    fn empty_table_reports_zero() {
        let empty = Catalog::default();
        let store = DiscoveryStore::new(catalog());
        assert_eq!(progress_percent(&store, &empty), 0.0);
    }

    #[test]
    fn percent_is_exact_share_of_rules() {
        let table = catalog();
        let mut store = DiscoveryStore::new(table);
        let light = table.element("light").unwrap().clone();
        store.record_discovery(light, PairKey::new("fire", "air"));
        // 1 of 43 rules
        assert_eq!(progress_percent(&store, table), 100.0 / 43.0);
        let summary = CompletionSummary::from_store(&store, table);
        assert_eq!(summary.elements, 5);
        assert_eq!(summary.found, 1);
        assert_eq!(summary.total, 43);
        assert_eq!(summary.day, 1);
    }
}
