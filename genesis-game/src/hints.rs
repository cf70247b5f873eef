//! Hints: pairs the player could combine right now for something new.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::catalog::{Catalog, ElementRecord, PairKey};
use crate::config::Resolution;
use crate::engine::{PairMatch, resolve_pair};
use crate::store::DiscoveryStore;

/// A suggested pair and what it leads to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub first: ElementRecord,
    pub second: ElementRecord,
    pub pair: PairKey,
    pub result_id: String,
    /// Day of creation the result belongs to.
    pub day: u8,
    pub verse: String,
}

/// Every pair of known elements that would currently yield a new discovery,
/// one entry per pair, in table order.
#[must_use]
pub fn available_hints(
    catalog: &Catalog,
    store: &DiscoveryStore,
    resolution: Resolution,
) -> Vec<Hint> {
    let mut seen = BTreeSet::new();
    let mut hints = Vec::new();
    for rule in &catalog.combinations {
        let [first, second] = &rule.inputs;
        let (Some(first), Some(second)) = (store.element(first), store.element(second)) else {
            continue;
        };
        let pair = rule.pair_key();
        if !seen.insert(pair.clone()) {
            continue;
        }
        if let PairMatch::Undiscovered(winner) =
            resolve_pair(catalog, store, resolution, &first.id, &second.id)
        {
            hints.push(Hint {
                first: first.clone(),
                second: second.clone(),
                pair,
                result_id: winner.result.id.clone(),
                day: winner.result.discovered_day,
                verse: winner.result.verse.clone(),
            });
        }
    }
    hints
}

/// Uniformly pick one available hint; `None` once nothing new is reachable.
pub fn pick_hint<R: Rng + ?Sized>(
    catalog: &Catalog,
    store: &DiscoveryStore,
    resolution: Resolution,
    rng: &mut R,
) -> Option<Hint> {
    let mut hints = available_hints(catalog, store, resolution);
    if hints.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..hints.len());
    Some(hints.swap_remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::catalog;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn fresh_store_hints_follow_table_order() {
        let table = catalog();
        let store = DiscoveryStore::new(table);
        let hints = available_hints(table, &store, Resolution::FirstUndiscovered);
        let results: Vec<_> = hints.iter().map(|hint| hint.result_id.as_str()).collect();
        assert_eq!(
            results,
            vec!["light", "firmament", "sea", "dry_land", "stone", "cloud"]
        );
        assert!(hints.iter().all(|hint| !store.contains(&hint.result_id)));
    }

    #[test]
    fn exhausted_pairs_drop_out() {
        let table = catalog();
        let mut store = DiscoveryStore::new(table);
        for id in ["light", "breath"] {
            let record = table.element(id).unwrap().clone();
            store.record_discovery(record, PairKey::new("air", "fire"));
        }
        let hints = available_hints(table, &store, Resolution::FirstUndiscovered);
        assert!(hints.iter().all(|hint| hint.pair.as_str() != "air+fire"));
    }

    #[test]
    fn strict_resolution_hides_shadowed_rules() {
        let table = catalog();
        let mut store = DiscoveryStore::new(table);
        let light = table.element("light").unwrap().clone();
        store.record_discovery(light, PairKey::new("air", "fire"));
        let lenient = available_hints(table, &store, Resolution::FirstUndiscovered);
        let strict = available_hints(table, &store, Resolution::FirstDefined);
        assert!(lenient.iter().any(|hint| hint.result_id == "breath"));
        assert!(strict.iter().all(|hint| hint.result_id != "breath"));
    }

    #[test]
    fn pick_is_reproducible_per_seed() {
        let table = catalog();
        let store = DiscoveryStore::new(table);
        let mut a = ChaCha20Rng::seed_from_u64(42);
        let mut b = ChaCha20Rng::seed_from_u64(42);
        assert_eq!(
            pick_hint(table, &store, Resolution::default(), &mut a),
            pick_hint(table, &store, Resolution::default(), &mut b)
        );
        let empty = Catalog::default();
        assert!(pick_hint(&empty, &store, Resolution::default(), &mut a).is_none());
    }
}
