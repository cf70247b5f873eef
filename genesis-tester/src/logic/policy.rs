use std::fmt;

use genesis_game::{Catalog, DiscoveryStore, ElementId, Resolution, available_hints};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Pair returned by a [`PlayerPolicy`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDecision {
    pub first: ElementId,
    pub second: ElementId,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub fn new(first: &str, second: &str, rationale: Option<String>) -> Self {
        Self {
            first: first.to_string(),
            second: second.to_string(),
            rationale,
        }
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Choose the next pair to combine, or `None` when the policy has nothing
    /// left to try.
    fn pick_pair(
        &mut self,
        catalog: &Catalog,
        store: &DiscoveryStore,
        resolution: Resolution,
    ) -> Option<PolicyDecision>;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameplayStrategy {
    HintFollower,
    RandomPairs,
    Exhaustive,
}

impl GameplayStrategy {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GameplayStrategy::HintFollower => "Hint Follower",
            GameplayStrategy::RandomPairs => "Random Pairs",
            GameplayStrategy::Exhaustive => "Exhaustive",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            GameplayStrategy::HintFollower => Box::new(HintFollowerPolicy),
            GameplayStrategy::RandomPairs => Box::new(RandomPairsPolicy::new(seed)),
            GameplayStrategy::Exhaustive => Box::new(ExhaustivePolicy::default()),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct HintFollowerPolicy;

struct RandomPairsPolicy {
    rng: ChaCha20Rng,
}

impl RandomPairsPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

/// Walks every unordered pair of known elements, self-pairs included. A pass
/// that ends with the same element count it started with is the last one.
#[derive(Default)]
struct ExhaustivePolicy {
    pairs: Vec<(ElementId, ElementId)>,
    cursor: usize,
    pass_start_count: Option<usize>,
}

impl ExhaustivePolicy {
    fn start_pass(&mut self, store: &DiscoveryStore) {
        let ids: Vec<&ElementId> = store.discovered().keys().collect();
        let ids = ids.as_slice();
        self.pairs = ids
            .iter()
            .enumerate()
            .flat_map(move |(i, first)| {
                ids[i..]
                    .iter()
                    .map(move |second| ((*first).clone(), (*second).clone()))
            })
            .collect();
        self.cursor = 0;
        self.pass_start_count = Some(store.discovered_count());
    }
}

impl PlayerPolicy for HintFollowerPolicy {
    fn name(&self) -> &'static str {
        "HintFollower"
    }

    fn pick_pair(
        &mut self,
        catalog: &Catalog,
        store: &DiscoveryStore,
        resolution: Resolution,
    ) -> Option<PolicyDecision> {
        let hints = available_hints(catalog, store, resolution);
        let hint = hints.first()?;
        Some(PolicyDecision::new(
            &hint.first.id,
            &hint.second.id,
            Some(format!("hint toward {}", hint.result_id)),
        ))
    }
}

impl PlayerPolicy for RandomPairsPolicy {
    fn name(&self) -> &'static str {
        "RandomPairs"
    }

    fn pick_pair(
        &mut self,
        _catalog: &Catalog,
        store: &DiscoveryStore,
        _resolution: Resolution,
    ) -> Option<PolicyDecision> {
        let ids: Vec<&ElementId> = store.discovered().keys().collect();
        if ids.is_empty() {
            return None;
        }
        let first = ids[self.rng.gen_range(0..ids.len())];
        let second = ids[self.rng.gen_range(0..ids.len())];
        Some(PolicyDecision::new(first, second, None))
    }
}

impl PlayerPolicy for ExhaustivePolicy {
    fn name(&self) -> &'static str {
        "Exhaustive"
    }

    fn pick_pair(
        &mut self,
        _catalog: &Catalog,
        store: &DiscoveryStore,
        _resolution: Resolution,
    ) -> Option<PolicyDecision> {
        if self.cursor >= self.pairs.len() {
            if self.pass_start_count == Some(store.discovered_count()) {
                return None;
            }
            self.start_pass(store);
        }
        let (first, second) = self.pairs.get(self.cursor)?;
        self.cursor += 1;
        Some(PolicyDecision::new(
            first,
            second,
            Some(format!("pair {}/{}", self.cursor, self.pairs.len())),
        ))
    }
}
