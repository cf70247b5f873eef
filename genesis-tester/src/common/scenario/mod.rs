pub mod catalog;

use crate::logic::SimulationPlan;

// Logic test scenario
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

/// Scenario keys in the order `all` expands to.
pub const SCENARIO_KEYS: [&str; 7] = [
    "smoke",
    "full-creation",
    "random-walk",
    "exhaustive",
    "persistence-roundtrip",
    "order-independence",
    "strict-resolution",
];

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    match name.to_lowercase().as_str() {
        "smoke" => Some(catalog::smoke_scenario()),
        "full-creation" | "full" => Some(catalog::full_creation_scenario()),
        "random-walk" | "random" => Some(catalog::random_walk_scenario()),
        "exhaustive" => Some(catalog::exhaustive_scenario()),
        "persistence-roundtrip" | "persistence" => Some(catalog::persistence_scenario()),
        "order-independence" => Some(catalog::order_independence_scenario()),
        "strict-resolution" | "strict" => Some(catalog::strict_resolution_scenario()),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Smoke Test"),
        ("full-creation", "Full Creation - Hint Follower"),
        ("random-walk", "Random Walk - Seeded Pairs"),
        ("exhaustive", "Exhaustive Pair Sweep"),
        ("persistence-roundtrip", "Snapshot and Resume Round Trip"),
        ("order-independence", "Input Order Independence"),
        ("strict-resolution", "First-Defined Resolution Dead Ends"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_key_resolves() {
        for key in SCENARIO_KEYS {
            assert!(get_scenario(key).is_some(), "{key}");
        }
        let listed: Vec<_> = list_scenarios().into_iter().map(|(key, _)| key).collect();
        assert_eq!(listed, SCENARIO_KEYS);
    }

    #[test]
    fn unknown_scenario_is_none() {
        assert!(get_scenario("oregon-trail").is_none());
        assert!(get_scenario("SMOKE").is_some());
    }
}
