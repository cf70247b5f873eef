use anyhow::{Context, Result, ensure};
use chrono::Utc;
use genesis_game::{
    CombineOutcome, DiscoveryEngine, DiscoveryStore, EngineConfig, GameSession, LAST_DAY,
    MemoryStorage, Resolution, Silent, SoundEvent, available_hints, catalog,
    missing_major_elements, restore, snapshot,
};

use crate::common::scenario::TestScenario;
use crate::logic::{
    GameTester, GameplayStrategy, HaltReason, OutcomeKind, SimulationPlan, SimulationSummary,
};

const SMOKE_ATTEMPTS: usize = 5;
const RANDOM_WALK_ATTEMPTS: usize = 3_000;
const EXHAUSTIVE_ATTEMPTS: usize = 20_000;
const PERSISTENCE_ATTEMPTS: usize = 12;

/// Elements whose only recipes need one another or a missing input.
const UNREACHABLE: [&str; 5] = ["word", "voice", "logos", "soul", "spirit"];

pub fn smoke_scenario() -> TestScenario {
    TestScenario::simulation(
        "Smoke Test",
        SimulationPlan::new(GameplayStrategy::HintFollower)
            .with_max_attempts(SMOKE_ATTEMPTS)
            .with_expectation(smoke_expectation),
    )
}

pub fn full_creation_scenario() -> TestScenario {
    TestScenario::simulation(
        "Full Creation - Hint Follower",
        SimulationPlan::new(GameplayStrategy::HintFollower)
            .with_expectation(completes_creation)
            .with_expectation(closure_reached),
    )
}

pub fn random_walk_scenario() -> TestScenario {
    TestScenario::simulation(
        "Random Walk - Seeded Pairs",
        SimulationPlan::new(GameplayStrategy::RandomPairs)
            .with_max_attempts(RANDOM_WALK_ATTEMPTS)
            .with_expectation(random_walk_expectation),
    )
}

pub fn exhaustive_scenario() -> TestScenario {
    TestScenario::simulation(
        "Exhaustive Pair Sweep",
        SimulationPlan::new(GameplayStrategy::Exhaustive)
            .with_max_attempts(EXHAUSTIVE_ATTEMPTS)
            .with_expectation(completes_creation)
            .with_expectation(closure_reached)
            .with_expectation(matches_hint_follower),
    )
}

pub fn persistence_scenario() -> TestScenario {
    TestScenario::simulation(
        "Snapshot and Resume Round Trip",
        SimulationPlan::new(GameplayStrategy::HintFollower)
            .with_max_attempts(PERSISTENCE_ATTEMPTS)
            .with_expectation(snapshot_round_trip)
            .with_expectation(session_resumes_from_slot),
    )
}

pub fn order_independence_scenario() -> TestScenario {
    TestScenario::simulation(
        "Input Order Independence",
        SimulationPlan::new(GameplayStrategy::HintFollower)
            .with_expectation(swapped_replay_matches),
    )
}

pub fn strict_resolution_scenario() -> TestScenario {
    TestScenario::simulation(
        "First-Defined Resolution Dead Ends",
        SimulationPlan::new(GameplayStrategy::HintFollower)
            .with_resolution(Resolution::FirstDefined)
            .with_expectation(strict_resolution_expectation),
    )
}

fn smoke_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.attempts.len() == SMOKE_ATTEMPTS,
        "expected {SMOKE_ATTEMPTS} attempts, got {}",
        summary.attempts.len()
    );
    ensure!(
        summary.outcomes.new_discoveries == SMOKE_ATTEMPTS,
        "every hinted pair should discover something, got {:?}",
        summary.outcomes
    );
    ensure!(
        summary.final_store.discovered_count() == 4 + SMOKE_ATTEMPTS,
        "known set has {} elements",
        summary.final_store.discovered_count()
    );
    ensure!(
        summary.sound_count(SoundEvent::Discovery) == SMOKE_ATTEMPTS,
        "discovery cue count {}",
        summary.sound_count(SoundEvent::Discovery)
    );
    ensure!(summary.progress() > 0.0, "progress did not move");
    Ok(())
}

fn completes_creation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.halt == HaltReason::PolicyExhausted,
        "run stopped by {:?}",
        summary.halt
    );
    let completed_at = summary
        .completed_at
        .context("creation never completed")?;
    let missing = missing_major_elements(&summary.final_store);
    ensure!(missing.is_empty(), "major elements missing: {missing:?}");
    ensure!(
        summary.final_store.current_day() == LAST_DAY,
        "ended on day {}",
        summary.final_store.current_day()
    );
    ensure!(
        summary.sound_count(SoundEvent::Completion) == 1,
        "completion cue played {} times",
        summary.sound_count(SoundEvent::Completion)
    );
    let latch = summary
        .attempts
        .get(completed_at - 1)
        .context("completion attempt not recorded")?;
    ensure!(
        latch.outcome == OutcomeKind::NewDiscovery,
        "completion fired on a {:?}",
        latch.outcome
    );
    Ok(())
}

fn closure_reached(summary: &SimulationSummary) -> Result<()> {
    let left = available_hints(catalog(), &summary.final_store, summary.resolution);
    ensure!(
        left.is_empty(),
        "{} hints still available, first {}",
        left.len(),
        left[0].pair
    );
    for id in UNREACHABLE {
        ensure!(
            !summary.final_store.contains(id),
            "`{id}` should be unreachable"
        );
    }
    Ok(())
}

fn matches_hint_follower(summary: &SimulationSummary) -> Result<()> {
    let plan =
        SimulationPlan::new(GameplayStrategy::HintFollower).with_resolution(summary.resolution);
    let reference = GameTester::new(false).run_plan(&plan, summary.seed);
    let swept: Vec<_> = summary.final_store.discovered().keys().collect();
    let hinted: Vec<_> = reference.final_store.discovered().keys().collect();
    ensure!(
        swept == hinted,
        "sweep found {} elements, hint follower {}",
        swept.len(),
        hinted.len()
    );
    Ok(())
}

fn random_walk_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.outcomes.total() == summary.attempts.len(),
        "outcome counts {:?} do not add up to {}",
        summary.outcomes,
        summary.attempts.len()
    );
    ensure!(
        summary.sound_count(SoundEvent::Completion) <= 1,
        "completion cue played {} times",
        summary.sound_count(SoundEvent::Completion)
    );
    ensure!(
        summary.completed_at.is_some() == summary.final_store.is_complete(),
        "completion latch and recorded completion disagree"
    );
    let discoveries: Vec<_> = summary.discoveries().collect();
    ensure!(
        discoveries.len() + 4 == summary.final_store.discovered_count(),
        "{} discoveries for {} known elements",
        discoveries.len(),
        summary.final_store.discovered_count()
    );
    for id in UNREACHABLE {
        ensure!(!summary.final_store.contains(id), "`{id}` was reached");
    }
    Ok(())
}

fn snapshot_round_trip(summary: &SimulationSummary) -> Result<()> {
    let blob = snapshot(&summary.final_store, Utc::now())
        .to_json()
        .context("serializing snapshot")?;
    let restored = restore(catalog(), &blob).context("restoring snapshot")?;
    ensure!(
        restored == summary.final_store,
        "restored store differs: {} vs {} elements",
        restored.discovered_count(),
        summary.final_store.discovered_count()
    );
    Ok(())
}

fn session_resumes_from_slot(summary: &SimulationSummary) -> Result<()> {
    let storage = MemoryStorage::new();
    let config = EngineConfig::default().with_resolution(summary.resolution);
    let engine =
        DiscoveryEngine::new(catalog(), &storage, Silent, Silent).with_config(config.clone());
    engine
        .save(&summary.final_store)
        .context("saving to memory slot")?;

    let resumed = GameSession::resume(
        DiscoveryEngine::new(catalog(), &storage, Silent, Silent).with_config(config),
        summary.seed,
    );
    ensure!(resumed.was_resumed(), "session did not resume the slot");
    ensure!(
        resumed.store() == &summary.final_store,
        "resumed store differs from the saved one"
    );
    Ok(())
}

fn swapped_replay_matches(summary: &SimulationSummary) -> Result<()> {
    let engine = DiscoveryEngine::new(catalog(), MemoryStorage::new(), Silent, Silent)
        .with_config(EngineConfig::default().with_resolution(summary.resolution));
    let mut store = DiscoveryStore::new(catalog());
    for record in &summary.attempts {
        let report = engine
            .attempt_combine(&mut store, &record.second, &record.first)
            .with_context(|| format!("replaying attempt {}", record.attempt))?;
        let element = report.outcome.element().map(|found| found.id.as_str());
        ensure!(
            OutcomeKind::from(&report.outcome) == record.outcome
                && element == record.element.as_deref(),
            "attempt {}: {}+{} gave {:?} {:?} swapped, {:?} {:?} in order",
            record.attempt,
            record.second,
            record.first,
            OutcomeKind::from(&report.outcome),
            element,
            record.outcome,
            record.element
        );
    }
    ensure!(
        store == summary.final_store,
        "swapped replay ended in a different store"
    );
    Ok(())
}

fn strict_resolution_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.halt == HaltReason::PolicyExhausted,
        "run stopped by {:?}",
        summary.halt
    );
    ensure!(
        summary.completed_at.is_none(),
        "creation completed under first-defined resolution"
    );
    let missing = missing_major_elements(&summary.final_store);
    for id in ["man", "fish", "bird"] {
        ensure!(missing.contains(&id), "`{id}` was reachable: {missing:?}");
    }
    ensure!(
        !summary.final_store.contains("breath"),
        "`breath` hides behind light and should stay out of reach"
    );
    ensure!(
        !summary
            .attempts
            .iter()
            .any(|record| record.outcome != OutcomeKind::NewDiscovery),
        "a hint led to a dead pair"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(scenario: &TestScenario, seed: u64) -> Vec<String> {
        let summary = GameTester::new(false).run_plan(&scenario.plan, seed);
        let mut problems = summary.invariant_violations.clone();
        for expectation in &scenario.plan.expectations {
            if let Err(err) = expectation.evaluate(&summary) {
                problems.push(err.to_string());
            }
        }
        problems
    }

    #[test]
    fn deterministic_scenarios_pass() {
        for scenario in [
            smoke_scenario(),
            full_creation_scenario(),
            persistence_scenario(),
            order_independence_scenario(),
            strict_resolution_scenario(),
        ] {
            let problems = run(&scenario, 1337);
            assert!(problems.is_empty(), "{}: {problems:?}", scenario.name);
        }
    }

    #[test]
    fn exhaustive_sweep_reaches_the_same_closure() {
        let problems = run(&exhaustive_scenario(), 1);
        assert!(problems.is_empty(), "{problems:?}");
    }

    #[test]
    fn random_walk_holds_for_several_seeds() {
        for seed in [1, 2, 3] {
            let problems = run(&random_walk_scenario(), seed);
            assert!(problems.is_empty(), "seed {seed}: {problems:?}");
        }
    }

    #[test]
    fn completion_is_required_for_full_creation() {
        let partial = GameTester::new(false).run_plan(
            &SimulationPlan::new(GameplayStrategy::HintFollower).with_max_attempts(3),
            0,
        );
        assert!(completes_creation(&partial).is_err());
    }

    #[test]
    fn strict_expectation_rejects_a_completed_run() {
        let complete = GameTester::new(false)
            .run_plan(&SimulationPlan::new(GameplayStrategy::HintFollower), 0);
        assert!(strict_resolution_expectation(&complete).is_err());
    }

    #[test]
    fn swapped_replay_survives_no_match_attempts() {
        let walk = GameTester::new(false).run_plan(
            &SimulationPlan::new(GameplayStrategy::RandomPairs).with_max_attempts(150),
            11,
        );
        assert!(walk.outcomes.no_match > 0);
        assert!(swapped_replay_matches(&walk).is_ok());
    }
}
