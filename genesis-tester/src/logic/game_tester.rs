use std::sync::Arc;

use anyhow::Result;
use genesis_game::{
    Catalog, CombineOutcome, CombineReport, DiscoveryEngine, DiscoveryStore, ElementId,
    EngineConfig, FIRST_DAY, LAST_DAY, MemoryStorage, Resolution, Silent, SoundEvent, SoundLog,
    catalog, is_complete, progress_percent,
};
use serde::Serialize;

use crate::logic::policy::GameplayStrategy;

pub const DEFAULT_MAX_ATTEMPTS: usize = 5_000;

#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub strategy: GameplayStrategy,
    pub max_attempts: usize,
    pub resolution: Resolution,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(strategy: GameplayStrategy) -> Self {
        Self {
            strategy,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            resolution: Resolution::default(),
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    /// # Errors
    ///
    /// Returns the expectation's own failure.
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    NewDiscovery,
    AlreadyKnown,
    NoMatch,
}

impl From<&CombineOutcome> for OutcomeKind {
    fn from(outcome: &CombineOutcome) -> Self {
        match outcome {
            CombineOutcome::NewDiscovery(_) => Self::NewDiscovery,
            CombineOutcome::AlreadyKnown(_) => Self::AlreadyKnown,
            CombineOutcome::NoMatch => Self::NoMatch,
        }
    }
}

/// One combine attempt as the policy played it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    pub attempt: usize,
    pub first: ElementId,
    pub second: ElementId,
    pub outcome: OutcomeKind,
    pub element: Option<ElementId>,
    pub day_advanced: Option<u8>,
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub new_discoveries: usize,
    pub already_known: usize,
    pub no_match: usize,
}

impl OutcomeCounts {
    fn record(&mut self, kind: OutcomeKind) {
        match kind {
            OutcomeKind::NewDiscovery => self.new_discoveries += 1,
            OutcomeKind::AlreadyKnown => self.already_known += 1,
            OutcomeKind::NoMatch => self.no_match += 1,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.new_discoveries + self.already_known + self.no_match
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HaltReason {
    /// The policy had nothing left to try.
    PolicyExhausted,
    AttemptLimit,
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub resolution: Resolution,
    pub attempts: Vec<AttemptRecord>,
    pub outcomes: OutcomeCounts,
    pub sounds: Vec<SoundEvent>,
    /// 1-based attempt on which the completion latch fired.
    pub completed_at: Option<usize>,
    pub halt: HaltReason,
    pub invariant_violations: Vec<String>,
    pub final_store: DiscoveryStore,
}

impl SimulationSummary {
    #[must_use]
    pub fn sound_count(&self, event: SoundEvent) -> usize {
        self.sounds.iter().filter(|played| **played == event).count()
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        progress_percent(&self.final_store, catalog())
    }

    /// Newly discovered ids in the order they appeared.
    pub fn discoveries(&self) -> impl Iterator<Item = &ElementId> {
        self.attempts
            .iter()
            .filter(|record| record.outcome == OutcomeKind::NewDiscovery)
            .filter_map(|record| record.element.as_ref())
    }
}

/// Headless deterministic runner for the discovery engine.
#[derive(Debug, Clone)]
pub struct GameTester {
    catalog: &'static Catalog,
    verbose: bool,
}

impl GameTester {
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self {
            catalog: catalog(),
            verbose,
        }
    }

    /// Play `plan` from a fresh store, checking the store after every attempt.
    #[must_use]
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> SimulationSummary {
        let storage = MemoryStorage::new();
        let sounds = SoundLog::new();
        let engine = DiscoveryEngine::new(self.catalog, &storage, &sounds, Silent)
            .with_config(EngineConfig::default().with_resolution(plan.resolution));
        let mut store = DiscoveryStore::new(self.catalog);
        let mut policy = plan.strategy.create_policy(seed);

        let mut attempts = Vec::new();
        let mut outcomes = OutcomeCounts::default();
        let mut played = Vec::new();
        let mut completed_at = None;
        let mut violations = Vec::new();
        let mut halt = HaltReason::AttemptLimit;

        while attempts.len() < plan.max_attempts {
            let Some(decision) = policy.pick_pair(self.catalog, &store, plan.resolution) else {
                halt = HaltReason::PolicyExhausted;
                break;
            };
            let attempt = attempts.len() + 1;
            let before = store.clone();
            let report = match engine.attempt_combine(&mut store, &decision.first, &decision.second)
            {
                Ok(report) => report,
                Err(err) => {
                    violations.push(format!(
                        "attempt {attempt}: {} picked an unusable pair: {err}",
                        policy.name()
                    ));
                    halt = HaltReason::PolicyExhausted;
                    break;
                }
            };
            let cues = sounds.take();

            for problem in self.check_attempt(&before, &store, &report, &cues) {
                violations.push(format!("attempt {attempt} ({}): {problem}", report.pair));
            }
            if report.completed {
                if completed_at.is_some() {
                    violations.push(format!("attempt {attempt}: completion fired twice"));
                }
                completed_at.get_or_insert(attempt);
            }

            let kind = OutcomeKind::from(&report.outcome);
            outcomes.record(kind);
            log::trace!(
                "[{}] #{attempt} {}+{} -> {kind:?}",
                policy.name(),
                decision.first,
                decision.second
            );
            if self.verbose
                && let CombineOutcome::NewDiscovery(record) = &report.outcome
            {
                println!(
                    "     ↳ #{attempt} {} + {} = {} {} (day {})",
                    decision.first,
                    decision.second,
                    record.icon,
                    record.id,
                    store.current_day()
                );
            }
            attempts.push(AttemptRecord {
                attempt,
                first: decision.first,
                second: decision.second,
                outcome: kind,
                element: report.outcome.element().map(|record| record.id.clone()),
                day_advanced: report.day_advanced,
                rationale: decision.rationale,
            });
            played.extend(cues);
        }

        let matched = outcomes.new_discoveries + outcomes.already_known;
        if usize::try_from(store.attempts()).ok() != Some(matched) {
            violations.push(format!(
                "store counted {} attempts but {matched} pairs matched a rule",
                store.attempts()
            ));
        }

        SimulationSummary {
            seed,
            strategy: plan.strategy,
            resolution: plan.resolution,
            attempts,
            outcomes,
            sounds: played,
            completed_at,
            halt,
            invariant_violations: violations,
            final_store: store,
        }
    }

    fn check_attempt(
        &self,
        before: &DiscoveryStore,
        after: &DiscoveryStore,
        report: &CombineReport,
        cues: &[SoundEvent],
    ) -> Vec<String> {
        let mut problems = Vec::new();

        for id in self.catalog.primordial_ids() {
            if !after.contains(id) {
                problems.push(format!("primordial `{id}` missing"));
            }
        }
        if !(FIRST_DAY..=LAST_DAY).contains(&after.current_day()) {
            problems.push(format!("day {} out of range", after.current_day()));
        }
        if after.current_day() < before.current_day() {
            problems.push("day went backwards".to_string());
        }
        let latest_day = after
            .discovered()
            .values()
            .map(|record| record.discovered_day)
            .max()
            .unwrap_or(FIRST_DAY);
        if after.current_day() != latest_day {
            problems.push(format!(
                "day {} does not match latest discovery day {latest_day}",
                after.current_day()
            ));
        }
        if after.found_count() > self.catalog.rule_count() {
            problems.push("more pair keys found than rules exist".to_string());
        }
        if after.is_complete() != is_complete(after) {
            problems.push("completion latch disagrees with major elements".to_string());
        }
        if report.autosave_error.is_some() {
            problems.push("auto-save failed against in-memory storage".to_string());
        }

        let expected_cues = match &report.outcome {
            CombineOutcome::NoMatch => {
                if after != before {
                    problems.push("unmatched pair changed the store".to_string());
                }
                vec![SoundEvent::Failure, SoundEvent::Combine]
            }
            CombineOutcome::AlreadyKnown(record) => {
                if after.discovered() != before.discovered() {
                    problems.push(format!("known `{}` changed the known set", record.id));
                }
                if after.found_combinations() != before.found_combinations() {
                    problems.push(format!("known `{}` changed the found pairs", record.id));
                }
                if after.attempts() != before.attempts() + 1 {
                    problems.push("known result did not count an attempt".to_string());
                }
                vec![SoundEvent::Combine]
            }
            CombineOutcome::NewDiscovery(record) => {
                if before.contains(&record.id) {
                    problems.push(format!("`{}` was already known", record.id));
                }
                if after.discovered_count() != before.discovered_count() + 1 {
                    problems.push("discovery did not add exactly one element".to_string());
                }
                let mut cues = vec![SoundEvent::Discovery];
                if report.day_advanced.is_some() {
                    cues.push(SoundEvent::DayTransition);
                }
                if report.completed {
                    cues.push(SoundEvent::Completion);
                }
                cues.push(SoundEvent::Combine);
                cues
            }
        };
        if cues != expected_cues.as_slice() {
            problems.push(format!("played {cues:?}, expected {expected_cues:?}"));
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_follower_completes_without_violations() {
        let tester = GameTester::new(false);
        let summary = tester.run_plan(&SimulationPlan::new(GameplayStrategy::HintFollower), 1);
        assert!(summary.invariant_violations.is_empty(), "{:?}", summary.invariant_violations);
        assert_eq!(summary.halt, HaltReason::PolicyExhausted);
        assert!(summary.completed_at.is_some());
        assert_eq!(summary.sound_count(SoundEvent::Completion), 1);
        assert_eq!(summary.outcomes.no_match, 0);
        assert_eq!(summary.final_store.current_day(), LAST_DAY);
    }

    #[test]
    fn attempt_limit_halts_the_run() {
        let tester = GameTester::new(false);
        let plan = SimulationPlan::new(GameplayStrategy::RandomPairs).with_max_attempts(25);
        let summary = tester.run_plan(&plan, 3);
        assert_eq!(summary.halt, HaltReason::AttemptLimit);
        assert_eq!(summary.attempts.len(), 25);
        assert_eq!(summary.outcomes.total(), 25);
        assert!(summary.invariant_violations.is_empty(), "{:?}", summary.invariant_violations);
    }

    #[test]
    fn runs_are_reproducible_per_seed() {
        let tester = GameTester::new(false);
        let plan = SimulationPlan::new(GameplayStrategy::RandomPairs).with_max_attempts(200);
        let first = tester.run_plan(&plan, 42);
        let second = tester.run_plan(&plan, 42);
        assert_eq!(first.attempts, second.attempts);
        assert_eq!(first.final_store, second.final_store);
    }

    #[test]
    fn expectations_receive_the_summary() {
        let plan = SimulationPlan::new(GameplayStrategy::HintFollower)
            .with_max_attempts(1)
            .with_expectation(|summary: &SimulationSummary| -> Result<()> {
                anyhow::ensure!(summary.discoveries().count() == 1, "one discovery");
                Ok(())
            });
        let summary = GameTester::new(false).run_plan(&plan, 0);
        assert!(plan.expectations.iter().all(|e| e.evaluate(&summary).is_ok()));
    }
}
