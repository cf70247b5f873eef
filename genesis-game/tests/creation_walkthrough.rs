use genesis_game::{
    CombineOutcome, DiscoveryEngine, DiscoveryStore, EngineConfig, GameError, MemoryStorage,
    RenderLog, Resolution, Silent, SoundEvent, SoundLog, available_hints, catalog, is_complete,
    progress_percent,
};

const WALKTHROUGH: [(&str, &str, &str); 21] = [
    ("fire", "air", "light"),
    ("light", "air", "darkness"),
    ("light", "darkness", "day"),
    ("darkness", "light", "night"),
    ("air", "water", "firmament"),
    ("firmament", "air", "heaven"),
    ("earth", "water", "sea"),
    ("earth", "air", "dry_land"),
    ("dry_land", "water", "grass"),
    ("grass", "earth", "herb"),
    ("herb", "earth", "tree"),
    ("light", "heaven", "sun"),
    ("darkness", "heaven", "moon"),
    ("air", "fire", "breath"),
    ("breath", "earth", "life"),
    ("earth", "breath", "man"),
    ("water", "life", "fish"),
    ("air", "life", "bird"),
    ("night", "man", "sleep"),
    ("man", "sleep", "woman"),
    ("day", "night", "sabbath"),
];

fn assert_store_invariants(store: &DiscoveryStore) {
    for id in ["air", "water", "earth", "fire"] {
        assert!(store.contains(id), "primordial `{id}` lost");
    }
    assert!(store.found_count() <= catalog().rule_count());
    assert!((1..=7).contains(&store.current_day()));
}

#[test]
fn scripted_walkthrough_completes_creation() {
    let sounds = SoundLog::new();
    let renders = RenderLog::new();
    let storage = MemoryStorage::new();
    let engine = DiscoveryEngine::new(catalog(), &storage, &sounds, &renders);
    let mut store = DiscoveryStore::new(catalog());

    let mut last_day = store.current_day();
    let mut days_advanced = Vec::new();
    for (step, (first, second, expected)) in WALKTHROUGH.iter().enumerate() {
        let report = engine.attempt_combine(&mut store, first, second).unwrap();
        match &report.outcome {
            CombineOutcome::NewDiscovery(record) => assert_eq!(record.id, *expected),
            other => panic!("step {step}: {first}+{second} gave {other:?}"),
        }
        assert!(store.current_day() >= last_day, "day went backwards");
        last_day = store.current_day();
        if let Some(day) = report.day_advanced {
            days_advanced.push(day);
        }
        assert_eq!(report.completed, step == WALKTHROUGH.len() - 1);
        assert_store_invariants(&store);
    }

    assert!(store.is_complete());
    assert!(is_complete(&store));
    assert_eq!(store.current_day(), 7);
    assert_eq!(days_advanced, vec![2, 3, 4, 6, 7]);
    assert_eq!(store.attempts(), 21);
    assert_eq!(store.discovered_count(), 25);
    assert_eq!(store.found_count(), 18);
    assert_eq!(progress_percent(&store, catalog()), 100.0 * 18.0 / 43.0);
    assert_eq!(renders.frames(), 21);
    assert_eq!(storage.write_count(), 21);

    let sabbath_sounds: Vec<_> = sounds.take().into_iter().rev().take(4).collect();
    assert_eq!(
        sabbath_sounds,
        vec![
            SoundEvent::Combine,
            SoundEvent::Completion,
            SoundEvent::DayTransition,
            SoundEvent::Discovery,
        ]
    );
}

#[test]
fn completion_latch_fires_once() {
    let engine = DiscoveryEngine::new(catalog(), MemoryStorage::new(), Silent, Silent);
    let mut store = DiscoveryStore::new(catalog());
    for (first, second, _) in WALKTHROUGH {
        engine.attempt_combine(&mut store, first, second).unwrap();
    }
    let report = engine.attempt_combine(&mut store, "tree", "light").unwrap();
    assert!(report.outcome.is_new_discovery());
    assert!(!report.completed);
    assert!(store.is_complete());
}

#[test]
fn combine_is_order_independent() {
    let engine = DiscoveryEngine::new(catalog(), MemoryStorage::new(), Silent, Silent);
    for (first, second, _) in WALKTHROUGH.iter().take(7) {
        let mut forward = DiscoveryStore::new(catalog());
        let mut backward = DiscoveryStore::new(catalog());
        for (a, b, _) in WALKTHROUGH.iter().take_while(|(a, b, _)| (a, b) != (first, second)) {
            engine.attempt_combine(&mut forward, a, b).unwrap();
            engine.attempt_combine(&mut backward, a, b).unwrap();
        }
        let ab = engine.attempt_combine(&mut forward, first, second).unwrap();
        let ba = engine.attempt_combine(&mut backward, second, first).unwrap();
        assert_eq!(ab.outcome, ba.outcome);
        assert_eq!(ab.pair, ba.pair);
        assert_eq!(forward, backward);
    }
}

#[test]
fn no_match_and_invalid_input_never_mutate() {
    let engine = DiscoveryEngine::new(catalog(), MemoryStorage::new(), Silent, Silent);
    let mut store = DiscoveryStore::new(catalog());
    engine.attempt_combine(&mut store, "fire", "air").unwrap();
    let before = store.clone();

    let report = engine.attempt_combine(&mut store, "earth", "earth").unwrap();
    assert_eq!(report.outcome, CombineOutcome::NoMatch);
    assert_eq!(store, before);

    let err = engine.attempt_combine(&mut store, "light", "voice").unwrap_err();
    assert_eq!(err, GameError::InvalidInput { id: "voice".into() });
    assert_eq!(store, before);
}

#[test]
fn strict_resolution_cannot_reach_man() {
    let engine = DiscoveryEngine::new(catalog(), MemoryStorage::new(), Silent, Silent)
        .with_config(EngineConfig::default().with_resolution(Resolution::FirstDefined));
    let mut store = DiscoveryStore::new(catalog());
    engine.attempt_combine(&mut store, "fire", "air").unwrap();
    let repeat = engine.attempt_combine(&mut store, "fire", "air").unwrap();
    assert!(matches!(repeat.outcome, CombineOutcome::AlreadyKnown(ref r) if r.id == "light"));
    assert_eq!(store.attempts(), 2);
    assert_eq!(store.found_count(), 1);
}

#[test]
fn hints_always_lead_somewhere_new() {
    let engine = DiscoveryEngine::new(catalog(), MemoryStorage::new(), Silent, Silent);
    let mut store = DiscoveryStore::new(catalog());
    for (first, second, _) in WALKTHROUGH.iter().take(12) {
        engine.attempt_combine(&mut store, first, second).unwrap();
        for hint in available_hints(catalog(), &store, Resolution::FirstUndiscovered) {
            let mut probe = store.clone();
            let report = engine
                .attempt_combine(&mut probe, &hint.first.id, &hint.second.id)
                .unwrap();
            assert!(
                report.outcome.is_new_discovery(),
                "hint {} was stale",
                hint.pair
            );
            assert_eq!(report.outcome.element().unwrap().id, hint.result_id);
        }
    }
}

#[test]
fn circular_word_voice_rules_stay_unreachable() {
    let engine = DiscoveryEngine::new(catalog(), MemoryStorage::new(), Silent, Silent);
    let mut store = DiscoveryStore::new(catalog());
    for (first, second, _) in WALKTHROUGH {
        engine.attempt_combine(&mut store, first, second).unwrap();
    }
    loop {
        let hints = available_hints(catalog(), &store, Resolution::FirstUndiscovered);
        let Some(hint) = hints.first() else { break };
        engine
            .attempt_combine(&mut store, &hint.first.id, &hint.second.id)
            .unwrap();
    }
    for id in ["word", "voice", "logos", "soul", "spirit"] {
        assert!(!store.contains(id), "`{id}` should need itself to be found");
    }
    assert!(progress_percent(&store, catalog()) < 100.0);
}
