//! Store dispatch loop tests.
//! No persistence involved: the store folds events in memory and records a
//! dispatch history.

use std::sync::Arc;

use anyhow::Result;
use switchyard_engine::{compile_reducer, CompiledReducer, Reducer, Store, TransitionMap};
use switchyard_events::{create_event_constructors, ConstructorSet, Event, Kind};

// ---------------------------------------------------------------------------
// Test state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
struct TestState {
    events_seen: Vec<String>,
    start_count: u32,
    end_count: u32,
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn constructors() -> ConstructorSet {
    create_event_constructors(["START", "END"]).expect("static kinds are valid")
}

fn test_reducer(set: &ConstructorSet) -> CompiledReducer<TestState> {
    let start = set.get("start").unwrap();
    let end = set.get("end").unwrap();

    compile_reducer(
        TransitionMap::new()
            .on(start, |s: &TestState, e: &Event| {
                let mut next = s.clone();
                next.events_seen.push(e.payload_as().unwrap_or_default());
                next.start_count += 1;
                next
            })
            .on(end, |s: &TestState, e: &Event| {
                let mut next = s.clone();
                next.events_seen.push(e.payload_as().unwrap_or_default());
                next.end_count += 1;
                next
            }),
        Some(TestState::default()),
    )
    .expect("test reducer compiles")
}

// =========================================================================
// Tests
// =========================================================================

#[test]
fn single_event_reduces_state() -> Result<()> {
    let set = constructors();
    let mut store = Store::new(test_reducer(&set), None);

    let state = store.dispatch(&set.get("start").unwrap().create("a"));
    assert_eq!(state.map(|s| s.start_count), Some(1));
    assert_eq!(store.state().unwrap().events_seen, vec!["a".to_string()]);
    Ok(())
}

#[test]
fn replay_folds_events_in_order() -> Result<()> {
    let set = constructors();
    let start = set.get("start").unwrap();
    let end = set.get("end").unwrap();
    let events = vec![start.create("a"), end.create("b"), start.create("c")];

    let mut store = Store::new(test_reducer(&set), None);
    store.replay(&events);

    let state = store.into_state().unwrap();
    assert_eq!(state.events_seen, vec!["a", "b", "c"]);
    assert_eq!(state.start_count, 2);
    assert_eq!(state.end_count, 1);
    Ok(())
}

#[test]
fn replaying_the_same_log_is_deterministic() -> Result<()> {
    let set = constructors();
    let start = set.get("start").unwrap();
    let events = vec![start.create("x"), start.create("y")];
    let reducer = Arc::new(test_reducer(&set));

    let mut first = Store::new(Arc::clone(&reducer), None);
    let mut second = Store::new(Arc::clone(&reducer), None);
    first.replay(&events);
    second.replay(&events);

    assert_eq!(first.state(), second.state());
    Ok(())
}

#[test]
fn unknown_kinds_are_recorded_but_change_nothing() -> Result<()> {
    let set = constructors();
    let mut store = Store::new(test_reducer(&set), Some(TestState::default()));

    store.dispatch(&Event::new("NOOP"));
    assert_eq!(store.state(), Some(&TestState::default()));

    let history = store.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, Kind::named("NOOP"));
    assert!(!history[0].handled);
    Ok(())
}

#[test]
fn history_sequence_numbers_increase() -> Result<()> {
    let set = constructors();
    let start = set.get("start").unwrap();
    let mut store = Store::new(test_reducer(&set), None);

    store.dispatch(&start.create("a"));
    store.dispatch(&Event::new("NOOP"));
    store.dispatch(&start.create("b"));

    let seqs: Vec<u64> = store.history().iter().map(|r| r.seq).collect();
    assert_eq!(seqs, vec![1, 2, 3]);
    assert!(store.history()[0].handled);
    assert!(store.history()[0].ts <= store.history()[2].ts);
    Ok(())
}

#[test]
fn history_serializes_for_inspection() -> Result<()> {
    let set = constructors();
    let mut store = Store::new(test_reducer(&set), None);
    store.dispatch(&set.get("end").unwrap().create("z"));

    let json = serde_json::to_value(store.history())?;
    assert_eq!(json[0]["kind"], "END");
    assert_eq!(json[0]["seq"], 1);
    assert_eq!(json[0]["handled"], true);
    Ok(())
}

// ---------------------------------------------------------------------------
// A hand-written reducer works with the store too
// ---------------------------------------------------------------------------

struct CountingReducer;

impl Reducer<u32> for CountingReducer {
    fn reduce(&self, state: Option<u32>, _event: &Event) -> Option<u32> {
        Some(state.unwrap_or(0) + 1)
    }
}

#[test]
fn custom_reducer_drives_the_store() -> Result<()> {
    let mut store = Store::new(CountingReducer, None);
    store.dispatch(&Event::new("A"));
    store.dispatch(&Event::new("B"));
    assert_eq!(store.state(), Some(&2));
    assert!(store.history().iter().all(|r| r.handled));
    Ok(())
}
