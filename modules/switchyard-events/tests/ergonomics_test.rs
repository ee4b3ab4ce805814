//! Ergonomics and usage pattern tests for the `Event` builder.
//! These test the API surface: construction, accessors and the JSON shape.

use serde_json::json;
use switchyard_events::{Event, Kind, FAILURE_FIELD};

// =========================================================================
// Event builder ergonomics
// =========================================================================

#[test]
fn event_minimal_construction() {
    let event = Event::new("INCREMENT");
    assert_eq!(event.kind(), &Kind::named("INCREMENT"));
    assert!(event.payload().is_none());
    assert!(event.meta().is_empty());
    assert!(!event.is_failure());
}

#[test]
fn event_full_builder_chain() {
    let event = Event::new("FETCH_USER")
        .with_payload(json!({"id": 42}))
        .with_field("source", "admin")
        .as_failure();

    assert_eq!(event.payload(), Some(&json!({"id": 42})));
    assert_eq!(event.field("source"), Some(&json!("admin")));
    assert_eq!(event.field(FAILURE_FIELD), Some(&json!(true)));
    assert!(event.is_failure());
}

#[test]
fn event_builder_order_doesnt_matter() {
    let a = Event::new("X").with_payload(1).with_field("source", "scout");
    let b = Event::new("X").with_field("source", "scout").with_payload(1);
    assert_eq!(a, b);
}

#[test]
fn later_fields_overwrite_earlier_ones() {
    let event = Event::new("X")
        .with_field("attempt", 1)
        .with_field("attempt", 2);
    assert_eq!(event.field("attempt"), Some(&json!(2)));
}

// =========================================================================
// JSON shape
// =========================================================================

#[test]
fn event_serializes_flat() {
    let event = Event::new("INCREMENT").with_payload(7).with_field("source", "ui");
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(
        value,
        json!({"kind": "INCREMENT", "payload": 7, "source": "ui"})
    );
}

#[test]
fn absent_payload_is_omitted() {
    let value = serde_json::to_value(Event::new("NOOP")).unwrap();
    assert_eq!(value, json!({"kind": "NOOP"}));
}

#[test]
fn null_payload_is_kept_distinct_from_absent() {
    let sent = Event::new("RESET").with_payload(json!(null));
    let value = serde_json::to_value(&sent).unwrap();
    assert_eq!(value, json!({"kind": "RESET", "payload": null}));

    let received: Event = serde_json::from_value(value).unwrap();
    assert_eq!(received.payload(), Some(&json!(null)));
    assert_eq!(received, sent);

    let bare: Event = serde_json::from_value(json!({"kind": "RESET"})).unwrap();
    assert!(bare.payload().is_none());
}

#[test]
fn received_event_deserializes_with_meta() {
    let event: Event =
        serde_json::from_value(json!({"kind": "DECREMENT", "payload": 3, "error": true}))
            .unwrap();
    assert_eq!(event.kind(), &Kind::named("DECREMENT"));
    assert_eq!(event.payload_as::<i64>(), Some(3));
    assert!(event.is_failure());
}

#[test]
fn unique_kind_serializes_as_its_display_form() {
    let kind = Kind::unique("TICK");
    let value = serde_json::to_value(Event::new(kind.clone())).unwrap();
    assert_eq!(value, json!({"kind": "Symbol(TICK)"}));

    // Reading it back yields a name, which never equals the minted token.
    let back: Event = serde_json::from_value(value).unwrap();
    assert_ne!(back.kind(), &kind);
}
