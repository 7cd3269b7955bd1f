//! Integration tests for textdesk.

use std::time::Duration;
use textdesk::{
    find_match_spans, find_matches, replace_all, Record, RecordStore, Revision, StoreEvent,
    SubscriptionConfig, SubscriptionFilter,
};

// --- Pattern Workflows ---

#[test]
fn test_find_and_replace_round() {
    let text = "Order 17 shipped 2024-03-01, order 18 pending";

    let ids = find_matches(r"(?i)order (\d+)", text).unwrap();
    assert_eq!(ids, vec!["Order 17", "order 18"]);

    let redacted = replace_all(r"\d{4}-\d{2}-\d{2}", "<date>", text).unwrap();
    assert_eq!(redacted, "Order 17 shipped <date>, order 18 pending");

    let swapped = replace_all(r"(\d{4})-(\d{2})-(\d{2})", "${3}.${2}.${1}", text).unwrap();
    assert_eq!(swapped, "Order 17 shipped 01.03.2024, order 18 pending");
}

#[test]
fn test_spans_locate_multibyte_text() {
    let text = "café 42 naïve 7";
    let spans = find_match_spans(r"\d+", text).unwrap();

    assert_eq!(spans.len(), 2);
    for span in &spans {
        assert_eq!(&text[span.start..span.end], span.text);
    }
    assert_eq!(spans[0].text, "42");
    assert_eq!(spans[1].text, "7");
}

#[test]
fn test_replace_does_not_rescan_output() {
    // Removing "ab" from "aabb" leaves a fresh "ab", which stays.
    assert_eq!(replace_all("ab", "", "aabb").unwrap(), "ab");
}

// --- Store Workflows ---

#[test]
fn test_store_example_sequence() {
    let mut store = RecordStore::new();
    let view = store.view();

    assert!(store.add_or_update("x", "1"));
    assert_eq!(view.snapshot(), vec![Record::new("x", "1")]);

    assert!(store.add_or_update("x", "2"));
    assert_eq!(view.snapshot(), vec![Record::new("x", "2")]);

    assert!(store.delete("x"));
    assert!(view.snapshot().is_empty());
}

#[test]
fn test_view_is_live_across_clones() {
    let mut store = RecordStore::new();
    let first = store.view();
    let second = first.clone();

    store.add_or_update("a", "1");
    store.add_or_update("b", "2");

    assert_eq!(first.keys(), vec!["a", "b"]);
    assert_eq!(second.len(), 2);
    assert_eq!(first.revision(), Revision(2));
    assert_eq!(first.with(|records| records[1].value.clone()), "2");
}

#[test]
fn test_view_readable_from_another_thread() {
    let mut store = RecordStore::new();
    let view = store.view();
    store.add_or_update("k", "v");

    let seen = std::thread::spawn(move || view.snapshot()).join().unwrap();
    assert_eq!(seen, vec![Record::new("k", "v")]);
}

#[test]
fn test_insertion_order_preserved() {
    let mut store = RecordStore::new();
    for key in ["zeta", "alpha", "mid"] {
        store.add_or_update(key, "");
    }
    store.add_or_update("alpha", "updated");
    store.delete("zeta");
    store.add_or_update("zeta", "back");

    assert_eq!(store.keys(), vec!["alpha", "mid", "zeta"]);
    assert_eq!(store.get("alpha").unwrap().value, "updated");
}

// --- Subscriptions ---

#[test]
fn test_subscriber_sees_changes_in_order() {
    let mut store = RecordStore::new();
    let handle = store.subscribe(SubscriptionConfig::default());

    store.add_or_update("a", "1");
    store.add_or_update("b", "2");
    store.add_or_update("a", "10");
    store.delete("a");

    let events = handle.drain();
    assert_eq!(
        events,
        vec![
            StoreEvent::CaughtUp,
            StoreEvent::Added {
                position: 0,
                record: Record::new("a", "1"),
                revision: Revision(1),
            },
            StoreEvent::Added {
                position: 1,
                record: Record::new("b", "2"),
                revision: Revision(2),
            },
            StoreEvent::Updated {
                position: 0,
                key: "a".into(),
                previous: "1".into(),
                value: "10".into(),
                revision: Revision(3),
            },
            StoreEvent::Removed {
                position: 0,
                record: Record::new("a", "10"),
                revision: Revision(4),
            },
        ]
    );
}

#[test]
fn test_subscriber_replay_existing() {
    let mut store = RecordStore::new();
    store.add_or_update("a", "1");
    store.add_or_update("b", "2");

    let handle = store.subscribe(SubscriptionConfig {
        replay_existing: true,
        ..Default::default()
    });

    let first = handle.recv_timeout(Duration::from_millis(100)).unwrap();
    assert!(matches!(first, StoreEvent::Added { position: 0, .. }));
    let second = handle.recv_timeout(Duration::from_millis(100)).unwrap();
    assert!(matches!(second, StoreEvent::Added { position: 1, .. }));
    let third = handle.recv_timeout(Duration::from_millis(100)).unwrap();
    assert_eq!(third, StoreEvent::CaughtUp);

    store.add_or_update("c", "3");
    let live = handle.recv_timeout(Duration::from_millis(100)).unwrap();
    assert!(matches!(live, StoreEvent::Added { position: 2, .. }));
}

#[test]
fn test_filtered_subscriber() {
    let mut store = RecordStore::new();
    let handle = store.subscribe(SubscriptionConfig {
        filter: SubscriptionFilter::keys(vec!["watched".to_string()]),
        ..Default::default()
    });

    store.add_or_update("other", "1");
    store.add_or_update("watched", "1");
    store.add_or_update("watched", "2");

    let events = handle.drain();
    assert_eq!(events.len(), 3);
    assert!(matches!(events[1], StoreEvent::Added { position: 1, .. }));
    assert!(matches!(events[2], StoreEvent::Updated { .. }));
}

#[test]
fn test_slow_subscriber_does_not_block_store() {
    let mut store = RecordStore::new();
    let _slow = store.subscribe(SubscriptionConfig {
        buffer_size: 4,
        ..Default::default()
    });
    let fast = store.subscribe(SubscriptionConfig::default());
    assert_eq!(store.subscription_count(), 2);

    for i in 0..100 {
        store.add_or_update(&format!("k{}", i), "v");
    }

    assert_eq!(store.len(), 100);
    assert_eq!(store.subscription_count(), 1);
    assert_eq!(fast.drain().len(), 101);
}

#[test]
fn test_unsubscribe() {
    let mut store = RecordStore::new();
    let handle = store.subscribe(SubscriptionConfig::default());
    store.unsubscribe(handle.id);
    store.add_or_update("a", "1");

    let events = handle.drain();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[1], StoreEvent::Dropped { .. }));
}
