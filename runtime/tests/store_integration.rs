//! Integration tests for Store effect publishing
//!
//! Exercises the Store and `EventEmitter` together: effect ordering, pattern
//! subscriptions, nested dispatch from handlers, and handler isolation.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use larek_core::{Effect, Effects, Event, Matcher, Reducer, SmallVec, smallvec};
use larek_runtime::{EventEmitter, Store, StoreError};
use larek_testing::EventRecorder;
use std::borrow::Cow;
use std::rc::Rc;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum ShelfEvent {
    Stocked { sku: &'static str, qty: u32 },
    Sold { sku: &'static str },
    Empty { sku: &'static str },
}

impl Event for ShelfEvent {
    fn name(&self) -> Cow<'static, str> {
        Cow::Borrowed(match self {
            Self::Stocked { .. } => "shelf.stock:change",
            Self::Sold { .. } => "shelf.sale:change",
            Self::Empty { .. } => "shelf:empty",
        })
    }

    fn topics() -> &'static [&'static str] {
        &["shelf.stock:change", "shelf.sale:change", "shelf:empty"]
    }
}

#[derive(Debug, Clone)]
enum ShelfAction {
    Stock { sku: &'static str, qty: u32 },
    Sell { sku: &'static str },
    Audit,
}

#[derive(Debug, Default)]
struct ShelfState {
    items: Vec<(&'static str, u32)>,
    audits: u32,
}

impl ShelfState {
    fn qty(&self, sku: &str) -> u32 {
        self.items.iter().find(|(s, _)| *s == sku).map_or(0, |(_, q)| *q)
    }
}

struct ShelfReducer;

impl Reducer for ShelfReducer {
    type State = ShelfState;
    type Action = ShelfAction;
    type Event = ShelfEvent;
    type Environment = ();
    type Error = String;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> Result<Effects<ShelfEvent>, String> {
        match action {
            ShelfAction::Stock { sku, qty } => {
                match state.items.iter_mut().find(|(s, _)| *s == sku) {
                    Some(entry) => entry.1 += qty,
                    None => state.items.push((sku, qty)),
                }
                Ok(smallvec![Effect::Publish(ShelfEvent::Stocked { sku, qty })])
            },
            ShelfAction::Sell { sku } => {
                let Some(entry) = state.items.iter_mut().find(|(s, q)| *s == sku && *q > 0) else {
                    return Err(format!("{sku} is out of stock"));
                };
                entry.1 -= 1;
                let sold = Effect::Publish(ShelfEvent::Sold { sku });
                if entry.1 == 0 {
                    Ok(smallvec![Effect::Sequential(vec![
                        sold,
                        Effect::Publish(ShelfEvent::Empty { sku }),
                    ])])
                } else {
                    Ok(smallvec![sold])
                }
            },
            ShelfAction::Audit => {
                state.audits += 1;
                Ok(SmallVec::new())
            },
        }
    }
}

fn shelf() -> (Rc<Store<ShelfReducer>>, EventEmitter<ShelfEvent>) {
    let events = EventEmitter::new();
    let store = Rc::new(Store::new(ShelfState::default(), ShelfReducer, (), events.clone()));
    (store, events)
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn sequential_effects_publish_in_order() {
    let (store, events) = shelf();
    let recorder = EventRecorder::attach(&events);

    store.send(ShelfAction::Stock { sku: "tea", qty: 1 }).unwrap();
    store.send(ShelfAction::Sell { sku: "tea" }).unwrap();

    assert_eq!(
        recorder.names(),
        vec!["shelf.stock:change", "shelf.sale:change", "shelf:empty"]
    );
}

#[test]
fn pattern_subscription_sees_every_matching_topic() {
    let (store, events) = shelf();
    let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    events
        .on(Matcher::pattern(r"^shelf\..+:change$").unwrap(), move |event: &ShelfEvent| {
            sink.borrow_mut().push(event.name().into_owned());
            Ok(())
        })
        .unwrap();

    store.send(ShelfAction::Stock { sku: "tea", qty: 2 }).unwrap();
    store.send(ShelfAction::Sell { sku: "tea" }).unwrap();

    assert_eq!(*seen.borrow(), vec!["shelf.stock:change", "shelf.sale:change"]);
}

#[test]
fn pattern_matching_no_topic_is_refused() {
    let (_store, events) = shelf();
    let result = events.on(Matcher::pattern(r"^basket:.*$").unwrap(), |_| Ok(()));
    assert!(result.is_err());
}

#[test]
fn handler_can_restock_through_the_store() {
    let (store, events) = shelf();
    let weak = Rc::downgrade(&store);
    events
        .on("shelf:empty", move |event: &ShelfEvent| {
            if let (ShelfEvent::Empty { sku }, Some(store)) = (event, weak.upgrade()) {
                store
                    .send(ShelfAction::Stock { sku: *sku, qty: 5 })
                    .map_err(|e| e.to_string())?;
            }
            Ok(())
        })
        .unwrap();
    let recorder = EventRecorder::attach(&events);

    store.send(ShelfAction::Stock { sku: "tea", qty: 1 }).unwrap();
    store.send(ShelfAction::Sell { sku: "tea" }).unwrap();

    assert_eq!(store.state(|s| s.qty("tea")), 5);
    // Nested publish runs inside the outer dispatch, before the recorder's turn
    assert_eq!(
        recorder.names(),
        vec!["shelf.stock:change", "shelf.sale:change", "shelf.stock:change", "shelf:empty"]
    );
}

#[test]
fn failing_handler_does_not_block_later_ones() {
    let (store, events) = shelf();
    events.on("shelf.stock:change", |_| Err("display offline".into())).unwrap();
    let recorder = EventRecorder::attach(&events);

    store.send(ShelfAction::Stock { sku: "tea", qty: 1 }).unwrap();

    assert_eq!(recorder.count("shelf.stock:change"), 1);
}

#[test]
fn rejection_reports_reducer_error() {
    let (store, events) = shelf();
    let recorder = EventRecorder::attach(&events);

    let error = store.send(ShelfAction::Sell { sku: "tea" }).unwrap_err();

    match error {
        StoreError::Rejected(message) => assert_eq!(message, "tea is out of stock"),
        StoreError::Busy => panic!("expected a rejection"),
    }
    assert!(recorder.events().is_empty());
}

#[test]
fn actions_without_effects_publish_nothing() {
    let (store, events) = shelf();
    let recorder = EventRecorder::attach(&events);

    store.send(ShelfAction::Audit).unwrap();

    assert_eq!(store.state(|s| s.audits), 1);
    assert!(recorder.events().is_empty());
}
