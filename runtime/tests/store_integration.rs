//! Integration tests for Store snapshot publication and notification delivery

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use order_desk_core::environment::NotificationSink;
use order_desk_core::{effect::Effect, reducer::Reducer, smallvec, Notification, SmallVec};
use order_desk_runtime::{Store, StoreError, ToastQueue};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
struct ShelfState {
    items: Vec<String>,
}

#[derive(Debug, Clone)]
enum ShelfAction {
    Stock(String),
    Explode,
}

struct ShelfReducer;

impl Reducer for ShelfReducer {
    type State = ShelfState;
    type Action = ShelfAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ShelfAction::Stock(item) => {
                state.items.push(item.clone());
                smallvec![Effect::Notify(Notification::success("Stocked", item))]
            },
            ShelfAction::Explode => panic!("reducer failure"),
        }
    }
}

type ShelfStore = Store<ShelfState, ShelfAction, (), ShelfReducer>;

/// Sink that reads the store while handling a notification
struct ReentrantSink {
    store: OnceLock<Arc<ShelfStore>>,
    seen: Mutex<Vec<usize>>,
}

impl NotificationSink for ReentrantSink {
    fn notify(&self, _notification: Notification) {
        if let Some(store) = self.store.get() {
            let count = store.state(|s| s.items.len());
            self.seen.lock().unwrap().push(count);
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("order_desk_runtime=trace")
        .try_init();
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn sink_sees_the_committed_snapshot() {
    init_tracing();
    let sink = Arc::new(ReentrantSink {
        store: OnceLock::new(),
        seen: Mutex::new(Vec::new()),
    });
    let store = Arc::new(Store::with_sink(
        ShelfState::default(),
        ShelfReducer,
        (),
        sink.clone(),
    ));
    let _ = sink.store.set(Arc::clone(&store));

    store.send(ShelfAction::Stock("bolts".into())).unwrap();
    store.send(ShelfAction::Stock("nuts".into())).unwrap();

    assert_eq!(*sink.seen.lock().unwrap(), vec![1, 2]);
}

#[test]
fn concurrent_senders_are_serialized() {
    init_tracing();
    let toasts = ToastQueue::new(64);
    let store = Arc::new(Store::with_sink(
        ShelfState::default(),
        ShelfReducer,
        (),
        Arc::new(toasts.clone()),
    ));

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for n in 0..10 {
                    store
                        .send(ShelfAction::Stock(format!("{worker}-{n}")))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.state(|s| s.items.len()), 40);
    assert_eq!(toasts.len(), 40);
}

#[test]
fn panicking_reducer_poisons_the_store() {
    init_tracing();
    let store = Arc::new(Store::new(ShelfState::default(), ShelfReducer, ()));
    store.send(ShelfAction::Stock("washers".into())).unwrap();

    let crashed = {
        let store = Arc::clone(&store);
        thread::spawn(move || store.send(ShelfAction::Explode)).join()
    };
    assert!(crashed.is_err());

    assert_eq!(
        store.send(ShelfAction::Stock("gears".into())).err(),
        Some(StoreError::Poisoned)
    );
    // The last published snapshot is still readable
    assert_eq!(store.snapshot().items, vec!["washers".to_string()]);
}
