//! Integration tests for the container binding protocol.
//!
//! Uses a recording presenter so the order of lifecycle calls, and what the
//! store looked like at each call, can be asserted from outside the crate.

use std::sync::{Arc, Mutex};

use holdover_core::{
    Container, ContainerPhase, NoopView, Presenter, ProgressView, RetentionKey, RetentionStore,
};

/// Recording implementation of Presenter for testing.
///
/// Records every lifecycle call along with whether the store still held the
/// presenter's key at that moment.
struct RecordingPresenter {
    key: RetentionKey,
    store: RetentionStore,
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingPresenter {
    fn record(&self, call: &str) {
        let retained = if self.store.contains(&self.key) {
            "retained"
        } else {
            "released"
        };
        self.calls
            .lock()
            .unwrap()
            .push(format!("{call}:{retained}"));
    }
}

impl Presenter for RecordingPresenter {
    fn bind_view(&self, _view: Arc<dyn ProgressView>) {
        self.record("bind");
    }

    fn unbind_view(&self) {
        self.record("unbind");
    }

    fn destroy(&self) {
        self.record("destroy");
    }

    fn on_trigger_action(&self) {
        self.record("trigger");
    }
}

struct Harness {
    store: RetentionStore,
    key: RetentionKey,
    calls: Arc<Mutex<Vec<String>>>,
    created: Arc<Mutex<usize>>,
}

impl Harness {
    fn new() -> Self {
        Self {
            store: RetentionStore::new(),
            key: RetentionKey::new("settings-screen"),
            calls: Arc::new(Mutex::new(Vec::new())),
            created: Arc::new(Mutex::new(0)),
        }
    }

    fn container(&self) -> Container<RecordingPresenter> {
        let key = self.key.clone();
        let store = self.store.clone();
        let calls = Arc::clone(&self.calls);
        let created = Arc::clone(&self.created);
        Container::new(self.store.clone(), self.key.clone(), move || {
            *created.lock().unwrap() += 1;
            Arc::new(RecordingPresenter {
                key: key.clone(),
                store: store.clone(),
                calls: Arc::clone(&calls),
            })
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn created(&self) -> usize {
        *self.created.lock().unwrap()
    }
}

fn view() -> Arc<dyn ProgressView> {
    Arc::new(NoopView::new())
}

#[test]
fn test_final_teardown_order() {
    let harness = Harness::new();
    let mut container = harness.container();

    container.on_attached(view());
    container.on_detached();
    container.on_destroyed();

    // Destroy runs while the entry is still registered; removal comes after
    assert_eq!(
        harness.calls(),
        vec!["bind:retained", "unbind:retained", "destroy:retained"]
    );
    assert!(!harness.store.contains(&harness.key));
    assert_eq!(container.phase(), ContainerPhase::Destroyed);
}

#[test]
fn test_transient_teardown_keeps_entry() {
    let harness = Harness::new();

    let mut first = harness.container();
    first.on_attached(view());
    first.on_save_state();
    first.on_detached();
    first.on_destroyed();

    let mut second = harness.container();
    second.on_attached(view());

    assert_eq!(harness.created(), 1);
    assert_eq!(
        harness.calls(),
        vec!["bind:retained", "unbind:retained", "bind:retained"]
    );
}

#[test]
fn test_many_transient_cycles_then_final() {
    let harness = Harness::new();

    for _ in 0..3 {
        let mut container = harness.container();
        container.on_attached(view());
        container.on_save_state();
        container.on_detached();
        container.on_destroyed();
    }

    let mut last = harness.container();
    last.on_attached(view());
    last.on_detached();
    last.on_destroyed();

    assert_eq!(harness.created(), 1);
    let destroys = harness
        .calls()
        .iter()
        .filter(|c| c.starts_with("destroy"))
        .count();
    assert_eq!(destroys, 1);
    assert!(harness.store.is_empty());
}

#[test]
fn test_final_cycles_create_fresh_presenters() {
    let harness = Harness::new();

    for _ in 0..2 {
        let mut container = harness.container();
        container.on_attached(view());
        container.on_destroyed();
    }

    assert_eq!(harness.created(), 2);
}

#[test]
fn test_trigger_is_forwarded_only_while_bound() {
    let harness = Harness::new();
    let mut container = harness.container();

    container.on_attached(view());
    container.on_trigger_action();
    container.on_detached();
    container.on_trigger_action();

    let triggers = harness
        .calls()
        .iter()
        .filter(|c| c.starts_with("trigger"))
        .count();
    assert_eq!(triggers, 1);
}

#[test]
fn test_independent_keys_do_not_interfere() {
    let store = RetentionStore::new();
    let calls = Arc::new(Mutex::new(Vec::new()));

    let make = |name: &str| {
        let key = RetentionKey::new(name);
        let store_for_presenter = store.clone();
        let calls = Arc::clone(&calls);
        let presenter_key = key.clone();
        Container::new(store.clone(), key, move || {
            Arc::new(RecordingPresenter {
                key: presenter_key.clone(),
                store: store_for_presenter.clone(),
                calls: Arc::clone(&calls),
            })
        })
    };

    let mut left = make("left");
    let mut right = make("right");
    left.on_attached(view());
    right.on_attached(view());

    left.on_destroyed();

    assert!(!store.contains(&RetentionKey::new("left")));
    assert!(store.contains(&RetentionKey::new("right")));
    assert_eq!(right.phase(), ContainerPhase::Attached);
}
