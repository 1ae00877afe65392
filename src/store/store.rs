//! The store: owner of the current snapshot.

use crate::core::{Action, ActionHistory, ActionRecord, DispatchRecord, Reducer, Snapshot};
use crate::error::{ActionError, StoreError};
use crate::store::config::StoreConfig;
use chrono::Utc;
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type Listener = Arc<dyn Fn() + Send + Sync>;

struct Shared<S, A> {
    // Serializes dispatches. The flag is raised while the reducer runs.
    gate: ReentrantMutex<Cell<bool>>,
    state: RwLock<Arc<S>>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener: AtomicU64,
    history: Mutex<ActionHistory>,
    reducer: Box<dyn Reducer<S, A>>,
    config: StoreConfig,
}

trait ListenerRegistry: Send + Sync {
    fn remove(&self, id: u64) -> bool;
}

impl<S: Snapshot, A: Action> ListenerRegistry for Shared<S, A> {
    fn remove(&self, id: u64) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        before != listeners.len()
    }
}

struct ReducingFlag<'a>(&'a Cell<bool>);

impl<'a> ReducingFlag<'a> {
    fn raise(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for ReducingFlag<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Handle returned by [`Store::subscribe`] that removes its listener.
pub struct Subscription {
    id: u64,
    registry: Weak<dyn ListenerRegistry>,
}

impl Subscription {
    /// Remove the listener this subscription registered.
    ///
    /// Returns `false` if it was already removed or the store is gone.
    /// A notification pass already in progress still calls the listener.
    pub fn unsubscribe(&self) -> bool {
        let removed = self
            .registry
            .upgrade()
            .is_some_and(|registry| registry.remove(self.id));
        tracing::trace!(listener = self.id, removed, "unsubscribe");
        removed
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

/// Holds a single immutable snapshot, applies actions through a reducer
/// and notifies listeners after each change.
///
/// `Store` is a cheap handle; clones share the same snapshot. Dispatches
/// are serialized: read, reduce, swap and notify form one critical
/// section. Reading the state never waits on a reducer.
///
/// # Example
///
/// ```rust
/// use unistore::core::fallible;
/// use unistore::regions::{counter_reducer, Counter, CounterAction, Counters};
/// use unistore::store::Store;
///
/// let store = Store::new(
///     Counters::new(vec![Counter::new(1, 0), Counter::new(2, 0)]),
///     fallible(counter_reducer),
/// );
///
/// store.dispatch(CounterAction::Increment { id: 1 }).unwrap();
/// assert_eq!(store.get_state().get(1), Some(&Counter::new(1, 1)));
/// ```
pub struct Store<S, A> {
    shared: Arc<Shared<S, A>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: Snapshot, A: Action> Store<S, A> {
    /// Create a store with default configuration.
    pub fn new<R>(initial: S, reducer: R) -> Self
    where
        R: Reducer<S, A> + 'static,
    {
        Self::with_config(initial, reducer, StoreConfig::default())
    }

    pub fn with_config<R>(initial: S, reducer: R, config: StoreConfig) -> Self
    where
        R: Reducer<S, A> + 'static,
    {
        Self::from_parts(initial, Box::new(reducer), config)
    }

    pub(crate) fn from_parts(
        initial: S,
        reducer: Box<dyn Reducer<S, A>>,
        config: StoreConfig,
    ) -> Self {
        let history = match config.history_limit {
            Some(limit) => ActionHistory::bounded(limit),
            None => ActionHistory::new(),
        };

        Self {
            shared: Arc::new(Shared {
                gate: ReentrantMutex::new(Cell::new(false)),
                state: RwLock::new(Arc::new(initial)),
                listeners: Mutex::new(Vec::new()),
                next_listener: AtomicU64::new(0),
                history: Mutex::new(history),
                reducer,
                config,
            }),
        }
    }

    /// Current snapshot.
    pub fn get_state(&self) -> Arc<S> {
        Arc::clone(&*self.shared.state.read())
    }

    /// Apply `action` and notify listeners if the snapshot changed.
    ///
    /// Fails with [`StoreError::ReentrantDispatch`] when called from inside
    /// a reducer of this store, and with [`StoreError::Reducer`] when the
    /// reducer fails. The snapshot is unchanged in both cases. Listeners
    /// may dispatch; those nested dispatches run before this call returns.
    pub fn dispatch(&self, action: A) -> Result<(), StoreError> {
        let kind = action.kind();
        let gate = self.shared.gate.lock();
        if gate.get() {
            tracing::warn!(kind = %kind, "dispatch from inside a reducer rejected");
            return Err(StoreError::ReentrantDispatch { kind });
        }

        let current = self.get_state();
        let next = {
            let _reducing = ReducingFlag::raise(&gate);
            self.shared.reducer.reduce(current.as_ref(), &action)?
        };

        let changed = next != *current;
        if changed {
            *self.shared.state.write() = Arc::new(next);
        }
        self.record(&kind, changed);

        if changed || self.shared.config.notify_unchanged {
            self.notify(&kind, changed);
        } else {
            tracing::debug!(kind = %kind, changed, "dispatch");
        }
        Ok(())
    }

    /// Register a listener, called with no arguments after each change.
    ///
    /// Listeners are called in registration order and are expected to read
    /// the state themselves.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.shared.next_listener.fetch_add(1, Ordering::Relaxed);
        self.shared.listeners.lock().push((id, Arc::new(listener)));
        tracing::trace!(listener = id, "subscribe");

        let registry: Arc<dyn ListenerRegistry> = self.shared.clone();
        Subscription {
            id,
            registry: Arc::downgrade(&registry),
        }
    }

    /// Dispatch history recorded so far.
    pub fn history(&self) -> ActionHistory {
        self.shared.history.lock().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.shared.listeners.lock().len()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.shared.config
    }

    fn record(&self, kind: &str, changed: bool) {
        if !self.shared.config.record_history {
            return;
        }
        self.shared.history.lock().push(DispatchRecord {
            kind: kind.to_string(),
            timestamp: Utc::now(),
            changed,
        });
    }

    fn notify(&self, kind: &str, changed: bool) {
        // Listeners added or removed during this pass do not affect it.
        let listeners: Vec<Listener> = self
            .shared
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        tracing::debug!(kind = %kind, changed, listeners = listeners.len(), "dispatch");
        for listener in &listeners {
            listener();
        }
    }
}

impl<S, A> Store<S, A>
where
    S: Snapshot,
    A: Action + TryFrom<ActionRecord, Error = ActionError>,
{
    /// Normalize an untyped record and dispatch it.
    pub fn dispatch_record(&self, record: ActionRecord) -> Result<(), StoreError> {
        let action = A::try_from(record)?;
        self.dispatch(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fallible;
    use crate::error::ReduceError;
    use std::sync::atomic::AtomicUsize;
    use std::sync::OnceLock;

    #[derive(Clone, Debug)]
    enum TestAction {
        Add(i64),
        Noop,
    }

    impl Action for TestAction {
        fn kind(&self) -> String {
            match self {
                Self::Add(_) => "test/add".to_string(),
                Self::Noop => "test/noop".to_string(),
            }
        }
    }

    fn reducer(total: &i64, action: &TestAction) -> i64 {
        match action {
            TestAction::Add(n) => total + n,
            TestAction::Noop => *total,
        }
    }

    fn counting_listener(store: &Store<i64, TestAction>) -> (Arc<AtomicUsize>, Subscription) {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let subscription = store.subscribe(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (calls, subscription)
    }

    #[test]
    fn get_state_returns_initial_snapshot() {
        let store = Store::new(7, reducer);
        assert_eq!(*store.get_state(), 7);
    }

    #[test]
    fn dispatch_replaces_snapshot() {
        let store = Store::new(0, reducer);
        let before = store.get_state();

        store.dispatch(TestAction::Add(2)).unwrap();

        assert_eq!(*store.get_state(), 2);
        assert_eq!(*before, 0);
    }

    #[test]
    fn listeners_run_once_per_change_in_registration_order() {
        let store = Store::new(0, reducer);
        let order = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            store.subscribe(move || order.lock().push(name));
        }

        store.dispatch(TestAction::Add(1)).unwrap();
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn identity_transition_does_not_notify_by_default() {
        let store = Store::new(0, reducer);
        let (calls, _subscription) = counting_listener(&store);

        store.dispatch(TestAction::Noop).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn identity_transition_notifies_when_configured() {
        let config = StoreConfig {
            notify_unchanged: true,
            ..StoreConfig::default()
        };
        let store = Store::with_config(0, reducer, config);
        let (calls, _subscription) = counting_listener(&store);

        store.dispatch(TestAction::Noop).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_stops_future_notifications() {
        let store = Store::new(0, reducer);
        let (calls, subscription) = counting_listener(&store);

        store.dispatch(TestAction::Add(1)).unwrap();
        assert!(subscription.unsubscribe());
        store.dispatch(TestAction::Add(1)).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!subscription.unsubscribe());
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn unsubscribe_during_fan_out_does_not_skip_collected_listeners() {
        let store = Store::new(0, reducer);
        let later: Arc<OnceLock<Subscription>> = Arc::new(OnceLock::new());

        let handle = Arc::clone(&later);
        store.subscribe(move || {
            if let Some(subscription) = handle.get() {
                subscription.unsubscribe();
            }
        });
        let (calls, subscription) = counting_listener(&store);
        let _ = later.set(subscription);

        store.dispatch(TestAction::Add(1)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        store.dispatch(TestAction::Add(1)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn subscribe_during_fan_out_waits_for_next_pass() {
        let store = Store::new(0, reducer);
        let calls = Arc::new(AtomicUsize::new(0));

        let inner_store = store.clone();
        let inner_calls = Arc::clone(&calls);
        let subscribed = Arc::new(AtomicUsize::new(0));
        let once = Arc::clone(&subscribed);
        store.subscribe(move || {
            if once.fetch_add(1, Ordering::SeqCst) == 0 {
                let calls = Arc::clone(&inner_calls);
                inner_store.subscribe(move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                });
            }
        });

        store.dispatch(TestAction::Add(1)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        store.dispatch(TestAction::Add(1)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failing_reducer_leaves_snapshot_unchanged() {
        let store: Store<i64, TestAction> = Store::new(
            1,
            fallible(|total: &i64, action: &TestAction| match action {
                TestAction::Add(n) if *n < 0 => Err(ReduceError::new("total", "negative")),
                other => Ok(reducer(total, other)),
            }),
        );
        let (calls, _subscription) = counting_listener(&store);

        let result = store.dispatch(TestAction::Add(-5));

        assert!(matches!(result, Err(StoreError::Reducer(_))));
        assert_eq!(*store.get_state(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dispatch_from_reducer_is_rejected() {
        let slot: Arc<OnceLock<Store<i64, TestAction>>> = Arc::new(OnceLock::new());
        let rejected = Arc::new(AtomicUsize::new(0));

        let inner = Arc::clone(&slot);
        let seen = Arc::clone(&rejected);
        let store = Store::new(0, move |total: &i64, action: &TestAction| {
            if let Some(store) = inner.get() {
                if let Err(StoreError::ReentrantDispatch { .. }) = store.dispatch(TestAction::Noop)
                {
                    seen.fetch_add(1, Ordering::SeqCst);
                }
            }
            reducer(total, action)
        });
        let _ = slot.set(store.clone());

        store.dispatch(TestAction::Add(3)).unwrap();

        assert_eq!(rejected.load(Ordering::SeqCst), 1);
        assert_eq!(*store.get_state(), 3);
        assert_eq!(store.history().kinds(), vec!["test/add"]);
    }

    #[test]
    fn listener_may_dispatch() {
        let store = Store::new(0, reducer);
        let inner = store.clone();
        store.subscribe(move || {
            if *inner.get_state() == 1 {
                inner.dispatch(TestAction::Add(10)).unwrap();
            }
        });

        store.dispatch(TestAction::Add(1)).unwrap();
        assert_eq!(*store.get_state(), 11);
    }

    #[test]
    fn history_records_each_dispatch() {
        let store = Store::new(0, reducer);

        store.dispatch(TestAction::Add(1)).unwrap();
        store.dispatch(TestAction::Noop).unwrap();

        let history = store.history();
        assert_eq!(history.kinds(), vec!["test/add", "test/noop"]);
        assert_eq!(history.changes(), 1);
    }

    #[test]
    fn history_keeps_the_most_recent_dispatches() {
        let config = StoreConfig {
            history_limit: Some(3),
            ..StoreConfig::default()
        };
        let store = Store::with_config(0, reducer, config);

        for n in 1..=5 {
            store.dispatch(TestAction::Add(n)).unwrap();
        }
        store.dispatch(TestAction::Noop).unwrap();

        let history = store.history();
        assert_eq!(history.kinds(), vec!["test/add", "test/add", "test/noop"]);
        assert_eq!(history.changes(), 2);
    }

    #[test]
    fn history_can_be_disabled() {
        let config = StoreConfig {
            record_history: false,
            ..StoreConfig::default()
        };
        let store = Store::with_config(0, reducer, config);

        store.dispatch(TestAction::Add(1)).unwrap();
        assert!(store.history().is_empty());
    }

    #[test]
    fn concurrent_dispatches_are_serialized() {
        let store = Store::new(0, reducer);
        let (calls, _subscription) = counting_listener(&store);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        store.dispatch(TestAction::Add(1)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(*store.get_state(), 400);
        assert_eq!(calls.load(Ordering::SeqCst), 400);
    }
}
