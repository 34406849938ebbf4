//! Trailing-edge debouncer backed by tokio timers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use log::debug;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::subscription::{Listeners, Subscription, Unsubscribe};
use crate::error::DebounceError;

/// Quiescence window used when none is configured.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(300);

/// Delays values until they have been stable for a fixed window.
///
/// Every [`observe`](Self::observe) replaces the pending value and restarts
/// the countdown, cancelling the previous one. Only a countdown that runs to
/// completion promotes its value to the stable value and notifies
/// subscribers, so a burst of observations produces exactly one
/// notification carrying the last value of the burst.
///
/// The debouncer is torn down on drop; a value still pending at that point
/// is discarded.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use datagrid_lib::debounce::Debouncer;
///
/// # #[tokio::main(flavor = "current_thread", start_paused = true)]
/// # async fn main() -> Result<(), datagrid_lib::error::DebounceError> {
/// let search = Debouncer::new(String::new(), Duration::from_millis(300))?;
/// let _subscription = search.subscribe(|text: &String| println!("search for {text}"));
///
/// search.observe("a".to_string());
/// search.observe("ab".to_string());
/// assert_eq!(search.current_stable(), "");
///
/// tokio::time::sleep(Duration::from_millis(301)).await;
/// assert_eq!(search.current_stable(), "ab");
/// # Ok(())
/// # }
/// ```
pub struct Debouncer<V> {
    shared: Arc<Shared<V>>,
    handle: Handle,
    window: Duration,
}

struct Shared<V> {
    state: Mutex<State<V>>,
    listeners: Listeners<V>,
}

struct State<V> {
    stable: V,
    pending: Option<V>,
    /// Bumped on every observe, flush and teardown. A timer only settles if
    /// the generation it was started with is still current.
    generation: u64,
    timer: Option<JoinHandle<()>>,
    torn_down: bool,
}

impl<V> State<V> {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl<V> Shared<V> {
    fn lock(&self) -> MutexGuard<'_, State<V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone> Shared<V> {
    /// Promotes the pending value if the timer for `generation` survived.
    fn settle(&self, generation: u64) {
        let value = {
            let mut state = self.lock();
            if state.torn_down || state.generation != generation {
                return;
            }
            state.timer = None;
            let Some(value) = state.pending.take() else {
                return;
            };
            state.stable = value.clone();
            value
        };
        self.listeners.notify(&value, &|| self.is_live());
    }

    fn is_live(&self) -> bool {
        !self.lock().torn_down
    }
}

impl<V: Send + 'static> Unsubscribe for Shared<V> {
    fn unsubscribe(&self, id: u64) {
        self.listeners.remove(id);
    }
}

impl<V> Debouncer<V>
where
    V: Clone + Send + 'static,
{
    /// Creates a debouncer on the current tokio runtime.
    ///
    /// Returns [`DebounceError::NoRuntime`] when called outside a runtime.
    pub fn new(initial: V, window: Duration) -> Result<Self, DebounceError> {
        let handle = Handle::try_current().map_err(|_| DebounceError::NoRuntime)?;
        Ok(Self::with_handle(initial, window, handle))
    }

    /// Creates a debouncer with the default 300 ms window.
    pub fn with_default_window(initial: V) -> Result<Self, DebounceError> {
        Self::new(initial, DEFAULT_WINDOW)
    }

    /// Creates a debouncer whose timers are spawned on `handle`.
    pub fn with_handle(initial: V, window: Duration, handle: Handle) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    stable: initial,
                    pending: None,
                    generation: 0,
                    timer: None,
                    torn_down: false,
                }),
                listeners: Listeners::new(),
            }),
            handle,
            window,
        }
    }

    /// Records `value` as pending and restarts the countdown.
    ///
    /// Equal values still restart the countdown. Ignored after teardown.
    pub fn observe(&self, value: V) {
        let mut state = self.shared.lock();
        if state.torn_down {
            debug!("Debouncer: observe after teardown ignored");
            return;
        }

        state.cancel_timer();
        state.generation = state.generation.wrapping_add(1);
        state.pending = Some(value);

        let generation = state.generation;
        let window = self.window;
        let shared: Weak<Shared<V>> = Arc::downgrade(&self.shared);
        state.timer = Some(self.handle.spawn(async move {
            tokio::time::sleep(window).await;
            if let Some(shared) = shared.upgrade() {
                shared.settle(generation);
            }
        }));
    }

    /// Returns the last value that survived a full window, or the initial
    /// value if none has yet.
    pub fn current_stable(&self) -> V {
        self.shared.lock().stable.clone()
    }

    /// Returns the value waiting for its window to elapse, if any.
    pub fn pending(&self) -> Option<V> {
        self.shared.lock().pending.clone()
    }

    /// Promotes the pending value immediately and notifies subscribers.
    ///
    /// Does nothing when no value is pending or after teardown.
    pub fn flush(&self) {
        let value = {
            let mut state = self.shared.lock();
            if state.torn_down {
                return;
            }
            let Some(value) = state.pending.take() else {
                return;
            };
            state.cancel_timer();
            state.generation = state.generation.wrapping_add(1);
            state.stable = value.clone();
            value
        };
        let shared = &self.shared;
        shared.listeners.notify(&value, &|| shared.is_live());
    }

    /// Registers `callback` to run once for every settled value.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&V) + Send + Sync + 'static,
    {
        let id = self.shared.listeners.add(Arc::new(callback));
        let shared: Weak<Shared<V>> = Arc::downgrade(&self.shared);
        let owner: Weak<dyn Unsubscribe> = shared;
        Subscription::new(id, owner)
    }
}

impl<V> Debouncer<V> {
    /// Cancels any pending countdown and stops all further propagation.
    ///
    /// The pending value, if any, is discarded. Idempotent.
    pub fn teardown(&self) {
        let mut state = self.shared.lock();
        if state.torn_down {
            return;
        }
        state.torn_down = true;
        state.cancel_timer();
        state.generation = state.generation.wrapping_add(1);
        if state.pending.take().is_some() {
            debug!("Debouncer: teardown discarded a pending value");
        }
    }

    /// Returns the quiescence window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns `true` while a countdown is running.
    pub fn is_pending(&self) -> bool {
        self.shared.lock().pending.is_some()
    }

    /// Returns `true` once [`teardown`](Self::teardown) has run.
    pub fn is_torn_down(&self) -> bool {
        self.shared.lock().torn_down
    }

    /// Returns the number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.shared.listeners.len()
    }
}

impl<V> Drop for Debouncer<V> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for Debouncer<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.lock();
        f.debug_struct("Debouncer")
            .field("window", &self.window)
            .field("stable", &state.stable)
            .field("pending", &state.pending)
            .field("torn_down", &state.torn_down)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&String) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |value: &String| {
            sink.lock().unwrap().push(value.clone())
        })
    }

    #[test]
    fn test_new_outside_runtime_fails() {
        let result = Debouncer::new(String::new(), DEFAULT_WINDOW);
        assert_eq!(result.err(), Some(DebounceError::NoRuntime));
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_value_is_stable() {
        let debouncer = Debouncer::with_default_window("initial".to_string()).unwrap();
        assert_eq!(debouncer.current_stable(), "initial");
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.window(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_then_stable() {
        let debouncer = Debouncer::new(String::new(), Duration::from_millis(300)).unwrap();
        debouncer.observe("x".to_string());
        assert_eq!(debouncer.pending().as_deref(), Some("x"));
        assert_eq!(debouncer.current_stable(), "");

        tokio::time::sleep(Duration::from_millis(301)).await;
        assert_eq!(debouncer.pending(), None);
        assert_eq!(debouncer.current_stable(), "x");
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_promotes_immediately() {
        let debouncer = Debouncer::new(String::new(), Duration::from_millis(300)).unwrap();
        let (seen, callback) = recorder();
        debouncer.subscribe(callback).detach();

        debouncer.observe("now".to_string());
        debouncer.flush();
        assert_eq!(debouncer.current_stable(), "now");
        assert_eq!(*seen.lock().unwrap(), vec!["now".to_string()]);

        // the cancelled timer must not deliver a second time
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_without_pending_is_noop() {
        let debouncer = Debouncer::new(1u32, Duration::from_millis(300)).unwrap();
        debouncer.flush();
        assert_eq!(debouncer.current_stable(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_subscription_not_notified() {
        let debouncer = Debouncer::new(String::new(), Duration::from_millis(300)).unwrap();
        let (seen, callback) = recorder();
        let subscription = debouncer.subscribe(callback);
        assert_eq!(debouncer.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(debouncer.subscriber_count(), 0);

        debouncer.observe("ignored".to_string());
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(debouncer.current_stable(), "ignored");
    }

    #[tokio::test(start_paused = true)]
    async fn test_observe_after_teardown_ignored() {
        let debouncer = Debouncer::new(0u32, Duration::from_millis(300)).unwrap();
        debouncer.teardown();
        debouncer.observe(7);
        assert!(!debouncer.is_pending());
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(debouncer.current_stable(), 0);
        assert!(debouncer.is_torn_down());
    }
}
