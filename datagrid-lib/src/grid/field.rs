//! Debounced input fields.

use std::sync::Arc;
use std::time::Duration;

use crate::debounce::{Debouncer, Subscription};
use crate::error::DebounceError;

/// Where a field's settled values go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Handed to a caller-supplied callback (server-side mode).
    Delegated,
    /// Applied to the local table model (client-side mode).
    Local,
}

/// An input whose raw value updates immediately and whose settled value
/// propagates after the debounce window.
///
/// The raw value is what the input widget shows while the user types. The
/// propagation target is chosen once, at construction: the delegate
/// callback if one is given, otherwise the local apply function.
pub struct DebouncedField<V> {
    raw: V,
    debouncer: Debouncer<V>,
    propagation: Propagation,
    _subscription: Subscription,
}

impl<V> DebouncedField<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a field that delegates to `delegate` when present and
    /// otherwise calls `apply`.
    pub fn new<F>(
        initial: V,
        window: Duration,
        delegate: Option<Arc<dyn Fn(&V) + Send + Sync>>,
        apply: F,
    ) -> Result<Self, DebounceError>
    where
        F: Fn(&V) + Send + Sync + 'static,
    {
        let debouncer = Debouncer::new(initial.clone(), window)?;
        let (propagation, subscription) = match delegate {
            Some(delegate) => (
                Propagation::Delegated,
                debouncer.subscribe(move |value: &V| delegate(value)),
            ),
            None => (Propagation::Local, debouncer.subscribe(apply)),
        };
        Ok(Self {
            raw: initial,
            debouncer,
            propagation,
            _subscription: subscription,
        })
    }

    /// The value as last entered.
    pub fn raw(&self) -> &V {
        &self.raw
    }

    /// The value that was last propagated.
    pub fn stable(&self) -> V {
        self.debouncer.current_stable()
    }

    /// Replaces the raw value and restarts the debounce window.
    pub fn set(&mut self, value: V) {
        self.raw = value.clone();
        self.debouncer.observe(value);
    }

    /// Edits the raw value in place and restarts the debounce window.
    pub fn update(&mut self, edit: impl FnOnce(&mut V)) {
        edit(&mut self.raw);
        self.debouncer.observe(self.raw.clone());
    }

    /// Propagates the raw value now instead of waiting out the window.
    pub fn flush(&self) {
        self.debouncer.flush();
    }

    /// `true` while an entered value is waiting to propagate.
    pub fn is_settling(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn propagation(&self) -> Propagation {
        self.propagation
    }

    /// Stops propagation; a value still waiting is dropped.
    pub fn teardown(&self) {
        self.debouncer.teardown();
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for DebouncedField<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebouncedField")
            .field("raw", &self.raw)
            .field("propagation", &self.propagation)
            .field("debouncer", &self.debouncer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_delegate_wins_over_apply() {
        let delegated = Arc::new(Mutex::new(Vec::new()));
        let applied = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&delegated);
        let delegate: Arc<dyn Fn(&String) + Send + Sync> =
            Arc::new(move |v: &String| sink.lock().unwrap().push(v.clone()));
        let sink = Arc::clone(&applied);
        let mut field = DebouncedField::new(
            String::new(),
            Duration::from_millis(300),
            Some(delegate),
            move |v: &String| sink.lock().unwrap().push(v.clone()),
        )
        .unwrap();
        assert_eq!(field.propagation(), Propagation::Delegated);

        field.set("abc".into());
        assert_eq!(field.raw(), "abc");
        assert!(field.is_settling());

        tokio::time::sleep(Duration::from_millis(301)).await;
        assert_eq!(*delegated.lock().unwrap(), vec!["abc".to_string()]);
        assert!(applied.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_local_apply() {
        let applied = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&applied);
        let mut field = DebouncedField::new(
            Vec::<String>::new(),
            Duration::from_millis(300),
            None,
            move |v: &Vec<String>| sink.lock().unwrap().push(v.len()),
        )
        .unwrap();
        assert_eq!(field.propagation(), Propagation::Local);

        field.update(|v| v.push("a".into()));
        field.update(|v| v.push("b".into()));
        field.flush();
        assert_eq!(*applied.lock().unwrap(), vec![2]);
        assert_eq!(field.stable().len(), 2);
    }
}
