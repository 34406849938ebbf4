//! Debouncer error types

/// Errors raised when creating a debouncer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DebounceError {
    /// The debouncer was created outside of a tokio runtime.
    #[error("no tokio runtime available to schedule debounce timers")]
    NoRuntime,
}
