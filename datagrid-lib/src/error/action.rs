//! Bulk action error types

/// Errors from the bulk-action confirmation flow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// Nothing is selected, so there is nothing to act on.
    #[error("no rows selected")]
    EmptySelection,

    /// A previous invocation is still running.
    #[error("bulk action already in progress")]
    Busy,

    /// The confirmation surface is not open.
    #[error("confirmation dialog is not open")]
    NotOpen,

    /// The action itself rejected.
    #[error("bulk action failed: {0}")]
    Failed(String),
}

impl ActionError {
    /// Creates a failure from any displayable error.
    pub fn failed(err: impl std::fmt::Display) -> Self {
        Self::Failed(err.to_string())
    }
}
