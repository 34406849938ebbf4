//! Table model error types

/// Errors raised by the client-side table model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// An operation referenced a column the table does not define.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// The column exists but does not allow the requested operation.
    #[error("column '{column}' does not support {operation}")]
    Unsupported {
        /// Column id.
        column: String,
        /// The refused operation (e.g. "sorting", "hiding").
        operation: &'static str,
    },
}
