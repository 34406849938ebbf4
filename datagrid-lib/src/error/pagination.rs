//! Pagination error types

/// Errors for malformed pagination descriptors and requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// Page numbers are one-based.
    #[error("invalid page {0}: pages start at 1")]
    InvalidPage(usize),

    /// Page size must be positive.
    #[error("invalid page size {0}: must be greater than 0")]
    InvalidPageSize(usize),
}
