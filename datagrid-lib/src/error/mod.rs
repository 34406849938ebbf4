//! Error types

mod action;
mod config;
mod debounce;
mod filter;
mod model;
mod pagination;

pub use action::*;
pub use config::*;
pub use debounce::*;
pub use filter::*;
pub use model::*;
pub use pagination::*;

/// Any error produced by the grid library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Debouncer construction failed.
    #[error(transparent)]
    Debounce(#[from] DebounceError),

    /// Invalid pagination descriptor or request.
    #[error(transparent)]
    Pagination(#[from] PaginationError),

    /// Invalid filter value.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Table model rejected an operation.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Bulk action could not run or failed.
    #[error(transparent)]
    Action(#[from] ActionError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
