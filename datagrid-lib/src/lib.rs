//! Data grid state engine
//!
//! Headless state behind an interactive data grid: debounced search and
//! filter input, sort and pagination descriptors, row selection and a
//! selection-gated bulk action. Rendering is left to the caller.
//!
//! A grid runs in client-side mode, where settled input is applied to an
//! in-memory [`TableModel`](model::TableModel), or in server-side mode,
//! where it is handed to callbacks that fetch data from elsewhere.

pub mod action;
pub mod config;
pub mod debounce;
pub mod error;
pub mod grid;
pub mod model;
pub mod query;

pub use config::GridConfig;
pub use error::Error;
pub use grid::{DataGrid, GridCallbacks, GridMode};
