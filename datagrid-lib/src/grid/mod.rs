//! Grid controller.
//!
//! [`DataGrid`] is the per-instance state behind a rendered data grid: the
//! table model, debounced search and filter inputs, sort and page state,
//! the column visibility menu and an optional bulk action. Each input is
//! either delegated to a callback (server-side) or applied to the model
//! (client-side), depending on which callbacks were supplied.

mod callbacks;
mod data_grid;
mod field;

pub use callbacks::{FilterFn, GridCallbacks, PageChangeFn, SearchFn, SortChangeFn};
pub use data_grid::{DataGrid, GridMode};
pub use field::{DebouncedField, Propagation};
