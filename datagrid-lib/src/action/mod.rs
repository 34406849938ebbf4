//! Bulk actions on selected rows.

mod bulk;

pub use bulk::{BoxError, BulkAction, BulkActionDialog, SelectionSource};
