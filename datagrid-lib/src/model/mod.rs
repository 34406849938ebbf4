//! In-memory table model for client-side mode.
//!
//! Rows are typed records; columns read cells out of them through accessor
//! closures. The model owns the view state (search, column filters, sort,
//! page, selection, column visibility) and derives the visible rows from it.

mod column;
mod selection;
mod table;
mod value;

pub use column::{ColumnDef, ColumnInfo};
pub use selection::{Selection, SelectionMode};
pub use table::TableModel;
pub use value::CellValue;
