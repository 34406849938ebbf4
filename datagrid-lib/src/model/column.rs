//! Column definitions.

use std::sync::Arc;

use super::value::CellValue;
use crate::query::Direction;

type Accessor<T> = Arc<dyn Fn(&T) -> CellValue + Send + Sync>;

/// Column definition for rows of type `T`.
///
/// Every feature is enabled by default; switch features off per column.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::ColumnDef;
///
/// struct User {
///     name: String,
///     email: String,
/// }
///
/// let columns = vec![
///     ColumnDef::new("name", "Name", |u: &User| u.name.clone().into()),
///     ColumnDef::new("email", "Email", |u: &User| u.email.clone().into()).hideable(false),
/// ];
/// assert_eq!(columns[1].id(), "email");
/// ```
pub struct ColumnDef<T> {
    id: String,
    header: String,
    accessor: Accessor<T>,
    sortable: bool,
    hideable: bool,
    searchable: bool,
    filterable: bool,
}

impl<T> ColumnDef<T> {
    /// Creates a column reading its cells with `accessor`.
    pub fn new<F>(id: impl Into<String>, header: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            header: header.into(),
            accessor: Arc::new(accessor),
            sortable: true,
            hideable: true,
            searchable: true,
            filterable: true,
        }
    }

    /// Enables or disables sorting by this column.
    pub fn sortable(mut self, enabled: bool) -> Self {
        self.sortable = enabled;
        self
    }

    /// Enables or disables hiding this column from the view menu.
    pub fn hideable(mut self, enabled: bool) -> Self {
        self.hideable = enabled;
        self
    }

    /// Enables or disables free-text search on this column.
    pub fn searchable(mut self, enabled: bool) -> Self {
        self.searchable = enabled;
        self
    }

    /// Enables or disables column filters on this column.
    pub fn filterable(mut self, enabled: bool) -> Self {
        self.filterable = enabled;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_hideable(&self) -> bool {
        self.hideable
    }

    pub fn is_searchable(&self) -> bool {
        self.searchable
    }

    pub fn is_filterable(&self) -> bool {
        self.filterable
    }

    /// Reads this column's cell from `row`.
    pub fn value(&self, row: &T) -> CellValue {
        (self.accessor)(row)
    }
}

impl<T> Clone for ColumnDef<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: Arc::clone(&self.accessor),
            sortable: self.sortable,
            hideable: self.hideable,
            searchable: self.searchable,
            filterable: self.filterable,
        }
    }
}

impl<T> std::fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("hideable", &self.hideable)
            .field("searchable", &self.searchable)
            .field("filterable", &self.filterable)
            .finish()
    }
}

/// Snapshot of a column's header state, for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub id: String,
    pub header: String,
    pub visible: bool,
    pub sortable: bool,
    pub hideable: bool,
    pub searchable: bool,
    pub filterable: bool,
    /// Current sort direction, if the column is sorted.
    pub sort: Option<Direction>,
}
