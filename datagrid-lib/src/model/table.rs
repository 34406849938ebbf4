//! Client-side table model.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;

use super::column::{ColumnDef, ColumnInfo};
use super::selection::{Selection, SelectionMode};
use super::value::CellValue;
use crate::error::{ModelError, PaginationError};
use crate::query::{Direction, FilterState, PageRequest, Pagination, SearchQuery, Sorting};

type RowId<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// In-memory rows plus the view state applied to them.
///
/// Cheap to clone; clones share state, so a debounced field can hold one
/// clone and apply settled values while the grid reads through another.
///
/// Rows flow through search, column filters and sort, then are cut into
/// pages. Changing the search or filters returns to the first page.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::{ColumnDef, TableModel};
/// use datagrid_lib::query::SearchQuery;
///
/// #[derive(Clone)]
/// struct User {
///     id: u32,
///     name: String,
/// }
///
/// let table = TableModel::new(
///     vec![ColumnDef::new("name", "Name", |u: &User| u.name.clone().into())],
///     |u: &User| u.id.to_string(),
/// );
/// table.set_rows(vec![
///     User { id: 1, name: "Ann".into() },
///     User { id: 2, name: "Bob".into() },
/// ]);
///
/// table.set_global_filter(SearchQuery::new("an")).unwrap();
/// assert_eq!(table.filtered_count(), 1);
/// ```
pub struct TableModel<T> {
    inner: Arc<RwLock<TableInner<T>>>,
}

struct TableInner<T> {
    columns: Vec<ColumnDef<T>>,
    rows: Vec<T>,
    row_id: RowId<T>,
    hidden: HashSet<String>,
    search: SearchQuery,
    filters: FilterState,
    sorting: Sorting,
    page: PageRequest,
    selection: Selection,
    selection_mode: SelectionMode,
}

impl<T> Clone for TableModel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> TableInner<T> {
    fn column(&self, id: &str) -> Result<&ColumnDef<T>, ModelError> {
        self.columns
            .iter()
            .find(|column| column.id() == id)
            .ok_or_else(|| ModelError::UnknownColumn(id.to_string()))
    }

    fn info(&self, column: &ColumnDef<T>) -> ColumnInfo {
        ColumnInfo {
            id: column.id().to_string(),
            header: column.header().to_string(),
            visible: !self.hidden.contains(column.id()),
            sortable: column.is_sortable(),
            hideable: column.is_hideable(),
            searchable: column.is_searchable(),
            filterable: column.is_filterable(),
            sort: self.sorting.direction_of(column.id()),
        }
    }

    fn matches_search(&self, row: &T) -> bool {
        if self.search.is_blank() {
            return true;
        }
        self.columns
            .iter()
            .filter(|column| column.is_searchable() && self.search.covers(column.id()))
            .any(|column| self.search.matches(&column.value(row).to_string()))
    }

    fn matches_filters(&self, row: &T) -> bool {
        let text_ok = self.filters.text_filters().all(|(column_id, needle)| {
            self.column(column_id).is_ok_and(|column| {
                let needle = needle.to_lowercase();
                column.value(row).to_string().to_lowercase().contains(&needle)
            })
        });
        text_ok
            && self.filters.date_filters().all(|(column_id, range)| {
                self.column(column_id).is_ok_and(|column| {
                    column
                        .value(row)
                        .as_date()
                        .is_some_and(|date| range.contains(date))
                })
            })
    }

    fn compare_rows(&self, a: &T, b: &T) -> Ordering {
        for key in self.sorting.keys() {
            let Ok(column) = self.column(&key.column_id) else {
                continue;
            };
            let ordering = column.value(a).compare(&column.value(b));
            let ordering = match key.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Rows after search, filters and sort, as references into `rows`.
    fn processed(&self) -> Vec<&T> {
        let mut rows: Vec<&T> = self
            .rows
            .iter()
            .filter(|row| self.matches_search(row) && self.matches_filters(row))
            .collect();
        if !self.sorting.is_empty() {
            rows.sort_by(|a, b| self.compare_rows(a, b));
        }
        rows
    }

    /// The current page, clamped to the last page that has rows.
    fn effective_page(&self, total: usize) -> PageRequest {
        let size = self.page.page_size();
        let last_index = total.div_ceil(size).saturating_sub(1);
        self.page.with_page_index(self.page.page_index().min(last_index))
    }

    fn page_slice<'a>(&self, rows: &[&'a T]) -> Vec<&'a T> {
        let page = self.effective_page(rows.len());
        rows.iter()
            .skip(page.offset())
            .take(page.page_size())
            .copied()
            .collect()
    }

    fn reset_page(&mut self) {
        self.page = self.page.with_page_index(0);
    }
}

impl<T> TableModel<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an empty table.
    ///
    /// `row_id` extracts the stable identifier of a row; selection and bulk
    /// actions work on these identifiers.
    pub fn new<F>(columns: Vec<ColumnDef<T>>, row_id: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(RwLock::new(TableInner {
                columns,
                rows: Vec::new(),
                row_id: Arc::new(row_id),
                hidden: HashSet::new(),
                search: SearchQuery::default(),
                filters: FilterState::default(),
                sorting: Sorting::default(),
                page: PageRequest::default(),
                selection: Selection::new(),
                selection_mode: SelectionMode::default(),
            })),
        }
    }

    /// Sets the initial page size.
    pub fn with_page_size(self, page_size: usize) -> Result<Self, PaginationError> {
        self.set_page(PageRequest::new(0, page_size)?);
        Ok(self)
    }

    fn read(&self) -> RwLockReadGuard<'_, TableInner<T>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TableInner<T>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Replaces all rows.
    pub fn set_rows(&self, rows: Vec<T>) {
        let mut inner = self.write();
        debug!("TableModel: {} rows loaded", rows.len());
        inner.rows = rows;
    }

    /// All rows, unfiltered, in load order.
    pub fn rows(&self) -> Vec<T> {
        self.read().rows.clone()
    }

    pub fn row_count(&self) -> usize {
        self.read().rows.len()
    }

    /// Identifier of `row`.
    pub fn row_id(&self, row: &T) -> String {
        (self.read().row_id)(row)
    }

    /// Rows after search, filters and sort.
    pub fn filtered_rows(&self) -> Vec<T> {
        self.read().processed().into_iter().cloned().collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.read().processed().len()
    }

    /// Rows on the current page.
    pub fn page_rows(&self) -> Vec<T> {
        let inner = self.read();
        let rows = inner.processed();
        inner.page_slice(&rows).into_iter().cloned().collect()
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    /// Header state of every column, in definition order.
    pub fn columns(&self) -> Vec<ColumnInfo> {
        let inner = self.read();
        inner.columns.iter().map(|c| inner.info(c)).collect()
    }

    /// Header state of the visible columns.
    pub fn visible_columns(&self) -> Vec<ColumnInfo> {
        self.columns().into_iter().filter(|c| c.visible).collect()
    }

    /// Reads one cell, if `column_id` exists.
    pub fn cell(&self, row: &T, column_id: &str) -> Result<CellValue, ModelError> {
        Ok(self.read().column(column_id)?.value(row))
    }

    pub fn is_column_visible(&self, column_id: &str) -> bool {
        !self.read().hidden.contains(column_id)
    }

    /// Shows or hides a column.
    pub fn set_column_visibility(&self, column_id: &str, visible: bool) -> Result<(), ModelError> {
        let mut inner = self.write();
        let column = inner.column(column_id)?;
        if !visible && !column.is_hideable() {
            return Err(ModelError::Unsupported {
                column: column_id.to_string(),
                operation: "hiding",
            });
        }
        if visible {
            inner.hidden.remove(column_id);
        } else {
            inner.hidden.insert(column_id.to_string());
        }
        Ok(())
    }

    /// Flips a column's visibility. Returns the new visibility.
    pub fn toggle_column_visibility(&self, column_id: &str) -> Result<bool, ModelError> {
        let visible = !self.is_column_visible(column_id);
        self.set_column_visibility(column_id, visible)?;
        Ok(visible)
    }

    // -------------------------------------------------------------------------
    // Search, filters, sort
    // -------------------------------------------------------------------------

    /// Applies a free-text search and returns to the first page.
    pub fn set_global_filter(&self, search: SearchQuery) -> Result<(), ModelError> {
        let mut inner = self.write();
        for column_id in &search.columns {
            inner.column(column_id)?;
        }
        debug!(
            "TableModel: search '{}' on {:?}",
            search.text, search.columns
        );
        inner.search = search;
        inner.reset_page();
        Ok(())
    }

    pub fn global_filter(&self) -> SearchQuery {
        self.read().search.clone()
    }

    /// Replaces the column filters and returns to the first page.
    pub fn set_column_filters(&self, filters: FilterState) -> Result<(), ModelError> {
        let mut inner = self.write();
        for column_id in filters.columns() {
            let column = inner.column(column_id)?;
            if !column.is_filterable() {
                return Err(ModelError::Unsupported {
                    column: column_id.to_string(),
                    operation: "filtering",
                });
            }
        }
        debug!("TableModel: {} column filters applied", filters.len());
        inner.filters = filters;
        inner.reset_page();
        Ok(())
    }

    pub fn column_filters(&self) -> FilterState {
        self.read().filters.clone()
    }

    /// Replaces the sort order.
    pub fn set_sorting(&self, sorting: Sorting) -> Result<(), ModelError> {
        let mut inner = self.write();
        for key in sorting.keys() {
            let column = inner.column(&key.column_id)?;
            if !column.is_sortable() {
                return Err(ModelError::Unsupported {
                    column: key.column_id.clone(),
                    operation: "sorting",
                });
            }
        }
        inner.sorting = sorting;
        Ok(())
    }

    /// Header click on `column_id`; `multi` keeps the other sort keys.
    ///
    /// Returns the resulting sort order.
    pub fn toggle_sorting(&self, column_id: &str, multi: bool) -> Result<Sorting, ModelError> {
        let mut sorting = self.sorting();
        if multi {
            sorting.toggle_multi(column_id);
        } else {
            sorting.toggle(column_id);
        }
        self.set_sorting(sorting.clone())?;
        Ok(sorting)
    }

    pub fn sorting(&self) -> Sorting {
        self.read().sorting.clone()
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    pub fn set_page(&self, page: PageRequest) {
        self.write().page = page;
    }

    pub fn set_page_index(&self, page_index: usize) {
        let mut inner = self.write();
        inner.page = inner.page.with_page_index(page_index);
    }

    /// Changes the page size, keeping the top row of the current page
    /// visible.
    pub fn set_page_size(&self, page_size: usize) -> Result<PageRequest, PaginationError> {
        let mut inner = self.write();
        let total = inner.processed().len();
        let page = inner.effective_page(total).with_page_size(page_size)?;
        inner.page = page;
        Ok(page)
    }

    /// The requested page, before clamping to the data.
    pub fn page_request(&self) -> PageRequest {
        self.read().page
    }

    /// Pagination derived from the filtered rows.
    pub fn pagination(&self) -> Pagination {
        let inner = self.read();
        let total = inner.processed().len();
        Pagination::for_request(inner.effective_page(total), total)
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    pub fn set_selection_mode(&self, mode: SelectionMode) {
        let mut inner = self.write();
        inner.selection_mode = mode;
        match mode {
            SelectionMode::None => {
                inner.selection.clear();
            }
            SelectionMode::Single if inner.selection.len() > 1 => {
                inner.selection.clear();
            }
            _ => {}
        }
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.read().selection_mode
    }

    /// Selects `id`. In single mode this replaces the selection.
    pub fn select_row(&self, id: &str) {
        let mut inner = self.write();
        match inner.selection_mode {
            SelectionMode::None => {}
            SelectionMode::Single => inner.selection.select_only(id),
            SelectionMode::Multiple => {
                inner.selection.insert(id);
            }
        }
    }

    pub fn deselect_row(&self, id: &str) {
        self.write().selection.remove(id);
    }

    /// Checkbox click on a row. Returns whether the row is now selected.
    pub fn toggle_row(&self, id: &str) -> bool {
        let mut inner = self.write();
        match inner.selection_mode {
            SelectionMode::None => false,
            SelectionMode::Single if !inner.selection.is_selected(id) => {
                inner.selection.select_only(id);
                true
            }
            _ => inner.selection.toggle(id),
        }
    }

    pub fn is_row_selected(&self, id: &str) -> bool {
        self.read().selection.is_selected(id)
    }

    fn page_ids(inner: &TableInner<T>) -> Vec<String> {
        let rows = inner.processed();
        inner
            .page_slice(&rows)
            .into_iter()
            .map(|row| (inner.row_id)(row))
            .collect()
    }

    /// `true` when the page has rows and all of them are selected.
    pub fn is_all_page_rows_selected(&self) -> bool {
        let inner = self.read();
        let ids = Self::page_ids(&inner);
        !ids.is_empty() && ids.iter().all(|id| inner.selection.is_selected(id))
    }

    /// `true` when some but not all rows of the page are selected.
    pub fn is_some_page_rows_selected(&self) -> bool {
        let inner = self.read();
        let ids = Self::page_ids(&inner);
        let selected = ids
            .iter()
            .filter(|id| inner.selection.is_selected(id))
            .count();
        selected > 0 && selected < ids.len()
    }

    /// Header checkbox: selects every row on the page, or deselects them
    /// all if they already are. Returns whether the page is now selected.
    pub fn toggle_all_page_rows(&self) -> bool {
        let mut inner = self.write();
        if inner.selection_mode != SelectionMode::Multiple {
            return false;
        }
        let ids = Self::page_ids(&inner);
        if !ids.is_empty() && ids.iter().all(|id| inner.selection.is_selected(id)) {
            inner.selection.deselect_all(&ids);
            false
        } else {
            inner.selection.select_all(&ids);
            true
        }
    }

    /// Selects every row that passes the current search and filters.
    pub fn select_all_filtered(&self) {
        let mut inner = self.write();
        if inner.selection_mode != SelectionMode::Multiple {
            return;
        }
        let ids: Vec<String> = inner
            .processed()
            .into_iter()
            .map(|row| (inner.row_id)(row))
            .collect();
        inner.selection.select_all(&ids);
    }

    /// Clears the selection. Returns the ids that were selected.
    pub fn clear_selection(&self) -> Vec<String> {
        self.write().selection.clear()
    }

    /// Ids of selected rows, in row load order.
    ///
    /// Ids of rows no longer loaded are not reported.
    pub fn selected_ids(&self) -> Vec<String> {
        let inner = self.read();
        inner
            .rows
            .iter()
            .map(|row| (inner.row_id)(row))
            .filter(|id| inner.selection.is_selected(id))
            .collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected_ids().len()
    }

    /// Footer text: `2 of 40 row(s) selected.`
    pub fn selection_summary(&self) -> String {
        format!(
            "{} of {} row(s) selected.",
            self.selected_count(),
            self.filtered_count()
        )
    }
}
