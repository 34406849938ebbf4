//! The grid controller.

use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, warn};

use super::callbacks::GridCallbacks;
use super::field::DebouncedField;
use crate::action::BulkActionDialog;
use crate::config::GridConfig;
use crate::error::{ActionError, Error, ModelError};
use crate::model::{ColumnInfo, TableModel};
use crate::query::{DateRange, FilterState, PageRequest, Pagination, SearchQuery, SortKey, Sorting};

/// How a grid pages its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridMode {
    /// Every row is loaded and the model cuts pages.
    Client,
    /// The data source pages; holds the descriptor of the loaded page.
    Server(Pagination),
}

/// State of one data grid instance.
///
/// Search and column filters go through debounced fields: the raw input is
/// available immediately for display, the settled value goes to the
/// `on_search`/`on_filter` callback when one was supplied, or to the table
/// model otherwise. Sorting is not debounced and goes to `on_sort_change`
/// or to the model the same way. In client-side mode a page change always
/// moves the model and is also reported to `on_page_change`.
///
/// In server-side mode the caller supplies the [`Pagination`] descriptor
/// with every page of rows it loads. The grid never edits it; page changes
/// are emitted as zero-based `(page_index, page_size)`.
///
/// Must be created inside a tokio runtime, which runs the debounce timers.
///
/// # Example
///
/// ```
/// use datagrid_lib::GridConfig;
/// use datagrid_lib::grid::{DataGrid, GridCallbacks};
/// use datagrid_lib::model::{ColumnDef, TableModel};
///
/// #[derive(Clone)]
/// struct User {
///     id: String,
///     name: String,
/// }
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), datagrid_lib::Error> {
/// let model = TableModel::new(
///     vec![ColumnDef::new("name", "Name", |u: &User| u.name.clone().into())],
///     |u: &User| u.id.clone(),
/// );
/// let mut grid = DataGrid::new(model, &GridConfig::default(), GridCallbacks::new())?;
/// grid.set_rows(vec![User { id: "1".into(), name: "Ann".into() }]);
///
/// grid.set_search_text("an");
/// grid.flush();
/// assert_eq!(grid.page_rows().len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct DataGrid<T> {
    model: TableModel<T>,
    callbacks: GridCallbacks,
    search: DebouncedField<SearchQuery>,
    filters: DebouncedField<FilterState>,
    sorting: Sorting,
    mode: GridMode,
    bulk_action: Option<BulkActionDialog>,
    page_size_options: Vec<usize>,
}

impl<T> DataGrid<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates a grid over `model`.
    pub fn new(
        model: TableModel<T>,
        config: &GridConfig,
        callbacks: GridCallbacks,
    ) -> Result<Self, Error> {
        config.validate()?;
        model.set_page(PageRequest::new(0, config.page_size)?);

        let searchable: Vec<String> = model
            .columns()
            .into_iter()
            .filter(|c| c.searchable)
            .map(|c| c.id)
            .collect();
        let search_delegate = callbacks.on_search.clone().map(|on_search| {
            Arc::new(move |query: &SearchQuery| {
                // an empty selection means every searchable column
                let columns: &[String] = if query.columns.is_empty() {
                    &searchable
                } else {
                    &query.columns
                };
                on_search(query.text.as_str(), columns);
            }) as Arc<dyn Fn(&SearchQuery) + Send + Sync>
        });
        let local = model.clone();
        let search = DebouncedField::new(
            SearchQuery::default(),
            config.debounce(),
            search_delegate,
            move |query: &SearchQuery| {
                if let Err(err) = local.set_global_filter(query.clone()) {
                    warn!("DataGrid: search not applied: {err}");
                }
            },
        )?;

        let filter_delegate = callbacks.on_filter.clone().map(|on_filter| {
            Arc::new(move |filters: &FilterState| on_filter(&filters.to_params()))
                as Arc<dyn Fn(&FilterState) + Send + Sync>
        });
        let local = model.clone();
        let filters = DebouncedField::new(
            FilterState::default(),
            config.debounce(),
            filter_delegate,
            move |filters: &FilterState| {
                if let Err(err) = local.set_column_filters(filters.clone()) {
                    warn!("DataGrid: filters not applied: {err}");
                }
            },
        )?;

        Ok(Self {
            sorting: model.sorting(),
            model,
            callbacks,
            search,
            filters,
            mode: GridMode::Client,
            bulk_action: None,
            page_size_options: config.page_size_options.clone(),
        })
    }

    /// Switches to server-side paging with the descriptor for the first
    /// loaded page.
    pub fn with_server_pagination(mut self, pagination: Pagination) -> Self {
        self.mode = GridMode::Server(pagination);
        self
    }

    /// Attaches a bulk action to the selection.
    pub fn with_bulk_action(mut self, dialog: BulkActionDialog) -> Self {
        self.bulk_action = Some(dialog);
        self
    }

    pub fn model(&self) -> &TableModel<T> {
        &self.model
    }

    pub fn callbacks(&self) -> &GridCallbacks {
        &self.callbacks
    }

    /// Whether paging is driven by the data source.
    pub fn is_server_side(&self) -> bool {
        matches!(self.mode, GridMode::Server(_))
    }

    pub fn mode(&self) -> GridMode {
        self.mode
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Loads rows: the whole data set in client-side mode, the current
    /// page in server-side mode.
    pub fn set_rows(&self, rows: Vec<T>) {
        self.model.set_rows(rows);
    }

    /// Loads a page of rows with the descriptor the data source returned.
    pub fn set_server_page(&mut self, rows: Vec<T>, pagination: Pagination) {
        self.model.set_rows(rows);
        self.mode = GridMode::Server(pagination);
    }

    /// Replaces the server-side pagination descriptor.
    pub fn set_server_pagination(&mut self, pagination: Pagination) {
        self.mode = GridMode::Server(pagination);
    }

    /// Rows to render.
    pub fn page_rows(&self) -> Vec<T> {
        if self.is_server_side() {
            self.model.filtered_rows()
        } else {
            self.model.page_rows()
        }
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    /// Search box keystroke.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.search.update(|query| query.text = text);
    }

    /// Restricts search to `columns`; an empty list searches every
    /// searchable column.
    pub fn set_search_columns<I, S>(&mut self, columns: I) -> Result<(), ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let known = self.model.columns();
        for column in &columns {
            if !known.iter().any(|c| &c.id == column && c.searchable) {
                return Err(ModelError::UnknownColumn(column.clone()));
            }
        }
        self.search.update(|query| query.columns = columns);
        Ok(())
    }

    /// The search as typed, before it settles.
    pub fn search_input(&self) -> &SearchQuery {
        self.search.raw()
    }

    /// Columns a user can pick for search.
    pub fn search_column_options(&self) -> Vec<ColumnInfo> {
        self.model
            .columns()
            .into_iter()
            .filter(|c| c.searchable)
            .collect()
    }

    pub fn search_field(&self) -> &DebouncedField<SearchQuery> {
        &self.search
    }

    // -------------------------------------------------------------------------
    // Filters
    // -------------------------------------------------------------------------

    fn filterable_column(&self, column_id: &str) -> Result<(), ModelError> {
        let column = self
            .model
            .columns()
            .into_iter()
            .find(|c| c.id == column_id)
            .ok_or_else(|| ModelError::UnknownColumn(column_id.to_string()))?;
        if !column.filterable {
            return Err(ModelError::Unsupported {
                column: column_id.to_string(),
                operation: "filtering",
            });
        }
        Ok(())
    }

    /// Text filter edit; an empty value removes the filter.
    pub fn set_text_filter(&mut self, column_id: &str, value: impl Into<String>) -> Result<(), Error> {
        self.filterable_column(column_id)?;
        let value = value.into();
        self.filters.update(|filters| filters.set_text(column_id, value));
        Ok(())
    }

    /// Date range edit; two missing bounds remove the filter.
    pub fn set_date_filter(
        &mut self,
        column_id: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<(), Error> {
        self.filterable_column(column_id)?;
        let range = DateRange::new(from, to)?;
        self.filters
            .update(|filters| filters.set_date_range(column_id, range));
        Ok(())
    }

    pub fn remove_filter(&mut self, column_id: &str) {
        self.filters.update(|filters| filters.remove(column_id));
    }

    /// Resets every column filter.
    pub fn clear_filters(&mut self) {
        self.filters.update(FilterState::clear);
    }

    /// Filters as edited, before they settle.
    pub fn filter_input(&self) -> &FilterState {
        self.filters.raw()
    }

    pub fn filter_field(&self) -> &DebouncedField<FilterState> {
        &self.filters
    }

    /// Propagates pending search and filter input right away.
    pub fn flush(&self) {
        self.search.flush();
        self.filters.flush();
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    pub fn sorting(&self) -> &Sorting {
        &self.sorting
    }

    /// Header click. `multi` keeps the other sort keys.
    pub fn toggle_sort(&mut self, column_id: &str, multi: bool) -> Result<(), ModelError> {
        let mut sorting = self.sorting.clone();
        if multi {
            sorting.toggle_multi(column_id);
        } else {
            sorting.toggle(column_id);
        }
        self.set_sorting(sorting)
    }

    /// Replaces the sort order and emits it whole.
    pub fn set_sorting(&mut self, sorting: Sorting) -> Result<(), ModelError> {
        let columns = self.model.columns();
        for key in sorting.keys() {
            let column = columns
                .iter()
                .find(|c| c.id == key.column_id)
                .ok_or_else(|| ModelError::UnknownColumn(key.column_id.clone()))?;
            if !column.sortable {
                return Err(ModelError::Unsupported {
                    column: key.column_id.clone(),
                    operation: "sorting",
                });
            }
        }

        match &self.callbacks.on_sort_change {
            Some(on_sort_change) => {
                let keys: &[SortKey] = sorting.keys();
                on_sort_change(keys);
            }
            None => self.model.set_sorting(sorting.clone())?,
        }
        self.sorting = sorting;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    /// Current pagination: the server's descriptor, or one derived from the
    /// model.
    pub fn pagination(&self) -> Pagination {
        match self.mode {
            GridMode::Server(pagination) => pagination,
            GridMode::Client => self.model.pagination(),
        }
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    fn request_page(&self, request: Option<PageRequest>) -> bool {
        let Some(request) = request else {
            return false;
        };
        debug!(
            "DataGrid: page {} ({} rows) requested",
            request.display_page(),
            request.page_size()
        );
        // client-side paging always moves the model; the callback only observes
        let callback = self.callbacks.on_page_change.as_ref();
        if self.mode == GridMode::Client || callback.is_none() {
            self.model.set_page(request);
        }
        if let Some(on_page_change) = callback {
            let (page_index, page_size) = request.as_tuple();
            on_page_change(page_index, page_size);
        }
        true
    }

    /// Moves to a one-based `page`, clamped to the page count. Returns
    /// whether a page change was requested.
    pub fn go_to_page(&self, page: usize) -> bool {
        self.request_page(self.pagination().go_to(page))
    }

    pub fn first_page(&self) -> bool {
        self.request_page(self.pagination().first())
    }

    pub fn previous_page(&self) -> bool {
        self.request_page(self.pagination().previous())
    }

    pub fn next_page(&self) -> bool {
        self.request_page(self.pagination().next())
    }

    pub fn last_page(&self) -> bool {
        self.request_page(self.pagination().last())
    }

    /// Changes the page size, staying on the page holding the current top
    /// row.
    pub fn set_page_size(&self, page_size: usize) -> Result<(), Error> {
        let request = self.pagination().resize(page_size)?;
        self.request_page(Some(request));
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Columns and selection
    // -------------------------------------------------------------------------

    /// Entries for the column visibility menu.
    pub fn column_options(&self) -> Vec<ColumnInfo> {
        self.model
            .columns()
            .into_iter()
            .filter(|c| c.hideable)
            .collect()
    }

    /// Toggles a column from the visibility menu. Returns its new
    /// visibility.
    pub fn toggle_column(&self, column_id: &str) -> Result<bool, ModelError> {
        self.model.toggle_column_visibility(column_id)
    }

    pub fn visible_columns(&self) -> Vec<ColumnInfo> {
        self.model.visible_columns()
    }

    /// Selects a row; in single-selection mode this replaces the selection.
    pub fn select_row(&self, id: &str) {
        self.model.select_row(id);
    }

    pub fn deselect_row(&self, id: &str) {
        self.model.deselect_row(id);
    }

    pub fn toggle_row(&self, id: &str) -> bool {
        self.model.toggle_row(id)
    }

    pub fn toggle_all_page_rows(&self) -> bool {
        self.model.toggle_all_page_rows()
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.model.selected_ids()
    }

    /// Footer text for the selection.
    ///
    /// In server-side mode the total is the data source's item count.
    pub fn selection_summary(&self) -> String {
        match self.mode {
            GridMode::Server(pagination) => format!(
                "{} of {} row(s) selected.",
                self.model.selected_count(),
                pagination.total_items()
            ),
            GridMode::Client => self.model.selection_summary(),
        }
    }

    // -------------------------------------------------------------------------
    // Bulk action
    // -------------------------------------------------------------------------

    pub fn bulk_action(&self) -> Option<&BulkActionDialog> {
        self.bulk_action.as_ref()
    }

    /// Whether the bulk action trigger is enabled.
    pub fn can_trigger_bulk_action(&self) -> bool {
        self.bulk_action
            .as_ref()
            .is_some_and(|dialog| dialog.can_trigger(&self.model))
    }

    /// Opens the bulk action confirmation.
    pub fn open_bulk_action(&self) -> Result<(), Error> {
        match &self.bulk_action {
            Some(dialog) => Ok(dialog.open(&self.model)?),
            None => Err(ActionError::NotOpen.into()),
        }
    }

    /// Confirms the bulk action on the selected rows.
    pub async fn confirm_bulk_action(&self) -> Result<(), Error> {
        match &self.bulk_action {
            Some(dialog) => Ok(dialog.confirm(&self.model).await?),
            None => Err(ActionError::NotOpen.into()),
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Stops all pending propagation. Also happens on drop.
    pub fn teardown(&self) {
        self.search.teardown();
        self.filters.teardown();
    }
}

impl<T> std::fmt::Debug for DataGrid<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataGrid")
            .field("callbacks", &self.callbacks)
            .field("search", &self.search)
            .field("filters", &self.filters)
            .field("sorting", &self.sorting)
            .field("mode", &self.mode)
            .finish()
    }
}
