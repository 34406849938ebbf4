//! Callbacks through which a server-side grid delegates its state.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::query::SortKey;

/// Receives `(page_index, page_size)`, zero-based.
pub type PageChangeFn = Arc<dyn Fn(usize, usize) + Send + Sync>;
/// Receives the whole sort order.
pub type SortChangeFn = Arc<dyn Fn(&[SortKey]) + Send + Sync>;
/// Receives `(search_text, active_column_ids)` once typing settles.
pub type SearchFn = Arc<dyn Fn(&str, &[String]) + Send + Sync>;
/// Receives flattened filter parameters once editing settles.
pub type FilterFn = Arc<dyn Fn(&BTreeMap<String, String>) + Send + Sync>;

/// Optional delegation callbacks.
///
/// A missing callback means the grid handles that concern itself by
/// applying it to its table model.
///
/// # Example
///
/// ```
/// use datagrid_lib::grid::GridCallbacks;
///
/// let callbacks = GridCallbacks::new()
///     .on_page_change(|index, size| println!("fetch page {index} ({size} rows)"))
///     .on_search(|text, columns| println!("search '{text}' in {columns:?}"));
/// assert!(callbacks.delegates_search());
/// assert!(!callbacks.delegates_filters());
/// ```
#[derive(Clone, Default)]
pub struct GridCallbacks {
    pub(crate) on_page_change: Option<PageChangeFn>,
    pub(crate) on_sort_change: Option<SortChangeFn>,
    pub(crate) on_search: Option<SearchFn>,
    pub(crate) on_filter: Option<FilterFn>,
}

impl GridCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delegates page changes.
    pub fn on_page_change(mut self, f: impl Fn(usize, usize) + Send + Sync + 'static) -> Self {
        self.on_page_change = Some(Arc::new(f));
        self
    }

    /// Delegates sort changes.
    pub fn on_sort_change(mut self, f: impl Fn(&[SortKey]) + Send + Sync + 'static) -> Self {
        self.on_sort_change = Some(Arc::new(f));
        self
    }

    /// Delegates search.
    pub fn on_search(mut self, f: impl Fn(&str, &[String]) + Send + Sync + 'static) -> Self {
        self.on_search = Some(Arc::new(f));
        self
    }

    /// Delegates column filters.
    pub fn on_filter(
        mut self,
        f: impl Fn(&BTreeMap<String, String>) + Send + Sync + 'static,
    ) -> Self {
        self.on_filter = Some(Arc::new(f));
        self
    }

    pub fn delegates_paging(&self) -> bool {
        self.on_page_change.is_some()
    }

    pub fn delegates_sorting(&self) -> bool {
        self.on_sort_change.is_some()
    }

    pub fn delegates_search(&self) -> bool {
        self.on_search.is_some()
    }

    pub fn delegates_filters(&self) -> bool {
        self.on_filter.is_some()
    }
}

impl std::fmt::Debug for GridCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridCallbacks")
            .field("on_page_change", &self.delegates_paging())
            .field("on_sort_change", &self.delegates_sorting())
            .field("on_search", &self.delegates_search())
            .field("on_filter", &self.delegates_filters())
            .finish()
    }
}
