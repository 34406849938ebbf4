//! Pagination descriptor and page requests.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::PaginationError;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Pagination state reported by the data source.
///
/// Pages are one-based here, as a backend reports them. The grid only reads
/// this descriptor; page changes travel the other way as [`PageRequest`]s,
/// which are zero-based.
///
/// # Example
///
/// ```
/// use datagrid_lib::query::Pagination;
///
/// let pagination = Pagination::from_totals(2, 10, 95).unwrap();
/// assert_eq!(pagination.total_pages(), 10);
/// assert_eq!(pagination.page_index(), 1);
/// assert_eq!(pagination.next().map(|r| r.page_index()), Some(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPagination")]
pub struct Pagination {
    page: usize,
    page_size: usize,
    total_items: usize,
    total_pages: usize,
    has_next_page: bool,
    has_previous_page: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPagination {
    page: usize,
    page_size: usize,
    total_items: usize,
    total_pages: usize,
    has_next_page: bool,
    has_previous_page: bool,
}

impl TryFrom<RawPagination> for Pagination {
    type Error = PaginationError;

    fn try_from(raw: RawPagination) -> Result<Self, Self::Error> {
        Pagination::new(
            raw.page,
            raw.page_size,
            raw.total_items,
            raw.total_pages,
            raw.has_next_page,
            raw.has_previous_page,
        )
    }
}

impl Pagination {
    /// Creates a descriptor from values supplied by the data source.
    ///
    /// Only `page >= 1` and `page_size > 0` are checked; the totals and
    /// flags are taken as reported.
    pub fn new(
        page: usize,
        page_size: usize,
        total_items: usize,
        total_pages: usize,
        has_next_page: bool,
        has_previous_page: bool,
    ) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::InvalidPage(page));
        }
        if page_size == 0 {
            return Err(PaginationError::InvalidPageSize(page_size));
        }
        Ok(Self {
            page,
            page_size,
            total_items,
            total_pages,
            has_next_page,
            has_previous_page,
        })
    }

    /// Derives page count and navigation flags from an item total.
    pub fn from_totals(
        page: usize,
        page_size: usize,
        total_items: usize,
    ) -> Result<Self, PaginationError> {
        if page_size == 0 {
            return Err(PaginationError::InvalidPageSize(page_size));
        }
        let total_pages = total_items.div_ceil(page_size);
        Self::new(
            page,
            page_size,
            total_items,
            total_pages,
            page < total_pages,
            page > 1,
        )
    }

    /// Descriptor for `request` over `total_items` rows.
    pub(crate) fn for_request(request: PageRequest, total_items: usize) -> Self {
        let page = request.display_page();
        let total_pages = total_items.div_ceil(request.page_size());
        Self {
            page,
            page_size: request.page_size(),
            total_items,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        }
    }

    /// Current page, one-based.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Current page, zero-based.
    pub fn page_index(&self) -> usize {
        self.page - 1
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    pub fn has_previous_page(&self) -> bool {
        self.has_previous_page
    }

    /// The request that would load the current page.
    pub fn current(&self) -> PageRequest {
        PageRequest {
            page_index: self.page_index(),
            page_size: self.page_size,
        }
    }

    /// Request for the first page, unless already there.
    pub fn first(&self) -> Option<PageRequest> {
        (self.page > 1).then(|| self.request(0))
    }

    /// Request for the previous page, if there is one.
    pub fn previous(&self) -> Option<PageRequest> {
        self.has_previous_page
            .then(|| self.request(self.page_index().saturating_sub(1)))
    }

    /// Request for the next page, if there is one.
    pub fn next(&self) -> Option<PageRequest> {
        self.has_next_page.then(|| self.request(self.page_index() + 1))
    }

    /// Request for the last page, unless already there.
    pub fn last(&self) -> Option<PageRequest> {
        (self.total_pages > 0 && self.page < self.total_pages)
            .then(|| self.request(self.total_pages - 1))
    }

    /// Request for a one-based `page`, clamped to the known page count.
    ///
    /// Returns `None` if the clamped page is the current one.
    pub fn go_to(&self, page: usize) -> Option<PageRequest> {
        let last = self.total_pages.max(1);
        let target = page.clamp(1, last);
        (target != self.page).then(|| self.request(target - 1))
    }

    /// Request for a new page size that keeps the first visible row on
    /// screen.
    pub fn resize(&self, page_size: usize) -> Result<PageRequest, PaginationError> {
        self.current().with_page_size(page_size)
    }

    /// One-based positions of the items on this page, e.g. `11..=20`.
    ///
    /// `None` when the page is past the end of the data.
    pub fn item_range(&self) -> Option<RangeInclusive<usize>> {
        let offset = self.page_index().checked_mul(self.page_size)?;
        if offset >= self.total_items {
            return None;
        }
        let end = offset.saturating_add(self.page_size).min(self.total_items);
        Some(offset + 1..=end)
    }

    /// Text for a page indicator: `Page 2 of 10`.
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page, self.total_pages)
    }

    fn request(&self, page_index: usize) -> PageRequest {
        PageRequest {
            page_index,
            page_size: self.page_size,
        }
    }
}

/// A zero-based page change request, emitted as `(page_index, page_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    page_index: usize,
    page_size: usize,
}

impl PageRequest {
    /// Creates a request for a zero-based page index.
    pub fn new(page_index: usize, page_size: usize) -> Result<Self, PaginationError> {
        if page_size == 0 {
            return Err(PaginationError::InvalidPageSize(page_size));
        }
        Ok(Self {
            page_index,
            page_size,
        })
    }

    /// Creates a request for a one-based page number.
    pub fn from_page(page: usize, page_size: usize) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::InvalidPage(page));
        }
        Self::new(page - 1, page_size)
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The one-based page a user would see for this request.
    pub fn display_page(&self) -> usize {
        self.page_index.saturating_add(1)
    }

    /// Index of the first row on this page, saturating at `usize::MAX`.
    pub fn offset(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }

    /// The same position with another page index.
    pub fn with_page_index(self, page_index: usize) -> Self {
        Self { page_index, ..self }
    }

    /// Changes the page size, moving to the page that contains the row
    /// currently at the top.
    pub fn with_page_size(self, page_size: usize) -> Result<Self, PaginationError> {
        if page_size == 0 {
            return Err(PaginationError::InvalidPageSize(page_size));
        }
        Ok(Self {
            page_index: self.offset() / page_size,
            page_size,
        })
    }

    /// The `(page_index, page_size)` pair handed to page-change callbacks.
    pub fn as_tuple(&self) -> (usize, usize) {
        (self.page_index, self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
