//! Query descriptors exchanged with the data source.
//!
//! These are the values a grid emits (page requests, sort order, search and
//! filter parameters) and the pagination descriptor it receives back.

mod filter;
mod order;
mod page;
mod search;

pub use filter::{DATE_FORMAT, DateRange, FilterState, parse_date};
pub use order::{Direction, SortKey, Sorting};
pub use page::{DEFAULT_PAGE_SIZE, PageRequest, Pagination};
pub use search::SearchQuery;
