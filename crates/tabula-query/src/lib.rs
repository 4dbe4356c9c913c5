//! Derived views over a row collection.
//!
//! Everything here is a pure function of the rows, the visible columns and
//! a [`QueryState`]: filter, then stable sort, then paginate.

mod engine;
mod state;

pub use engine::{Page, compare_rows, filter, last_page, paginate, query, sort};
pub use state::{DEFAULT_PAGE_SIZE, QueryState, SortOrder};
