//! Filter, sort and paginate.

use std::cmp::Ordering;

use tracing::trace;

use tabula_model::{CellValue, ColumnName, Row};

use crate::state::{QueryState, SortOrder};

/// One window of the derived view.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    pub items: Vec<&'a Row>,
    /// Number of rows that passed the filter, before pagination.
    pub total_count: usize,
    /// Page actually returned, after clamping.
    pub page: usize,
    pub page_size: usize,
}

impl Page<'_> {
    pub fn page_count(&self) -> usize {
        self.total_count.div_ceil(self.page_size)
    }
}

/// Runs the full pipeline: filter, stable sort, paginate.
///
/// `page` is clamped to the last page that has rows, so a stale cursor never
/// yields an empty window while rows exist. A `page_size` of zero is
/// treated as one.
pub fn query<'a>(
    rows: &'a [Row],
    visible_columns: &[ColumnName],
    state: &QueryState,
    page: usize,
    page_size: usize,
) -> Page<'a> {
    let mut matched = filter(rows, visible_columns, &state.search_term);
    if let Some(column) = &state.sort_by {
        sort(&mut matched, column.as_str(), state.sort_order);
    }
    let page_size = page_size.max(1);
    let total_count = matched.len();
    let page = page.min(last_page(total_count, page_size));
    trace!(
        total = rows.len(),
        matched = total_count,
        page,
        page_size,
        "query evaluated"
    );
    Page {
        items: paginate(&matched, page, page_size).to_vec(),
        total_count,
        page,
        page_size,
    }
}

/// Rows where any visible field contains `term`, ignoring case.
///
/// An empty term keeps every row. Store order is preserved.
pub fn filter<'a>(rows: &'a [Row], visible_columns: &[ColumnName], term: &str) -> Vec<&'a Row> {
    if term.is_empty() {
        return rows.iter().collect();
    }
    let needle = term.to_lowercase();
    rows.iter()
        .filter(|row| {
            visible_columns.iter().any(|column| {
                row.display(column.as_str())
                    .to_lowercase()
                    .contains(&needle)
            })
        })
        .collect()
}

/// Stable sort by one column.
///
/// Direction is applied to the comparator so that equal keys keep their
/// relative order in both directions.
pub fn sort(rows: &mut [&Row], column: &str, order: SortOrder) {
    rows.sort_by(|a, b| {
        let ordering = compare_rows(a, b, column);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Natural ordering of two rows on `column`.
///
/// Blank cells sort first. Two numeric values compare numerically and two
/// other values compare as strings. A numeric value sorts before a
/// non-numeric one, which keeps the order total for mixed columns.
pub fn compare_rows(a: &Row, b: &Row, column: &str) -> Ordering {
    compare_cells(a.get(column), b.get(column))
}

static EMPTY: CellValue = CellValue::Empty;

fn compare_cells(a: Option<&CellValue>, b: Option<&CellValue>) -> Ordering {
    let a = a.unwrap_or(&EMPTY);
    let b = b.unwrap_or(&EMPTY);
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.display().cmp(&b.display()),
    }
}

/// Slice `[page * page_size, page * page_size + page_size)`, clipped.
pub fn paginate<'s, T>(items: &'s [T], page: usize, page_size: usize) -> &'s [T] {
    let start = page.saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Last page index holding rows; zero for an empty sequence.
pub fn last_page(total_count: usize, page_size: usize) -> usize {
    total_count.saturating_sub(1) / page_size.max(1)
}
