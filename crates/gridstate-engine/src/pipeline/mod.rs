//! Local filter -> sort -> paginate pipeline
//!
//! Used when the grid owns its rows. The stages always run in that order and
//! never touch the network; the result is the visible page plus the
//! post-filter row total that pagination is computed against.

mod predicate;

use gridstate_core::value::{compare_values, lookup};
use gridstate_core::{ColumnSet, FilterClause, GridState, SortDirection, SortSpec};
use serde_json::Value;

pub use predicate::row_matches;

/// Visible rows and the filtered total they were cut from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOutput {
    pub rows: Vec<Value>,
    pub total: usize,
}

/// Run all three stages over `rows`
pub fn run(rows: &[Value], state: &GridState, columns: &ColumnSet) -> PipelineOutput {
    let mut filtered = filter_rows(rows, state.filters(), columns);
    sort_rows(&mut filtered, state.sort());

    let total = filtered.len();
    let page: Vec<Value> = paginate(&filtered, state.skip(), state.page_size())
        .iter()
        .map(|row| (*row).clone())
        .collect();

    tracing::trace!(
        input = rows.len(),
        total,
        visible = page.len(),
        page = state.page_number(),
        "Local pipeline ran"
    );

    PipelineOutput { rows: page, total }
}

/// Keep the rows matching every applicable clause
pub fn filter_rows<'a>(
    rows: &'a [Value],
    clauses: &[FilterClause],
    columns: &ColumnSet,
) -> Vec<&'a Value> {
    let active: Vec<_> = clauses
        .iter()
        .filter(|clause| clause.is_applicable())
        .map(|clause| (clause, clause.resolved_type(columns.filter_type_for(&clause.field))))
        .collect();

    rows.iter()
        .filter(|row| {
            active
                .iter()
                .all(|(clause, filter_type)| row_matches(row, clause, *filter_type))
        })
        .collect()
}

/// Stable sort on the raw field value; no-op when unsorted
pub fn sort_rows(rows: &mut [&Value], sort: &SortSpec) {
    if !sort.is_active() {
        return;
    }

    rows.sort_by(|a, b| {
        let ordering = compare_values(lookup(a, &sort.field), lookup(b, &sort.field));
        match sort.dir {
            SortDirection::Descending => ordering.reverse(),
            _ => ordering,
        }
    });
}

/// Slice one page out of the filtered rows.
///
/// When everything fits in a single page the whole set is returned, even if
/// `skip` points past it; a page size change can land here before `skip` has
/// been corrected.
pub fn paginate<'a, T>(rows: &'a [T], skip: usize, page_size: usize) -> &'a [T] {
    if rows.len() <= page_size {
        return rows;
    }

    let start = skip.min(rows.len());
    let end = skip.saturating_add(page_size).min(rows.len());
    &rows[start..end]
}

#[cfg(test)]
mod tests;
