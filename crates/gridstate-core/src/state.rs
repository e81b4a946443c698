//! Grid state and its transitions
//!
//! `GridState` is an immutable value: fields are private and every change goes
//! through `GridState::apply`, which returns the next state. Transitions keep
//! the pagination invariant `skip == (page_number - 1) * page_size` and reset
//! to the first page whenever the filter or sort changes.

use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::{FilterClause, SortSpec};

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default number of page links shown at once
pub const DEFAULT_PAGE_NUMBER_COUNT: usize = 5;

/// Total number of pages for `total` rows, zero when there are no rows
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

/// Zero-based group (window) index a page falls in
pub fn page_group(page_number: usize, page_number_count: usize) -> usize {
    page_number.saturating_sub(1) / page_number_count.max(1)
}

/// A state change requested by the user or the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridAction {
    /// Go to `page`, clamped against the current row total
    ChangePage { page: usize, total: usize },
    /// Jump to the first page of the next window
    NextPageGroup {
        total: usize,
        page_number_count: usize,
    },
    /// Jump to the first page of the previous window
    PreviousPageGroup { page_number_count: usize },
    ChangePageSize(usize),
    /// Advance the sort cycle for a field
    Sort(String),
    /// Add, replace or (with an empty value) remove a field's clause
    Filter(FilterClause),
    ClearFilter(String),
    ClearAllFilters,
    /// Back to page one with no sort or filter, keeping the page size
    Reset,
}

/// Pagination, sort and filter configuration of one grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridState {
    page_number: usize,
    page_size: usize,
    skip: usize,
    sort: SortSpec,
    filter: Vec<FilterClause>,
}

impl Default for GridState {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            skip: 0,
            sort: SortSpec::default(),
            filter: Vec::new(),
        }
    }
}

impl GridState {
    /// Create a state on page one with the given page size
    pub fn new(page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(GridError::InvalidPageSize(page_size));
        }
        Ok(Self {
            page_size,
            ..Self::default()
        })
    }

    /// Decode a host-supplied state and normalize it
    pub fn from_json(json: &str) -> Result<Self> {
        let state: GridState = serde_json::from_str(json)?;
        Ok(state.normalized())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_filter(mut self, clause: FilterClause) -> Self {
        upsert_clause(&mut self.filter, clause);
        self
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn skip(&self) -> usize {
        self.skip
    }

    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub fn filters(&self) -> &[FilterClause] {
        &self.filter
    }

    pub fn filter_for(&self, field: &str) -> Option<&FilterClause> {
        self.filter.iter().find(|clause| clause.field == field)
    }

    pub fn is_filtered(&self) -> bool {
        !self.filter.is_empty()
    }

    pub fn total_pages(&self, total: usize) -> usize {
        total_pages(total, self.page_size)
    }

    /// Repair a state that did not come through transitions: page size and
    /// page number at least one, page number small enough for `skip` to fit,
    /// `skip` recomputed, a sort without direction cleared, empty clauses
    /// dropped and duplicate fields collapsed (the later clause wins).
    pub fn normalized(&self) -> Self {
        let mut filter = Vec::with_capacity(self.filter.len());
        for clause in &self.filter {
            upsert_clause(&mut filter, clause.clone());
        }

        let page_size = self.page_size.max(1);
        let max_page = usize::MAX / page_size;
        let sort = if self.sort.is_active() {
            self.sort.clone()
        } else {
            SortSpec::default()
        };

        let mut next = Self {
            page_number: self.page_number.clamp(1, max_page),
            page_size,
            skip: 0,
            sort,
            filter,
        };
        next.sync_skip();
        next
    }

    /// Compute the state that follows `action`
    pub fn apply(&self, action: GridAction) -> Self {
        let mut next = self.clone();

        match action {
            GridAction::ChangePage { page, total } => {
                next.page_number = clamp_page(page, self.total_pages(total));
            }
            GridAction::NextPageGroup {
                total,
                page_number_count,
            } => {
                let count = page_number_count.max(1);
                let group = page_group(self.page_number, count);
                let first_of_next = (group + 1) * count + 1;
                next.page_number = clamp_page(first_of_next, self.total_pages(total));
            }
            GridAction::PreviousPageGroup { page_number_count } => {
                let count = page_number_count.max(1);
                let group = page_group(self.page_number, count);
                next.page_number = match group {
                    0 => 1,
                    g => (g - 1) * count + 1,
                };
            }
            GridAction::ChangePageSize(size) => {
                if size == 0 {
                    tracing::debug!("Ignoring page size of zero");
                    return next;
                }
                next.page_size = size;
                next.page_number = 1;
            }
            GridAction::Sort(field) => {
                if field.is_empty() {
                    return next;
                }
                next.sort = self.sort.toggled(&field);
                next.page_number = 1;
            }
            GridAction::Filter(clause) => {
                upsert_clause(&mut next.filter, clause);
                next.page_number = 1;
            }
            GridAction::ClearFilter(field) => {
                next.filter.retain(|clause| clause.field != field);
                next.page_number = 1;
            }
            GridAction::ClearAllFilters => {
                next.filter.clear();
                next.page_number = 1;
            }
            GridAction::Reset => {
                next = Self {
                    page_size: self.page_size,
                    ..Self::default()
                };
            }
        }

        next.sync_skip();
        next
    }

    fn sync_skip(&mut self) {
        self.skip = (self.page_number - 1).saturating_mul(self.page_size);
    }
}

fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// One clause per field: replace in place, append when new, remove when empty
fn upsert_clause(filter: &mut Vec<FilterClause>, clause: FilterClause) {
    if clause.is_empty() {
        filter.retain(|existing| existing.field != clause.field);
        return;
    }

    match filter.iter_mut().find(|existing| existing.field == clause.field) {
        Some(existing) => *existing = clause,
        None => filter.push(clause),
    }
}
