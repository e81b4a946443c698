//! Page window calculation
//!
//! A pager shows at most `page_number_count` clickable page numbers. Pages are
//! grouped into fixed windows of that size (`1..=5`, `6..=10`, ...) and the
//! window slides a whole group at a time when the current page crosses a
//! group boundary.

use std::ops::RangeInclusive;

use gridstate_core::{page_group, total_pages, GridState, DEFAULT_PAGE_NUMBER_COUNT};
use serde::Serialize;

/// Which way the window moved between two pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowShift {
    Forward,
    Backward,
    InPlace,
}

impl WindowShift {
    /// Compare the groups `previous_page` and `next_page` fall in
    pub fn between(previous_page: usize, next_page: usize, page_number_count: usize) -> Self {
        let previous_group = page_group(previous_page, page_number_count);
        let current_group = page_group(next_page, page_number_count);

        if current_group > previous_group {
            Self::Forward
        } else if current_group < previous_group {
            Self::Backward
        } else {
            Self::InPlace
        }
    }
}

/// The visible slice of page numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    pub current_page: usize,
    pub start_page: usize,
    /// Inclusive; below `start_page` when there are no pages
    pub end_page: usize,
    pub total_pages: usize,
    pub page_number_count: usize,
}

impl PageWindow {
    /// Compute the window for `page_number` over `total` rows
    pub fn compute(
        page_number: usize,
        page_size: usize,
        total: usize,
        page_number_count: usize,
    ) -> Self {
        let count = page_number_count.max(1);
        let total_pages = total_pages(total, page_size);
        let current_page = page_number.clamp(1, total_pages.max(1));

        let start_page = page_group(current_page, count) * count + 1;
        let end_page = (start_page + count - 1).min(total_pages);

        Self {
            current_page,
            start_page,
            end_page,
            total_pages,
            page_number_count: count,
        }
    }

    pub fn for_state(state: &GridState, total: usize, page_number_count: usize) -> Self {
        Self::compute(state.page_number(), state.page_size(), total, page_number_count)
    }

    /// Page numbers to render as links
    pub fn pages(&self) -> RangeInclusive<usize> {
        self.start_page..=self.end_page
    }

    pub fn contains(&self, page: usize) -> bool {
        self.pages().contains(&page)
    }

    pub fn is_empty(&self) -> bool {
        self.end_page < self.start_page
    }

    /// Whether a "previous pages" control should be enabled
    pub fn has_previous_group(&self) -> bool {
        self.start_page > 1
    }

    /// Whether a "next pages" control should be enabled
    pub fn has_next_group(&self) -> bool {
        self.end_page < self.total_pages
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page == 1
    }

    pub fn is_last_page(&self) -> bool {
        self.current_page >= self.total_pages
    }

    pub fn current_group(&self) -> usize {
        page_group(self.current_page, self.page_number_count)
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::compute(1, 1, 0, DEFAULT_PAGE_NUMBER_COUNT)
    }
}
