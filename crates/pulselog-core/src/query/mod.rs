//! Query pipeline over a record snapshot.
//!
//! Pure functions, applied in a fixed order: filter → sort → window.

mod filter;
mod sort;
mod window;

pub use filter::*;
pub use sort::*;
pub use window::*;

use crate::models::StoredRecord;

/// Filter, sort and window settings for one view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: FilterSpec,
    pub sort: Option<SortSpec>,
    pub window: Window,
}

/// Rows visible in the window plus what the consumer needs for "load more".
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Filtered, sorted rows inside the window
    pub rows: Vec<StoredRecord>,
    /// Rows matching the filter (before windowing)
    pub matched: usize,
    /// True when growing the window would reveal more rows
    pub has_more: bool,
}

impl Query {
    pub fn new(window_increment: usize) -> Self {
        Self {
            window: Window::new(window_increment),
            ..Self::default()
        }
    }

    /// Run the pipeline over a snapshot.
    pub fn run(&self, records: &[StoredRecord]) -> QueryResult {
        let mut matched = filter_records(records, &self.filter);
        if let Some(spec) = &self.sort {
            sort_records(&mut matched, spec);
        }

        let total = matched.len();
        let visible = self.window.range(total).end;
        matched.truncate(visible);

        QueryResult {
            rows: matched,
            matched: total,
            has_more: self.window.has_more(total),
        }
    }

    /// Header click; the window restarts because row order changed.
    pub fn toggle_sort(&mut self, field: crate::models::Field) {
        self.sort = Some(SortSpec::toggle(self.sort, field));
        self.window.reset();
    }

    /// Replace the filter; the window restarts.
    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.filter = filter;
        self.window.reset();
    }

    /// Grow the window against the current match count.
    pub fn load_more(&mut self, records: &[StoredRecord]) -> bool {
        let total = records.iter().filter(|r| self.filter.matches(r)).count();
        self.window.advance(total)
    }
}
