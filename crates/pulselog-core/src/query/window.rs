//! Growing "load more" window over a result list.
//!
//! The window always starts at row 0; its end grows by a fixed increment
//! each time the consumer scrolls near the bottom.

use std::ops::Range;

/// Visible window `[0, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    end: usize,
    increment: usize,
}

impl Window {
    /// Initial window showing one increment of rows.
    pub fn new(increment: usize) -> Self {
        let increment = increment.max(1);
        Self {
            end: increment,
            increment,
        }
    }

    /// Window already grown to `end`, never smaller than one increment.
    pub fn with_end(increment: usize, end: usize) -> Self {
        let increment = increment.max(1);
        Self {
            end: end.max(increment),
            increment,
        }
    }

    /// Window showing every row.
    pub fn unbounded() -> Self {
        Self {
            end: usize::MAX,
            increment: usize::MAX,
        }
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn increment(&self) -> usize {
        self.increment
    }

    /// Grow by one increment, clamped to `total`. Returns false if nothing was added.
    pub fn advance(&mut self, total: usize) -> bool {
        if !self.has_more(total) {
            return false;
        }
        self.end = self.end.saturating_add(self.increment).min(total);
        true
    }

    /// Shrink back to the first increment (e.g. after the filter changes).
    pub fn reset(&mut self) {
        self.end = self.increment;
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.end < total
    }

    pub fn range(&self, total: usize) -> Range<usize> {
        0..self.end.min(total)
    }

    pub fn apply<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range(items.len())]
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_WINDOW_INCREMENT)
    }
}

/// Whether a scroll position is within `threshold` of the content's bottom.
pub fn is_near_bottom(scroll_offset: f64, viewport_height: f64, content_height: f64, threshold: f64) -> bool {
    scroll_offset + viewport_height >= content_height - threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_growth() {
        let rows: Vec<u32> = (0..45).collect();
        let mut window = Window::new(20);
        assert_eq!(window.apply(&rows).len(), 20);
        assert!(window.has_more(rows.len()));

        assert!(window.advance(rows.len()));
        assert_eq!(window.apply(&rows).len(), 40);

        assert!(window.advance(rows.len()));
        assert_eq!(window.end(), 45);
        assert_eq!(window.apply(&rows), &rows[..]);

        assert!(!window.advance(rows.len()));
        assert!(!window.has_more(rows.len()));

        window.reset();
        assert_eq!(window.end(), 20);
    }

    #[test]
    fn test_short_list() {
        let rows = [1, 2, 3];
        let window = Window::new(20);
        assert_eq!(window.apply(&rows), &rows);
        assert!(!window.has_more(rows.len()));
        assert_eq!(Window::new(0).increment(), 1);
    }

    #[test]
    fn test_with_end() {
        let window = Window::with_end(20, 60);
        assert_eq!(window.end(), 60);
        assert_eq!(window.increment(), 20);
        assert_eq!(Window::with_end(20, 5).end(), 20);

        let rows: Vec<u32> = (0..45).collect();
        let window = Window::with_end(20, usize::MAX);
        assert_eq!(window.apply(&rows).len(), 45);
        assert!(!window.has_more(rows.len()));
    }

    #[test]
    fn test_unbounded() {
        let rows: Vec<u32> = (0..1000).collect();
        let mut window = Window::unbounded();
        assert_eq!(window.apply(&rows).len(), 1000);
        assert!(!window.advance(rows.len()));
    }

    #[test]
    fn test_near_bottom() {
        assert!(is_near_bottom(880.0, 100.0, 1000.0, 50.0));
        assert!(!is_near_bottom(500.0, 100.0, 1000.0, 50.0));
    }
}
