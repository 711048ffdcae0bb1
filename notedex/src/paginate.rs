//! Page windowing.
//!
//! Pure arithmetic: page and page size are validated upstream.

use crate::interface::ResultPage;
use crate::models::Document;

/// Navigation metadata for `total` items at `page_size` per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub start: usize,
    pub end: usize,
}

impl PageWindow {
    pub fn new(total: usize, page: usize, page_size: usize) -> Self {
        let total_pages = total.div_ceil(page_size);
        let start = page.saturating_sub(1).saturating_mul(page_size).min(total);
        let end = start.saturating_add(page_size).min(total);
        Self {
            page,
            total,
            total_pages,
            start,
            end,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Slice an ordered sequence into one page, cloning the documents returned.
pub fn paginate(ordered: &[&Document], page: usize, page_size: usize) -> ResultPage {
    let window = PageWindow::new(ordered.len(), page, page_size);
    ResultPage {
        notes: ordered[window.start..window.end]
            .iter()
            .map(|doc| (*doc).clone())
            .collect(),
        total: window.total,
        page: window.page,
        total_pages: window.total_pages,
        has_next: window.has_next(),
        has_prev: window.has_prev(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn docs(n: usize) -> Vec<Document> {
        (0..n)
            .map(|i| Document::new(i.to_string(), format!("Note {i}"), "Subject", Utc::now()))
            .collect()
    }

    fn page_ids(all: &[Document], page: usize, size: usize) -> (Vec<String>, ResultPage) {
        let refs: Vec<&Document> = all.iter().collect();
        let result = paginate(&refs, page, size);
        (result.notes.iter().map(|d| d.id.clone()).collect(), result)
    }

    #[test]
    fn test_first_page() {
        let all = docs(45);
        let (ids, page) = page_ids(&all, 1, 20);
        assert_eq!(ids.len(), 20);
        assert_eq!(ids[0], "0");
        assert_eq!(page.total, 45);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn test_last_partial_page() {
        let all = docs(45);
        let (ids, page) = page_ids(&all, 3, 20);
        assert_eq!(ids, vec!["40", "41", "42", "43", "44"]);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn test_beyond_last_page() {
        let all = docs(45);
        let (ids, page) = page_ids(&all, 4, 20);
        assert!(ids.is_empty());
        assert_eq!(page.total, 45);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 4);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn test_far_beyond_does_not_overflow() {
        let all = docs(3);
        let (ids, page) = page_ids(&all, usize::MAX, usize::MAX);
        assert!(ids.is_empty());
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_empty_input() {
        let (ids, page) = page_ids(&[], 1, 20);
        assert!(ids.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next);
        assert!(!page.has_prev);
    }

    #[test]
    fn test_exact_multiple() {
        let window = PageWindow::new(40, 2, 20);
        assert_eq!(window.total_pages, 2);
        assert_eq!((window.start, window.end), (20, 40));
        assert!(!window.has_next());
    }

    #[test]
    fn test_page_length_formula() {
        for total in 0..30 {
            for size in 1..7 {
                for page in 1..8 {
                    let window = PageWindow::new(total, page, size);
                    let expected = size.min(total.saturating_sub((page - 1) * size));
                    assert_eq!(window.end - window.start, expected, "total={total} size={size} page={page}");
                }
            }
        }
    }
}
