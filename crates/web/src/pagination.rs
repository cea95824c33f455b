//! Feed pagination with lenient page number handling.
//!
//! Page numbers come straight from the query string, so anything goes:
//! non-numeric input falls back to page 1 and out-of-range numbers clamp
//! to the last page. An empty feed still renders as page 1 of 1.

/// Number of posts per feed page.
pub const PAGE_SIZE: i64 = 10;

/// Computes page boundaries for a feed of known size.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    page_size: i64,
    total_pages: i64,
}

/// A resolved page within a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number, always within `1..=total_pages`.
    pub number: i64,
    /// Total number of pages in the feed (at least 1).
    pub total_pages: i64,
    /// Row offset for the database query.
    pub offset: i64,
    /// Row limit for the database query.
    pub limit: i64,
}

impl Paginator {
    #[must_use]
    pub fn new(total_items: i64, page_size: i64) -> Self {
        let total_pages = if total_items <= 0 {
            1
        } else {
            // i64::div_ceil is unstable (int_roundings); equivalent for positive operands
            (total_items + page_size - 1) / page_size
        };
        Self {
            page_size,
            total_pages,
        }
    }

    /// Resolve a raw query-string page value to a concrete page.
    ///
    /// Missing, non-numeric, zero, or negative input resolves to page 1.
    /// Numbers past the end clamp to the last page.
    #[must_use]
    pub fn resolve(&self, raw: Option<&str>) -> Page {
        let requested = raw
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|&n| n >= 1)
            .unwrap_or(1);
        let number = requested.min(self.total_pages);
        Page {
            number,
            total_pages: self.total_pages,
            offset: (number - 1) * self.page_size,
            limit: self.page_size,
        }
    }
}

impl Page {
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    #[must_use]
    pub const fn previous(&self) -> i64 {
        self.number - 1
    }

    #[must_use]
    pub const fn next(&self) -> i64 {
        self.number + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_page_defaults_to_first() {
        let page = Paginator::new(25, PAGE_SIZE).resolve(None);
        assert_eq!(page.number, 1);
        assert_eq!(page.offset, 0);
        assert_eq!(page.limit, PAGE_SIZE);
    }

    #[test]
    fn test_non_numeric_page_defaults_to_first() {
        let page = Paginator::new(25, PAGE_SIZE).resolve(Some("abc"));
        assert_eq!(page.number, 1);
    }

    #[test]
    fn test_zero_and_negative_pages_default_to_first() {
        let paginator = Paginator::new(25, PAGE_SIZE);
        assert_eq!(paginator.resolve(Some("0")).number, 1);
        assert_eq!(paginator.resolve(Some("-3")).number, 1);
    }

    #[test]
    fn test_out_of_range_clamps_to_last_page() {
        // 25 items at 10 per page = 3 pages
        let page = Paginator::new(25, PAGE_SIZE).resolve(Some("999"));
        assert_eq!(page.number, 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.offset, 20);
    }

    #[test]
    fn test_empty_feed_is_one_page() {
        let page = Paginator::new(0, PAGE_SIZE).resolve(Some("5"));
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.offset, 0);
        assert!(!page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_exact_multiple_of_page_size() {
        let paginator = Paginator::new(20, PAGE_SIZE);
        assert_eq!(paginator.resolve(None).total_pages, 2);
        assert_eq!(paginator.resolve(Some("2")).offset, 10);
    }

    #[test]
    fn test_middle_page_navigation() {
        let page = Paginator::new(35, PAGE_SIZE).resolve(Some("2"));
        assert!(page.has_previous());
        assert!(page.has_next());
        assert_eq!(page.previous(), 1);
        assert_eq!(page.next(), 3);
    }
}
