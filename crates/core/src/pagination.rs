//! Page/limit arithmetic shared by every paginated listing.

/// Default page size when the caller omits `limit`.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Largest page size a caller may request.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Build a page request from optional query values, clamping `limit` to
    /// `1..=MAX_PAGE_LIMIT` and `page` to at least 1.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
        }
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// `ceil(total / limit)`; zero rows yield zero pages.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

/// One page of results plus the paging metadata returned to clients.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub page: i64,
    pub total_pages: i64,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(request: PageRequest, items: Vec<T>, total: i64) -> Self {
        Self {
            page: request.page,
            total_pages: total_pages(total, request.limit),
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_twenty() {
        let req = PageRequest::default();
        assert_eq!(req, PageRequest { page: 1, limit: 20 });
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn limit_and_page_are_clamped() {
        assert_eq!(PageRequest::new(Some(0), Some(0)), PageRequest { page: 1, limit: 1 });
        assert_eq!(PageRequest::new(Some(-3), Some(1000)).limit, MAX_PAGE_LIMIT);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(PageRequest::new(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(25, 20), 2);
        assert_eq!(total_pages(40, 20), 2);
        assert_eq!(total_pages(41, 20), 3);
        assert_eq!(total_pages(0, 20), 0);
    }
}
