//! Page windowing for listings.
//!
//! Out-of-range page numbers never fail: they are clamped into
//! `[1, total_pages]`, and an empty result set still has one (empty) page.

use serde::Serialize;
use utoipa::ToSchema;

/// How many page numbers are shown on each side of the current one
pub const PAGE_WINDOW_RADIUS: i64 = 2;

/// Resolved position of a page inside a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageInfo {
    /// Current page (1-based, already clamped)
    pub page: i64,
    pub page_size: i64,
    /// Total number of matching records
    pub total: i64,
    pub total_pages: i64,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageInfo {
    pub fn new(requested: i64, page_size: i64, total: i64) -> Self {
        let page_size = page_size.max(1);
        let total = total.max(0);
        let total_pages = ((total + page_size - 1) / page_size).max(1);
        let page = requested.clamp(1, total_pages);

        Self {
            page,
            page_size,
            total,
            total_pages,
            has_previous: page > 1,
            has_next: page < total_pages,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// Consecutive page numbers `page - radius ..= page + radius`, clamped to the valid range
    pub fn window(&self, radius: i64) -> Vec<i64> {
        let start = (self.page - radius).max(1);
        let end = (self.page + radius).min(self.total_pages);
        (start..=end).collect()
    }
}

/// Parse a raw `page` query value; junk means the first page
pub fn parse_page(raw: Option<&str>) -> i64 {
    raw.and_then(|p| p.trim().parse::<i64>().ok()).unwrap_or(1)
}
