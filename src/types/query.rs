//! Listing parameters and results: filters, page sizing, page frames.

use serde::Serialize;

/// Number of entries per page when the caller supplies none or garbage.
pub const DEFAULT_PAGE_SIZE: i64 = 5;

/// Optional filters combined when listing entries.
///
/// All supplied filters must hold simultaneously; text matching is
/// case-insensitive substring throughout. `search` is one more AND-ed
/// clause that matches across every text field, not a replacement for the
/// narrower filters.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub tag: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub search: Option<String>,
}

impl EntryFilter {
    /// A filter that matches every active entry.
    pub fn none() -> Self {
        Self::default()
    }
}

/// One page of results plus the metadata a caller needs to render
/// pagination controls.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    /// 1-based page number actually served (after clamping).
    pub page: i64,
    pub page_count: i64,
    pub per_page: i64,
}

impl<T> Page<T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}

/// Parses a raw page-size parameter. Missing, non-numeric, or non-positive
/// input falls back to [`DEFAULT_PAGE_SIZE`].
pub fn parse_page_size(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

/// Computes the served page number, page count, and row offset for a
/// listing. An out-of-range page number clamps to the nearest valid page;
/// an empty result set still reports one (empty) page.
pub fn page_frame(total: i64, requested_page: i64, per_page: i64) -> (i64, i64, i64) {
    let per_page = per_page.max(1);
    let page_count = ((total + per_page - 1) / per_page).max(1);
    let page = requested_page.clamp(1, page_count);
    let offset = (page - 1) * per_page;
    (page, page_count, offset)
}
