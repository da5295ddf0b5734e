use serde::{Deserialize, Serialize};

/// Fixed page size for the public post listing.
pub const POSTS_PER_PAGE: u64 = 20;

/// A request for one page of results. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    /// Page `page` of the post listing. Page numbers below 1 are clamped to 1.
    pub fn posts(page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: POSTS_PER_PAGE,
        }
    }

    /// Number of rows to skip. Saturates for absurdly large page numbers.
    pub fn offset(&self) -> u64 {
        skipped(self.page, self.per_page)
    }
}

fn skipped(page: u64, per_page: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(per_page)
}

/// One page of results plus the totals needed for pagination links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
        }
    }

    /// Last page number; an empty result still has one (empty) page.
    pub fn last_page(&self) -> u64 {
        if self.per_page == 0 {
            return 1;
        }
        self.total.div_ceil(self.per_page).max(1)
    }

    /// 1-based index of the first item on this page, if any.
    pub fn from(&self) -> Option<u64> {
        (!self.items.is_empty()).then(|| skipped(self.page, self.per_page).saturating_add(1))
    }

    /// 1-based index of the last item on this page, if any.
    pub fn to(&self) -> Option<u64> {
        self.from()
            .map(|from| from.saturating_add(self.items.len() as u64 - 1))
    }
}
