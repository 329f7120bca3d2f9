//! Offset pagination over a fixed sort order.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    #[must_use]
    pub const fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Rows skipped before this page starts, or `None` when that overflows.
    #[must_use]
    pub const fn offset(&self) -> Option<u64> {
        match self.page.checked_sub(1) {
            Some(skipped) => skipped.checked_mul(self.per_page),
            None => None,
        }
    }

    #[must_use]
    pub const fn total_pages(&self, total_items: u64) -> u64 {
        if self.per_page == 0 {
            0
        } else {
            total_items.div_ceil(self.per_page)
        }
    }

    #[must_use]
    pub const fn prev_page(&self) -> Option<u64> {
        if self.page > 1 {
            Some(self.page - 1)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn next_page(&self, total_pages: u64) -> Option<u64> {
        if self.page < total_pages {
            Some(self.page + 1)
        } else {
            None
        }
    }

    /// Relative link to `page` keeping this request's page size.
    #[must_use]
    pub fn page_url(&self, path: &str, page: u64) -> String {
        format!("{path}?page={page}&per_page={}", self.per_page)
    }
}

/// One page of results plus the totals needed to navigate the rest.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub request: PageRequest,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            request,
            total_items,
            total_pages: request.total_pages(total_items),
        }
    }

    #[must_use]
    pub fn prev_url(&self, path: &str) -> Option<String> {
        self.request
            .prev_page()
            .map(|page| self.request.page_url(path, page))
    }

    #[must_use]
    pub fn next_url(&self, path: &str) -> Option<String> {
        self.request
            .next_page(self.total_pages)
            .map(|page| self.request.page_url(path, page))
    }
}
