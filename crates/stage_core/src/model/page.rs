//! Pagination request and page result.
//!
//! # Invariants
//! - Pages are 1-based; page `0` is treated as page `1`.
//! - Page size is clamped to `1..=PAGE_SIZE_MAX`.

use serde::{Deserialize, Serialize};

pub const PAGE_SIZE_DEFAULT: u32 = 10;
pub const PAGE_SIZE_MAX: u32 = 100;

/// Requested page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Rows per page.
    pub size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            size: PAGE_SIZE_DEFAULT,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Normalized 1-based page number.
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    /// Normalized page size.
    pub fn limit(&self) -> u32 {
        self.size.clamp(1, PAGE_SIZE_MAX)
    }

    /// Rows skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page() - 1) * u64::from(self.limit())
    }
}

/// One page of results plus the total match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplePage<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

impl<T> SimplePage<T> {
    pub fn new(items: Vec<T>, total: u64, request: &PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            size: request.limit(),
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.size))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }
}

#[cfg(test)]
mod tests {
    use super::{PageRequest, SimplePage, PAGE_SIZE_DEFAULT, PAGE_SIZE_MAX};

    #[test]
    fn request_normalizes_page_and_size() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page(), 1);
        assert_eq!(request.limit(), 1);
        assert_eq!(request.offset(), 0);

        let request = PageRequest::new(3, 10_000);
        assert_eq!(request.limit(), PAGE_SIZE_MAX);
        assert_eq!(request.offset(), 2 * u64::from(PAGE_SIZE_MAX));
    }

    #[test]
    fn request_defaults_from_partial_json() {
        let request: PageRequest = serde_json::from_str(r#"{"page":2}"#).unwrap();
        assert_eq!(request.page(), 2);
        assert_eq!(request.limit(), PAGE_SIZE_DEFAULT);
    }

    #[test]
    fn page_counts_partial_last_page() {
        let page = SimplePage::new(vec![1, 2], 21, &PageRequest::new(3, 10));
        assert_eq!(page.total_pages(), 3);
        assert!(!page.has_next());

        let first = SimplePage::new(vec![0; 10], 21, &PageRequest::default());
        assert!(first.has_next());
    }
}
