//! Pagination

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// One page of a list plus the totals needed to render a pager
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    /// Number of items before pagination
    pub total: u64,
    /// Effective (clamped) page, 1-indexed
    pub page: u32,
    /// Effective (clamped) page size
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = if limit > 0 {
            total.div_ceil(u64::from(limit)) as u32
        } else {
            1
        };

        Self {
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

/// Clamp a requested page size into `[1, MAX_PAGE_SIZE]`
pub fn clamp_page_size(page_size: u32) -> u32 {
    page_size.clamp(1, MAX_PAGE_SIZE)
}

/// Cut one 1-indexed page out of `items`
///
/// Page 0 is treated as page 1. A page past the end yields an empty page,
/// never an error.
pub fn paginate<T: Clone>(items: &[T], page_size: u32, page: u32) -> PaginatedResponse<T> {
    let limit = clamp_page_size(page_size);
    let page = page.max(1);
    let start = (page as usize - 1).saturating_mul(limit as usize);
    let data = items
        .iter()
        .skip(start)
        .take(limit as usize)
        .cloned()
        .collect();
    PaginatedResponse::new(data, items.len() as u64, page, limit)
}
