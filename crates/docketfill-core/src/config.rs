//! Engine configuration: page sizes, the pagination boundary, and the
//! fan-out policy.

use std::num::NonZeroUsize;

use crate::records::SortOrder;

/// How the pagination walk decides whether to fetch the next page.
///
/// Pages are numbered from 1 and the next page number is compared against
/// the total reported on the first page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageBoundary {
    /// Fetch while `next <= total`. Every page is fetched.
    #[default]
    Inclusive,
    /// Fetch while `next < total`. Drops the last page whenever there are two
    /// or more; kept for callers that need to match the legacy walk.
    Exclusive,
}

impl PageBoundary {
    pub fn continues(&self, next_page: u32, total_pages: u32) -> bool {
        match self {
            Self::Inclusive => next_page <= total_pages,
            Self::Exclusive => next_page < total_pages,
        }
    }
}

/// Concurrency policy for per-item work.
///
/// The default runs one item at a time: each item may issue billed upstream
/// calls, and sequential order keeps both the bill and error attribution
/// predictable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanOutPolicy {
    pub max_concurrency: NonZeroUsize,
}

impl Default for FanOutPolicy {
    fn default() -> Self {
        Self::sequential()
    }
}

impl FanOutPolicy {
    pub const fn sequential() -> Self {
        Self {
            max_concurrency: NonZeroUsize::MIN,
        }
    }

    /// Bounded concurrency; `0` is treated as `1`.
    pub fn bounded(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: NonZeroUsize::new(max_concurrency).unwrap_or(NonZeroUsize::MIN),
        }
    }

    pub fn is_sequential(&self) -> bool {
        self.max_concurrency.get() == 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub claims_page_size: u32,
    pub claims_sort_order: SortOrder,
    pub docket_page_size: u32,
    pub page_boundary: PageBoundary,
    pub fan_out: FanOutPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            claims_page_size: 50,
            claims_sort_order: SortOrder::Desc,
            docket_page_size: 50,
            page_boundary: PageBoundary::default(),
            fan_out: FanOutPolicy::default(),
        }
    }
}
