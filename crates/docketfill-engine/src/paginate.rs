//! Page-cursor walk over a paged record-store listing.

use std::future::Future;

use docketfill_core::{PageBoundary, PagedResult};
use tracing::debug;

/// Fetch every page of a listing and concatenate the items in page order.
///
/// Pages are fetched one at a time starting at 1; the total page count is
/// taken from the first response and held for the rest of the walk. If the
/// first page is empty the walk stops there whatever total it reported.
pub async fn collect_all_pages<T, E, F, Fut>(
    boundary: PageBoundary,
    mut fetch_page: F,
) -> Result<Vec<T>, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<PagedResult<T>, E>>,
{
    let mut items = Vec::new();
    let mut page_number = 1;
    let mut total_pages = 0;

    loop {
        let page = fetch_page(page_number).await?;

        if page_number == 1 {
            total_pages = page.total_pages;
            if page.items.is_empty() {
                debug!(total_pages, "first page empty, stopping");
                break;
            }
        }

        debug!(
            page_number,
            total_pages,
            count = page.items.len(),
            "fetched page"
        );
        items.extend(page.items);

        page_number += 1;
        if !boundary.continues(page_number, total_pages) {
            break;
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Serves fixed pages, recording which page numbers were requested.
    struct Pages {
        pages: Vec<Vec<&'static str>>,
        total_pages: u32,
        requested: RefCell<Vec<u32>>,
    }

    impl Pages {
        fn new(pages: Vec<Vec<&'static str>>) -> Self {
            let total_pages = pages.len() as u32;
            Self::with_total(pages, total_pages)
        }

        fn with_total(pages: Vec<Vec<&'static str>>, total_pages: u32) -> Self {
            Self {
                pages,
                total_pages,
                requested: RefCell::new(Vec::new()),
            }
        }

        async fn fetch(&self, page_number: u32) -> Result<PagedResult<&'static str>, String> {
            self.requested.borrow_mut().push(page_number);
            let items = self
                .pages
                .get(page_number as usize - 1)
                .cloned()
                .unwrap_or_default();
            Ok(PagedResult::new(items, page_number, self.total_pages))
        }
    }

    fn three_pages() -> Pages {
        Pages::new(vec![vec!["a", "b"], vec!["c", "d"], vec!["e", "f"]])
    }

    #[tokio::test]
    async fn inclusive_boundary_collects_every_page() {
        let pages = three_pages();
        let items = collect_all_pages(PageBoundary::Inclusive, |n| pages.fetch(n))
            .await
            .unwrap();
        assert_eq!(items, vec!["a", "b", "c", "d", "e", "f"]);
        assert_eq!(*pages.requested.borrow(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn exclusive_boundary_drops_last_page() {
        let pages = three_pages();
        let items = collect_all_pages(PageBoundary::Exclusive, |n| pages.fetch(n))
            .await
            .unwrap();
        assert_eq!(items, vec!["a", "b", "c", "d"]);
        assert_eq!(*pages.requested.borrow(), vec![1, 2]);
    }

    #[tokio::test]
    async fn single_page_is_fetched_once() {
        for boundary in [PageBoundary::Inclusive, PageBoundary::Exclusive] {
            let pages = Pages::new(vec![vec!["only", "page"]]);
            let items = collect_all_pages(boundary, |n| pages.fetch(n)).await.unwrap();
            assert_eq!(items, vec!["only", "page"]);
            assert_eq!(*pages.requested.borrow(), vec![1]);
        }
    }

    #[tokio::test]
    async fn empty_first_page_stops_regardless_of_total() {
        let pages = Pages::with_total(vec![vec![], vec!["x"]], 2);
        let items = collect_all_pages(PageBoundary::Inclusive, |n| pages.fetch(n))
            .await
            .unwrap();
        assert!(items.is_empty());
        assert_eq!(*pages.requested.borrow(), vec![1]);
    }

    #[tokio::test]
    async fn unknown_total_stops_after_first_page() {
        let pages = Pages::with_total(vec![vec!["a"], vec!["b"]], 0);
        let items = collect_all_pages(PageBoundary::Inclusive, |n| pages.fetch(n))
            .await
            .unwrap();
        assert_eq!(items, vec!["a"]);
    }

    #[tokio::test]
    async fn total_from_later_pages_is_ignored() {
        let requested = RefCell::new(Vec::new());
        let items = collect_all_pages(PageBoundary::Inclusive, |n| {
            requested.borrow_mut().push(n);
            // Later pages claim a larger total; the walk must not follow it.
            let total = if n == 1 { 2 } else { 5 };
            async move { Ok::<_, String>(PagedResult::new(vec![n], n, total)) }
        })
        .await
        .unwrap();
        assert_eq!(items, vec![1, 2]);
        assert_eq!(*requested.borrow(), vec![1, 2]);
    }

    #[tokio::test]
    async fn page_failure_aborts_walk() {
        let requested = RefCell::new(Vec::new());
        let result: Result<Vec<u32>, String> =
            collect_all_pages(PageBoundary::Inclusive, |n| {
                requested.borrow_mut().push(n);
                async move {
                    if n == 2 {
                        Err("page 2 unavailable".to_string())
                    } else {
                        Ok(PagedResult::new(vec![n], n, 3))
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap_err(), "page 2 unavailable");
        assert_eq!(*requested.borrow(), vec![1, 2]);
    }
}
