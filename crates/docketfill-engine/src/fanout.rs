//! Per-item work over a collection, in order, stopping at the first failure.

use std::future::Future;

use docketfill_core::FanOutPolicy;
use futures::{StreamExt, TryStreamExt, stream};

/// Run `work` on each item in turn. The first error stops the walk: later
/// items are never started and results gathered so far are dropped.
pub async fn for_each_sequential<I, R, E, F, Fut>(items: I, mut work: F) -> Result<Vec<R>, E>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let items = items.into_iter();
    let mut results = Vec::with_capacity(items.size_hint().0);
    for item in items {
        results.push(work(item).await?);
    }
    Ok(results)
}

/// Run `work` on each item under `policy`.
///
/// Results keep input order whatever the concurrency. With more than one
/// slot, work already in flight when an item fails is dropped, not awaited.
pub async fn fan_out<I, R, E, F, Fut>(policy: FanOutPolicy, items: I, work: F) -> Result<Vec<R>, E>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    if policy.is_sequential() {
        return for_each_sequential(items, work).await;
    }
    stream::iter(items)
        .map(work)
        .buffered(policy.max_concurrency.get())
        .try_collect()
        .await
}
