//! Fixed-size concurrent batches with a pause in between.

use std::future::Future;
use std::time::Duration;

use futures::future::join_all;

/// Runs `op` over `items`, `batch_size` at a time, sleeping `delay` between
/// batches (not after the last). Results keep input order.
pub async fn run_in_batches<T, R, F, Fut>(
    items: Vec<T>,
    batch_size: usize,
    delay: Duration,
    mut op: F,
) -> Vec<R>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = R>,
{
    let batch_size = batch_size.max(1);
    let mut results = Vec::with_capacity(items.len());
    let mut remaining = items.into_iter().peekable();
    let mut batch_no = 0usize;

    while remaining.peek().is_some() {
        batch_no += 1;
        let batch: Vec<Fut> = remaining.by_ref().take(batch_size).map(&mut op).collect();
        tracing::debug!(batch = batch_no, size = batch.len(), "running scan batch");
        results.extend(join_all(batch).await);

        if remaining.peek().is_some() && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
    results
}
