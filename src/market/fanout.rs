//! Per-symbol concurrent fetches joined into one batch result

use crate::api::SharedClient;
use crate::error::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Run `fetch` for every symbol as its own task and join the results.
///
/// Results come back in the order of `symbols`. The first failure ends the
/// batch: the error is returned and the remaining tasks are aborted when the
/// set is dropped.
pub(crate) async fn fan_out<T, F, Fut>(
    client: &SharedClient,
    symbols: &[String],
    fetch: F,
) -> Result<Vec<T>>
where
    T: Send + 'static,
    F: Fn(SharedClient, String) -> Fut,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let mut tasks = JoinSet::new();
    for (index, symbol) in symbols.iter().enumerate() {
        let task = fetch(Arc::clone(client), symbol.clone());
        tasks.spawn(async move { task.await.map(|value| (index, value)) });
    }

    let mut slots: Vec<Option<T>> = (0..symbols.len()).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let (index, value) = joined??;
        slots[index] = Some(value);
    }

    Ok(slots.into_iter().flatten().collect())
}
