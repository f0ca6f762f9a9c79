use std::future::Future;
use std::time::Duration;

/// Re-fetches a value every `interval` until `is_terminal` accepts it.
///
/// `initial` is checked first, so no wait happens when it is already
/// terminal. There is no timeout: the loop ends only on a terminal value or
/// a fetch error.
pub async fn poll_until<T, E, F, Fut, P>(
    initial: T,
    interval: Duration,
    mut fetch: F,
    is_terminal: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&T) -> bool,
{
    let mut current = initial;
    while !is_terminal(&current) {
        tokio::time::sleep(interval).await;
        current = fetch().await?;
    }
    Ok(current)
}
