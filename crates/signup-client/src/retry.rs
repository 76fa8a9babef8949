//! Bounded retry for outbound requests.
//!
//! A request is repeated only when it never reached the service (connect
//! failures). Timeouts, HTTP statuses, and body errors go straight back to
//! the caller, so the worst-case wait stays close to one client timeout.

use std::time::Duration;

/// Pause before each retry. One initial attempt plus one per entry.
const BACKOFF_MS: [u64; 3] = [200, 400, 800];

/// Whether a failed send is worth repeating.
pub(crate) fn is_retryable(err: &reqwest::Error) -> bool {
    err.is_connect() && !err.is_timeout()
}

/// Run `send`, repeating it after each retryable failure until the backoff
/// schedule is exhausted.
pub(crate) async fn retry_send<F, Fut>(send: F) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut schedule = BACKOFF_MS.iter().copied().map(Duration::from_millis);
    loop {
        match send().await {
            Err(e) if is_retryable(&e) => {
                let Some(delay) = schedule.next() else {
                    return Err(e);
                };
                tracing::warn!(?delay, error = %e, "could not reach remote service; retrying");
                tokio::time::sleep(delay).await;
            }
            result => return result,
        }
    }
}
