//! Retry with exponential backoff for registry HTTP calls.
//!
//! Retries transport errors and `429 Too Many Requests`. Every other
//! response, success or not, is returned to the caller on first receipt.

use std::time::Duration;

/// Total attempts, including the first.
pub(crate) const MAX_ATTEMPTS: u32 = 3;

/// Base delay between attempts (doubles each time: 200ms, 400ms).
const BASE_DELAY_MS: u64 = 200;

/// Send a request, retrying transport failures and 429 responses.
///
/// The last attempt's outcome is returned as-is, so a persistent 429
/// reaches the caller as a response.
pub(crate) async fn retry_send<F, Fut>(f: F) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    for attempt in 0..MAX_ATTEMPTS - 1 {
        let delay = Duration::from_millis(BASE_DELAY_MS * 2u64.pow(attempt));
        match f().await {
            Ok(resp) if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS => {
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts = MAX_ATTEMPTS,
                    "registry rate-limited the request, retrying in {delay:?}"
                );
            }
            Ok(resp) => return Ok(resp),
            Err(e) => {
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts = MAX_ATTEMPTS,
                    "registry HTTP request failed, retrying in {delay:?}: {e}"
                );
            }
        }
        tokio::time::sleep(delay).await;
    }
    f().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn retry_exhausts_all_attempts_on_transport_failure() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = call_count.clone();

        let result = retry_send(|| {
            let cc = cc.clone();
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                // Closed port: connection refused.
                reqwest::Client::builder()
                    .timeout(Duration::from_millis(50))
                    .build()
                    .unwrap()
                    .get("http://127.0.0.1:1/")
                    .send()
                    .await
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(call_count.load(Ordering::SeqCst), MAX_ATTEMPTS);
    }
}
