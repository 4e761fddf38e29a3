use std::{future::Future, time::Duration};

use voxnote_config::Retry;

use crate::Result;

/// Runs `op` up to `retry.max_attempts` times, sleeping between attempts with a delay that
/// doubles each time, starting from `retry.base_delay_ms`. The last error wins.
pub async fn with_backoff<T, F, Fut>(retry: &Retry, mut op: F) -> Result<T>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let attempts = retry.max_attempts.max(1);
	let mut delay = Duration::from_millis(retry.base_delay_ms);
	let mut attempt = 0;

	loop {
		attempt += 1;

		match op().await {
			Ok(value) => return Ok(value),
			Err(err) => {
				if attempt >= attempts {
					return Err(err);
				}

				tracing::warn!(error = %err, attempt, "Provider call failed. Retrying.");
				tokio::time::sleep(delay).await;

				delay = delay.saturating_mul(2);
			},
		}
	}
}
