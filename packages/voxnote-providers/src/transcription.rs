//! Client for the transcription provider: raw-byte upload, job submission, and the
//! fixed-interval status poll.

use std::time::Duration;

use reqwest::{Client, header::CONTENT_TYPE};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use voxnote_config::{Retry, TranscriptionProviderConfig};

use crate::{Error, Result, retry};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobStatus {
	Queued,
	Processing,
	Completed { text: String },
	Failed { message: String },
}

/// Forwards raw audio bytes to the provider's ingest endpoint and returns its opaque upload
/// handle. Wrapped in backoff; a non-success upstream status is preserved verbatim so the
/// caller can propagate it.
pub async fn upload(
	cfg: &TranscriptionProviderConfig,
	retry_cfg: &Retry,
	content_type: &str,
	bytes: Vec<u8>,
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.upload_path);

	retry::with_backoff(retry_cfg, || {
		let client = client.clone();
		let url = url.clone();
		let body = bytes.clone();

		async move {
			let res = client
				.post(&url)
				.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
				.header(CONTENT_TYPE, content_type)
				.body(body)
				.send()
				.await?;
			let status = res.status();

			if !status.is_success() {
				let message = res.text().await.unwrap_or_default();

				return Err(Error::Upstream { status: status.as_u16(), message });
			}

			let json: Value = res.json().await?;

			parse_upload_response(json)
		}
	})
	.await
}

/// Submits a transcription job for previously uploaded audio, then polls its status on a
/// fixed cadence until completion, provider error, cancellation, or the attempt budget runs
/// out. The upstream job is never cancelled, merely abandoned.
pub async fn transcribe(
	cfg: &TranscriptionProviderConfig,
	audio_url: &str,
	cancel: &CancellationToken,
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let job_id = submit(&client, cfg, audio_url).await?;
	let interval = Duration::from_millis(cfg.poll_interval_ms);

	for attempt in 1..=cfg.max_poll_attempts {
		match fetch_job(&client, cfg, &job_id).await? {
			JobStatus::Completed { text } => return Ok(text),
			JobStatus::Failed { message } => return Err(Error::TranscriptFailed { message }),
			JobStatus::Queued | JobStatus::Processing => {
				tracing::debug!(%job_id, attempt, "Transcript is not ready yet.");
			},
		}

		if attempt < cfg.max_poll_attempts && !wait_or_cancelled(interval, cancel).await {
			return Err(Error::Cancelled);
		}
	}

	Err(Error::PollBudgetExhausted { attempts: cfg.max_poll_attempts })
}

async fn submit(
	client: &Client,
	cfg: &TranscriptionProviderConfig,
	audio_url: &str,
) -> Result<String> {
	let url = format!("{}{}", cfg.api_base, cfg.transcript_path);
	let body = serde_json::json!({ "audio_url": audio_url });
	let res = client
		.post(&url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_submit_response(json)
}

async fn fetch_job(
	client: &Client,
	cfg: &TranscriptionProviderConfig,
	job_id: &str,
) -> Result<JobStatus> {
	let url = format!("{}{}/{job_id}", cfg.api_base, cfg.transcript_path);
	let res = client
		.get(&url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_job_status(json)
}

/// Returns `false` when the token fired before the interval elapsed.
async fn wait_or_cancelled(interval: Duration, cancel: &CancellationToken) -> bool {
	tokio::select! {
		_ = cancel.cancelled() => false,
		_ = tokio::time::sleep(interval) => true,
	}
}

fn parse_upload_response(json: Value) -> Result<String> {
	json.get("upload_url")
		.and_then(|v| v.as_str())
		.filter(|handle| !handle.is_empty())
		.map(ToString::to_string)
		.ok_or_else(|| Error::InvalidResponse {
			message: "Upload response is missing upload_url.".to_string(),
		})
}

fn parse_submit_response(json: Value) -> Result<String> {
	json.get("id")
		.and_then(|v| v.as_str())
		.filter(|id| !id.is_empty())
		.map(ToString::to_string)
		.ok_or_else(|| Error::InvalidResponse {
			message: "Transcript submission response is missing id.".to_string(),
		})
}

fn parse_job_status(json: Value) -> Result<JobStatus> {
	let status = json.get("status").and_then(|v| v.as_str()).ok_or_else(|| {
		Error::InvalidResponse { message: "Transcript response is missing status.".to_string() }
	})?;

	match status {
		"queued" => Ok(JobStatus::Queued),
		"processing" => Ok(JobStatus::Processing),
		"completed" => {
			let text =
				json.get("text").and_then(|v| v.as_str()).unwrap_or_default().to_string();

			Ok(JobStatus::Completed { text })
		},
		"error" => {
			let message = json
				.get("error")
				.and_then(|v| v.as_str())
				.unwrap_or("Transcription failed upstream.")
				.to_string();

			Ok(JobStatus::Failed { message })
		},
		other =>
			Err(Error::InvalidResponse { message: format!("Unknown transcript status: {other}.") }),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_upload_handle() {
		let json = serde_json::json!({ "upload_url": "https://cdn.test/upload/abc" });

		assert_eq!(
			parse_upload_response(json).expect("parse failed"),
			"https://cdn.test/upload/abc"
		);
	}

	#[test]
	fn rejects_empty_upload_handle() {
		let json = serde_json::json!({ "upload_url": "" });

		assert!(parse_upload_response(json).is_err());
	}

	#[test]
	fn parses_job_status_variants() {
		let queued = serde_json::json!({ "status": "queued" });
		let completed = serde_json::json!({ "status": "completed", "text": "hello world" });
		let failed = serde_json::json!({ "status": "error", "error": "bad audio" });

		assert_eq!(parse_job_status(queued).expect("parse failed"), JobStatus::Queued);
		assert_eq!(
			parse_job_status(completed).expect("parse failed"),
			JobStatus::Completed { text: "hello world".to_string() }
		);
		assert_eq!(
			parse_job_status(failed).expect("parse failed"),
			JobStatus::Failed { message: "bad audio".to_string() }
		);
	}

	#[test]
	fn completed_without_text_is_empty_transcript() {
		let json = serde_json::json!({ "status": "completed" });

		assert_eq!(
			parse_job_status(json).expect("parse failed"),
			JobStatus::Completed { text: String::new() }
		);
	}

	#[test]
	fn unknown_status_is_rejected() {
		let json = serde_json::json!({ "status": "exploded" });

		assert!(parse_job_status(json).is_err());
	}

	#[tokio::test]
	async fn cancelled_token_stops_the_wait() {
		let cancel = CancellationToken::new();

		cancel.cancel();

		assert!(!wait_or_cancelled(Duration::from_secs(30), &cancel).await);
	}
}
