//! Chat-completion client for the generative-language provider.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use voxnote_config::{LlmProviderConfig, Retry};

use crate::{Error, Result, retry};

#[derive(Clone, Copy, Debug)]
pub struct CompletionOptions {
	pub temperature: f32,
	pub max_tokens: Option<u32>,
}

/// One chat-completion round trip, wrapped in exponential backoff. Returns the raw text of
/// the first choice; callers own any further parsing.
pub async fn complete(
	cfg: &LlmProviderConfig,
	retry_cfg: &Retry,
	prompt: &str,
	opts: CompletionOptions,
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);

	retry::with_backoff(retry_cfg, || {
		let client = client.clone();
		let url = url.clone();

		async move {
			let mut body = serde_json::json!({
				"model": cfg.model,
				"temperature": opts.temperature,
				"messages": [
					{ "role": "user", "content": prompt }
				],
			});

			if let Some(max_tokens) = opts.max_tokens {
				body["max_tokens"] = max_tokens.into();
			}

			let res = client
				.post(&url)
				.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
				.json(&body)
				.send()
				.await?;
			let json: Value = res.error_for_status()?.json().await?;

			parse_completion_response(json)
		}
	})
	.await
}

fn parse_completion_response(json: Value) -> Result<String> {
	json.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.map(ToString::to_string)
		.ok_or_else(|| Error::InvalidResponse {
			message: "Completion response is missing message content.".to_string(),
		})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_choice_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "- one\n- two" } }
			]
		});

		assert_eq!(parse_completion_response(json).expect("parse failed"), "- one\n- two");
	}

	#[test]
	fn missing_content_is_rejected() {
		let json = serde_json::json!({ "choices": [] });

		assert!(parse_completion_response(json).is_err());
	}
}
