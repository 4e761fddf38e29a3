use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub quota: Quota,
	pub upload: Upload,
	pub billing: Billing,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	/// Base URL under which previously uploaded audio files are publicly reachable. Used to
	/// resolve a bare `filename` into a provider-fetchable URL.
	pub public_url: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub transcription: TranscriptionProviderConfig,
	pub llm: LlmProviderConfig,
	pub identity: IdentityProviderConfig,
	pub retry: Retry,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptionProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub upload_path: String,
	pub transcript_path: String,
	pub timeout_ms: u64,
	pub poll_interval_ms: u64,
	pub max_poll_attempts: u32,
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub tag_temperature: f32,
	pub tag_max_tokens: u32,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct IdentityProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}

/// Backoff policy for the outbound LLM calls and the transcription upload. The delay doubles
/// on every attempt, starting from `base_delay_ms`.
#[derive(Debug, Deserialize)]
pub struct Retry {
	pub max_attempts: u32,
	pub base_delay_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Quota {
	pub free_note_limit: i64,
}

#[derive(Debug, Deserialize)]
pub struct Upload {
	pub max_upload_bytes: u64,
}

#[derive(Debug, Deserialize)]
pub struct Billing {
	pub webhook_secret: String,
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
}
