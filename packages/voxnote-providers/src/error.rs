pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error("{message}")]
	InvalidResponse { message: String },
	#[error("Bearer credential was rejected by the identity provider.")]
	Unauthorized,
	#[error("Upstream returned status {status}: {message}")]
	Upstream { status: u16, message: String },
	#[error("Transcription failed: {message}")]
	TranscriptFailed { message: String },
	#[error("Transcription did not complete within {attempts} poll attempts.")]
	PollBudgetExhausted { attempts: u32 },
	#[error("Operation was cancelled before it completed.")]
	Cancelled,
}
