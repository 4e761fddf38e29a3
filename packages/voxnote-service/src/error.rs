pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Unauthorized: {message}")]
	Unauthorized { message: String },
	#[error("Forbidden: {message}")]
	Forbidden { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Free note limit of {limit} reached.")]
	QuotaExceeded { limit: i64 },
	#[error("No summary points extracted.")]
	EmptySummary,
	#[error("Upstream returned status {status}: {message}")]
	Upstream { status: u16, message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Transcription timed out after {attempts} poll attempts.")]
	PollTimeout { attempts: u32 },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
impl From<voxnote_storage::Error> for Error {
	fn from(err: voxnote_storage::Error) -> Self {
		match err {
			voxnote_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			voxnote_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			voxnote_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}
impl From<voxnote_providers::Error> for Error {
	fn from(err: voxnote_providers::Error) -> Self {
		match err {
			voxnote_providers::Error::Unauthorized => Self::Unauthorized {
				message: "Bearer credential was rejected by the identity provider.".to_string(),
			},
			voxnote_providers::Error::Upstream { status, message } =>
				Self::Upstream { status, message },
			voxnote_providers::Error::TranscriptFailed { message } => Self::Provider { message },
			voxnote_providers::Error::PollBudgetExhausted { attempts } =>
				Self::PollTimeout { attempts },
			other => Self::Provider { message: other.to_string() },
		}
	}
}
