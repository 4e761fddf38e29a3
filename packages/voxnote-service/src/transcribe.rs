use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::{Error, NoteService, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TranscribeRequest {
	#[serde(default, rename = "uploadUrl")]
	pub upload_url: Option<String>,
	#[serde(default)]
	pub filename: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TranscribeResponse {
	pub transcription: String,
}

impl NoteService {
	/// Submits a transcription job for previously uploaded audio and busy-polls it to
	/// completion. A `filename` is resolved against the configured public base URL; an
	/// `uploadUrl` is used as-is. Dropping `cancel` ends the wait without further polls.
	pub async fn transcribe(
		&self,
		bearer: &str,
		req: TranscribeRequest,
		cancel: &CancellationToken,
	) -> Result<TranscribeResponse> {
		self.authenticate(bearer).await?;

		let audio_url = match (req.upload_url, req.filename) {
			(Some(upload_url), _) if !upload_url.trim().is_empty() => upload_url,
			(_, Some(filename)) if !filename.trim().is_empty() =>
				format!("{}/{}", self.cfg.service.public_url, filename.trim()),
			_ =>
				return Err(Error::InvalidRequest {
					message: "Either uploadUrl or filename is required.".to_string(),
				}),
		};
		let transcription = self
			.providers
			.transcription
			.transcribe(&self.cfg.providers.transcription, &audio_url, cancel)
			.await?;

		Ok(TranscribeResponse { transcription })
	}
}
