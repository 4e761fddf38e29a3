use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, NoteService, Result};
use voxnote_domain::media;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadAudioResponse {
	pub success: bool,
	pub filename: String,
	#[serde(rename = "uploadUrl")]
	pub upload_url: String,
}

impl NoteService {
	/// Accepts a raw audio/video payload and forwards it to the transcription provider's
	/// ingest endpoint. The returned handle is the input of the transcription step.
	pub async fn upload_audio(
		&self,
		bearer: &str,
		content_type: &str,
		bytes: Vec<u8>,
	) -> Result<UploadAudioResponse> {
		self.authenticate(bearer).await?;

		if !media::is_supported_media_type(content_type) {
			return Err(Error::InvalidRequest {
				message: format!("Unsupported content type: {content_type}."),
			});
		}
		if bytes.is_empty() {
			return Err(Error::InvalidRequest { message: "Audio payload is empty.".to_string() });
		}

		let max_bytes = self.cfg.upload.max_upload_bytes;

		if bytes.len() as u64 > max_bytes {
			return Err(Error::InvalidRequest {
				message: format!("Audio payload exceeds the {max_bytes} byte limit."),
			});
		}

		let filename = format!("{}.{}", Uuid::new_v4(), media::extension_for(content_type));
		let upload_url = self
			.providers
			.transcription
			.upload(
				&self.cfg.providers.transcription,
				&self.cfg.providers.retry,
				content_type,
				bytes,
			)
			.await?;

		tracing::info!(%filename, "Audio payload forwarded to the transcription provider.");

		Ok(UploadAudioResponse { success: true, filename, upload_url })
	}
}
