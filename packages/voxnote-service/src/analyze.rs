use serde::{Deserialize, Serialize};

use crate::{Error, NoteService, Result};
use voxnote_domain::summary;
use voxnote_providers::summarizer::CompletionOptions;

/// Applied when tag generation fails or produces nothing usable. Summary generation has no
/// such fallback; an unusable summary aborts the operation.
pub const DEFAULT_TAG: &str = "General";

const SUMMARY_PROMPT: &str = "Summarize the following voice note transcript as short bullet \
	points. Each point must capture one key idea. Reply with the bullet points only.";
const TAG_PROMPT: &str = "Suggest a category tag of one or two words for the following note \
	summary. Reply with the tag only.";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalyzeRequest {
	#[serde(default)]
	pub text: Option<String>,
	#[serde(default)]
	pub transcription: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
	pub success: bool,
	pub summary: Vec<String>,
	#[serde(rename = "suggestedTag")]
	pub suggested_tag: String,
}

impl NoteService {
	/// Turns a transcript into bullet-point summary segments plus a suggested category tag.
	/// Two model calls: one for the summary, one (lower temperature, capped output) for the
	/// tag.
	pub async fn analyze(&self, bearer: &str, req: AnalyzeRequest) -> Result<AnalyzeResponse> {
		self.authenticate(bearer).await?;

		let text = req
			.text
			.or(req.transcription)
			.map(|value| value.trim().to_string())
			.filter(|value| !value.is_empty())
			.ok_or_else(|| Error::InvalidRequest {
				message: "Either text or transcription is required.".to_string(),
			})?;
		let llm = &self.cfg.providers.llm;
		let retry = &self.cfg.providers.retry;
		let summary_prompt = format!("{SUMMARY_PROMPT}\n\n{text}");
		let raw_summary = self
			.providers
			.completion
			.complete(
				llm,
				retry,
				&summary_prompt,
				CompletionOptions { temperature: llm.temperature, max_tokens: None },
			)
			.await?;
		let summary = summary::split_points(&raw_summary);

		if summary.is_empty() {
			return Err(Error::EmptySummary);
		}

		let tag_prompt = format!("{TAG_PROMPT}\n\n{}", summary.join("\n"));
		let suggested_tag = match self
			.providers
			.completion
			.complete(
				llm,
				retry,
				&tag_prompt,
				CompletionOptions {
					temperature: llm.tag_temperature,
					max_tokens: Some(llm.tag_max_tokens),
				},
			)
			.await
		{
			Ok(raw_tag) => {
				let tag = summary::clean_tag(&raw_tag);

				if tag.is_empty() { DEFAULT_TAG.to_string() } else { tag }
			},
			Err(err) => {
				tracing::warn!(error = %err, "Tag generation failed. Using the default tag.");

				DEFAULT_TAG.to_string()
			},
		};

		Ok(AnalyzeResponse { success: true, summary, suggested_tag })
	}
}
