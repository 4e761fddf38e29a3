use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, NoteService, NoteView, Result};
use voxnote_storage::queries;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
	pub id: Uuid,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub content: Option<String>,
	#[serde(default)]
	pub tag: Option<String>,
}

impl NoteService {
	/// Partial edit of the caller's own note. Only title, content, and tag are editable;
	/// absent fields are left untouched.
	pub async fn update_note(&self, bearer: &str, req: UpdateNoteRequest) -> Result<NoteView> {
		let identity = self.authenticate(bearer).await?;

		if req.title.is_none() && req.content.is_none() && req.tag.is_none() {
			return Err(Error::InvalidRequest {
				message: "At least one of title, content, or tag is required.".to_string(),
			});
		}

		for (label, value) in [("title", req.title.as_deref()), ("content", req.content.as_deref())]
		{
			if let Some(value) = value
				&& value.trim().is_empty()
			{
				return Err(Error::InvalidRequest {
					message: format!("{label} must not be empty when provided."),
				});
			}
		}

		let now = OffsetDateTime::now_utc();
		let note = queries::update_note(
			&self.db,
			req.id,
			identity.user_id,
			req.title.as_deref(),
			req.content.as_deref(),
			req.tag.as_deref(),
			now,
		)
		.await?
		.ok_or_else(|| Error::NotFound { message: "Note not found.".to_string() })?;

		Ok(note.into())
	}
}
