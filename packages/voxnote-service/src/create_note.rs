use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, NoteService, Result};
use voxnote_domain::quota;
use voxnote_storage::{models::Note, queries};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateNoteRequest {
	pub title: String,
	pub content: String,
	#[serde(default)]
	pub summary: Option<String>,
	#[serde(default)]
	pub tag: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoteView {
	pub id: Uuid,
	pub user_id: Uuid,
	pub title: String,
	pub content: String,
	pub summary: Option<String>,
	pub tag: Option<String>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}
impl From<Note> for NoteView {
	fn from(note: Note) -> Self {
		Self {
			id: note.id,
			user_id: note.user_id,
			title: note.title,
			content: note.content,
			summary: note.summary,
			tag: note.tag,
			created_at: note.created_at,
			updated_at: note.updated_at,
		}
	}
}

impl NoteService {
	/// Persists a note for the verified caller. Admins and active subscribers insert
	/// unconditionally; everyone else claims one unit of free-tier quota in the same
	/// transaction as the insert, so a refused claim leaves no note behind.
	pub async fn create_note(&self, bearer: &str, req: CreateNoteRequest) -> Result<NoteView> {
		let identity = self.authenticate(bearer).await?;
		let title = req.title.trim();
		let content = req.content.trim();

		if title.is_empty() || content.is_empty() {
			return Err(Error::InvalidRequest {
				message: "title and content are required.".to_string(),
			});
		}

		let limit = self.cfg.quota.free_note_limit;
		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await?;
		let exempt = if quota::is_admin_role(&identity.role) {
			true
		} else {
			queries::fetch_profile_tx(&mut tx, identity.user_id)
				.await?
				.map(|profile| quota::has_active_subscription(&profile.subscription_status))
				.unwrap_or(false)
		};

		if !exempt {
			queries::ensure_profile_tx(&mut tx, identity.user_id).await?;

			if queries::try_increment_free_notes_tx(&mut tx, identity.user_id, limit, now)
				.await?
				.is_none()
			{
				return Err(Error::QuotaExceeded { limit });
			}
		}

		let note = queries::insert_note_tx(
			&mut tx,
			&queries::NewNote {
				user_id: identity.user_id,
				title,
				content,
				summary: req.summary.as_deref(),
				tag: req.tag.as_deref(),
			},
		)
		.await?;

		tx.commit().await?;

		tracing::info!(note_id = %note.id, user_id = %note.user_id, "Note created.");

		Ok(note.into())
	}
}
