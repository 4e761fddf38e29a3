use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, NoteService, Result};
use voxnote_domain::quota;
use voxnote_storage::queries;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteNoteRequest {
	pub id: Uuid,
	pub user_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteNoteResponse {
	pub success: bool,
}

impl NoteService {
	/// Removes the row matching both the note id and the target owner. The client-supplied
	/// `user_id` is honored only when the verified identity matches it or carries the admin
	/// role.
	pub async fn delete_note(
		&self,
		bearer: &str,
		req: DeleteNoteRequest,
	) -> Result<DeleteNoteResponse> {
		let identity = self.authenticate(bearer).await?;

		if identity.user_id != req.user_id && !quota::is_admin_role(&identity.role) {
			return Err(Error::Forbidden {
				message: "Cannot delete another user's note.".to_string(),
			});
		}

		let removed = queries::delete_note(&self.db, req.id, req.user_id).await?;

		if removed == 0 {
			return Err(Error::NotFound { message: "Note not found.".to_string() });
		}

		tracing::info!(note_id = %req.id, user_id = %req.user_id, "Note deleted.");

		Ok(DeleteNoteResponse { success: true })
	}
}
