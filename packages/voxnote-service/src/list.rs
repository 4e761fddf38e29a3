use serde::{Deserialize, Serialize};

use crate::{NoteService, NoteView, Result};
use voxnote_storage::queries;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListNotesResponse {
	pub notes: Vec<NoteView>,
}

impl NoteService {
	pub async fn list_notes(&self, bearer: &str) -> Result<ListNotesResponse> {
		let identity = self.authenticate(bearer).await?;
		let notes = queries::list_notes(&self.db, identity.user_id).await?;

		Ok(ListNotesResponse { notes: notes.into_iter().map(NoteView::from).collect() })
	}
}
