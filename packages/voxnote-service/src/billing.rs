use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, NoteService, Result};
use voxnote_storage::queries;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubscriptionUpdate {
	pub user_id: Uuid,
	pub subscription_status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubscriptionUpdateResponse {
	pub success: bool,
}

impl NoteService {
	/// Records a subscription status pushed by the billing provider's webhook (or set by an
	/// operator through the admin surface), creating the profile row if it does not exist.
	pub async fn apply_subscription_update(
		&self,
		update: SubscriptionUpdate,
	) -> Result<SubscriptionUpdateResponse> {
		let status = update.subscription_status.trim();

		if status.is_empty() {
			return Err(Error::InvalidRequest {
				message: "subscription_status is required.".to_string(),
			});
		}

		let now = OffsetDateTime::now_utc();

		queries::upsert_subscription(&self.db, update.user_id, status, now).await?;

		tracing::info!(user_id = %update.user_id, subscription_status = %status, "Subscription status updated.");

		Ok(SubscriptionUpdateResponse { success: true })
	}
}
