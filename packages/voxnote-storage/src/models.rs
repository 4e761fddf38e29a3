use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Note {
	pub id: Uuid,
	pub user_id: Uuid,
	pub title: String,
	pub content: String,
	pub summary: Option<String>,
	pub tag: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserProfile {
	pub user_id: Uuid,
	pub subscription_status: String,
	pub free_notes_count: i64,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
