use sqlx::{Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Result,
	db::Db,
	models::{Note, UserProfile},
};

pub struct NewNote<'a> {
	pub user_id: Uuid,
	pub title: &'a str,
	pub content: &'a str,
	pub summary: Option<&'a str>,
	pub tag: Option<&'a str>,
}

pub async fn insert_note_tx(tx: &mut Transaction<'_, Postgres>, new: &NewNote<'_>) -> Result<Note> {
	let note = sqlx::query_as::<_, Note>(
		"\
INSERT INTO notes (user_id, title, content, summary, tag)
VALUES ($1, $2, $3, $4, $5)
RETURNING *",
	)
	.bind(new.user_id)
	.bind(new.title)
	.bind(new.content)
	.bind(new.summary)
	.bind(new.tag)
	.fetch_one(&mut **tx)
	.await?;

	Ok(note)
}

pub async fn list_notes(db: &Db, user_id: Uuid) -> Result<Vec<Note>> {
	let notes = sqlx::query_as::<_, Note>(
		"SELECT * FROM notes WHERE user_id = $1 ORDER BY created_at DESC",
	)
	.bind(user_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(notes)
}

/// Applies a partial edit to the caller's own note. Absent fields keep their current value.
pub async fn update_note(
	db: &Db,
	id: Uuid,
	user_id: Uuid,
	title: Option<&str>,
	content: Option<&str>,
	tag: Option<&str>,
	now: OffsetDateTime,
) -> Result<Option<Note>> {
	let note = sqlx::query_as::<_, Note>(
		"\
UPDATE notes
SET
	title = COALESCE($3, title),
	content = COALESCE($4, content),
	tag = COALESCE($5, tag),
	updated_at = $6
WHERE id = $1 AND user_id = $2
RETURNING *",
	)
	.bind(id)
	.bind(user_id)
	.bind(title)
	.bind(content)
	.bind(tag)
	.bind(now)
	.fetch_optional(&db.pool)
	.await?;

	Ok(note)
}

/// Deletes the row matching both `id` and `user_id`. Returns the number of rows removed so
/// callers can distinguish a miss from a hit.
pub async fn delete_note(db: &Db, id: Uuid, user_id: Uuid) -> Result<u64> {
	let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
		.bind(id)
		.bind(user_id)
		.execute(&db.pool)
		.await?;

	Ok(result.rows_affected())
}

pub async fn fetch_profile(db: &Db, user_id: Uuid) -> Result<Option<UserProfile>> {
	let profile =
		sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE user_id = $1")
			.bind(user_id)
			.fetch_optional(&db.pool)
			.await?;

	Ok(profile)
}

pub async fn fetch_profile_tx(
	tx: &mut Transaction<'_, Postgres>,
	user_id: Uuid,
) -> Result<Option<UserProfile>> {
	let profile =
		sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE user_id = $1")
			.bind(user_id)
			.fetch_optional(&mut **tx)
			.await?;

	Ok(profile)
}

/// Lazily creates the quota row the first time a user needs one.
pub async fn ensure_profile_tx(tx: &mut Transaction<'_, Postgres>, user_id: Uuid) -> Result<()> {
	sqlx::query("INSERT INTO user_profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
		.bind(user_id)
		.execute(&mut **tx)
		.await?;

	Ok(())
}

/// Conditionally claims one unit of free-tier quota. The increment and the limit check are a
/// single statement, so two concurrent creations cannot both pass the check before either
/// increments. Returns the new count, or `None` when the limit is already reached.
pub async fn try_increment_free_notes_tx(
	tx: &mut Transaction<'_, Postgres>,
	user_id: Uuid,
	limit: i64,
	now: OffsetDateTime,
) -> Result<Option<i64>> {
	let count = sqlx::query_scalar::<_, i64>(
		"\
UPDATE user_profiles
SET free_notes_count = free_notes_count + 1, updated_at = $3
WHERE user_id = $1 AND free_notes_count < $2
RETURNING free_notes_count",
	)
	.bind(user_id)
	.bind(limit)
	.bind(now)
	.fetch_optional(&mut **tx)
	.await?;

	Ok(count)
}

/// Billing-webhook path: creates the profile row if needed and records the new status.
pub async fn upsert_subscription(
	db: &Db,
	user_id: Uuid,
	subscription_status: &str,
	now: OffsetDateTime,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO user_profiles (user_id, subscription_status)
VALUES ($1, $2)
ON CONFLICT (user_id) DO UPDATE
SET subscription_status = EXCLUDED.subscription_status, updated_at = $3",
	)
	.bind(user_id)
	.bind(subscription_status)
	.bind(now)
	.execute(&db.pool)
	.await?;

	Ok(())
}
