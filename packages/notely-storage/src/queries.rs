use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Error, NoteScope, Result,
	db::Db,
	models::{NoteRecord, SessionRecord, UserRecord},
};

const NOTE_COLUMNS: &str = "\
note_id, owner_id, title, content, content_state, color, pinned, tags, category, created_at, \
updated_at";

const USER_COLUMNS: &str =
	"user_id, email, display_name, photo_url, theme, password_hash, created_at";

pub async fn insert_user(db: &Db, user: &UserRecord) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO users (
	user_id,
	email,
	display_name,
	photo_url,
	theme,
	password_hash,
	created_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(user.user_id)
	.bind(user.email.as_str())
	.bind(user.display_name.as_deref())
	.bind(user.photo_url.as_deref())
	.bind(user.theme.as_str())
	.bind(user.password_hash.as_str())
	.bind(user.created_at)
	.execute(&db.pool)
	.await
	.map_err(|err| Error::from_insert(err, "Email is already registered."))?;

	Ok(())
}

pub async fn get_user(db: &Db, user_id: Uuid) -> Result<Option<UserRecord>> {
	let user = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"))
		.bind(user_id)
		.fetch_optional(&db.pool)
		.await?;

	Ok(user)
}

pub async fn find_user_by_email(db: &Db, email: &str) -> Result<Option<UserRecord>> {
	let user = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
		.bind(email)
		.fetch_optional(&db.pool)
		.await?;

	Ok(user)
}

pub async fn update_user_theme(db: &Db, user_id: Uuid, theme: &str) -> Result<Option<UserRecord>> {
	let user = sqlx::query_as(&format!(
		"UPDATE users SET theme = $1 WHERE user_id = $2 RETURNING {USER_COLUMNS}"
	))
	.bind(theme)
	.bind(user_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(user)
}

pub async fn insert_session(db: &Db, session: &SessionRecord) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
VALUES ($1, $2, $3, $4)",
	)
	.bind(session.token_hash.as_str())
	.bind(session.user_id)
	.bind(session.created_at)
	.bind(session.expires_at)
	.execute(&db.pool)
	.await
	.map_err(|err| Error::from_insert(err, "Session token collision."))?;

	Ok(())
}

pub async fn find_session(db: &Db, token_hash: &str) -> Result<Option<SessionRecord>> {
	let session = sqlx::query_as(
		"\
SELECT token_hash, user_id, created_at, expires_at
FROM sessions
WHERE token_hash = $1",
	)
	.bind(token_hash)
	.fetch_optional(&db.pool)
	.await?;

	Ok(session)
}

pub async fn delete_session(db: &Db, token_hash: &str) -> Result<bool> {
	let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
		.bind(token_hash)
		.execute(&db.pool)
		.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn purge_expired_sessions(db: &Db, now: OffsetDateTime) -> Result<u64> {
	let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
		.bind(now)
		.execute(&db.pool)
		.await?;

	Ok(result.rows_affected())
}

pub async fn insert_note(db: &Db, note: &NoteRecord) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO notes (
	note_id,
	owner_id,
	title,
	content,
	content_state,
	color,
	pinned,
	tags,
	category,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
	)
	.bind(note.note_id.as_str())
	.bind(note.owner_id)
	.bind(note.title.as_str())
	.bind(note.content.as_str())
	.bind(note.content_state.as_deref())
	.bind(note.color.as_str())
	.bind(note.pinned)
	.bind(note.tags.as_slice())
	.bind(note.category.as_deref())
	.bind(note.created_at)
	.bind(note.updated_at)
	.execute(&db.pool)
	.await
	.map_err(|err| Error::from_insert(err, "Note id is already in use."))?;

	Ok(())
}

pub async fn get_note(db: &Db, owner_id: Uuid, note_id: &str) -> Result<Option<NoteRecord>> {
	let note = sqlx::query_as(&format!(
		"SELECT {NOTE_COLUMNS} FROM notes WHERE note_id = $1 AND owner_id = $2"
	))
	.bind(note_id)
	.bind(owner_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(note)
}

pub async fn list_notes(db: &Db, owner_id: Uuid, scope: &NoteScope) -> Result<Vec<NoteRecord>> {
	let mut builder = sqlx::QueryBuilder::new(format!(
		"SELECT {NOTE_COLUMNS} FROM notes WHERE owner_id = "
	));

	builder.push_bind(owner_id);

	match scope {
		NoteScope::All => {},
		NoteScope::Tag(tag) => {
			builder.push(" AND ");
			builder.push_bind(tag.as_str());
			builder.push(" = ANY(tags)");
		},
		NoteScope::Category(category) => {
			builder.push(" AND category = ");
			builder.push_bind(category.as_str());
		},
	}

	builder.push(" ORDER BY updated_at DESC");

	let notes = builder.build_query_as().fetch_all(&db.pool).await?;

	Ok(notes)
}

pub async fn update_note(db: &Db, note: &NoteRecord) -> Result<bool> {
	let result = sqlx::query(
		"\
UPDATE notes
SET
	title = $1,
	content = $2,
	content_state = $3,
	color = $4,
	pinned = $5,
	tags = $6,
	category = $7,
	updated_at = $8
WHERE note_id = $9 AND owner_id = $10",
	)
	.bind(note.title.as_str())
	.bind(note.content.as_str())
	.bind(note.content_state.as_deref())
	.bind(note.color.as_str())
	.bind(note.pinned)
	.bind(note.tags.as_slice())
	.bind(note.category.as_deref())
	.bind(note.updated_at)
	.bind(note.note_id.as_str())
	.bind(note.owner_id)
	.execute(&db.pool)
	.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn delete_note(db: &Db, owner_id: Uuid, note_id: &str) -> Result<bool> {
	let result = sqlx::query("DELETE FROM notes WHERE note_id = $1 AND owner_id = $2")
		.bind(note_id)
		.bind(owner_id)
		.execute(&db.pool)
		.await?;

	Ok(result.rows_affected() > 0)
}
