use std::{future::Future, pin::Pin};

use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Result,
	models::{NoteRecord, SessionRecord, UserRecord},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Which of an owner's notes a listing returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteScope {
	All,
	Tag(String),
	Category(String),
}

/// Persistence for users, sessions, and notes.
///
/// Note reads and writes always carry the owner id; a note owned by someone else behaves exactly
/// like a missing one. Listings are ordered by `updated_at`, newest first.
pub trait Store
where
	Self: Send + Sync,
{
	/// Fails with [`crate::Error::Conflict`] when the email is taken.
	fn insert_user<'a>(&'a self, user: &'a UserRecord) -> BoxFuture<'a, Result<()>>;

	fn get_user<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, Result<Option<UserRecord>>>;

	fn find_user_by_email<'a>(
		&'a self,
		email: &'a str,
	) -> BoxFuture<'a, Result<Option<UserRecord>>>;

	fn update_user_theme<'a>(
		&'a self,
		user_id: Uuid,
		theme: &'a str,
	) -> BoxFuture<'a, Result<Option<UserRecord>>>;

	fn insert_session<'a>(&'a self, session: &'a SessionRecord) -> BoxFuture<'a, Result<()>>;

	fn find_session<'a>(
		&'a self,
		token_hash: &'a str,
	) -> BoxFuture<'a, Result<Option<SessionRecord>>>;

	fn delete_session<'a>(&'a self, token_hash: &'a str) -> BoxFuture<'a, Result<bool>>;

	/// Removes sessions that expired at or before `now` and returns how many were dropped.
	fn purge_expired_sessions<'a>(&'a self, now: OffsetDateTime) -> BoxFuture<'a, Result<u64>>;

	/// Fails with [`crate::Error::Conflict`] when the note id is taken by any owner.
	fn insert_note<'a>(&'a self, note: &'a NoteRecord) -> BoxFuture<'a, Result<()>>;

	fn get_note<'a>(
		&'a self,
		owner_id: Uuid,
		note_id: &'a str,
	) -> BoxFuture<'a, Result<Option<NoteRecord>>>;

	fn list_notes<'a>(
		&'a self,
		owner_id: Uuid,
		scope: &'a NoteScope,
	) -> BoxFuture<'a, Result<Vec<NoteRecord>>>;

	/// Replaces the stored note matching `note.note_id` and `note.owner_id`. Returns `false`
	/// when there is no such note. `created_at` is never changed.
	fn update_note<'a>(&'a self, note: &'a NoteRecord) -> BoxFuture<'a, Result<bool>>;

	fn delete_note<'a>(&'a self, owner_id: Uuid, note_id: &'a str)
	-> BoxFuture<'a, Result<bool>>;
}
