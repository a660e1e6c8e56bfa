//! JSON-file backend.
//!
//! The whole store lives in one document shaped as `{ "notes": [...], "users": [...],
//! "sessions": [...] }`. Every mutation rewrites the file through a sibling temp file and a rename,
//! so readers never observe a half-written document. Without a path the store is memory only.

use std::{
	ffi::OsString,
	io::ErrorKind,
	path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
	BoxFuture, Error, NoteScope, Result, Store,
	models::{NoteRecord, SessionRecord, UserRecord},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Document {
	#[serde(default)]
	notes: Vec<NoteRecord>,
	#[serde(default)]
	users: Vec<UserRecord>,
	#[serde(default)]
	sessions: Vec<SessionRecord>,
}

pub struct LocalStore {
	path: Option<PathBuf>,
	doc: Mutex<Document>,
}
impl LocalStore {
	pub fn in_memory() -> Self {
		Self { path: None, doc: Mutex::new(Document::default()) }
	}

	/// Opens the document at `path`. A missing file starts an empty store.
	pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
		let path = path.into();
		let doc = match tokio::fs::read(&path).await {
			Ok(bytes) => serde_json::from_slice(&bytes)
				.map_err(|source| Error::Decode { path: path.clone(), source })?,
			Err(err) if err.kind() == ErrorKind::NotFound => Document::default(),
			Err(source) => return Err(Error::Io { path, source }),
		};

		tracing::info!(
			path = %path.display(),
			notes = doc.notes.len(),
			users = doc.users.len(),
			"Opened local store."
		);

		Ok(Self { path: Some(path), doc: Mutex::new(doc) })
	}

	pub async fn from_config(cfg: &notely_config::Local) -> Result<Self> {
		match cfg.path.as_ref() {
			Some(path) => Self::open(path.clone()).await,
			None => Ok(Self::in_memory()),
		}
	}

	async fn read<T>(&self, f: impl FnOnce(&Document) -> T) -> T {
		let doc = self.doc.lock().await;

		f(&*doc)
	}

	/// Applies `f` to a copy of the document and only keeps the copy once it is on disk.
	async fn write<T>(&self, f: impl FnOnce(&mut Document) -> Result<T>) -> Result<T> {
		let mut doc = self.doc.lock().await;
		let mut next = doc.clone();
		let out = f(&mut next)?;

		if let Some(path) = self.path.as_deref() {
			persist(path, &next).await?;
		}

		*doc = next;

		Ok(out)
	}
}

async fn persist(path: &Path, doc: &Document) -> Result<()> {
	let bytes = serde_json::to_vec_pretty(doc)
		.map_err(|source| Error::Encode { path: path.to_path_buf(), source })?;
	let io_err = |source| Error::Io { path: path.to_path_buf(), source };

	if let Some(parent) = path.parent()
		&& !parent.as_os_str().is_empty()
	{
		tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
	}

	let mut tmp = OsString::from(path.as_os_str());

	tmp.push(".tmp");

	let tmp = PathBuf::from(tmp);

	tokio::fs::write(&tmp, bytes).await.map_err(io_err)?;
	tokio::fs::rename(&tmp, path).await.map_err(io_err)?;

	Ok(())
}

fn owned_note<'a>(
	notes: &'a [NoteRecord],
	owner_id: Uuid,
	note_id: &str,
) -> Option<&'a NoteRecord> {
	notes.iter().find(|note| note.note_id == note_id && note.owner_id == owner_id)
}

impl Store for LocalStore {
	fn insert_user<'a>(&'a self, user: &'a UserRecord) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.write(move |doc| {
			if doc.users.iter().any(|existing| existing.email == user.email) {
				return Err(Error::Conflict("Email is already registered.".to_string()));
			}

			doc.users.push(user.clone());

			Ok(())
		}))
	}

	fn get_user<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, Result<Option<UserRecord>>> {
		Box::pin(async move {
			Ok(self
				.read(|doc| doc.users.iter().find(|user| user.user_id == user_id).cloned())
				.await)
		})
	}

	fn find_user_by_email<'a>(
		&'a self,
		email: &'a str,
	) -> BoxFuture<'a, Result<Option<UserRecord>>> {
		Box::pin(async move {
			Ok(self.read(|doc| doc.users.iter().find(|user| user.email == email).cloned()).await)
		})
	}

	fn update_user_theme<'a>(
		&'a self,
		user_id: Uuid,
		theme: &'a str,
	) -> BoxFuture<'a, Result<Option<UserRecord>>> {
		Box::pin(self.write(move |doc| {
			let Some(user) = doc.users.iter_mut().find(|user| user.user_id == user_id) else {
				return Ok(None);
			};

			user.theme = theme.to_string();

			Ok(Some(user.clone()))
		}))
	}

	fn insert_session<'a>(&'a self, session: &'a SessionRecord) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.write(move |doc| {
			if doc.sessions.iter().any(|existing| existing.token_hash == session.token_hash) {
				return Err(Error::Conflict("Session token collision.".to_string()));
			}

			doc.sessions.push(session.clone());

			Ok(())
		}))
	}

	fn find_session<'a>(
		&'a self,
		token_hash: &'a str,
	) -> BoxFuture<'a, Result<Option<SessionRecord>>> {
		Box::pin(async move {
			Ok(self
				.read(|doc| {
					doc.sessions.iter().find(|session| session.token_hash == token_hash).cloned()
				})
				.await)
		})
	}

	fn delete_session<'a>(&'a self, token_hash: &'a str) -> BoxFuture<'a, Result<bool>> {
		Box::pin(self.write(move |doc| {
			let before = doc.sessions.len();

			doc.sessions.retain(|session| session.token_hash != token_hash);

			Ok(doc.sessions.len() < before)
		}))
	}

	fn purge_expired_sessions<'a>(&'a self, now: OffsetDateTime) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move {
			let expired = self
				.read(|doc| doc.sessions.iter().filter(|session| session.expires_at <= now).count())
				.await;

			if expired == 0 {
				return Ok(0);
			}

			self.write(move |doc| {
				let before = doc.sessions.len();

				doc.sessions.retain(|session| session.expires_at > now);

				Ok((before - doc.sessions.len()) as u64)
			})
			.await
		})
	}

	fn insert_note<'a>(&'a self, note: &'a NoteRecord) -> BoxFuture<'a, Result<()>> {
		Box::pin(self.write(move |doc| {
			if doc.notes.iter().any(|existing| existing.note_id == note.note_id) {
				return Err(Error::Conflict("Note id is already in use.".to_string()));
			}

			doc.notes.push(note.clone());

			Ok(())
		}))
	}

	fn get_note<'a>(
		&'a self,
		owner_id: Uuid,
		note_id: &'a str,
	) -> BoxFuture<'a, Result<Option<NoteRecord>>> {
		Box::pin(async move {
			Ok(self.read(|doc| owned_note(&doc.notes, owner_id, note_id).cloned()).await)
		})
	}

	fn list_notes<'a>(
		&'a self,
		owner_id: Uuid,
		scope: &'a NoteScope,
	) -> BoxFuture<'a, Result<Vec<NoteRecord>>> {
		Box::pin(async move {
			let mut notes = self
				.read(|doc| {
					doc.notes
						.iter()
						.filter(|note| note.owner_id == owner_id)
						.filter(|note| match scope {
							NoteScope::All => true,
							NoteScope::Tag(tag) => note.tags.contains(tag),
							NoteScope::Category(category) =>
								note.category.as_deref() == Some(category.as_str()),
						})
						.cloned()
						.collect::<Vec<_>>()
				})
				.await;

			notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

			Ok(notes)
		})
	}

	fn update_note<'a>(&'a self, note: &'a NoteRecord) -> BoxFuture<'a, Result<bool>> {
		Box::pin(self.write(move |doc| {
			let Some(existing) = doc.notes.iter_mut().find(|existing| {
				existing.note_id == note.note_id && existing.owner_id == note.owner_id
			}) else {
				return Ok(false);
			};
			let created_at = existing.created_at;

			*existing = NoteRecord { created_at, ..note.clone() };

			Ok(true)
		}))
	}

	fn delete_note<'a>(
		&'a self,
		owner_id: Uuid,
		note_id: &'a str,
	) -> BoxFuture<'a, Result<bool>> {
		Box::pin(self.write(move |doc| {
			let before = doc.notes.len();

			doc.notes.retain(|note| !(note.note_id == note_id && note.owner_id == owner_id));

			Ok(doc.notes.len() < before)
		}))
	}
}
