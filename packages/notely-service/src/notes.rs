use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, NotelyService, Result};
use notely_domain::{
	note::{self, NoteDraft, NoteInput},
	rich_text::{self, RawDocument},
};
use notely_storage::models::NoteRecord;

const MAX_NOTE_ID_CHARS: usize = 128;
/// Ids that collide with the static `/api/notes/tags/..` and `/api/notes/categories/..` routes.
const RESERVED_NOTE_IDS: [&str; 2] = ["tags", "categories"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
	pub id: String,
	pub user_id: Uuid,
	pub title: String,
	pub content: String,
	pub content_state: Option<String>,
	pub color: String,
	pub pinned: bool,
	pub tags: Vec<String>,
	pub category: Option<String>,
	#[serde(with = "notely_storage::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "notely_storage::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<NoteRecord> for Note {
	fn from(record: NoteRecord) -> Self {
		Self {
			id: record.note_id,
			user_id: record.owner_id,
			title: record.title,
			content: record.content,
			content_state: record.content_state,
			color: record.color,
			pinned: record.pinned,
			tags: record.tags,
			category: record.category,
			created_at: record.created_at,
			updated_at: record.updated_at,
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateNoteRequest {
	/// Client-chosen id. The service generates a UUID when absent.
	pub id: Option<String>,
	pub title: String,
	pub content: String,
	pub content_state: Option<String>,
	pub color: Option<String>,
	pub tags: Vec<String>,
	pub category: Option<String>,
	#[serde(alias = "isPinned")]
	pub pinned: bool,
}

/// Fields left as `None` keep their stored values. An empty `contentState` or `category` clears
/// it.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateNoteRequest {
	pub title: Option<String>,
	pub content: Option<String>,
	pub content_state: Option<String>,
	pub color: Option<String>,
	pub tags: Option<Vec<String>>,
	pub category: Option<String>,
	#[serde(alias = "isPinned")]
	pub pinned: Option<bool>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PinRequest {
	#[serde(alias = "isPinned")]
	pub pinned: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedNote {
	pub id: String,
	pub html: String,
	pub preview: String,
}

impl NotelyService {
	pub async fn get_note(&self, owner_id: Uuid, note_id: &str) -> Result<Note> {
		Ok(self.load_note(owner_id, note_id).await?.into())
	}

	pub async fn create_note(&self, owner_id: Uuid, req: CreateNoteRequest) -> Result<Note> {
		let note_id = match req.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
			Some(id) => checked_note_id(id)?,
			None => Uuid::new_v4().to_string(),
		};
		let draft = note::prepare(
			NoteInput {
				title: req.title,
				content: req.content,
				content_state: req.content_state,
				color: req.color,
				tags: req.tags,
				category: req.category,
				pinned: req.pinned,
			},
			&self.note_limits(),
		)?;
		let now = OffsetDateTime::now_utc();
		let record = record_from_draft(note_id, owner_id, draft, now, now);

		self.store.insert_note(&record).await?;

		tracing::debug!(owner_id = %owner_id, note_id = %record.note_id, "Created note.");

		Ok(record.into())
	}

	pub async fn update_note(
		&self,
		owner_id: Uuid,
		note_id: &str,
		req: UpdateNoteRequest,
	) -> Result<Note> {
		let existing = self.load_note(owner_id, note_id).await?;
		// A new rich document without new plain text re-derives the plain text from it. A blank
		// document only clears the stored one.
		let new_document =
			req.content_state.as_deref().map(str::trim).is_some_and(|state| !state.is_empty());
		let content = match (req.content, new_document) {
			(Some(content), _) => content,
			(None, true) => String::new(),
			(None, false) => existing.content,
		};
		let draft = note::prepare(
			NoteInput {
				title: req.title.unwrap_or(existing.title),
				content,
				content_state: req.content_state.or(existing.content_state),
				color: req.color.or(Some(existing.color)),
				tags: req.tags.unwrap_or(existing.tags),
				category: req.category.or(existing.category),
				pinned: req.pinned.unwrap_or(existing.pinned),
			},
			&self.note_limits(),
		)?;
		let record = record_from_draft(
			existing.note_id,
			owner_id,
			draft,
			existing.created_at,
			OffsetDateTime::now_utc(),
		);

		if !self.store.update_note(&record).await? {
			return Err(Error::note_not_found());
		}

		tracing::debug!(owner_id = %owner_id, note_id = %record.note_id, "Updated note.");

		Ok(record.into())
	}

	pub async fn set_pinned(&self, owner_id: Uuid, note_id: &str, pinned: bool) -> Result<Note> {
		let mut record = self.load_note(owner_id, note_id).await?;

		record.pinned = pinned;
		record.updated_at = OffsetDateTime::now_utc();

		if !self.store.update_note(&record).await? {
			return Err(Error::note_not_found());
		}

		Ok(record.into())
	}

	pub async fn delete_note(&self, owner_id: Uuid, note_id: &str) -> Result<()> {
		if !self.store.delete_note(owner_id, note_id).await? {
			return Err(Error::note_not_found());
		}

		tracing::debug!(owner_id = %owner_id, note_id, "Deleted note.");

		Ok(())
	}

	/// Display HTML for a note plus a short plain-text preview.
	pub async fn render_note(&self, owner_id: Uuid, note_id: &str) -> Result<RenderedNote> {
		let record = self.load_note(owner_id, note_id).await?;
		let doc = record.content_state.as_deref().and_then(|state| match RawDocument::parse(state) {
			Ok(doc) => Some(doc),
			Err(err) => {
				tracing::warn!(note_id, error = %err, "Stored rich document does not parse.");

				None
			},
		});
		let html = match doc {
			Some(doc) => rich_text::to_html(&doc),
			None => rich_text::plain_text_html(&record.content),
		};
		let preview = rich_text::preview(&record.content, self.cfg.notes.preview_chars as usize);

		Ok(RenderedNote { id: record.note_id, html, preview })
	}

	pub(crate) async fn load_note(&self, owner_id: Uuid, note_id: &str) -> Result<NoteRecord> {
		self.store.get_note(owner_id, note_id).await?.ok_or_else(Error::note_not_found)
	}
}

fn checked_note_id(id: &str) -> Result<String> {
	if id.chars().count() > MAX_NOTE_ID_CHARS || id.chars().any(|c| c.is_whitespace() || c == '/') {
		return Err(Error::InvalidRequest {
			message: format!(
				"Note id must be at most {MAX_NOTE_ID_CHARS} characters without spaces or slashes."
			),
		});
	}

	if RESERVED_NOTE_IDS.contains(&id) {
		return Err(Error::InvalidRequest { message: format!("Note id {id:?} is reserved.") });
	}

	Ok(id.to_string())
}

fn record_from_draft(
	note_id: String,
	owner_id: Uuid,
	draft: NoteDraft,
	created_at: OffsetDateTime,
	updated_at: OffsetDateTime,
) -> NoteRecord {
	NoteRecord {
		note_id,
		owner_id,
		title: draft.title,
		content: draft.content,
		content_state: draft.content_state,
		color: draft.color,
		pinned: draft.pinned,
		tags: draft.tags,
		category: draft.category,
		created_at,
		updated_at,
	}
}
