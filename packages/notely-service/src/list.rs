use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Note, NotelyService, Result};
use notely_domain::{
	category,
	filter::{self, NoteFilter, NoteQuery},
	note,
};
use notely_storage::{NoteScope, models::NoteRecord};

/// Query parameters of the list view. At most one of `color`, `category`, `tag`, and `date` may
/// be set.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListNotesRequest {
	pub search: Option<String>,
	pub color: Option<String>,
	pub category: Option<String>,
	pub tag: Option<String>,
	pub date: Option<String>,
}

impl NotelyService {
	/// The owner's notes, newest first with pinned notes ahead of the rest.
	pub async fn list_notes(&self, owner_id: Uuid, req: ListNotesRequest) -> Result<Vec<Note>> {
		let filter = NoteFilter::from_params(
			req.color.as_deref(),
			req.category.as_deref(),
			req.tag.as_deref(),
			req.date.as_deref(),
		)?;
		let query = NoteQuery { search: req.search, filter };
		let notes = self.store.list_notes(owner_id, &NoteScope::All).await?;

		Ok(into_notes(query.apply(notes, OffsetDateTime::now_utc())))
	}

	pub async fn notes_by_tag(&self, owner_id: Uuid, tag: &str) -> Result<Vec<Note>> {
		let Some(tag) = note::normalize_tag(tag) else {
			return Err(Error::InvalidRequest { message: "Tag is required.".to_string() });
		};

		self.scoped(owner_id, NoteScope::Tag(tag)).await
	}

	pub async fn notes_by_category(&self, owner_id: Uuid, category: &str) -> Result<Vec<Note>> {
		let Some(category) = category::normalize_category(Some(category)) else {
			return Err(Error::InvalidRequest { message: "Category is required.".to_string() });
		};

		self.scoped(owner_id, NoteScope::Category(category)).await
	}

	/// Every tag the owner uses, most recently edited notes first.
	pub async fn list_tags(&self, owner_id: Uuid) -> Result<Vec<String>> {
		let notes = self.store.list_notes(owner_id, &NoteScope::All).await?;

		Ok(filter::collect_tags(&notes))
	}

	/// Built-in categories followed by any custom ones the owner uses.
	pub async fn list_categories(&self, owner_id: Uuid) -> Result<Vec<String>> {
		let notes = self.store.list_notes(owner_id, &NoteScope::All).await?;
		let mut out =
			category::BUILTIN_CATEGORIES.iter().map(|name| name.to_string()).collect::<Vec<_>>();

		for used in filter::collect_categories(&notes) {
			if !category::is_builtin(&used) {
				out.push(used);
			}
		}

		Ok(out)
	}

	async fn scoped(&self, owner_id: Uuid, scope: NoteScope) -> Result<Vec<Note>> {
		let mut notes = self.store.list_notes(owner_id, &scope).await?;

		filter::sort_pinned_first(&mut notes);

		Ok(into_notes(notes))
	}
}

fn into_notes(records: Vec<NoteRecord>) -> Vec<Note> {
	records.into_iter().map(Note::from).collect()
}
