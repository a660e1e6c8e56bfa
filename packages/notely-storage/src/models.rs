use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use notely_domain::filter::NoteFields;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
	#[serde(rename = "id")]
	pub note_id: String,
	#[serde(rename = "userId")]
	pub owner_id: Uuid,
	pub title: String,
	pub content: String,
	pub content_state: Option<String>,
	pub color: String,
	#[serde(default)]
	pub pinned: bool,
	#[serde(default)]
	pub tags: Vec<String>,
	pub category: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl NoteFields for NoteRecord {
	fn title(&self) -> &str {
		&self.title
	}

	fn content(&self) -> &str {
		&self.content
	}

	fn color(&self) -> &str {
		&self.color
	}

	fn category(&self) -> Option<&str> {
		self.category.as_deref()
	}

	fn tags(&self) -> &[String] {
		&self.tags
	}

	fn pinned(&self) -> bool {
		self.pinned
	}

	fn created_at(&self) -> OffsetDateTime {
		self.created_at
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
	#[serde(rename = "id")]
	pub user_id: Uuid,
	pub email: String,
	pub display_name: Option<String>,
	pub photo_url: Option<String>,
	pub theme: String,
	pub password_hash: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
	/// BLAKE3 hex digest of the bearer token.
	pub token_hash: String,
	pub user_id: Uuid,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub expires_at: OffsetDateTime,
}
