use crate::{category, palette, rich_text::RawDocument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectCode {
	EmptyTitle,
	TitleTooLong,
	ContentTooLong,
	TooManyTags,
	TagTooLong,
	InvalidColor,
	InvalidContentState,
}
impl RejectCode {
	pub fn message(self) -> &'static str {
		match self {
			Self::EmptyTitle => "Title is required.",
			Self::TitleTooLong => "Title is too long.",
			Self::ContentTooLong => "Content is too long.",
			Self::TooManyTags => "Too many tags.",
			Self::TagTooLong => "Tag is too long.",
			Self::InvalidColor => "Color must be a palette name or a hex token.",
			Self::InvalidContentState => "contentState is not a valid rich document.",
		}
	}
}

#[derive(Debug, Clone, Copy)]
pub struct NoteLimits {
	pub max_title_chars: usize,
	pub max_content_chars: usize,
	pub max_tags: usize,
	pub max_tag_chars: usize,
}
impl From<&notely_config::Notes> for NoteLimits {
	fn from(cfg: &notely_config::Notes) -> Self {
		Self {
			max_title_chars: cfg.max_title_chars as usize,
			max_content_chars: cfg.max_content_chars as usize,
			max_tags: cfg.max_tags as usize,
			max_tag_chars: cfg.max_tag_chars as usize,
		}
	}
}

/// Fields of a note as a client submitted them.
#[derive(Debug, Clone, Default)]
pub struct NoteInput {
	pub title: String,
	pub content: String,
	pub content_state: Option<String>,
	pub color: Option<String>,
	pub tags: Vec<String>,
	pub category: Option<String>,
	pub pinned: bool,
}

/// Normalized note fields, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
	pub title: String,
	pub content: String,
	pub content_state: Option<String>,
	pub color: String,
	pub tags: Vec<String>,
	pub category: Option<String>,
	pub pinned: bool,
}

pub fn prepare(input: NoteInput, limits: &NoteLimits) -> Result<NoteDraft, RejectCode> {
	let title = input.title.trim().to_string();

	if title.is_empty() {
		return Err(RejectCode::EmptyTitle);
	}
	if title.chars().count() > limits.max_title_chars {
		return Err(RejectCode::TitleTooLong);
	}

	let content_state = input
		.content_state
		.map(|state| state.trim().to_string())
		.filter(|state| !state.is_empty());
	let mut content = input.content.trim().to_string();

	if let Some(state) = content_state.as_deref() {
		let doc = RawDocument::parse(state).map_err(|_| RejectCode::InvalidContentState)?;

		if content.is_empty() {
			content = doc.plain_text().trim().to_string();
		}
	}
	if content.chars().count() > limits.max_content_chars {
		return Err(RejectCode::ContentTooLong);
	}

	let color = palette::normalize_color(input.color.as_deref()).ok_or(RejectCode::InvalidColor)?;
	let tags = normalize_tags(&input.tags);

	if tags.len() > limits.max_tags {
		return Err(RejectCode::TooManyTags);
	}
	if tags.iter().any(|tag| tag.chars().count() > limits.max_tag_chars) {
		return Err(RejectCode::TagTooLong);
	}

	Ok(NoteDraft {
		title,
		content,
		content_state,
		color,
		tags,
		category: category::normalize_category(input.category.as_deref()),
		pinned: input.pinned,
	})
}

/// Trims and lower-cases tags, dropping blanks and later duplicates.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
	let mut out: Vec<String> = Vec::with_capacity(tags.len());

	for tag in tags {
		let Some(tag) = normalize_tag(tag.as_ref()) else {
			continue;
		};

		if !out.contains(&tag) {
			out.push(tag);
		}
	}

	out
}

pub fn normalize_tag(raw: &str) -> Option<String> {
	let trimmed = raw.trim();

	if trimmed.is_empty() {
		return None;
	}

	Some(trimmed.to_lowercase())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn limits() -> NoteLimits {
		NoteLimits { max_title_chars: 10, max_content_chars: 20, max_tags: 3, max_tag_chars: 5 }
	}

	fn input(title: &str) -> NoteInput {
		NoteInput { title: title.to_string(), ..Default::default() }
	}

	#[test]
	fn rejects_blank_title() {
		assert_eq!(prepare(input("   "), &limits()), Err(RejectCode::EmptyTitle));
	}

	#[test]
	fn counts_title_in_characters() {
		assert!(prepare(input(&"\u{e9}".repeat(10)), &limits()).is_ok());
		assert_eq!(prepare(input("eleven char"), &limits()), Err(RejectCode::TitleTooLong));
	}

	#[test]
	fn fills_defaults() {
		let draft = prepare(input(" Groceries "), &limits()).expect("Valid input.");

		assert_eq!(draft.title, "Groceries");
		assert_eq!(draft.color, "default");
		assert_eq!(draft.category, None);
		assert_eq!(draft.content_state, None);
		assert!(!draft.pinned);
	}

	#[test]
	fn dedupes_tags_after_folding() {
		let mut raw = input("t");

		raw.tags = vec!["Home".into(), " home ".into(), "".into(), "Work".into()];

		let draft = prepare(raw, &limits()).expect("Valid input.");

		assert_eq!(draft.tags, vec!["home".to_string(), "work".to_string()]);
	}

	#[test]
	fn enforces_tag_limits() {
		let mut raw = input("t");

		raw.tags = vec!["a".into(), "b".into(), "c".into(), "d".into()];

		assert_eq!(prepare(raw.clone(), &limits()), Err(RejectCode::TooManyTags));

		raw.tags = vec!["toolong".into()];

		assert_eq!(prepare(raw, &limits()), Err(RejectCode::TagTooLong));
	}

	#[test]
	fn validates_content_state() {
		let mut raw = input("t");

		raw.content_state = Some("not json".to_string());

		assert_eq!(prepare(raw.clone(), &limits()), Err(RejectCode::InvalidContentState));

		raw.content_state = Some("  ".to_string());

		assert_eq!(prepare(raw, &limits()).map(|draft| draft.content_state), Ok(None));
	}

	#[test]
	fn derives_content_from_rich_document() {
		let mut raw = input("t");

		raw.content_state = Some(RawDocument::from_plain_text("line one\nline two").to_json());

		let draft = prepare(raw, &limits()).expect("Valid input.");

		assert_eq!(draft.content, "line one\nline two");
	}

	#[test]
	fn rejects_long_content_and_bad_color() {
		let mut raw = input("t");

		raw.content = "x".repeat(21);

		assert_eq!(prepare(raw.clone(), &limits()), Err(RejectCode::ContentTooLong));

		raw.content = String::new();
		raw.color = Some("mauve".to_string());

		assert_eq!(prepare(raw, &limits()), Err(RejectCode::InvalidColor));
	}
}
