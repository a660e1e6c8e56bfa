//! The note list view: search, one active filter, and pinned-first ordering.

use std::str::FromStr;

use time::{Duration, OffsetDateTime, Time, UtcOffset};

use crate::{category, note, palette};

/// Read access to the note fields the list view looks at.
pub trait NoteFields {
	fn title(&self) -> &str;
	fn content(&self) -> &str;
	fn color(&self) -> &str;
	fn category(&self) -> Option<&str>;
	fn tags(&self) -> &[String];
	fn pinned(&self) -> bool;
	fn created_at(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
	Today,
	Week,
}
impl DateWindow {
	/// Earliest creation time inside the window. Days start at UTC midnight.
	pub fn since(self, now: OffsetDateTime) -> OffsetDateTime {
		let today = now.to_offset(UtcOffset::UTC).replace_time(Time::MIDNIGHT);

		match self {
			Self::Today => today,
			Self::Week => today - Duration::days(7),
		}
	}
}

impl FromStr for DateWindow {
	type Err = FilterError;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"today" => Ok(Self::Today),
			"week" => Ok(Self::Week),
			other => Err(FilterError::UnknownDateWindow(other.to_string())),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
	Conflicting,
	UnknownDateWindow(String),
}
impl FilterError {
	pub fn message(&self) -> String {
		match self {
			Self::Conflicting =>
				"Only one of color, category, tag, or date may be set.".to_string(),
			Self::UnknownDateWindow(raw) =>
				format!("Unknown date filter {raw:?}; expected today or week."),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NoteFilter {
	#[default]
	All,
	Color(String),
	Category(String),
	Tag(String),
	Date(DateWindow),
}
impl NoteFilter {
	/// Builds the single active filter from optional request parameters. Blank values count as
	/// unset.
	pub fn from_params(
		color: Option<&str>,
		category: Option<&str>,
		tag: Option<&str>,
		date: Option<&str>,
	) -> Result<Self, FilterError> {
		let mut filters = Vec::with_capacity(1);

		if let Some(color) = present(color) {
			filters.push(Self::Color(color.to_ascii_lowercase()));
		}
		if let Some(category) = category::normalize_category(present(category)) {
			filters.push(Self::Category(category));
		}
		if let Some(tag) = present(tag).and_then(note::normalize_tag) {
			filters.push(Self::Tag(tag));
		}
		if let Some(date) = present(date) {
			filters.push(Self::Date(date.parse()?));
		}

		match filters.len() {
			0 => Ok(Self::All),
			1 => Ok(filters.remove(0)),
			_ => Err(FilterError::Conflicting),
		}
	}

	pub fn matches<N: NoteFields>(&self, note: &N, now: OffsetDateTime) -> bool {
		match self {
			Self::All => true,
			Self::Color(color) => palette::same_color(note.color(), color),
			Self::Category(category) => note.category() == Some(category.as_str()),
			Self::Tag(tag) => note.tags().iter().any(|candidate| candidate == tag),
			Self::Date(window) => note.created_at() >= window.since(now),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteQuery {
	pub search: Option<String>,
	pub filter: NoteFilter,
}
impl NoteQuery {
	pub fn matches<N: NoteFields>(&self, note: &N, now: OffsetDateTime) -> bool {
		self.matches_search(note) && self.filter.matches(note, now)
	}

	/// Keeps matching notes and moves pinned ones to the front, preserving the incoming order
	/// otherwise.
	pub fn apply<N: NoteFields>(&self, notes: Vec<N>, now: OffsetDateTime) -> Vec<N> {
		let mut kept: Vec<N> = notes.into_iter().filter(|note| self.matches(note, now)).collect();

		sort_pinned_first(&mut kept);

		kept
	}

	fn matches_search<N: NoteFields>(&self, note: &N) -> bool {
		let Some(needle) = self.search.as_deref().map(str::trim).filter(|term| !term.is_empty())
		else {
			return true;
		};
		let needle = needle.to_lowercase();

		note.title().to_lowercase().contains(&needle)
			|| note.content().to_lowercase().contains(&needle)
	}
}

fn present(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|value| !value.is_empty())
}

pub fn sort_pinned_first<N: NoteFields>(notes: &mut [N]) {
	notes.sort_by_key(|note| !note.pinned());
}

/// Every tag used by `notes`, in first-seen order.
pub fn collect_tags<N: NoteFields>(notes: &[N]) -> Vec<String> {
	let mut out: Vec<String> = Vec::new();

	for tag in notes.iter().flat_map(|note| note.tags()) {
		if !out.contains(tag) {
			out.push(tag.clone());
		}
	}

	out
}

/// Every category used by `notes`, in first-seen order.
pub fn collect_categories<N: NoteFields>(notes: &[N]) -> Vec<String> {
	let mut out: Vec<String> = Vec::new();

	for category in notes.iter().filter_map(|note| note.category()) {
		if !out.iter().any(|seen| seen == category) {
			out.push(category.to_string());
		}
	}

	out
}
