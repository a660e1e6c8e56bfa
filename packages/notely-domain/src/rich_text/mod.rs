//! Block-based rich documents in the editor's raw JSON form.
//!
//! A document is an ordered list of typed blocks. Each block carries its text and a list of
//! inline style ranges whose offsets count UTF-16 code units, matching how the editor indexes
//! strings.

pub mod html;

pub use html::{escape_html, plain_text_html, preview, to_html};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
	pub blocks: Vec<RawBlock>,
	#[serde(default)]
	pub entity_map: Map<String, Value>,
}
impl RawDocument {
	pub fn parse(raw: &str) -> serde_json::Result<Self> {
		serde_json::from_str(raw)
	}

	/// One unstyled block per line, the way the editor seeds itself from plain text.
	pub fn from_plain_text(text: &str) -> Self {
		let blocks = text
			.split('\n')
			.map(|line| RawBlock::unstyled(line.strip_suffix('\r').unwrap_or(line)))
			.collect();

		Self { blocks, entity_map: Map::new() }
	}

	pub fn to_json(&self) -> String {
		serde_json::to_string(self).unwrap_or_else(|_| r#"{"blocks":[],"entityMap":{}}"#.to_string())
	}

	pub fn plain_text(&self) -> String {
		self.blocks.iter().map(|block| block.text.as_str()).collect::<Vec<_>>().join("\n")
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
	#[serde(default)]
	pub key: String,
	#[serde(default)]
	pub text: String,
	#[serde(rename = "type", default = "unstyled_type")]
	pub block_type: String,
	#[serde(default)]
	pub depth: u32,
	#[serde(default)]
	pub inline_style_ranges: Vec<InlineStyleRange>,
	#[serde(default)]
	pub entity_ranges: Vec<Value>,
	#[serde(default)]
	pub data: Map<String, Value>,
}
impl RawBlock {
	pub fn unstyled(text: &str) -> Self {
		Self {
			key: block_key(),
			text: text.to_string(),
			block_type: unstyled_type(),
			depth: 0,
			inline_style_ranges: Vec::new(),
			entity_ranges: Vec::new(),
			data: Map::new(),
		}
	}

	pub fn kind(&self) -> BlockKind {
		BlockKind::from_type(&self.block_type)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineStyleRange {
	pub offset: usize,
	pub length: usize,
	pub style: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
	Unstyled,
	HeaderOne,
	HeaderTwo,
	Blockquote,
	UnorderedListItem,
	OrderedListItem,
	Other,
}
impl BlockKind {
	pub fn from_type(block_type: &str) -> Self {
		match block_type {
			"unstyled" => Self::Unstyled,
			"header-one" => Self::HeaderOne,
			"header-two" => Self::HeaderTwo,
			"blockquote" => Self::Blockquote,
			"unordered-list-item" => Self::UnorderedListItem,
			"ordered-list-item" => Self::OrderedListItem,
			_ => Self::Other,
		}
	}
}

/// Inline styles in nesting order: earlier variants wrap later ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineStyle {
	Bold,
	Italic,
	Underline,
	Code,
}
impl InlineStyle {
	pub const ALL: [Self; 4] = [Self::Bold, Self::Italic, Self::Underline, Self::Code];

	pub fn from_name(name: &str) -> Option<Self> {
		match name {
			"BOLD" => Some(Self::Bold),
			"ITALIC" => Some(Self::Italic),
			"UNDERLINE" => Some(Self::Underline),
			"CODE" => Some(Self::Code),
			_ => None,
		}
	}

	pub fn tag(self) -> &'static str {
		match self {
			Self::Bold => "strong",
			Self::Italic => "em",
			Self::Underline => "u",
			Self::Code => "code",
		}
	}

	fn bit(self) -> u8 {
		match self {
			Self::Bold => 1,
			Self::Italic => 1 << 1,
			Self::Underline => 1 << 2,
			Self::Code => 1 << 3,
		}
	}
}

/// Set of inline styles active on one character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleMask(u8);
impl StyleMask {
	pub fn with(self, style: InlineStyle) -> Self {
		Self(self.0 | style.bit())
	}

	pub fn contains(self, style: InlineStyle) -> bool {
		self.0 & style.bit() != 0
	}

	/// Active styles in nesting order.
	pub fn styles(self) -> impl Iterator<Item = InlineStyle> {
		InlineStyle::ALL.into_iter().filter(move |style| self.contains(*style))
	}
}

fn unstyled_type() -> String {
	"unstyled".to_string()
}

fn block_key() -> String {
	Uuid::new_v4().simple().to_string()[..5].to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn plain_text_round_trips_through_blocks() {
		let doc = RawDocument::from_plain_text("first\r\nsecond\n\nfourth");

		assert_eq!(doc.blocks.len(), 4);
		assert!(doc.blocks.iter().all(|block| block.kind() == BlockKind::Unstyled));
		assert!(doc.blocks.iter().all(|block| block.key.len() == 5));
		assert_eq!(doc.plain_text(), "first\nsecond\n\nfourth");
	}

	#[test]
	fn empty_text_still_has_one_block() {
		let doc = RawDocument::from_plain_text("");

		assert_eq!(doc.blocks.len(), 1);
		assert_eq!(doc.plain_text(), "");
	}

	#[test]
	fn parses_editor_output_and_keeps_entities() {
		let raw = r#"{
			"blocks": [{
				"key": "a1b2c",
				"text": "Link here",
				"type": "header-two",
				"depth": 0,
				"inlineStyleRanges": [{ "offset": 0, "length": 4, "style": "BOLD" }],
				"entityRanges": [{ "offset": 0, "length": 4, "key": 0 }],
				"data": {}
			}],
			"entityMap": { "0": { "type": "LINK", "mutability": "MUTABLE", "data": { "url": "https://example.com" } } }
		}"#;
		let doc = RawDocument::parse(raw).expect("Editor output must parse.");

		assert_eq!(doc.blocks[0].kind(), BlockKind::HeaderTwo);
		assert_eq!(doc.blocks[0].entity_ranges.len(), 1);
		assert!(doc.entity_map.contains_key("0"));

		let reparsed = RawDocument::parse(&doc.to_json()).expect("Serialized form must parse.");

		assert_eq!(reparsed, doc);
	}

	#[test]
	fn missing_optional_fields_default() {
		let doc = RawDocument::parse(r#"{"blocks":[{"text":"bare"}]}"#).expect("Must parse.");

		assert_eq!(doc.blocks[0].block_type, "unstyled");
		assert!(doc.blocks[0].inline_style_ranges.is_empty());
		assert!(doc.entity_map.is_empty());
	}

	#[test]
	fn rejects_non_documents() {
		assert!(RawDocument::parse("plain words").is_err());
		assert!(RawDocument::parse(r#"{"entityMap":{}}"#).is_err());
	}

	#[test]
	fn style_mask_lists_styles_in_nesting_order() {
		let mask = StyleMask::default().with(InlineStyle::Code).with(InlineStyle::Bold);

		assert_eq!(mask.styles().collect::<Vec<_>>(), vec![InlineStyle::Bold, InlineStyle::Code]);
		assert!(!mask.contains(InlineStyle::Italic));
	}
}
