use crate::rich_text::{BlockKind, InlineStyle, RawBlock, RawDocument, StyleMask};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
	Unordered,
	Ordered,
}
impl ListKind {
	fn tag(self) -> &'static str {
		match self {
			Self::Unordered => "ul",
			Self::Ordered => "ol",
		}
	}
}

/// Renders a document to display HTML. Never fails: unknown block types render as paragraphs,
/// unknown inline styles are dropped, and style ranges past the end of a block are clipped.
pub fn to_html(doc: &RawDocument) -> String {
	let mut out = String::new();
	let mut open_list: Option<ListKind> = None;

	for block in &doc.blocks {
		let (list, tag) = match block.kind() {
			BlockKind::UnorderedListItem => (Some(ListKind::Unordered), "li"),
			BlockKind::OrderedListItem => (Some(ListKind::Ordered), "li"),
			BlockKind::HeaderOne => (None, "h1"),
			BlockKind::HeaderTwo => (None, "h2"),
			BlockKind::Blockquote => (None, "blockquote"),
			BlockKind::Unstyled | BlockKind::Other => (None, "p"),
		};

		if open_list != list {
			if let Some(current) = open_list {
				push_close(&mut out, current.tag());
			}
			if let Some(next) = list {
				push_open(&mut out, next.tag());
			}

			open_list = list;
		}

		push_open(&mut out, tag);
		render_inline(block, &mut out);
		push_close(&mut out, tag);
	}

	if let Some(current) = open_list {
		push_close(&mut out, current.tag());
	}

	out
}

/// Renders plain note text the way notes without a rich document are displayed.
pub fn plain_text_html(text: &str) -> String {
	let mut out = String::with_capacity(text.len() + 7);

	out.push_str("<p>");

	for (i, line) in text.split('\n').enumerate() {
		if i > 0 {
			out.push_str("<br>");
		}

		escape_html(line, &mut out);
	}

	out.push_str("</p>");

	out
}

/// First `max_chars` characters of `text`, with an ellipsis when anything was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
	match text.char_indices().nth(max_chars) {
		Some((cut, _)) => format!("{}...", &text[..cut]),
		None => text.to_string(),
	}
}

pub fn escape_html(text: &str, out: &mut String) {
	for ch in text.chars() {
		match ch {
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'&' => out.push_str("&amp;"),
			_ => out.push(ch),
		}
	}
}

fn render_inline(block: &RawBlock, out: &mut String) {
	let masks = unit_masks(block);
	let mut open: Vec<InlineStyle> = Vec::new();
	let mut unit = 0_usize;

	for ch in block.text.chars() {
		let wanted: Vec<InlineStyle> = masks.get(unit).copied().unwrap_or_default().styles().collect();
		let keep = open.iter().zip(&wanted).take_while(|(a, b)| a == b).count();

		while open.len() > keep {
			if let Some(style) = open.pop() {
				push_close(out, style.tag());
			}
		}
		for style in &wanted[keep..] {
			push_open(out, style.tag());
			open.push(*style);
		}

		let mut buf = [0_u8; 4];

		escape_html(ch.encode_utf8(&mut buf), out);

		unit += ch.len_utf16();
	}

	while let Some(style) = open.pop() {
		push_close(out, style.tag());
	}
}

/// Style mask per UTF-16 code unit of the block text.
fn unit_masks(block: &RawBlock) -> Vec<StyleMask> {
	let len = block.text.encode_utf16().count();
	let mut masks = vec![StyleMask::default(); len];

	for range in &block.inline_style_ranges {
		let Some(style) = InlineStyle::from_name(&range.style) else {
			continue;
		};
		let start = range.offset.min(len);
		let end = range.offset.saturating_add(range.length).min(len);

		for mask in &mut masks[start..end] {
			*mask = mask.with(style);
		}
	}

	masks
}

fn push_open(out: &mut String, tag: &str) {
	out.push('<');
	out.push_str(tag);
	out.push('>');
}

fn push_close(out: &mut String, tag: &str) {
	out.push_str("</");
	out.push_str(tag);
	out.push('>');
}
