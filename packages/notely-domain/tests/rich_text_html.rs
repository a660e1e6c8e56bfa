use notely_domain::rich_text::{
	InlineStyleRange, RawBlock, RawDocument, plain_text_html, preview, to_html,
};

fn block(block_type: &str, text: &str, ranges: &[(usize, usize, &str)]) -> RawBlock {
	let mut block = RawBlock::unstyled(text);

	block.block_type = block_type.to_string();
	block.inline_style_ranges = ranges
		.iter()
		.map(|(offset, length, style)| InlineStyleRange {
			offset: *offset,
			length: *length,
			style: style.to_string(),
		})
		.collect();

	block
}

fn doc(blocks: Vec<RawBlock>) -> RawDocument {
	RawDocument { blocks, entity_map: Default::default() }
}

#[test]
fn maps_block_types_to_tags() {
	let html = to_html(&doc(vec![
		block("header-one", "Title", &[]),
		block("header-two", "Sub", &[]),
		block("unstyled", "Body", &[]),
		block("blockquote", "Quote", &[]),
		block("code-block", "Unknown", &[]),
	]));

	assert_eq!(
		html,
		"<h1>Title</h1><h2>Sub</h2><p>Body</p><blockquote>Quote</blockquote><p>Unknown</p>"
	);
}

#[test]
fn groups_consecutive_list_items() {
	let html = to_html(&doc(vec![
		block("unordered-list-item", "a", &[]),
		block("unordered-list-item", "b", &[]),
		block("ordered-list-item", "one", &[]),
		block("ordered-list-item", "two", &[]),
		block("unstyled", "after", &[]),
		block("unordered-list-item", "tail", &[]),
	]));

	assert_eq!(
		html,
		"<ul><li>a</li><li>b</li></ul><ol><li>one</li><li>two</li></ol><p>after</p><ul><li>tail</li></ul>"
	);
}

#[test]
fn unknown_block_type_closes_open_list() {
	let html = to_html(&doc(vec![
		block("ordered-list-item", "one", &[]),
		block("atomic", "media", &[]),
	]));

	assert_eq!(html, "<ol><li>one</li></ol><p>media</p>");
}

#[test]
fn wraps_inline_style_runs() {
	let html = to_html(&doc(vec![block(
		"unstyled",
		"plain bold italic",
		&[(6, 4, "BOLD"), (11, 6, "ITALIC")],
	)]));

	assert_eq!(html, "<p>plain <strong>bold</strong> <em>italic</em></p>");
}

#[test]
fn overlapping_styles_stay_well_nested() {
	// "ab" bold, "bc" italic.
	let html = to_html(&doc(vec![block("unstyled", "abc", &[(0, 2, "BOLD"), (1, 2, "ITALIC")])]));

	assert_eq!(html, "<p><strong>a<em>b</em></strong><em>c</em></p>");
}

#[test]
fn nests_in_fixed_order_regardless_of_range_order() {
	let html = to_html(&doc(vec![block(
		"unstyled",
		"x",
		&[(0, 1, "CODE"), (0, 1, "UNDERLINE"), (0, 1, "ITALIC"), (0, 1, "BOLD")],
	)]));

	assert_eq!(html, "<p><strong><em><u><code>x</code></u></em></strong></p>");
}

#[test]
fn escapes_markup_characters() {
	let html = to_html(&doc(vec![block("unstyled", "a < b && c > d", &[(0, 1, "CODE")])]));

	assert_eq!(html, "<p><code>a</code> &lt; b &amp;&amp; c &gt; d</p>");
}

#[test]
fn offsets_count_utf16_units() {
	// The emoji takes two UTF-16 units, so "hi" starts at offset 3.
	let html = to_html(&doc(vec![block("unstyled", "\u{1F600} hi", &[(3, 2, "BOLD")])]));

	assert_eq!(html, "<p>\u{1F600} <strong>hi</strong></p>");
}

#[test]
fn clips_ranges_and_ignores_unknown_styles() {
	let html = to_html(&doc(vec![block(
		"unstyled",
		"short",
		&[(3, 100, "BOLD"), (0, 5, "STRIKETHROUGH"), (50, 2, "ITALIC")],
	)]));

	assert_eq!(html, "<p>sho<strong>rt</strong></p>");
}

#[test]
fn empty_document_renders_nothing() {
	assert_eq!(to_html(&doc(Vec::new())), "");
}

#[test]
fn plain_text_uses_line_breaks() {
	assert_eq!(plain_text_html("one\ntwo <3"), "<p>one<br>two &lt;3</p>");
}

#[test]
fn preview_truncates_on_characters() {
	assert_eq!(preview("abcdef", 3), "abc...");
	assert_eq!(preview("abc", 3), "abc");
	assert_eq!(preview("\u{e9}t\u{e9}", 2), "\u{e9}t...");
}
