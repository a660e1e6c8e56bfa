/// Named note colors and the hex value the list view paints them with.
pub const PALETTE: [(&str, &str); 9] = [
	("default", "#2c2c2c"),
	("white", "#ffffff"),
	("red", "#f8d7da"),
	("orange", "#ffe5d0"),
	("yellow", "#fff3cd"),
	("green", "#d1e7dd"),
	("blue", "#cfe2ff"),
	("purple", "#e2d9f3"),
	("pink", "#f7d6e6"),
];

pub const DEFAULT_COLOR: &str = "default";

pub fn hex_for(name: &str) -> Option<&'static str> {
	PALETTE.iter().find(|(candidate, _)| *candidate == name).map(|(_, hex)| *hex)
}

/// Lower-cases palette names, expands `#rgb` to `#rrggbb`, and maps blank input to the default
/// color. Returns `None` for anything else.
pub fn normalize_color(raw: Option<&str>) -> Option<String> {
	let lowered = raw.map(|value| value.trim().to_ascii_lowercase()).unwrap_or_default();

	if lowered.is_empty() {
		return Some(DEFAULT_COLOR.to_string());
	}
	if hex_for(&lowered).is_some() {
		return Some(lowered);
	}

	expand_hex(&lowered)
}

/// Compares two stored or requested colors, treating a palette name and its hex value as equal.
pub fn same_color(a: &str, b: &str) -> bool {
	match (canonical_hex(a), canonical_hex(b)) {
		(Some(a), Some(b)) => a == b,
		_ => a.trim().eq_ignore_ascii_case(b.trim()),
	}
}

fn canonical_hex(color: &str) -> Option<String> {
	let lowered = color.trim().to_ascii_lowercase();

	match hex_for(&lowered) {
		Some(hex) => Some(hex.to_string()),
		None => expand_hex(&lowered),
	}
}

fn expand_hex(value: &str) -> Option<String> {
	let digits = value.strip_prefix('#')?;

	if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
		return None;
	}

	match digits.len() {
		6 => Some(value.to_string()),
		3 => {
			let mut out = String::with_capacity(7);

			out.push('#');

			for ch in digits.chars() {
				out.push(ch);
				out.push(ch);
			}

			Some(out)
		},
		_ => None,
	}
}
