/// Categories offered by the note form. Any other non-empty value is kept as a custom category.
pub const BUILTIN_CATEGORIES: [&str; 5] = ["work", "personal", "ideas", "to-do", "important"];

pub fn normalize_category(raw: Option<&str>) -> Option<String> {
	let trimmed = raw?.trim();

	if trimmed.is_empty() {
		return None;
	}

	Some(trimmed.to_lowercase())
}

pub fn is_builtin(category: &str) -> bool {
	BUILTIN_CATEGORIES.contains(&category)
}
