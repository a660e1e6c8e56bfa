#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Failed to access {path:?}: {source}")]
	Io { path: std::path::PathBuf, source: std::io::Error },
	#[error("Failed to encode {path:?}: {source}")]
	Encode { path: std::path::PathBuf, source: serde_json::Error },
	#[error("Failed to decode {path:?}: {source}")]
	Decode { path: std::path::PathBuf, source: serde_json::Error },
	#[error("Conflict: {0}")]
	Conflict(String),
}
impl Error {
	/// Maps unique-key violations to [`Error::Conflict`] and keeps every other failure as is.
	pub(crate) fn from_insert(err: sqlx::Error, conflict: &str) -> Self {
		if err.as_database_error().map(|db_err| db_err.is_unique_violation()).unwrap_or(false) {
			return Self::Conflict(conflict.to_string());
		}

		Self::Sqlx(err)
	}
}
