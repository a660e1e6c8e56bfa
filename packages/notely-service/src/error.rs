use notely_domain::{filter::FilterError, note::RejectCode};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Unauthorized: {message}")]
	Unauthorized { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl Error {
	pub(crate) fn note_not_found() -> Self {
		Self::NotFound { message: "Note not found".to_string() }
	}
}

impl From<notely_storage::Error> for Error {
	fn from(err: notely_storage::Error) -> Self {
		match err {
			notely_storage::Error::Conflict(message) => Self::Conflict { message },
			other => Self::Storage { message: other.to_string() },
		}
	}
}

impl From<RejectCode> for Error {
	fn from(code: RejectCode) -> Self {
		Self::InvalidRequest { message: code.message().to_string() }
	}
}

impl From<FilterError> for Error {
	fn from(err: FilterError) -> Self {
		Self::InvalidRequest { message: err.message() }
	}
}
