//! Owner-scoped note operations and the accounts that own them.

pub mod accounts;
pub mod list;
pub mod notes;

mod error;
mod password;
mod token;

pub use accounts::{
	AuthResponse, LoginRequest, Preferences, PreferencesRequest, RegisterRequest, User,
};
pub use error::{Error, Result};
pub use list::ListNotesRequest;
pub use notes::{CreateNoteRequest, Note, PinRequest, RenderedNote, UpdateNoteRequest};

use std::sync::Arc;

use notely_config::{Config, StorageBackend};
use notely_domain::note::NoteLimits;
use notely_storage::{Store, db::PgStore, local::LocalStore};

pub struct NotelyService {
	pub cfg: Config,
	pub store: Arc<dyn Store>,
}
impl NotelyService {
	pub fn new(cfg: Config, store: Arc<dyn Store>) -> Self {
		Self { cfg, store }
	}

	/// Opens the storage backend named by `cfg.storage.backend`.
	pub async fn connect(cfg: Config) -> Result<Self> {
		let store: Arc<dyn Store> = match cfg.storage.backend {
			StorageBackend::Postgres => {
				let Some(postgres) = cfg.storage.postgres.as_ref() else {
					return Err(Error::Storage {
						message: "storage.postgres is required for the postgres backend."
							.to_string(),
					});
				};

				Arc::new(PgStore::connect(postgres).await?)
			},
			StorageBackend::Local => {
				let local = cfg.storage.local.clone().unwrap_or_default();

				Arc::new(LocalStore::from_config(&local).await?)
			},
		};

		Ok(Self::new(cfg, store))
	}

	pub(crate) fn note_limits(&self) -> NoteLimits {
		NoteLimits::from(&self.cfg.notes)
	}
}
