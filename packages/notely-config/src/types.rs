use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub security: Security,
	#[serde(default)]
	pub notes: Notes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	/// Origins allowed by the CORS layer. Empty allows any origin.
	#[serde(default)]
	pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
	Postgres,
	Local,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub backend: StorageBackend,
	pub postgres: Option<Postgres>,
	pub local: Option<Local>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Local {
	/// JSON document holding every collection. Absent keeps data in memory only.
	pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Security {
	pub session_ttl_hours: u32,
	pub min_password_chars: u32,
}
impl Default for Security {
	fn default() -> Self {
		Self { session_ttl_hours: 24 * 7, min_password_chars: 8 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Notes {
	pub max_title_chars: u32,
	pub max_content_chars: u32,
	pub max_tags: u32,
	pub max_tag_chars: u32,
	pub preview_chars: u32,
}
impl Default for Notes {
	fn default() -> Self {
		Self {
			max_title_chars: 200,
			max_content_chars: 100_000,
			max_tags: 32,
			max_tag_chars: 40,
			preview_chars: 150,
		}
	}
}
