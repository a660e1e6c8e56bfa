mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Local, Notes, Postgres, Security, Service, Storage, StorageBackend};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		Error::ParseConfig { source, .. } =>
			Error::ParseConfig { path: path.to_path_buf(), source },
		other => other,
	})
}

pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: Default::default(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}

	match cfg.storage.backend {
		StorageBackend::Postgres => {
			let Some(postgres) = cfg.storage.postgres.as_ref() else {
				return Err(Error::Validation {
					message: "storage.postgres is required when storage.backend is postgres."
						.to_string(),
				});
			};

			if postgres.dsn.trim().is_empty() {
				return Err(Error::Validation {
					message: "storage.postgres.dsn must be non-empty.".to_string(),
				});
			}
			if postgres.pool_max_conns == 0 {
				return Err(Error::Validation {
					message: "storage.postgres.pool_max_conns must be greater than zero."
						.to_string(),
				});
			}
		},
		StorageBackend::Local => {},
	}

	if cfg.security.session_ttl_hours == 0 {
		return Err(Error::Validation {
			message: "security.session_ttl_hours must be greater than zero.".to_string(),
		});
	}
	if cfg.security.min_password_chars == 0 {
		return Err(Error::Validation {
			message: "security.min_password_chars must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("notes.max_title_chars", cfg.notes.max_title_chars),
		("notes.max_content_chars", cfg.notes.max_content_chars),
		("notes.max_tags", cfg.notes.max_tags),
		("notes.max_tag_chars", cfg.notes.max_tag_chars),
		("notes.preview_chars", cfg.notes.preview_chars),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if let Some(local) = cfg.storage.local.as_mut()
		&& local.path.as_deref().map(|path| path.as_os_str().is_empty()).unwrap_or(false)
	{
		local.path = None;
	}

	cfg.service.cors_allowed_origins = cfg
		.service
		.cors_allowed_origins
		.iter()
		.map(|origin| origin.trim().trim_end_matches('/').to_string())
		.filter(|origin| !origin.is_empty())
		.collect();
}
