use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use notely_config::{Error, StorageBackend};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn sample_with(edit: impl FnOnce(&mut toml::Table)) -> String {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let root = value.as_table_mut().expect("Template config must be a table.");

	edit(root);

	toml::to_string(&value).expect("Failed to render template config.")
}

fn section<'a>(root: &'a mut toml::Table, name: &str) -> &'a mut toml::Table {
	root.get_mut(name)
		.and_then(Value::as_table_mut)
		.unwrap_or_else(|| panic!("Template config must include [{name}]."))
}

fn write_temp_config(payload: &str) -> PathBuf {
	let nanos = SystemTime::now().duration_since(UNIX_EPOCH).expect("Clock drift.").as_nanos();
	let seq = COUNTER.fetch_add(1, Ordering::SeqCst);
	let path = env::temp_dir().join(format!("notely_config_{nanos}_{seq}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

#[test]
fn sample_config_loads() {
	let path = write_temp_config(SAMPLE_CONFIG_TEMPLATE_TOML);
	let cfg = notely_config::load(&path).expect("Sample config must load.");

	fs::remove_file(&path).ok();

	assert_eq!(cfg.storage.backend, StorageBackend::Postgres);
	assert_eq!(cfg.storage.postgres.as_ref().map(|pg| pg.pool_max_conns), Some(4));
	assert_eq!(cfg.notes.preview_chars, 150);
	assert_eq!(cfg.service.cors_allowed_origins, vec!["http://localhost:3000".to_string()]);
}

#[test]
fn missing_file_reports_read_error() {
	let path = env::temp_dir().join("notely_config_does_not_exist.toml");
	let err = notely_config::load(&path).expect_err("Missing file must fail.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}

#[test]
fn optional_sections_fall_back_to_defaults() {
	let payload = sample_with(|root| {
		root.remove("security");
		root.remove("notes");
	});
	let cfg = notely_config::parse(&payload).expect("Defaults must apply.");

	assert_eq!(cfg.security.session_ttl_hours, 168);
	assert_eq!(cfg.security.min_password_chars, 8);
	assert_eq!(cfg.notes.max_tags, 32);
}

#[test]
fn postgres_backend_requires_postgres_section() {
	let payload = sample_with(|root| {
		section(root, "storage").remove("postgres");
	});
	let err = notely_config::parse(&payload).expect_err("Missing postgres section must fail.");

	assert!(
		err.to_string().contains("storage.postgres is required"),
		"Unexpected error: {err}"
	);
}

#[test]
fn local_backend_needs_no_postgres() {
	let payload = sample_with(|root| {
		let storage = section(root, "storage");

		storage.insert("backend".to_string(), Value::String("local".to_string()));
		storage.remove("postgres");
	});
	let cfg = notely_config::parse(&payload).expect("Local backend must load.");

	assert_eq!(cfg.storage.backend, StorageBackend::Local);
	assert_eq!(
		cfg.storage.local.and_then(|local| local.path),
		Some(PathBuf::from("notes.json"))
	);
}

#[test]
fn blank_local_path_is_memory_only() {
	let payload = sample_with(|root| {
		let storage = section(root, "storage");
		let mut local = toml::Table::new();

		local.insert("path".to_string(), Value::String(String::new()));
		storage.insert("local".to_string(), Value::Table(local));
	});
	let cfg = notely_config::parse(&payload).expect("Blank path must load.");

	assert_eq!(cfg.storage.local.and_then(|local| local.path), None);
}

#[test]
fn unknown_backend_is_a_parse_error() {
	let payload = sample_with(|root| {
		section(root, "storage")
			.insert("backend".to_string(), Value::String("firestore".to_string()));
	});
	let err = notely_config::parse(&payload).expect_err("Unknown backend must fail.");

	assert!(matches!(err, Error::ParseConfig { .. }));
}

#[test]
fn zero_limits_are_rejected() {
	for key in ["max_title_chars", "max_content_chars", "max_tags", "max_tag_chars", "preview_chars"]
	{
		let payload = sample_with(|root| {
			section(root, "notes").insert(key.to_string(), Value::Integer(0));
		});
		let err = notely_config::parse(&payload).expect_err("Zero limit must fail.");

		assert_eq!(err.to_string(), format!("notes.{key} must be greater than zero."));
	}
}

#[test]
fn zero_session_ttl_is_rejected() {
	let payload = sample_with(|root| {
		section(root, "security").insert("session_ttl_hours".to_string(), Value::Integer(0));
	});
	let err = notely_config::parse(&payload).expect_err("Zero TTL must fail.");

	assert_eq!(err.to_string(), "security.session_ttl_hours must be greater than zero.");
}

#[test]
fn zero_pool_size_is_rejected() {
	let payload = sample_with(|root| {
		let storage = section(root, "storage");

		section(storage, "postgres").insert("pool_max_conns".to_string(), Value::Integer(0));
	});
	let err = notely_config::parse(&payload).expect_err("Zero pool must fail.");

	assert_eq!(err.to_string(), "storage.postgres.pool_max_conns must be greater than zero.");
}
