use time::{Duration, macros::datetime};
use uuid::Uuid;

use notely_storage::{
	Error, NoteScope, Store,
	db::PgStore,
	models::{NoteRecord, UserRecord},
};
use notely_testkit::TestDatabase;

fn note(owner_id: Uuid, id: &str, tags: &[&str], category: Option<&str>) -> NoteRecord {
	let at = datetime!(2024-03-01 12:00 UTC);

	NoteRecord {
		note_id: id.to_string(),
		owner_id,
		title: format!("Note {id}"),
		content: "body".to_string(),
		content_state: None,
		color: "blue".to_string(),
		pinned: false,
		tags: tags.iter().map(|tag| tag.to_string()).collect(),
		category: category.map(str::to_string),
		created_at: at,
		updated_at: at,
	}
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set NOTELY_PG_DSN to run."]
async fn schema_bootstrap_is_idempotent() {
	let Some(base_dsn) = notely_testkit::env_dsn() else {
		eprintln!("Skipping schema_bootstrap_is_idempotent; set NOTELY_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let store = PgStore::connect(&test_db.postgres_config()).await.expect("Failed to connect.");

	store.db.ensure_schema().await.expect("Failed to re-apply schema.");

	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM information_schema.tables WHERE table_name IN ('users', 'sessions', 'notes')",
	)
	.fetch_one(&store.db.pool)
	.await
	.expect("Failed to query schema tables.");

	assert_eq!(count, 3);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set NOTELY_PG_DSN to run."]
async fn notes_are_scoped_to_their_owner() {
	let Some(base_dsn) = notely_testkit::env_dsn() else {
		eprintln!("Skipping notes_are_scoped_to_their_owner; set NOTELY_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let store = PgStore::connect(&test_db.postgres_config()).await.expect("Failed to connect.");
	let alice = Uuid::new_v4();
	let bob = Uuid::new_v4();

	store.insert_note(&note(alice, "a1", &["home"], Some("work"))).await.expect("insert");

	let mut newer = note(alice, "a2", &[], None);

	newer.updated_at += Duration::hours(1);

	store.insert_note(&newer).await.expect("insert");
	store.insert_note(&note(bob, "b1", &["home"], None)).await.expect("insert");

	let ids = store
		.list_notes(alice, &NoteScope::All)
		.await
		.expect("Failed to list notes.")
		.into_iter()
		.map(|note| note.note_id)
		.collect::<Vec<_>>();

	assert_eq!(ids, vec!["a2".to_string(), "a1".to_string()]);

	let tagged = store.list_notes(alice, &NoteScope::Tag("home".to_string())).await.expect("list");

	assert_eq!(tagged.len(), 1);
	assert_eq!(tagged[0].tags, vec!["home".to_string()]);

	let filed =
		store.list_notes(alice, &NoteScope::Category("work".to_string())).await.expect("list");

	assert_eq!(filed.len(), 1);
	assert!(store.get_note(bob, "a1").await.expect("get").is_none());
	assert!(!store.delete_note(bob, "a1").await.expect("delete"));
	assert!(store.delete_note(alice, "a1").await.expect("delete"));

	let err = store.insert_note(&note(bob, "a2", &[], None)).await.expect_err("Expected conflict.");

	assert!(matches!(err, Error::Conflict(_)));

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set NOTELY_PG_DSN to run."]
async fn duplicate_email_is_a_conflict() {
	let Some(base_dsn) = notely_testkit::env_dsn() else {
		eprintln!("Skipping duplicate_email_is_a_conflict; set NOTELY_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let store = PgStore::connect(&test_db.postgres_config()).await.expect("Failed to connect.");
	let user = |email: &str| UserRecord {
		user_id: Uuid::new_v4(),
		email: email.to_string(),
		display_name: Some("sam".to_string()),
		photo_url: None,
		theme: "light".to_string(),
		password_hash: "$argon2id$placeholder".to_string(),
		created_at: datetime!(2024-01-01 0:00 UTC),
	};
	let first = user("sam@example.com");

	store.insert_user(&first).await.expect("Failed to insert user.");

	let err = store.insert_user(&user("sam@example.com")).await.expect_err("Expected conflict.");

	assert!(matches!(err, Error::Conflict(_)));

	let found = store
		.find_user_by_email("sam@example.com")
		.await
		.expect("Failed to find user.")
		.expect("Missing user.");

	assert_eq!(found.user_id, first.user_id);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
