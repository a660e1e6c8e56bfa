use sqlx::{PgPool, postgres::PgPoolOptions};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	BoxFuture, NoteScope, Result, Store,
	models::{NoteRecord, SessionRecord, UserRecord},
	queries, schema,
};

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &notely_config::Postgres) -> Result<Self> {
		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let sql = schema::render_schema();
		let lock_id: i64 = 6_614_011;
		// Advisory locks are held per connection. Use a single transaction so the lock is scoped to
		// one connection and automatically released when the transaction ends.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(lock_id).execute(&mut *tx).await?;

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}
}

/// [`Store`] backed by PostgreSQL.
pub struct PgStore {
	pub db: Db,
}
impl PgStore {
	pub async fn connect(cfg: &notely_config::Postgres) -> Result<Self> {
		let db = Db::connect(cfg).await?;

		db.ensure_schema().await?;

		tracing::info!(pool_max_conns = cfg.pool_max_conns, "Connected to Postgres.");

		Ok(Self { db })
	}
}

impl Store for PgStore {
	fn insert_user<'a>(&'a self, user: &'a UserRecord) -> BoxFuture<'a, Result<()>> {
		Box::pin(queries::insert_user(&self.db, user))
	}

	fn get_user<'a>(&'a self, user_id: Uuid) -> BoxFuture<'a, Result<Option<UserRecord>>> {
		Box::pin(queries::get_user(&self.db, user_id))
	}

	fn find_user_by_email<'a>(
		&'a self,
		email: &'a str,
	) -> BoxFuture<'a, Result<Option<UserRecord>>> {
		Box::pin(queries::find_user_by_email(&self.db, email))
	}

	fn update_user_theme<'a>(
		&'a self,
		user_id: Uuid,
		theme: &'a str,
	) -> BoxFuture<'a, Result<Option<UserRecord>>> {
		Box::pin(queries::update_user_theme(&self.db, user_id, theme))
	}

	fn insert_session<'a>(&'a self, session: &'a SessionRecord) -> BoxFuture<'a, Result<()>> {
		Box::pin(queries::insert_session(&self.db, session))
	}

	fn find_session<'a>(
		&'a self,
		token_hash: &'a str,
	) -> BoxFuture<'a, Result<Option<SessionRecord>>> {
		Box::pin(queries::find_session(&self.db, token_hash))
	}

	fn delete_session<'a>(&'a self, token_hash: &'a str) -> BoxFuture<'a, Result<bool>> {
		Box::pin(queries::delete_session(&self.db, token_hash))
	}

	fn purge_expired_sessions<'a>(&'a self, now: OffsetDateTime) -> BoxFuture<'a, Result<u64>> {
		Box::pin(queries::purge_expired_sessions(&self.db, now))
	}

	fn insert_note<'a>(&'a self, note: &'a NoteRecord) -> BoxFuture<'a, Result<()>> {
		Box::pin(queries::insert_note(&self.db, note))
	}

	fn get_note<'a>(
		&'a self,
		owner_id: Uuid,
		note_id: &'a str,
	) -> BoxFuture<'a, Result<Option<NoteRecord>>> {
		Box::pin(queries::get_note(&self.db, owner_id, note_id))
	}

	fn list_notes<'a>(
		&'a self,
		owner_id: Uuid,
		scope: &'a NoteScope,
	) -> BoxFuture<'a, Result<Vec<NoteRecord>>> {
		Box::pin(queries::list_notes(&self.db, owner_id, scope))
	}

	fn update_note<'a>(&'a self, note: &'a NoteRecord) -> BoxFuture<'a, Result<bool>> {
		Box::pin(queries::update_note(&self.db, note))
	}

	fn delete_note<'a>(
		&'a self,
		owner_id: Uuid,
		note_id: &'a str,
	) -> BoxFuture<'a, Result<bool>> {
		Box::pin(queries::delete_note(&self.db, owner_id, note_id))
	}
}
