use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{Error, NotelyService, Result, password, token};
use notely_domain::theme::Theme;
use notely_storage::models::{SessionRecord, UserRecord};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const MISSING_TOKEN: &str = "No token, authorization denied";
const INVALID_TOKEN: &str = "Token is not valid";

#[derive(Clone, Debug, Deserialize)]
pub struct RegisterRequest {
	#[serde(default)]
	pub username: Option<String>,
	pub email: String,
	pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoginRequest {
	pub email: String,
	pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PreferencesRequest {
	pub theme: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
	pub theme: Theme,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: Uuid,
	pub email: String,
	pub display_name: Option<String>,
	pub photo_url: Option<String>,
	pub preferences: Preferences,
	#[serde(with = "notely_storage::time_serde")]
	pub created_at: OffsetDateTime,
}
impl From<UserRecord> for User {
	fn from(record: UserRecord) -> Self {
		Self {
			id: record.user_id,
			email: record.email,
			display_name: record.display_name,
			photo_url: record.photo_url,
			preferences: Preferences { theme: record.theme.parse().unwrap_or_default() },
			created_at: record.created_at,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthResponse {
	pub token: String,
	pub user: User,
}

impl NotelyService {
	pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse> {
		let email = normalize_email(&req.email)?;
		let min_chars = self.cfg.security.min_password_chars as usize;

		if req.password.chars().count() < min_chars {
			return Err(Error::InvalidRequest {
				message: format!("Password must be at least {min_chars} characters."),
			});
		}
		if self.store.find_user_by_email(&email).await?.is_some() {
			return Err(Error::Conflict { message: "User already exists".to_string() });
		}

		let now = OffsetDateTime::now_utc();
		let user = UserRecord {
			user_id: Uuid::new_v4(),
			email,
			display_name: req
				.username
				.map(|name| name.trim().to_string())
				.filter(|name| !name.is_empty()),
			photo_url: None,
			theme: Theme::default().as_str().to_string(),
			password_hash: password::hash_password(&req.password)?,
			created_at: now,
		};

		self.store.insert_user(&user).await?;

		let token = self.issue_session(user.user_id, now).await?;

		tracing::info!(user_id = %user.user_id, "Registered user.");

		Ok(AuthResponse { token, user: user.into() })
	}

	pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse> {
		let invalid = || Error::Unauthorized { message: INVALID_CREDENTIALS.to_string() };
		let email = normalize_email(&req.email).map_err(|_| invalid())?;
		let Some(user) = self.store.find_user_by_email(&email).await? else {
			return Err(invalid());
		};

		if !password::verify_password(&req.password, &user.password_hash) {
			tracing::debug!(user_id = %user.user_id, "Rejected login with a wrong password.");

			return Err(invalid());
		}

		let now = OffsetDateTime::now_utc();
		let purged = self.store.purge_expired_sessions(now).await?;

		if purged > 0 {
			tracing::debug!(purged, "Purged expired sessions.");
		}

		let token = self.issue_session(user.user_id, now).await?;

		tracing::info!(user_id = %user.user_id, "User logged in.");

		Ok(AuthResponse { token, user: user.into() })
	}

	/// Ends the session behind `token`. Unknown tokens are ignored.
	pub async fn logout(&self, token: &str) -> Result<()> {
		let removed = self.store.delete_session(&token::digest(token.trim())).await?;

		tracing::debug!(removed, "Processed logout.");

		Ok(())
	}

	/// Resolves a bearer token to the id of the user it was issued to.
	pub async fn authenticate(&self, token: Option<&str>) -> Result<Uuid> {
		let Some(token) = token.map(str::trim).filter(|token| !token.is_empty()) else {
			return Err(Error::Unauthorized { message: MISSING_TOKEN.to_string() });
		};
		let invalid = || Error::Unauthorized { message: INVALID_TOKEN.to_string() };
		let token_hash = token::digest(token);
		let Some(session) = self.store.find_session(&token_hash).await? else {
			return Err(invalid());
		};

		if session.expires_at <= OffsetDateTime::now_utc() {
			self.store.delete_session(&token_hash).await?;

			return Err(invalid());
		}

		Ok(session.user_id)
	}

	pub async fn me(&self, user_id: Uuid) -> Result<User> {
		let Some(user) = self.store.get_user(user_id).await? else {
			return Err(Error::NotFound { message: "User not found".to_string() });
		};

		Ok(user.into())
	}

	pub async fn update_preferences(&self, user_id: Uuid, req: PreferencesRequest) -> Result<User> {
		let theme: Theme =
			req.theme.parse().map_err(|message| Error::InvalidRequest { message })?;
		let Some(user) = self.store.update_user_theme(user_id, theme.as_str()).await? else {
			return Err(Error::NotFound { message: "User not found".to_string() });
		};

		Ok(user.into())
	}

	async fn issue_session(&self, user_id: Uuid, now: OffsetDateTime) -> Result<String> {
		let token = token::generate();
		let ttl = Duration::hours(i64::from(self.cfg.security.session_ttl_hours));
		let session = SessionRecord {
			token_hash: token::digest(&token),
			user_id,
			created_at: now,
			expires_at: now + ttl,
		};

		self.store.insert_session(&session).await?;

		Ok(token)
	}
}

fn normalize_email(raw: &str) -> Result<String> {
	let email = raw.trim().to_lowercase();
	let valid = match email.split_once('@') {
		Some((local, domain)) =>
			!local.is_empty()
				&& !domain.is_empty()
				&& !domain.contains('@')
				&& !email.chars().any(char::is_whitespace),
		None => false,
	};

	if !valid {
		return Err(Error::InvalidRequest { message: "Please include a valid email".to_string() });
	}

	Ok(email)
}
