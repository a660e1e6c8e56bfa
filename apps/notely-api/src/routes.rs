use axum::{
	Json, Router,
	extract::{
		FromRequestParts, Path, Query, State,
		rejection::{JsonRejection, QueryRejection},
	},
	http::{
		HeaderMap, HeaderName, HeaderValue, Method, StatusCode,
		header::{AUTHORIZATION, CONTENT_TYPE},
		request::Parts,
	},
	response::{IntoResponse, Response},
	routing::{get, post, put},
};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use uuid::Uuid;

use crate::state::AppState;
use notely_service::{
	AuthResponse, CreateNoteRequest, Error as ServiceError, ListNotesRequest, LoginRequest, Note,
	PinRequest, PreferencesRequest, RegisterRequest, RenderedNote, UpdateNoteRequest, User,
};

const HEADER_AUTH_TOKEN: &str = "x-auth-token";

pub fn router(state: AppState) -> Router {
	let cors = cors_layer(&state.service.cfg.service.cors_allowed_origins);

	Router::new()
		.route("/", get(banner))
		.route("/health", get(health))
		.route("/api/users/register", post(register))
		.route("/api/users/login", post(login))
		.route("/api/users/logout", post(logout))
		.route("/api/users/me", get(me))
		.route("/api/users/preferences", put(update_preferences))
		.route("/api/notes", get(list_notes).post(create_note))
		.route("/api/notes/{id}", get(get_note).put(update_note).delete(delete_note))
		.route("/api/notes/{id}/pin", put(set_pinned))
		.route("/api/notes/{id}/html", get(render_note))
		.route("/api/notes/tags/{tag}", get(notes_by_tag))
		.route("/api/notes/categories/{category}", get(notes_by_category))
		.route("/api/tags", get(list_tags))
		.route("/api/categories", get(list_categories))
		.layer(cors)
		.with_state(state)
}

/// An empty origin list allows any origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
	let allow_origin = if origins.is_empty() {
		AllowOrigin::from(Any)
	} else {
		let values = origins
			.iter()
			.filter_map(|origin| match HeaderValue::from_str(origin) {
				Ok(value) => Some(value),
				Err(_) => {
					tracing::warn!(origin = %origin, "Ignoring invalid CORS origin.");

					None
				},
			})
			.collect::<Vec<_>>();

		AllowOrigin::list(values)
	};

	CorsLayer::new()
		.allow_origin(allow_origin)
		.allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
		.allow_headers([CONTENT_TYPE, AUTHORIZATION, HeaderName::from_static(HEADER_AUTH_TOKEN)])
}

/// The caller behind a valid session token.
pub struct AuthUser {
	pub user_id: Uuid,
}
impl FromRequestParts<AppState> for AuthUser {
	type Rejection = ApiError;

	async fn from_request_parts(
		parts: &mut Parts,
		state: &AppState,
	) -> Result<Self, Self::Rejection> {
		let token = read_token(&parts.headers);
		let user_id = state.service.authenticate(token).await?;

		Ok(Self { user_id })
	}
}

/// Reads `x-auth-token`, falling back to `Authorization: Bearer`. The scheme is matched without
/// regard to case.
fn read_token(headers: &HeaderMap) -> Option<&str> {
	if let Some(raw) = headers.get(HEADER_AUTH_TOKEN)
		&& let Some(token) = raw.to_str().ok().and_then(non_blank)
	{
		return Some(token);
	}

	let raw = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();

	let (scheme, token) = raw.split_once(' ')?;

	if !scheme.eq_ignore_ascii_case("bearer") {
		return None;
	}

	non_blank(token)
}

fn non_blank(value: &str) -> Option<&str> {
	let value = value.trim();

	if value.is_empty() { None } else { Some(value) }
}

async fn banner() -> &'static str {
	"Notely API is running."
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn register(
	State(state): State<AppState>,
	payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
	let Json(payload) = payload?;
	let response = state.service.register(payload).await?;

	Ok(Json(response))
}

async fn login(
	State(state): State<AppState>,
	payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
	let Json(payload) = payload?;
	let response = state.service.login(payload).await?;

	Ok(Json(response))
}

/// Ends the presented session. Unknown and expired tokens still count as logged out.
async fn logout(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
	let Some(token) = read_token(&headers) else {
		return Err(ServiceError::Unauthorized {
			message: "No token, authorization denied".to_string(),
		}
		.into());
	};

	state.service.logout(token).await?;

	Ok(StatusCode::NO_CONTENT)
}

async fn me(State(state): State<AppState>, auth: AuthUser) -> Result<Json<User>, ApiError> {
	let user = state.service.me(auth.user_id).await?;

	Ok(Json(user))
}

async fn update_preferences(
	State(state): State<AppState>,
	auth: AuthUser,
	payload: Result<Json<PreferencesRequest>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
	let Json(payload) = payload?;
	let user = state.service.update_preferences(auth.user_id, payload).await?;

	Ok(Json(user))
}

async fn list_notes(
	State(state): State<AppState>,
	auth: AuthUser,
	query: Result<Query<ListNotesRequest>, QueryRejection>,
) -> Result<Json<Vec<Note>>, ApiError> {
	let Query(query) = query?;
	let notes = state.service.list_notes(auth.user_id, query).await?;

	Ok(Json(notes))
}

async fn create_note(
	State(state): State<AppState>,
	auth: AuthUser,
	payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
	let Json(payload) = payload?;
	let note = state.service.create_note(auth.user_id, payload).await?;

	Ok((StatusCode::CREATED, Json(note)))
}

async fn get_note(
	State(state): State<AppState>,
	auth: AuthUser,
	Path(id): Path<String>,
) -> Result<Json<Note>, ApiError> {
	let note = state.service.get_note(auth.user_id, &id).await?;

	Ok(Json(note))
}

async fn update_note(
	State(state): State<AppState>,
	auth: AuthUser,
	Path(id): Path<String>,
	payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
	let Json(payload) = payload?;
	let note = state.service.update_note(auth.user_id, &id, payload).await?;

	Ok(Json(note))
}

#[derive(Debug, Serialize)]
struct MessageBody {
	message: &'static str,
}

async fn delete_note(
	State(state): State<AppState>,
	auth: AuthUser,
	Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
	state.service.delete_note(auth.user_id, &id).await?;

	Ok(Json(MessageBody { message: "Note deleted" }))
}

async fn set_pinned(
	State(state): State<AppState>,
	auth: AuthUser,
	Path(id): Path<String>,
	payload: Result<Json<PinRequest>, JsonRejection>,
) -> Result<Json<Note>, ApiError> {
	let Json(payload) = payload?;
	let note = state.service.set_pinned(auth.user_id, &id, payload.pinned).await?;

	Ok(Json(note))
}

async fn render_note(
	State(state): State<AppState>,
	auth: AuthUser,
	Path(id): Path<String>,
) -> Result<Json<RenderedNote>, ApiError> {
	let rendered = state.service.render_note(auth.user_id, &id).await?;

	Ok(Json(rendered))
}

async fn notes_by_tag(
	State(state): State<AppState>,
	auth: AuthUser,
	Path(tag): Path<String>,
) -> Result<Json<Vec<Note>>, ApiError> {
	let notes = state.service.notes_by_tag(auth.user_id, &tag).await?;

	Ok(Json(notes))
}

async fn notes_by_category(
	State(state): State<AppState>,
	auth: AuthUser,
	Path(category): Path<String>,
) -> Result<Json<Vec<Note>>, ApiError> {
	let notes = state.service.notes_by_category(auth.user_id, &category).await?;

	Ok(Json(notes))
}

async fn list_tags(
	State(state): State<AppState>,
	auth: AuthUser,
) -> Result<Json<Vec<String>>, ApiError> {
	let tags = state.service.list_tags(auth.user_id).await?;

	Ok(Json(tags))
}

async fn list_categories(
	State(state): State<AppState>,
	auth: AuthUser,
) -> Result<Json<Vec<String>>, ApiError> {
	let categories = state.service.list_categories(auth.user_id).await?;

	Ok(Json(categories))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } =>
				Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message),
			ServiceError::Unauthorized { message } =>
				Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message),
			ServiceError::NotFound { message } =>
				Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message),
			ServiceError::Conflict { message } =>
				Self::new(StatusCode::CONFLICT, "CONFLICT", message),
			ServiceError::Storage { message } => {
				tracing::error!(error = %message, "Storage failure while serving request.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Server error")
			},
		}
	}
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", rejection.body_text())
	}
}

impl From<QueryRejection> for ApiError {
	fn from(rejection: QueryRejection) -> Self {
		Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", rejection.body_text())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		if self.status.is_client_error() {
			tracing::debug!(
				status = self.status.as_u16(),
				error_code = %self.error_code,
				message = %self.message,
				"Rejected request."
			);
		}

		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

#[cfg(test)]
mod tests {
	use axum::http::HeaderMap;

	use super::{AUTHORIZATION, HEADER_AUTH_TOKEN, read_token};

	#[test]
	fn prefers_the_auth_token_header() {
		let mut headers = HeaderMap::new();

		headers.insert(AUTHORIZATION, "Bearer from-bearer".parse().expect("valid header"));

		assert_eq!(read_token(&headers), Some("from-bearer"));

		headers.insert(HEADER_AUTH_TOKEN, " from-header ".parse().expect("valid header"));

		assert_eq!(read_token(&headers), Some("from-header"));
	}

	#[test]
	fn matches_the_bearer_scheme_without_case() {
		let mut headers = HeaderMap::new();

		headers.insert(AUTHORIZATION, "bearer lower".parse().expect("valid header"));

		assert_eq!(read_token(&headers), Some("lower"));

		headers.insert(AUTHORIZATION, "BEARER  upper ".parse().expect("valid header"));

		assert_eq!(read_token(&headers), Some("upper"));
	}

	#[test]
	fn ignores_blank_and_non_bearer_values() {
		let mut headers = HeaderMap::new();

		assert_eq!(read_token(&headers), None);

		headers.insert(AUTHORIZATION, "Basic abc".parse().expect("valid header"));

		assert_eq!(read_token(&headers), None);

		headers.insert(HEADER_AUTH_TOKEN, "  ".parse().expect("valid header"));

		assert_eq!(read_token(&headers), None);
	}
}
