use axum::{
	Json, Router,
	body::Bytes,
	extract::{DefaultBodyLimit, State},
	http::{
		HeaderMap, StatusCode,
		header::{AUTHORIZATION, CONTENT_TYPE},
	},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;
use voxnote_service::{
	AnalyzeRequest, AnalyzeResponse, CreateNoteRequest, DeleteNoteRequest, DeleteNoteResponse,
	ListNotesResponse, NoteView, SubscriptionUpdate, SubscriptionUpdateResponse,
	TranscribeRequest, TranscribeResponse, UpdateNoteRequest, UploadAudioResponse,
};

const WEBHOOK_SIGNATURE_HEADER: &str = "X-Webhook-Signature";

pub fn router(state: AppState) -> Router {
	let max_upload_bytes = state.service.cfg.upload.max_upload_bytes as usize;

	Router::new()
		.route("/health", get(health))
		.route(
			"/api/upload-audio",
			post(upload_audio).layer(DefaultBodyLimit::max(max_upload_bytes)),
		)
		.route("/api/transcribe", post(transcribe))
		.route("/api/analyze", post(analyze))
		.route(
			"/api/notes",
			post(create_note).get(list_notes).patch(update_note).delete(delete_note),
		)
		.route("/api/billing/webhook", post(billing_webhook))
		.with_state(state)
}

pub fn admin_router(state: AppState) -> Router {
	Router::new().route("/admin/subscription", post(admin_set_subscription)).with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn upload_audio(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Bytes,
) -> Result<Json<UploadAudioResponse>, ApiError> {
	let bearer = bearer_token(&headers)?.to_string();
	let content_type = headers
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.unwrap_or_default()
		.to_string();
	let response = state.service.upload_audio(&bearer, &content_type, body.to_vec()).await?;

	Ok(Json(response))
}

async fn transcribe(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<TranscribeRequest>,
) -> Result<Json<TranscribeResponse>, ApiError> {
	let bearer = bearer_token(&headers)?.to_string();
	// Dropping the handler future (client gone) drops the token and ends the poll loop.
	let cancel = CancellationToken::new();
	let response = state.service.transcribe(&bearer, payload, &cancel).await?;

	Ok(Json(response))
}

async fn analyze(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
	let bearer = bearer_token(&headers)?.to_string();
	let response = state.service.analyze(&bearer, payload).await?;

	Ok(Json(response))
}

async fn create_note(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<NoteView>), ApiError> {
	let bearer = bearer_token(&headers)?.to_string();
	let note = state.service.create_note(&bearer, payload).await?;

	Ok((StatusCode::CREATED, Json(note)))
}

async fn list_notes(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<ListNotesResponse>, ApiError> {
	let bearer = bearer_token(&headers)?.to_string();
	let response = state.service.list_notes(&bearer).await?;

	Ok(Json(response))
}

async fn update_note(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<UpdateNoteRequest>,
) -> Result<Json<NoteView>, ApiError> {
	let bearer = bearer_token(&headers)?.to_string();
	let note = state.service.update_note(&bearer, payload).await?;

	Ok(Json(note))
}

async fn delete_note(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<DeleteNoteRequest>,
) -> Result<Json<DeleteNoteResponse>, ApiError> {
	let bearer = bearer_token(&headers)?.to_string();
	let response = state.service.delete_note(&bearer, payload).await?;

	Ok(Json(response))
}

async fn billing_webhook(
	State(state): State<AppState>,
	headers: HeaderMap,
	Json(payload): Json<SubscriptionUpdate>,
) -> Result<Json<SubscriptionUpdateResponse>, ApiError> {
	let provided = headers
		.get(WEBHOOK_SIGNATURE_HEADER)
		.and_then(|value| value.to_str().ok())
		.unwrap_or_default();

	if provided.is_empty() || provided != state.service.cfg.billing.webhook_secret {
		return Err(json_error(
			StatusCode::UNAUTHORIZED,
			None,
			"Invalid webhook signature.",
			None,
		));
	}

	let response = state.service.apply_subscription_update(payload).await?;

	Ok(Json(response))
}

/// Loopback-only operator tooling; trust is the bind address, not a signature.
async fn admin_set_subscription(
	State(state): State<AppState>,
	Json(payload): Json<SubscriptionUpdate>,
) -> Result<Json<SubscriptionUpdateResponse>, ApiError> {
	let response = state.service.apply_subscription_update(payload).await?;

	Ok(Json(response))
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
	let value = headers
		.get(AUTHORIZATION)
		.and_then(|value| value.to_str().ok())
		.ok_or_else(|| {
			json_error(StatusCode::UNAUTHORIZED, None, "Missing bearer credential.", None)
		})?;

	value
		.strip_prefix("Bearer ")
		.map(str::trim)
		.filter(|token| !token.is_empty())
		.ok_or_else(|| {
			json_error(StatusCode::UNAUTHORIZED, None, "Malformed authorization header.", None)
		})
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	code: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	details: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error: String,
	code: Option<String>,
	details: Option<String>,
}

pub fn json_error(
	status: StatusCode,
	code: Option<&str>,
	error: impl Into<String>,
	details: Option<String>,
) -> ApiError {
	ApiError { status, error: error.into(), code: code.map(ToString::to_string), details }
}

impl From<voxnote_service::Error> for ApiError {
	fn from(err: voxnote_service::Error) -> Self {
		use voxnote_service::Error;

		match err {
			Error::Unauthorized { message } =>
				json_error(StatusCode::UNAUTHORIZED, None, message, None),
			Error::Forbidden { message } => json_error(StatusCode::FORBIDDEN, None, message, None),
			Error::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, None, message, None),
			Error::NotFound { message } => json_error(StatusCode::NOT_FOUND, None, message, None),
			Error::QuotaExceeded { .. } => json_error(
				StatusCode::PAYMENT_REQUIRED,
				Some("FREE_LIMIT_REACHED"),
				"Free note limit reached.",
				None,
			),
			Error::EmptySummary => json_error(
				StatusCode::INTERNAL_SERVER_ERROR,
				None,
				"Failed to summarize the transcript.",
				Some("No summary points extracted.".to_string()),
			),
			Error::Upstream { status, message } => json_error(
				StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
				None,
				"Upstream provider call failed.",
				Some(message),
			),
			Error::Provider { message } => json_error(
				StatusCode::INTERNAL_SERVER_ERROR,
				None,
				"Provider call failed.",
				Some(message),
			),
			Error::PollTimeout { attempts } => json_error(
				StatusCode::GATEWAY_TIMEOUT,
				None,
				"Transcription timed out.",
				Some(format!("Gave up after {attempts} poll attempts.")),
			),
			Error::Storage { message } => json_error(
				StatusCode::INTERNAL_SERVER_ERROR,
				None,
				"Storage operation failed.",
				Some(message),
			),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error: self.error, code: self.code, details: self.details };

		(self.status, Json(body)).into_response()
	}
}
