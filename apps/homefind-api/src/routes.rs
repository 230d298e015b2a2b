use axum::{
	Json, Router,
	extract::{FromRequest, Query, Request, State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use homefind_service::{
	BrokerDetailsRequest, BrokerDetailsResponse, CarouselRequest, DeleteSavedSearchRequest, Error,
	ExportRequest,
	ExportResponse, ExtractInformationResponse, MessageResponse, SaveSearchRequest,
	SavedSearchesResponse, SearchRequest, SearchResponse, SearchResultsResponse,
};

pub fn router(state: AppState) -> Router {
	let allow_any_origin = state.service.cfg.service.cors_allow_any_origin;
	let router = Router::new()
		.route("/health", get(health))
		.route("/api/search", post(search))
		.route("/api/search_results", post(search_results))
		.route("/api/extract_information", post(extract_information))
		.route("/api/save_search", post(save_search))
		.route("/api/get_saved_searches", get(saved_searches))
		.route("/api/delete_saved_search", post(delete_saved_search))
		.route("/api/clear_saved_searches", post(clear_saved_searches))
		.route("/api/get_broker_details", get(broker_details))
		.route("/api/save_to_txt", post(export))
		.route("/api/send_carousel", post(send_carousel))
		.with_state(state)
		.layer(TraceLayer::new_for_http());

	if allow_any_origin { router.layer(CorsLayer::permissive()) } else { router }
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	ApiJson(payload): ApiJson<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
	let response = state.service.search(payload).await?;

	Ok(Json(response))
}

async fn search_results(
	State(state): State<AppState>,
	ApiJson(payload): ApiJson<SearchRequest>,
) -> Result<Json<SearchResultsResponse>, ApiError> {
	let response = state.service.search_results(payload).await?;

	Ok(Json(response))
}

async fn extract_information(
	State(state): State<AppState>,
	ApiJson(payload): ApiJson<SearchRequest>,
) -> Result<Json<ExtractInformationResponse>, ApiError> {
	let response = state.service.extract_information(payload).await?;

	Ok(Json(response))
}

async fn save_search(
	State(state): State<AppState>,
	ApiJson(payload): ApiJson<SaveSearchRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
	let response = state.service.save_search(payload).await?;

	Ok(Json(response))
}

async fn saved_searches(
	State(state): State<AppState>,
) -> Result<Json<SavedSearchesResponse>, ApiError> {
	let response = state.service.saved_searches().await?;

	Ok(Json(response))
}

async fn delete_saved_search(
	State(state): State<AppState>,
	ApiJson(payload): ApiJson<DeleteSavedSearchRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
	let response = state.service.delete_saved_search(payload).await?;

	Ok(Json(response))
}

async fn clear_saved_searches(
	State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
	let response = state.service.clear_saved_searches().await?;

	Ok(Json(response))
}

async fn broker_details(
	State(state): State<AppState>,
	Query(params): Query<BrokerDetailsRequest>,
) -> Result<Json<BrokerDetailsResponse>, ApiError> {
	let response = state.service.broker_details(params)?;

	Ok(Json(response))
}

async fn export(
	State(state): State<AppState>,
	ApiJson(payload): ApiJson<ExportRequest>,
) -> Result<Json<ExportResponse>, ApiError> {
	let response = state.service.export(payload).await?;

	Ok(Json(response))
}

async fn send_carousel(
	State(state): State<AppState>,
	ApiJson(payload): ApiJson<CarouselRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
	let response = state.service.send_carousel(payload).await?;

	Ok(Json(response))
}

/// `Json` whose rejections answer with the API error body.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
	Json<T>: FromRequest<S, Rejection = JsonRejection>,
	S: Send + Sync,
{
	type Rejection = ApiError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let Json(value) = Json::<T>::from_request(req, state).await?;

		Ok(Self(value))
	}
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	error: String,
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

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		let (status, error_code) = match &err {
			Error::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
			Error::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
			Error::Extraction { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "EXTRACTION_FAILED"),
			Error::Synthesis => (StatusCode::INTERNAL_SERVER_ERROR, "SYNTHESIS_FAILED"),
			Error::Execution => (StatusCode::INTERNAL_SERVER_ERROR, "EXECUTION_FAILED"),
			Error::Storage { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
			Error::Export { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_FAILED"),
			Error::Messaging { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "MESSAGING_FAILED"),
		};
		// Client-facing messages go out bare; server-side failures use their display text.
		let message = match err {
			Error::InvalidRequest { message } | Error::NotFound { message } => message,
			other => other.to_string(),
		};

		ApiError::new(status, error_code, message)
	}
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		ApiError::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", rejection.body_text())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, error: self.message };

		(self.status, Json(body)).into_response()
	}
}
