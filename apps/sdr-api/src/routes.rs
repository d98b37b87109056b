use axum::{
	Json, Router,
	extract::{Path, State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;

use sdr_service::{
	ActionResponse, AnalysisRequest, BulkLeadRequest, BulkLeadResponse, Error,
	IntentClassificationRequest, IntentClassificationResponse, LeadInsightsRequest,
	LeadInsightsResponse, LeadQualityRequest, LeadQualityResponse, SentimentAnalysisRequest,
	SentimentAnalysisResponse,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/analyze", post(analyze))
		.route("/v1/sentiment", post(sentiment))
		.route("/v1/leads/quality", post(lead_quality))
		.route("/v1/emails/intent", post(email_intent))
		.route("/v1/leads/bulk", post(bulk_leads))
		.route("/v1/leads/{lead_id}/insights", get(lead_insights))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn analyze(
	State(state): State<AppState>,
	payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ActionResponse>, ApiError> {
	// An unreadable envelope has no usable action either.
	let Json(body) = payload.map_err(|err| {
		ApiError::new(StatusCode::BAD_REQUEST, "INVALID_ACTION", err.body_text())
	})?;
	let request = AnalysisRequest::from_envelope(body)?;
	let response = state.service.dispatch(request).await?;
	Ok(Json(response))
}

async fn sentiment(
	State(state): State<AppState>,
	payload: Result<Json<SentimentAnalysisRequest>, JsonRejection>,
) -> Result<Json<SentimentAnalysisResponse>, ApiError> {
	let response = state.service.advanced_sentiment_analysis(request_body(payload)?).await?;
	Ok(Json(response))
}

async fn lead_quality(
	State(state): State<AppState>,
	payload: Result<Json<LeadQualityRequest>, JsonRejection>,
) -> Result<Json<LeadQualityResponse>, ApiError> {
	let response = state.service.lead_quality_prediction(request_body(payload)?).await?;
	Ok(Json(response))
}

async fn email_intent(
	State(state): State<AppState>,
	payload: Result<Json<IntentClassificationRequest>, JsonRejection>,
) -> Result<Json<IntentClassificationResponse>, ApiError> {
	let response = state.service.email_intent_classification(request_body(payload)?).await?;
	Ok(Json(response))
}

async fn bulk_leads(
	State(state): State<AppState>,
	payload: Result<Json<BulkLeadRequest>, JsonRejection>,
) -> Result<Json<BulkLeadResponse>, ApiError> {
	let response = state.service.bulk_lead_analysis(request_body(payload)?).await?;
	Ok(Json(response))
}

async fn lead_insights(
	State(state): State<AppState>,
	Path(lead_id): Path<String>,
) -> Result<Json<LeadInsightsResponse>, ApiError> {
	let response =
		state.service.lead_insights(LeadInsightsRequest { lead_id: Some(lead_id) }).await?;
	Ok(Json(response))
}

fn request_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
	payload.map(|Json(body)| body).map_err(|err| {
		ApiError::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", err.body_text())
	})
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

impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidAction { .. } =>
				ApiError::new(StatusCode::BAD_REQUEST, "INVALID_ACTION", err.to_string()),
			err => {
				tracing::error!(error = %err, "Analysis request failed.");

				ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", err.to_string())
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
