use super::types::{HealthResponse, PredictionRequest, PredictionResponse};
use crate::predictor::LoanModel;
use axum::{
    Form,
    extract::{
        State,
        rejection::{FormRejection, JsonRejection},
    },
    http::StatusCode,
    response::{Html, Json},
};
use tracing::{info, warn};
use uuid::Uuid;

const FORM_PAGE: &str = include_str!("form.html");

#[derive(Clone)]
pub struct AppState {
    pub model: LoanModel,
}

pub async fn index() -> Html<&'static str> {
    Html(FORM_PAGE)
}

/// Form submission from the page served at `/`.
pub async fn predict_form(
    State(state): State<AppState>,
    form: Result<Form<PredictionRequest>, FormRejection>,
) -> (StatusCode, Json<PredictionResponse>) {
    match form {
        Ok(Form(request)) => predict(&state, &request),
        Err(rejection) => reject(&state, rejection.status(), rejection.body_text()),
    }
}

pub async fn predict_json(
    State(state): State<AppState>,
    json: Result<Json<PredictionRequest>, JsonRejection>,
) -> (StatusCode, Json<PredictionResponse>) {
    match json {
        Ok(Json(request)) => predict(&state, &request),
        Err(rejection) => reject(&state, rejection.status(), rejection.body_text()),
    }
}

/// A body that does not decode still gets the `Error` mapping; while the
/// artifacts are unloaded that is the load error, whatever was sent.
fn reject(
    state: &AppState,
    status: StatusCode,
    message: String,
) -> (StatusCode, Json<PredictionResponse>) {
    if let Some(load_error) = state.model.load_error() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(PredictionResponse::failure(load_error)),
        );
    }
    warn!("Rejected prediction request: {}", message);
    (status, Json(PredictionResponse::failure(message)))
}

fn predict(state: &AppState, request: &PredictionRequest) -> (StatusCode, Json<PredictionResponse>) {
    let request_id = Uuid::new_v4();
    info!(
        "Received prediction request {} (income: {}, education: {})",
        request_id, request.income, request.education
    );

    let response = state.model.respond(request);
    let status = if response.is_success() {
        info!("Prediction request {} completed", request_id);
        StatusCode::OK
    } else if !state.model.is_ready() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        warn!("Prediction request {} failed", request_id);
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, Json(response))
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_loaded = state.model.is_ready();
    Json(HealthResponse {
        status: if model_loaded { "ok" } else { "degraded" }.to_string(),
        model_loaded,
        error: state.model.load_error().map(str::to_string),
    })
}
