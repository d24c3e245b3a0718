//! Axum REST API handlers

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
    extract::{DefaultBodyLimit, FromRequest, Multipart, Path, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use tower_http::services::ServeDir;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::engine::{DiseaseClass, ALL_CLASSES};
use crate::service::Predictor;
use crate::utils::image::decode_data_uri;

use super::dto::*;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Application state shared across handlers
pub struct AppState {
    pub predictor: Arc<Predictor>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(predictor: Arc<Predictor>) -> Self {
        Self {
            predictor,
            start_time: Instant::now(),
        }
    }
}

/// Create the REST API router
pub fn create_rest_router(state: Arc<AppState>, server: &ServerConfig) -> Router {
    Router::new()
        // Prediction, under the paths Gradio clients try
        .route("/api/predict", post(predict_handler))
        .route("/run/predict", post(predict_handler))
        .route("/call/predict", post(predict_handler))
        // Class table
        .route("/api/v1/classes", get(classes_handler))
        .route("/api/v1/classes/:code", get(class_handler))
        // System endpoints
        .route("/health", get(health_handler))
        .route("/api/v1/health", get(health_handler))
        // Upload page
        .fallback_service(ServeDir::new(&server.ui_dir).append_index_html_on_directories(true))
        // Middleware
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn bad_request(error: &str, code: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(error, code)))
}

/// Extractor failure: 413 when the body limit was hit, 400 otherwise
fn rejected(status: StatusCode, error: &str, code: &str) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        (status, Json(ErrorResponse::new(error, "PAYLOAD_TOO_LARGE")))
    } else {
        bad_request(error, code)
    }
}

/// Classify an uploaded image
///
/// Accepts `multipart/form-data` with an `image` field, answering with the
/// bare prediction record, or a Gradio JSON envelope, answering in kind.
async fn predict_handler(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| rejected(e.status(), &e.body_text(), "MULTIPART_ERROR"))?;
        let image_data = read_image_field(multipart).await?;

        info!(%request_id, bytes = image_data.len(), "Predict request (multipart)");
        let record = state.predictor.predict(image_data).await.into_record();
        log_record(request_id, record.error.as_deref());

        Ok(Json(record).into_response())
    } else if content_type.starts_with("application/json") {
        let Json(body) = Json::<GradioPredictRequest>::from_request(request, &state)
            .await
            .map_err(|e| rejected(e.status(), &e.body_text(), "INVALID_JSON"))?;
        let image_data = read_gradio_image(&body)?;

        info!(%request_id, bytes = image_data.len(), "Predict request (json)");
        let record = state.predictor.predict(image_data).await.into_record();
        log_record(request_id, record.error.as_deref());

        Ok(Json(GradioPredictResponse { data: vec![record] }).into_response())
    } else {
        Err((
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Json(ErrorResponse::new(
                "Expected multipart/form-data or application/json",
                "UNSUPPORTED_MEDIA_TYPE",
            )),
        ))
    }
}

async fn read_image_field(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| rejected(e.status(), &e.body_text(), "MULTIPART_ERROR"))?
    {
        if field.name() == Some("image") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| rejected(e.status(), &e.body_text(), "READ_ERROR"))?;
            return Ok(bytes.to_vec());
        }
    }

    Err(bad_request("Missing image field", "MISSING_IMAGE"))
}

fn read_gradio_image(body: &GradioPredictRequest) -> Result<Vec<u8>, ApiError> {
    let uri = body
        .data
        .first()
        .and_then(|v| v.as_str())
        .ok_or_else(|| bad_request("Expected data[0] to be an image data URI", "MISSING_IMAGE"))?;

    decode_data_uri(uri).map_err(|e| bad_request(&format!("{:#}", e), "INVALID_IMAGE_DATA"))
}

fn log_record(request_id: Uuid, error: Option<&str>) {
    match error {
        Some(error) => warn!(%request_id, error, "Predict request answered with error result"),
        None => info!(%request_id, "Predict request completed"),
    }
}

/// List all classes with their condition info
async fn classes_handler() -> Json<ClassesResponse> {
    Json(ClassesResponse {
        classes: ALL_CLASSES.iter().copied().map(ClassDto::from).collect(),
    })
}

/// Look up one class by code
async fn class_handler(Path(code): Path<String>) -> Result<Json<ClassDto>, ApiError> {
    DiseaseClass::from_code(&code)
        .map(|class| Json(ClassDto::from(class)))
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(&format!("Unknown class code: {}", code), "NOT_FOUND")),
            )
        })
}

/// Health check
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let health = state.predictor.health();

    Json(HealthResponse {
        status: if health.model_loaded { "healthy" } else { "degraded" }.to_string(),
        model_loaded: health.model_loaded,
        version: health.version,
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
