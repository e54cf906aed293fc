mod page;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    AppConfig, ExportStatus, GanttError, RegistryEntry, SelectResponse, Shell, UploadRequest,
    UploadResponse,
};

#[derive(Clone)]
pub struct AppState {
    shell: Arc<Shell>,
    page_title: Arc<str>,
}

impl AppState {
    pub fn new(shell: Shell, page_title: impl Into<String>) -> Self {
        let page_title: String = page_title.into();
        Self {
            shell: Arc::new(shell),
            page_title: page_title.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(Shell::from_config(config), config.page_title.clone())
    }

    fn shell(&self) -> Arc<Shell> {
        self.shell.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Unprocessable(&'static str, String),
    Internal(String),
}

#[derive(Debug, Deserialize)]
struct ChartQuery {
    file: String,
}

#[derive(Debug, Deserialize)]
struct ExportPayload {
    file: Option<String>,
}

impl ApiError {
    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<GanttError> for ApiError {
    fn from(value: GanttError) -> Self {
        if value.is_not_found() {
            return ApiError::NotFound(value.to_string());
        }
        match value {
            GanttError::MalformedSchedule(_) => {
                ApiError::Unprocessable("malformed_schedule", value.to_string())
            }
            GanttError::InvalidDate { .. } => {
                ApiError::Unprocessable("invalid_date", value.to_string())
            }
            GanttError::InvalidSelection(_) | GanttError::InvalidUpload(_) => {
                ApiError::Invalid(value.to_string())
            }
            GanttError::Io { .. } | GanttError::Frame(_) | GanttError::Render(_) => {
                ApiError::Internal(value.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Unprocessable(error, message) => {
                (StatusCode::UNPROCESSABLE_ENTITY, error, message)
            }
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        warn!(status = status.as_u16(), error, %message, "request failed");
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/api/schedules", get(list_schedules))
        .route("/api/chart", get(select_chart))
        .route("/api/upload", post(upload_schedule))
        .route("/api/export", post(export_chart))
        .with_state(state)
}

pub async fn serve(config: &AppConfig) -> std::io::Result<()> {
    let state = AppState::from_config(config);
    state
        .shell
        .registry()
        .ensure_dir()
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(config.http_addr).await?;
    info!(addr = %config.http_addr, dir = %config.schedule_dir.display(), "gantt viewer listening");
    axum::serve(listener, app).await
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(page::render(&state.page_title))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_schedules(
    State(state): State<AppState>,
) -> Result<Json<Vec<RegistryEntry>>, ApiError> {
    let entries = state.shell().entries()?;
    Ok(Json(entries))
}

async fn select_chart(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<SelectResponse>, ApiError> {
    let response = state.shell().select(&query.file)?;
    Ok(Json(response))
}

async fn upload_schedule(
    State(state): State<AppState>,
    Json(request): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    let response = state.shell().upload(&request)?;
    Ok(Json(response))
}

async fn export_chart(
    State(state): State<AppState>,
    Json(payload): Json<ExportPayload>,
) -> Result<Json<ExportStatus>, ApiError> {
    let Some(file) = payload.file.filter(|file| !file.trim().is_empty()) else {
        return Err(ApiError::Invalid("no schedule selected".into()));
    };
    let shell = state.shell();
    let status = tokio::task::spawn_blocking(move || shell.export(&file))
        .await
        .map_err(|err| ApiError::internal(format!("export task failed: {err}")))??;
    Ok(Json(status))
}
