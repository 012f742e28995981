use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, DefaultBodyLimit, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;

use silhouette::io::{png, IoError};
use silhouette::overlay::{
    run_overlay, FigureStyle, OverlayError, OverlayParams, ResourceLimits, DOWNLOAD_FILE_NAME,
    DOWNLOAD_MIME_TYPE,
};

#[derive(Debug, Clone, Copy)]
pub struct AppState {
    pub limits: ResourceLimits,
}

pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(|| async { "Welcome to Silhouette!" }))
        .route("/api/v0/overlay", post(overlay))
        .route("/api/v0/figure", post(figure))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub enum ApiError {
    Query(QueryRejection),
    Overlay(OverlayError),
    Task(tokio::task::JoinError),
}

impl From<OverlayError> for ApiError {
    fn from(err: OverlayError) -> Self {
        ApiError::Overlay(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Query(rejection) => (StatusCode::BAD_REQUEST, rejection.body_text()),
            ApiError::Overlay(err) => (overlay_status(&err), err.to_string()),
            ApiError::Task(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };

        if status.is_server_error() {
            log::error!("request failed: {}", message);
        } else {
            log::warn!("request rejected: {}", message);
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

fn overlay_status(err: &OverlayError) -> StatusCode {
    match err {
        OverlayError::ResourceLimitExceeded { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        OverlayError::Io(IoError::PngEncodingError(_)) | OverlayError::Image(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::BAD_REQUEST,
    }
}

enum Rendering {
    Composite,
    Figure,
}

// the pipeline is cpu bound, keep it off the async workers
async fn render(
    limits: ResourceLimits,
    params: OverlayParams,
    body: Bytes,
    rendering: Rendering,
) -> Result<Vec<u8>, ApiError> {
    let result = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, OverlayError> {
        let output = run_overlay(&body, &params, &limits)?;
        match rendering {
            Rendering::Composite => output.png_bytes(),
            Rendering::Figure => {
                let figure = output.figure(&FigureStyle::default())?;
                Ok(png::encode_image_png_rgb8(&figure)?)
            }
        }
    })
    .await
    .map_err(ApiError::Task)?;

    Ok(result?)
}

pub async fn overlay(
    State(state): State<AppState>,
    query: Result<Query<OverlayParams>, QueryRejection>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let Query(params) = query.map_err(ApiError::Query)?;
    log::info!("overlay of {} bytes with {:?}", body.len(), params);

    let bytes = render(state.limits, params, body, Rendering::Composite).await?;

    Ok((
        [
            (header::CONTENT_TYPE, DOWNLOAD_MIME_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", DOWNLOAD_FILE_NAME),
            ),
        ],
        bytes,
    )
        .into_response())
}

pub async fn figure(
    State(state): State<AppState>,
    query: Result<Query<OverlayParams>, QueryRejection>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let Query(params) = query.map_err(ApiError::Query)?;
    log::info!("figure of {} bytes with {:?}", body.len(), params);

    let bytes = render(state.limits, params, body, Rendering::Figure).await?;

    Ok(([(header::CONTENT_TYPE, DOWNLOAD_MIME_TYPE)], bytes).into_response())
}
