use crate::error::{AppError, Result};
use crate::model::ShortenRequest;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use shorten_core::{ShortKey, UrlRecord};
use tracing::info;

pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UrlRecord>)> {
    let Json(request) = payload.map_err(AppError::InvalidPayload)?;

    let record = state.shortener().shorten(&request.long_url).await?;
    info!(key = %record.key, long_url = %record.long_url, "Shortened URL");

    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn resolve_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    let record = state.shortener().resolve(&ShortKey::new(key)).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, record.long_url)]).into_response())
}

pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode> {
    state.shortener().delete(&ShortKey::new(key)).await?;

    Ok(StatusCode::NO_CONTENT)
}
