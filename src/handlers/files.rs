// src/handlers/files.rs
//
// Entrega pública dos objetos do bucket (as URLs gravadas nos recursos apontam para cá).

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::{
    common::{error::ApiError, resource_path::guess_content_type},
    config::AppState,
    middleware::i18n::Locale,
};

// GET /files/{*path}
pub async fn serve_file(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = app_state
        .storage
        .download(&path)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let headers = [(header::CONTENT_TYPE, guess_content_type(&path))];

    Ok((StatusCode::OK, headers, bytes))
}
