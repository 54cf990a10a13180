// src/handlers/database.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    services::database_service::{TableCount, TableQuery, TableView},
};

// GET /api/database
#[utoipa::path(
    get,
    path = "/api/database",
    tag = "Database",
    responses(
        (status = 200, description = "Tabelas disponíveis e quantidade de linhas", body = Vec<TableCount>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_tables(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let counts = app_state
        .database_service
        .counts()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(counts)))
}

// GET /api/database/{table}
#[utoipa::path(
    get,
    path = "/api/database/{table}",
    tag = "Database",
    params(
        ("table" = String, Path, description = "clients | projects | invoices"),
        TableQuery
    ),
    responses(
        (status = 200, description = "Colunas e linhas filtradas", body = TableView),
        (status = 404, description = "Tabela desconhecida")
    ),
    security(("api_jwt" = []))
)]
pub async fn browse_table(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(table): Path<String>,
    Query(query): Query<TableQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state
        .database_service
        .browse(&table, &query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

// GET /api/database/{table}/export
#[utoipa::path(
    get,
    path = "/api/database/{table}/export",
    tag = "Database",
    params(
        ("table" = String, Path, description = "clients | projects | invoices"),
        TableQuery
    ),
    responses(
        (status = 200, description = "CSV das linhas visíveis", content_type = "text/csv"),
        (status = 404, description = "Tabela desconhecida")
    ),
    security(("api_jwt" = []))
)]
pub async fn export_table(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(table): Path<String>,
    Query(query): Query<TableQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (file_name, csv) = app_state
        .database_service
        .export_csv(&table, &query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_name),
        ),
    ];

    Ok((StatusCode::OK, headers, csv))
}
