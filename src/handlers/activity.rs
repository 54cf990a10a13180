// src/handlers/activity.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::activity::{ActivityLog, ActivityQuery},
};

// GET /api/activity
#[utoipa::path(
    get,
    path = "/api/activity",
    tag = "Activity",
    params(ActivityQuery),
    responses(
        (status = 200, description = "Atividades mais recentes primeiro", body = Vec<ActivityLog>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_activity(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<ActivityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let logs = app_state
        .activity_service
        .recent(query.effective_limit())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(logs)))
}
