// src/handlers/currencies.rs

use axum::Json;

use crate::common::currency::{Currency, CurrencyInfo};

// GET /api/currencies
#[utoipa::path(
    get,
    path = "/api/currencies",
    tag = "Currencies",
    responses(
        (status = 200, description = "Moedas aceitas em projetos e faturas", body = Vec<CurrencyInfo>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_currencies() -> Json<Vec<CurrencyInfo>> {
    Json(Currency::ALL.into_iter().map(CurrencyInfo::from).collect())
}
