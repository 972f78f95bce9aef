use axum::{extract::State, Json};
use power_monitor_core::calculate_tier_cost;

use super::AppState;
use crate::{
    api::models::{QuoteRequest, QuoteResponse},
    error::Result,
};

/// POST /api/v1/tariff/quote
/// Prices a monthly consumption with the current schedule and VAT
pub async fn quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    request.validate()?;

    let settings = state.settings.load().await?;
    let cost = calculate_tier_cost(request.kwh, &settings.tiers, settings.vat)?;

    Ok(Json(QuoteResponse::new(
        request.kwh,
        &settings.tiers,
        settings.vat,
        cost,
    )))
}
