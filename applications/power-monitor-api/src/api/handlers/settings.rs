use axum::{extract::State, Json};
use power_monitor_core::{
    validate_room_thresholds, validate_threshold_pair, validate_tier_schedule, validate_vat,
    ThresholdPair, TierSchedule,
};

use super::AppState;
use crate::{
    api::models::{
        EmailSettingsRequest, EmailSettingsView, RoomThresholdsBody, SavedResponse, VatRequest,
    },
    error::Result,
    repositories::SettingsChange,
};

async fn save(state: &AppState, change: SettingsChange) -> Result<Json<SavedResponse>> {
    let kind = change.kind();
    state.settings.save(change).await?;
    Ok(Json(SavedResponse::new(kind)))
}

/// POST /api/v1/settings/thresholds
pub async fn save_thresholds(
    State(state): State<AppState>,
    Json(pair): Json<ThresholdPair>,
) -> Result<Json<SavedResponse>> {
    let pair = validate_threshold_pair(pair)?;
    save(&state, SettingsChange::Thresholds(pair)).await
}

/// POST /api/v1/settings/tiers
pub async fn save_tiers(
    State(state): State<AppState>,
    Json(schedule): Json<TierSchedule>,
) -> Result<Json<SavedResponse>> {
    let schedule = validate_tier_schedule(schedule)?;
    save(&state, SettingsChange::Tiers(schedule)).await
}

/// POST /api/v1/settings/vat
pub async fn save_vat(
    State(state): State<AppState>,
    Json(request): Json<VatRequest>,
) -> Result<Json<SavedResponse>> {
    let vat = validate_vat(request.vat)?;
    save(&state, SettingsChange::Vat(vat)).await
}

/// GET /api/v1/settings/room-thresholds
pub async fn get_room_thresholds(State(state): State<AppState>) -> Result<Json<RoomThresholdsBody>> {
    let settings = state.settings.load().await?;

    Ok(Json(RoomThresholdsBody {
        room_thresholds: settings.room_thresholds,
    }))
}

/// POST /api/v1/settings/room-thresholds
/// Replaces the whole map; rooms left out lose their pair
pub async fn save_room_thresholds(
    State(state): State<AppState>,
    Json(body): Json<RoomThresholdsBody>,
) -> Result<Json<SavedResponse>> {
    let rooms = validate_room_thresholds(body.room_thresholds)?;
    save(&state, SettingsChange::RoomThresholds(rooms)).await
}

/// GET /api/v1/settings/email
pub async fn get_email(State(state): State<AppState>) -> Result<Json<EmailSettingsView>> {
    let settings = state.settings.load().await?;

    Ok(Json(EmailSettingsView::from(&settings.email)))
}

/// POST /api/v1/settings/email
pub async fn save_email(
    State(state): State<AppState>,
    Json(request): Json<EmailSettingsRequest>,
) -> Result<Json<SavedResponse>> {
    request.validate()?;

    let current = state.settings.load().await?;
    let email = request.apply_to(&current.email);
    save(&state, SettingsChange::Email(email)).await
}
