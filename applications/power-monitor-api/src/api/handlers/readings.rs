use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use super::AppState;
use crate::{
    error::Result,
    ingest::{ingest_frame, ModbusFrame, RegisterSnapshot},
};

/// POST /api/v1/readings
/// Stores one register frame from the field bridge
pub async fn ingest(
    State(state): State<AppState>,
    Json(frame): Json<ModbusFrame>,
) -> Result<(StatusCode, Json<RegisterSnapshot>)> {
    let snapshot = ingest_frame(&state.readings, &state.commands, &frame, Utc::now()).await?;

    Ok((StatusCode::CREATED, Json(snapshot)))
}
