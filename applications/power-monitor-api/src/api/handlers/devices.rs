use axum::{extract::State, Json};
use tracing::info;

use super::AppState;
use crate::{
    api::models::{PendingCommandsResponse, ToggleRequest, ToggleResponse},
    error::Result,
};

/// POST /api/v1/device/toggle
/// Queues a relay command for the bridge
pub async fn toggle(
    State(state): State<AppState>,
    Json(request): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>> {
    let slave_id = request.slave_id()?;
    let device = request.device()?;

    let states = state.commands.toggle(slave_id, device, request.state).await;
    info!(slave_id, device = ?device, state = request.state, "relay command queued");

    Ok(Json(ToggleResponse {
        success: true,
        states,
    }))
}

/// POST /api/v1/device/commands/drain
/// Hands pending commands to the bridge; each command is returned once
pub async fn drain_commands(State(state): State<AppState>) -> Json<PendingCommandsResponse> {
    let commands = state.commands.drain_pending().await;
    if !commands.is_empty() {
        info!(count = commands.len(), "relay commands drained");
    }

    Json(PendingCommandsResponse { commands })
}
