use axum::{extract::State, Json};
use chrono::Utc;

use super::AppState;
use crate::{
    api::models::{AlertMessageRequest, NotificationResponse},
    error::Result,
};

/// POST /api/v1/email/test
pub async fn send_test(State(state): State<AppState>) -> Result<Json<NotificationResponse>> {
    let settings = state.settings.load().await?;
    let outcome = state.dispatcher.send_test(&settings.email, Utc::now()).await?;

    Ok(Json(NotificationResponse::from_outcome(outcome)?))
}

/// POST /api/v1/email/alert
/// Sends an alert raised by the dashboard client
pub async fn send_alert(
    State(state): State<AppState>,
    Json(request): Json<AlertMessageRequest>,
) -> Result<Json<NotificationResponse>> {
    let settings = state.settings.load().await?;
    let outcome = state
        .dispatcher
        .send_manual(
            &settings.email,
            request.subject.as_deref(),
            request.message.as_deref(),
            Utc::now(),
        )
        .await?;

    Ok(Json(NotificationResponse::from_outcome(outcome)?))
}
