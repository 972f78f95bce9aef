use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::AppState;
use crate::{
    api::models::SettingsView,
    chart::{build_chart, ChartPeriod, PowerChart},
    error::Result,
    snapshot::{build_snapshot, DashboardSnapshot},
};

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    #[serde(flatten)]
    pub snapshot: DashboardSnapshot,
    pub settings: SettingsView,
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    pub period: Option<String>,
}

/// GET /api/v1/data
/// Returns every room, the totals and the alerts for this refresh
pub async fn get_data(State(state): State<AppState>) -> Result<Json<DashboardResponse>> {
    let now = Utc::now();
    let settings = state.settings.load().await?;
    let readings = state.readings.latest().await;
    let devices = state.commands.all().await;

    let snapshot = build_snapshot(
        &state.config.monitor,
        &state.evaluator,
        &settings,
        &readings,
        &devices,
        now,
    )?;

    if let Err(e) = state
        .dispatcher
        .dispatch_report(&snapshot.alerts, &settings.email, now)
        .await
    {
        warn!(error = %e, "failed to forward alerts");
    }

    Ok(Json(DashboardResponse {
        snapshot,
        settings: SettingsView::from(&settings),
    }))
}

/// GET /api/v1/chart/power?period=day|week|month
/// Returns total power per time label
pub async fn get_power_chart(
    State(state): State<AppState>,
    Query(query): Query<ChartQuery>,
) -> Json<PowerChart> {
    let period = ChartPeriod::parse(query.period.as_deref());
    let samples = state
        .readings
        .power_history(period.since(Utc::now()), period.row_limit())
        .await;

    Json(build_chart(&samples, period))
}
