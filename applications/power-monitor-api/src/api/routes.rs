use crate::api::handlers::{dashboard, devices, email, health, readings, settings, tariff, AppState};
use axum::{
    extract::Request,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::Level;

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new().route("/health", get(health::health));

    let api_routes = Router::new()
        .route("/api/v1/data", get(dashboard::get_data))
        .route("/api/v1/chart/power", get(dashboard::get_power_chart))
        .route("/api/v1/readings", post(readings::ingest))
        .route("/api/v1/device/toggle", post(devices::toggle))
        .route(
            "/api/v1/device/commands/drain",
            post(devices::drain_commands),
        )
        .route("/api/v1/settings/thresholds", post(settings::save_thresholds))
        .route("/api/v1/settings/tiers", post(settings::save_tiers))
        .route("/api/v1/settings/vat", post(settings::save_vat))
        .route(
            "/api/v1/settings/room-thresholds",
            get(settings::get_room_thresholds).post(settings::save_room_thresholds),
        )
        .route(
            "/api/v1/settings/email",
            get(settings::get_email).post(settings::save_email),
        )
        .route("/api/v1/email/test", post(email::send_test))
        .route("/api/v1/email/alert", post(email::send_alert))
        .route("/api/v1/tariff/quote", post(tariff::quote));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .with_state(state)
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request| {
                    tracing::span!(
                        Level::INFO,
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_request(|_request: &Request, _span: &tracing::Span| {
                    tracing::event!(Level::DEBUG, "received request");
                })
                .on_response(
                    |response: &axum::response::Response,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::event!(
                            Level::INFO,
                            status = response.status().as_u16(),
                            latency = ?latency,
                            "request completed"
                        );
                    },
                )
                .on_failure(
                    |_error: tower_http::classify::ServerErrorsFailureClass,
                     _latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::event!(Level::ERROR, "request failed");
                    },
                ),
        )
}
