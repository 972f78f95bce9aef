// Integration tests for the HTTP endpoints over the in-memory stores

use axum::http::StatusCode;
use axum_test::TestServer;
use power_monitor_api::config::{Config, RoomConfig};
use power_monitor_api::{create_router, AppState};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn create_test_config() -> Config {
    let mut config = Config::default();
    config.monitor.rooms = vec![
        RoomConfig {
            slave_id: 5,
            name: "Phòng 1".into(),
        },
        RoomConfig {
            slave_id: 7,
            name: "Phòng 2".into(),
        },
    ];
    config
}

fn create_server() -> TestServer {
    let app = create_router(AppState::in_memory(create_test_config()));
    TestServer::new(app).unwrap()
}

async fn ingest(server: &TestServer, slave_id: u16, power: i64, energy_wh: i64) {
    server
        .post("/api/v1/readings")
        .json(&json!({
            "slaveId": slave_id,
            "regs": {"40000": 2200, "40001": 100, "40002": power, "40003": energy_wh}
        }))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_server();

    let response = server.get("/health").await;
    response.assert_status(StatusCode::OK);
    response.assert_text("OK");
}

#[tokio::test]
async fn test_dashboard_reflects_ingested_frames() {
    let server = create_server();
    ingest(&server, 5, 650, 2000).await;
    ingest(&server, 7, 0, 500).await;

    let response = server.get("/api/v1/data").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();

    assert_eq!(body["rooms"]["room5"]["name"], "Phòng 1");
    assert_eq!(body["rooms"]["room5"]["power"], 650.0);
    assert_eq!(body["rooms"]["room5"]["voltage"], 220.0);
    assert_eq!(body["rooms"]["room5"]["timeout"], false);
    assert_eq!(body["totals"]["power"], 650.0);
    assert_eq!(body["totals"]["today_kwh"], 2.5);
    assert_eq!(body["totals"]["month_kwh"], 75.0);

    let codes: Vec<&str> = body["alerts"]["alerts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["global_warning", "inactive_rooms"]);
    assert_eq!(body["alerts"]["badge_count"], 1);
    assert_eq!(body["settings"]["email"]["has_password"], false);
}

#[tokio::test]
async fn test_room_thresholds_raise_room_alerts() {
    let server = create_server();
    server
        .post("/api/v1/settings/room-thresholds")
        .json(&json!({"room_thresholds": {"room5": {"warning": 100, "critical": 200}}}))
        .await
        .assert_status(StatusCode::OK);
    ingest(&server, 5, 150, 1000).await;

    let body: Value = server.get("/api/v1/data").await.json();
    let alert = &body["alerts"]["alerts"][0];
    assert_eq!(alert["code"], "room_warning");
    assert_eq!(alert["room_id"], "room5");
    assert_eq!(alert["title"], "Phòng 1: công suất cao");

    let stored: Value = server.get("/api/v1/settings/room-thresholds").await.json();
    assert_eq!(stored["room_thresholds"]["room5"]["critical"], 200.0);
}

#[tokio::test]
async fn test_rejects_malformed_register_frame() {
    let server = create_server();

    let response = server
        .post("/api/v1/readings")
        .json(&json!({"slaveId": 5, "regs": {"power": 12}}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "register 'power' is not a number");
}

#[tokio::test]
async fn test_toggle_then_drain() {
    let server = create_server();

    let response = server
        .post("/api/v1/device/toggle")
        .json(&json!({"room_id": "room5", "device_id": "device1", "state": true}))
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["device1"], true);
    assert_eq!(body["sync"], true);

    let drained: Value = server.post("/api/v1/device/commands/drain").await.json();
    assert_eq!(
        drained,
        json!({"commands": [{"slave_id": 5, "device0": false, "device1": true}]})
    );

    let again: Value = server.post("/api/v1/device/commands/drain").await.json();
    assert_eq!(again, json!({"commands": []}));
}

#[tokio::test]
async fn test_toggle_rejects_unknown_device() {
    let server = create_server();

    let response = server
        .post("/api/v1/device/toggle")
        .json(&json!({"room_id": "room5", "device_id": "device9", "state": true}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_settings_validation() {
    let server = create_server();

    let response = server
        .post("/api/v1/settings/thresholds")
        .json(&json!({"warning": 500, "critical": 500}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("warning"));

    server
        .post("/api/v1/settings/vat")
        .json(&json!({"vat": 101}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/api/v1/settings/tiers")
        .json(&json!({
            "limits": {"tier1": 50, "tier2": 100, "tier3": 90, "tier4": 300, "tier5": 400},
            "prices": [1984, 2050, 2380, 2998, 3350, 3460]
        }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/v1/settings/vat")
        .json(&json!({"vat": 10}))
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body, json!({"success": true, "setting": "vat"}));
}

#[tokio::test]
async fn test_tariff_quote() {
    let server = create_server();

    let response = server
        .post("/api/v1/tariff/quote")
        .json(&json!({"kwh": 120}))
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();

    assert_eq!(body["subtotal"], 249300);
    assert_eq!(body["vat_amount"], 19944);
    assert_eq!(body["total"], 269244);
    assert_eq!(body["vat_percent"], 8);
    assert_eq!(body["bands"][2]["label"], "101-200");
    assert_eq!(body["bands"][2]["kwh"], 20.0);
}

#[tokio::test]
async fn test_tariff_quote_rejects_oversized_consumption() {
    let server = create_server();

    let response = server
        .post("/api/v1/tariff/quote")
        .json(&json!({"kwh": 1.0e16}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("kwh must be"));
}

#[tokio::test]
async fn test_oversized_energy_register_is_not_stored() {
    let server = create_server();

    server
        .post("/api/v1/readings")
        .json(&json!({"slaveId": 5, "regs": {"40002": 100, "40003": 9000000000000000000i64}}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = server.get("/api/v1/data").await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert!(body["rooms"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_email_settings_hide_password() {
    let server = create_server();

    server
        .post("/api/v1/settings/email")
        .json(&json!({
            "enabled": true,
            "recipient": "ops@example.com",
            "sender_email": "monitor@example.com",
            "sender_password": "secret"
        }))
        .await
        .assert_status(StatusCode::OK);

    let body: Value = server.get("/api/v1/settings/email").await.json();
    assert_eq!(body["has_password"], true);
    assert_eq!(body["cooldown_minutes"], 5);
    assert!(body.get("sender_password").is_none());

    let response = server.post("/api/v1/email/test").await;
    response.assert_status(StatusCode::OK);

    // Second send falls inside the cooldown window
    let response = server
        .post("/api/v1/email/alert")
        .json(&json!({"subject": "Test"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("Cooldown"));
}

#[tokio::test]
async fn test_email_disabled_by_default() {
    let server = create_server();

    let response = server.post("/api/v1/email/test").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Email alerts disabled");
}

#[tokio::test]
async fn test_chart_sums_rooms() {
    let server = create_server();
    ingest(&server, 5, 100, 0).await;
    ingest(&server, 7, 50, 0).await;

    let body: Value = server
        .get("/api/v1/chart/power")
        .add_query_param("period", "month")
        .await
        .json();

    assert_eq!(body["period"], "month");
    assert_eq!(body["count"], body["labels"].as_array().unwrap().len());
    let total: f64 = body["total_power"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .sum();
    assert_eq!(total, 150.0);
}

#[test]
fn test_shipped_config_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/config.yaml");
    let config = Config::load(path).unwrap();
    assert_eq!(config.monitor.room_name(5), "Phòng 1");
    assert_eq!(config.settings.room_thresholds.len(), 2);
}
