//! End-to-end tests for the full devicehubd stack.
//!
//! Each test wires an in-memory `SQLite` database, the real repository, the
//! device service and the axum router, then drives it through
//! `tower::ServiceExt::oneshot` without binding a TCP port.

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use devicehub_adapter_http_axum::router;
use devicehub_adapter_http_axum::state::AppState;
use devicehub_adapter_storage_sqlite_sqlx::{Config, SqliteDeviceRepository};
use devicehub_app::services::device_service::DeviceService;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");

    let repo = SqliteDeviceRepository::new(db.pool().clone());
    router::build(AppState::new(DeviceService::new(repo)))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post(app: &Router, body: Value) -> Value {
    let (status, created) = call(app, Method::POST, "/api/dispositivos", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    created
}

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let app = app().await;
    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_return_empty_list_initially() {
    let app = app().await;
    let (status, body) = call(&app, Method::GET, "/api/dispositivos", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn should_fetch_what_was_posted() {
    let app = app().await;
    let created = post(
        &app,
        json!({
            "type": "SENSOR",
            "name": "soil probe",
            "location": "bed 3",
            "description": "capacitive",
            "sensorType": "MOISTURE",
            "measurementUnit": "%",
        }),
    )
    .await;

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = call(&app, Method::GET, &format!("/api/dispositivos/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
    assert_eq!(fetched["name"], "soil probe");
    assert_eq!(fetched["sensorType"], "MOISTURE");
}

#[tokio::test]
async fn should_accept_body_with_only_a_type() {
    let app = app().await;
    let created = post(&app, json!({"type": "SENSOR"})).await;

    let uri = format!("/api/dispositivos/{}", created["id"]);
    let (status, fetched) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = call(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"type": "SENSOR", "name": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "");
}

#[tokio::test]
async fn should_return_404_without_body_for_unknown_id() {
    let app = app().await;

    let (status, body) = call(&app, Method::GET, "/api/dispositivos/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_null());

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/dispositivos/999",
        Some(json!({"type": "ACTUATOR", "name": "ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_null());
}

#[tokio::test]
async fn should_return_200_when_deleting_unknown_id() {
    let app = app().await;
    let (status, body) = call(&app, Method::DELETE, "/api/dispositivos/999", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}

#[tokio::test]
async fn should_persist_light_type_and_fixed_sensor_fields() {
    let app = app().await;
    let created = post(
        &app,
        json!({"type": "LIGHT_SENSOR", "name": "uv meter", "lightType": "UV"}),
    )
    .await;

    let id = created["id"].as_i64().unwrap();
    let (_, fetched) = call(&app, Method::GET, &format!("/api/dispositivos/{id}"), None).await;
    assert_eq!(fetched["type"], "LIGHT_SENSOR");
    assert_eq!(fetched["lightType"], "UV");
    assert_eq!(fetched["sensorType"], "LIGHT");
    assert_eq!(fetched["measurementUnit"], "lux");
}

#[tokio::test]
async fn should_report_fixed_fields_for_humidity_sensor() {
    let app = app().await;
    let created = post(&app, json!({"type": "HUMIDITY_SENSOR", "name": "hygro"})).await;
    assert_eq!(created["sensorType"], "HUMIDITY");
    assert_eq!(created["measurementUnit"], "%");
    assert!(created.get("lightType").is_none());
    assert!(created.get("actuatorType").is_none());
}

#[tokio::test]
async fn should_delete_twice_and_then_report_missing() {
    let app = app().await;
    let created = post(&app, json!({"type": "ACTUATOR", "name": "valve"})).await;
    let uri = format!("/api/dispositivos/{}", created["id"]);

    let (first, _) = call(&app, Method::DELETE, &uri, None).await;
    let (second, _) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);

    let (status, _) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_list_remaining_devices_after_delete() {
    let app = app().await;
    let first = post(&app, json!({"type": "SENSOR", "name": "a"})).await;
    let second = post(&app, json!({"type": "HUMIDITY_SENSOR", "name": "b"})).await;
    let third = post(&app, json!({"type": "ACTUATOR", "name": "c"})).await;

    let (status, _) = call(
        &app,
        Method::DELETE,
        &format!("/api/dispositivos/{}", second["id"]),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) = call(&app, Method::GET, "/api/dispositivos", None).await;
    let ids: Vec<&Value> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|device| &device["id"])
        .collect();
    assert_eq!(ids, vec![&first["id"], &third["id"]]);
}

#[tokio::test]
async fn should_update_fields_and_keep_identity() {
    let app = app().await;
    let created = post(
        &app,
        json!({"type": "ACTUATOR", "name": "pump", "actuatorType": "PUMP"}),
    )
    .await;
    let uri = format!("/api/dispositivos/{}", created["id"]);

    let (status, updated) = call(
        &app,
        Method::PUT,
        &uri,
        Some(json!({
            "type": "ACTUATOR",
            "name": "main pump",
            "actuatorType": "PUMP",
            "state": true,
            "operationMode": "SCHEDULED",
            "active": false,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_eq!(updated["state"], true);
    assert_eq!(updated["active"], false);

    let (_, fetched) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn should_reject_update_that_changes_type() {
    let app = app().await;
    let created = post(&app, json!({"type": "LIGHT_SENSOR", "name": "lux"})).await;
    let uri = format!("/api/dispositivos/{}", created["id"]);

    let (status, body) = call(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"type": "SENSOR", "name": "lux"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("LIGHT_SENSOR"));

    let (_, fetched) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn should_reject_body_with_unknown_type() {
    let app = app().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/dispositivos")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"type":"THERMOSTAT","name":"t"}"#))
        .unwrap();
    let resp = app.oneshot(request).await.unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn should_send_cors_header_for_any_origin() {
    let app = app().await;
    let request = Request::builder()
        .uri("/api/dispositivos")
        .header(header::ORIGIN, "https://somewhere.example")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
