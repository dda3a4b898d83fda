use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use inn_api::{app, AppState, AuthConfig};
use inn_core::identity::LocalIdentityProvider;

fn test_app() -> Router {
    app(AppState {
        data: inn_store::fixture_data_source(),
        identity: Arc::new(LocalIdentityProvider),
        auth: AuthConfig {
            secret: "integration-test-secret-0123456789".into(),
            expiration: 3600,
            admin_email: "admin@parnaioca.com".into(),
        },
        backend: "fixture",
    })
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    (status, value)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn login_resolves_the_role_once() {
    let app = test_app();

    let token = login(&app, "ADMIN@parnaioca.com", "admin123").await;
    let (status, session) = send(&app, Method::GET, "/auth/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["role"], "ADMINISTRATOR");
    assert_eq!(session["display_name"], "Administrador");

    let token = login(&app, "funcionario@parnaioca.com", "func123").await;
    let (_, session) = send(&app, Method::GET, "/auth/session", Some(&token), None).await;
    assert_eq!(session["role"], "STAFF");
}

#[tokio::test]
async fn bad_credentials_and_missing_tokens_are_rejected() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "admin@parnaioca.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, Method::GET, "/customers", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/customers", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["backend"], "fixture");
}

#[tokio::test]
async fn parking_shows_half_the_slots_taken() {
    let app = test_app();
    let token = login(&app, "funcionario@parnaioca.com", "func123").await;

    let (status, parking) = send(&app, Method::GET, "/parking", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parking["summary"]["total"], 2);
    assert_eq!(parking["summary"]["occupied"], 1);
    assert_eq!(parking["summary"]["percentage"], 50);
}

#[tokio::test]
async fn only_admins_toggle_and_two_toggles_restore() {
    let app = test_app();
    let staff = login(&app, "funcionario@parnaioca.com", "func123").await;
    let admin = login(&app, "admin@parnaioca.com", "admin123").await;

    let (_, customers) = send(&app, Method::GET, "/customers?q=maria", Some(&staff), None).await;
    let id = customers[0]["id"].as_str().unwrap().to_string();
    let toggle = format!("/customers/{id}/toggle");

    let (status, _) = send(&app, Method::POST, &toggle, Some(&staff), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, first) = send(&app, Method::POST, &toggle, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["active"], false);
    let (_, second) = send(&app, Method::POST, &toggle, Some(&admin), None).await;
    assert_eq!(second["active"], true);
}

#[tokio::test]
async fn customer_validation_and_duplicates() {
    let app = test_app();
    let token = login(&app, "funcionario@parnaioca.com", "func123").await;

    let (status, body) = send(&app, Method::POST, "/customers", Some(&token), Some(json!({ "name": "A" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["name"].is_string());
    assert!(body["fields"]["national_id"].is_string());

    let duplicate = json!({
        "name": "Outro João",
        "birth_date": "1980-01-01",
        "national_id": "123.456.789-00",
        "email": "outro@email.com",
        "phone": "(21) 97777-0000",
        "state": "RJ",
        "city": "Niterói"
    });
    let (status, _) = send(&app, Method::POST, "/customers", Some(&token), Some(duplicate)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn check_in_then_check_out_twice() {
    let app = test_app();
    let token = login(&app, "funcionario@parnaioca.com", "func123").await;

    let (_, board) = send(&app, Method::GET, "/stays/board", Some(&token), None).await;
    let free_room = board["available_accommodations"][0]["id"].as_str().unwrap().to_string();
    let maria = board["customers"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "Maria Santos")
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, stay) = send(
        &app,
        Method::POST,
        "/stays",
        Some(&token),
        Some(json!({ "customer_id": maria, "accommodation_id": free_room })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(stay["status"], "checked_in");

    let (status, _) = send(
        &app,
        Method::POST,
        "/stays",
        Some(&token),
        Some(json!({ "customer_id": maria, "accommodation_id": free_room })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let check_out = format!("/stays/{}/check-out", stay["id"].as_str().unwrap());
    let (status, first) = send(&app, Method::POST, &check_out, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["status"], "checked_out");
    assert!(first["check_out_at"].is_string());

    let (status, second) = send(&app, Method::POST, &check_out, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["check_out_at"], first["check_out_at"]);
}

#[tokio::test]
async fn cancel_frees_the_room_and_cannot_repeat() {
    let app = test_app();
    let token = login(&app, "funcionario@parnaioca.com", "func123").await;

    let (_, board) = send(&app, Method::GET, "/stays/board", Some(&token), None).await;
    let stay = board["active_stays"][0].clone();
    let stay_id = stay["stay_id"].as_str().unwrap().to_string();
    let cancel = format!("/stays/{stay_id}/cancel");

    let (status, cancelled) = send(&app, Method::POST, &cancel, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");
    assert!(cancelled["check_out_at"].is_null());

    let (_, board) = send(&app, Method::GET, "/stays/board", Some(&token), None).await;
    assert_eq!(board["available_accommodations"].as_array().unwrap().len(), 3);

    let (status, _) = send(&app, Method::POST, &cancel, Some(&token), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn reports_reject_inverted_periods() {
    let app = test_app();
    let token = login(&app, "funcionario@parnaioca.com", "func123").await;

    let (status, body) = send(&app, Method::GET, "/reports?from=2024-05-10&to=2024-05-01", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["from"].is_string());

    let (status, report) = send(&app, Method::GET, "/reports", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["stays"], 1);
}

#[tokio::test]
async fn admin_overview_lists_recent_changes() {
    let app = test_app();
    let staff = login(&app, "funcionario@parnaioca.com", "func123").await;
    let admin = login(&app, "admin@parnaioca.com", "admin123").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/minibar/items",
        Some(&staff),
        Some(json!({ "name": "Amendoim 100g", "price_cents": 700 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, Method::GET, "/admin/overview", Some(&staff), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, overview) = send(&app, Method::GET, "/admin/overview", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["total_logs"], 1);
    assert_eq!(overview["recent_logs"][0]["table_name"], "minibar_items");
    assert_eq!(overview["recent_logs"][0]["operation"], "INSERT");

    let (status, purged) = send(&app, Method::DELETE, "/admin/logs", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(purged["removed"], 1);
}
