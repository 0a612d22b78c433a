//! Tests for the public surface: health probes, browser runtime config,
//! the image proxy, and dashboard access control.

#![allow(clippy::unwrap_used)]

mod common;

use axum::http::header::{COOKIE, LOCATION};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::{ACCOUNT_EMAIL, ACCOUNT_ID, ACCOUNT_NAME, spawn};

#[tokio::test]
async fn health_answers_without_upstream_calls() {
    let app = spawn().await;

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    response.assert_text("ok");
    assert!(app.supabase.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn readiness_reflects_supabase_reachability() {
    let app = spawn().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&app.supabase)
        .await;

    app.server.get("/health/ready").await.assert_status_ok();
}

#[tokio::test]
async fn readiness_fails_when_supabase_rejects() {
    let app = spawn().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/accounts"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "bad key"})))
        .mount(&app.supabase)
        .await;

    let response = app.server.get("/health/ready").await;
    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn public_config_exposes_anon_keys_only() {
    let app = spawn().await;

    let response = app.server.get("/api/public-config").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["supabase_anon_key"], json!("test-anon-key"));
    assert_eq!(body["performance_supabase_anon_key"], json!("test-perf-anon-key"));
    assert!(body.get("service_role_key").is_none());

    // The service-role key must not appear anywhere in the payload.
    let raw = serde_json::to_string(&body).unwrap();
    assert!(!raw.contains("test-service-role-key"));
}

#[tokio::test]
async fn image_proxy_redirects_allowlisted_urls() {
    let app = spawn().await;

    let response = app
        .server
        .get("/img")
        .add_query_param("url", "https://images.unsplash.com/photo-123?w=800")
        .await;

    response.assert_status(axum::http::StatusCode::FOUND);
    assert_eq!(
        response.headers().get(LOCATION).unwrap(),
        "https://images.unsplash.com/photo-123?w=800"
    );
}

#[tokio::test]
async fn image_proxy_permits_project_storage_prefix_only() {
    let app = spawn().await;

    let allowed = app
        .server
        .get("/img")
        .add_query_param(
            "url",
            "https://abcdefgh.supabase.co/storage/v1/object/public/decks/matrix.png",
        )
        .await;
    allowed.assert_status(axum::http::StatusCode::FOUND);

    let wrong_prefix = app
        .server
        .get("/img")
        .add_query_param("url", "https://abcdefgh.supabase.co/rest/v1/accounts")
        .await;
    wrong_prefix.assert_status(axum::http::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn image_proxy_rejects_unlisted_hosts_and_plain_http() {
    let app = spawn().await;

    let other_host = app
        .server
        .get("/img")
        .add_query_param("url", "https://evil.example.com/cat.png")
        .await;
    other_host.assert_status(axum::http::StatusCode::FORBIDDEN);

    let plain_http = app
        .server
        .get("/img")
        .add_query_param("url", "http://images.unsplash.com/photo-123")
        .await;
    plain_http.assert_status(axum::http::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn dashboard_requires_a_session() {
    let app = spawn().await;

    // Session load for the absent cookie never happens, but the layer may
    // probe; an empty result set means "no session".
    Mock::given(method("GET"))
        .and(path("/rest/v1/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&app.supabase)
        .await;

    let response = app.server.get("/dashboard/stock").await;

    response.assert_status(axum::http::StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/auth/login");
}

/// A stored session row whose payload carries the current account.
fn session_row() -> Value {
    json!([{
        "data": {
            "current_account": {
                "id": ACCOUNT_ID,
                "email": ACCOUNT_EMAIL,
                "display_name": ACCOUNT_NAME
            }
        },
        "expiry_date": "2036-01-01T00:00:00Z"
    }])
}

#[tokio::test]
async fn session_load_asks_only_for_unexpired_rows() {
    let app = spawn().await;

    let session_id = tower_sessions::session::Id::default();

    Mock::given(method("GET"))
        .and(path("/rest/v1/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_row()))
        .mount(&app.supabase)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/stock_items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&app.supabase)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/stock_history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&app.supabase)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/sessions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{}])))
        .mount(&app.supabase)
        .await;

    let response = app
        .server
        .get("/dashboard/stock")
        .add_header(COOKIE, format!("aykasosyal_session={session_id}"))
        .await;
    response.assert_status_ok();

    // Expiry is enforced in the query itself, so a stale row never even
    // reaches the store.
    let session_load = app
        .supabase
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.method == wiremock::http::Method::GET && r.url.path() == "/rest/v1/sessions")
        .expect("session row was loaded");
    let query = session_load.url.query().unwrap_or_default().to_owned();
    assert!(
        query.contains("expiry_date=gt."),
        "session load must filter expired rows upstream, got query: {query}"
    );
}

#[tokio::test]
async fn stock_report_goes_to_the_configured_recipient() {
    let app = spawn().await;

    let session_id = tower_sessions::session::Id::default();

    Mock::given(method("GET"))
        .and(path("/rest/v1/sessions"))
        .and(query_param("id", format!("eq.{session_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_row()))
        .mount(&app.supabase)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/stock_history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "7c6b5a49-3827-4160-9584-73625140fedc",
            "item_name": "Sticker pack",
            "sku": "STK-001",
            "change": -3,
            "note": "damaged in transit",
            "recorded_at": "2026-08-20T10:00:00Z"
        }])))
        .mount(&app.supabase)
        .await;

    // Session save-back after the request.
    Mock::given(method("POST"))
        .and(path("/rest/v1/sessions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{}])))
        .mount(&app.supabase)
        .await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "email_1"})))
        .expect(1)
        .mount(&app.resend)
        .await;

    let response = app
        .server
        .post("/dashboard/stock/report")
        .add_header(COOKIE, format!("aykasosyal_session={session_id}"))
        .form(&[("recipient", "")])
        .await;

    response.assert_status(axum::http::StatusCode::SEE_OTHER);
    let location = response.headers().get(LOCATION).unwrap().to_str().unwrap();
    assert!(location.starts_with("/dashboard/stock?success="));

    // The one outbound email went to the STOCK_REPORT_TO default.
    let sent = &app.resend.received_requests().await.unwrap()[0];
    let payload: Value = serde_json::from_slice(&sent.body).unwrap();
    assert_eq!(payload["to"], json!(["ops@aykasosyal.test"]));
    assert!(payload["html"].as_str().unwrap().contains("STK-001"));
    assert!(payload["text"].as_str().unwrap().contains("-3"));
}
