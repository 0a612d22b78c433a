//! Shared harness for the in-process integration tests.
//!
//! Spins up the full router (session layer included) against wiremock
//! stand-ins for the Supabase PostgREST API and the Resend API. No test
//! here talks to a live service.

use axum_test::TestServer;
use secrecy::SecretString;
use serde_json::json;
use wiremock::MockServer;

use ayka_web::config::{AppConfig, PerformanceConfig, ResendConfig, SupabaseConfig};
use ayka_web::images::ImageAllowlist;
use ayka_web::routes;
use ayka_web::state::AppState;

/// Fixed account identity used across mocks.
pub const ACCOUNT_ID: &str = "5f0c3f9a-8a4f-4f6e-9a6c-1d2e3f4a5b6c";
pub const ACCOUNT_EMAIL: &str = "user@example.com";
pub const ACCOUNT_NAME: &str = "Test User";

/// The application under test plus its mocked upstreams.
pub struct TestApp {
    pub server: TestServer,
    pub supabase: MockServer,
    pub resend: MockServer,
}

/// Build the app against fresh mock upstreams.
///
/// The performance project points at the same mock; its best-effort writes
/// land as unmatched (404) requests, which the analytics service swallows.
pub async fn spawn() -> TestApp {
    let supabase = MockServer::start().await;
    let resend = MockServer::start().await;

    let config = AppConfig {
        host: "127.0.0.1".parse().expect("valid host"),
        port: 0,
        base_url: "https://aykasosyal.test".to_owned(),
        supabase: SupabaseConfig {
            url: supabase.uri(),
            service_role_key: SecretString::from("test-service-role-key-3x9q7w1z"),
            anon_key: "test-anon-key".to_owned(),
        },
        performance: PerformanceConfig {
            url: supabase.uri(),
            anon_key: "test-perf-anon-key".to_owned(),
        },
        resend: ResendConfig {
            base_url: resend.uri(),
            api_key: SecretString::from("re_test_8f2k1m4p"),
            from_address: "noreply@aykasosyal.test".to_owned(),
            report_to: Some("ops@aykasosyal.test".to_owned()),
        },
        image_allowlist: ImageAllowlist::defaults_for("https://abcdefgh.supabase.co")
            .expect("valid default allowlist"),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
    };

    let state = AppState::new(config).expect("state builds");
    let server = TestServer::builder()
        .save_cookies()
        .build(routes::app(state))
        .expect("server builds");

    TestApp {
        server,
        supabase,
        resend,
    }
}

/// Account row as PostgREST returns it (without the password hash).
pub fn account_row() -> serde_json::Value {
    json!({
        "id": ACCOUNT_ID,
        "email": ACCOUNT_EMAIL,
        "display_name": ACCOUNT_NAME,
        "created_at": "2026-01-01T00:00:00Z",
        "updated_at": "2026-01-01T00:00:00Z"
    })
}

/// Account row including a password hash for the given password.
pub fn credential_row(password: &str) -> serde_json::Value {
    let hash = ayka_web::services::auth::hash_password(password).expect("hashing works");
    let mut row = account_row();
    row["password_hash"] = json!(hash);
    row
}
