//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Landing page
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (pings Supabase)
//! GET  /img?url=…               - Allowlisted remote image redirect
//!
//! # Auth
//! GET  /auth/login              - Login page
//! POST /auth/login              - Login action
//! GET  /auth/register           - Register page
//! POST /auth/register           - Register action
//! GET  /auth/forgot-password    - Forgot password page
//! POST /auth/forgot-password    - Request a reset email
//! GET  /auth/reset              - Reset page (from the emailed link)
//! POST /auth/reset              - Complete the reset
//! POST /auth/logout             - Logout action
//!
//! # Dashboard (requires auth)
//! GET  /dashboard/stock         - Stock levels + recent history
//! POST /dashboard/stock/record  - Record a stock movement
//! POST /dashboard/stock/report  - Email the stock report
//!
//! # JSON API
//! GET  /api/public-config       - Browser runtime config (anon keys only)
//! POST /api/auth/login          - Login, ActionState as JSON
//! POST /api/auth/register       - Register, ActionState as JSON
//! POST /api/auth/forgot-password - Request reset, ActionState as JSON
//! POST /api/auth/reset          - Complete reset, ActionState as JSON
//! ```

pub mod api;
pub mod auth;
pub mod dashboard;
pub mod home;
pub mod images;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::db::SupabaseSessionStore;
use crate::middleware::create_session_layer;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route(
            "/forgot-password",
            get(auth::forgot_password_page).post(auth::forgot_password),
        )
        .route("/reset", get(auth::reset_page).post(auth::reset))
        .route("/logout", post(auth::logout))
}

/// Create the dashboard routes router.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/stock", get(dashboard::stock))
        .route("/stock/record", post(dashboard::record))
        .route("/stock/report", post(dashboard::report))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/public-config", get(api::public_config))
        .route("/auth/login", post(api::login))
        .route("/auth/register", post(api::register))
        .route("/auth/forgot-password", post(api::forgot_password))
        .route("/auth/reset", post(api::reset))
}

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Landing page
        .route("/", get(home::home))
        // Image proxy
        .route("/img", get(images::img))
        // Auth routes
        .nest("/auth", auth_routes())
        // Dashboard routes
        .nest("/dashboard", dashboard_routes())
        // JSON API
        .nest("/api", api_routes())
}

/// Build the complete application: routes, session layer, tracing, Sentry.
///
/// Shared between `main` and the integration tests so both run the same
/// middleware stack.
pub fn app(state: AppState) -> Router {
    let session_store = SupabaseSessionStore::new(state.admin().clone());
    let session_layer = create_session_layer(session_store, state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .nest_service("/static", ServeDir::new("crates/web/static"))
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record("latency_ms", latency.as_millis() as u64);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies Supabase connectivity before returning OK.
/// Returns 503 Service Unavailable if the project is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.admin().ping("accounts").await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
