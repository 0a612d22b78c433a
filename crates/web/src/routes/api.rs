//! JSON API route handlers.
//!
//! The `/api/auth/*` endpoints mirror the HTML auth actions but answer
//! with the `ActionState` serialized as JSON. The HTTP status is always
//! 200; success or failure travels in the body, and the session cookie is
//! only issued on success.

use axum::{Form, Json, extract::State};
use serde::Serialize;
use tower_sessions::Session;

use ayka_core::ActionState;

use crate::routes::auth::{
    ForgotPasswordForm, LoginForm, RegisterForm, ResetPasswordForm, perform_forgot_password,
    perform_login, perform_register, perform_reset,
};
use crate::state::AppState;

/// Runtime configuration safe to disclose to browsers.
///
/// The service-role key lives in a `SecretString`, which has no
/// `Serialize` impl: it cannot end up in this payload.
#[derive(Debug, Serialize)]
pub struct PublicConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub performance_supabase_url: String,
    pub performance_supabase_anon_key: String,
}

/// Expose the anon-key runtime configuration for browser clients.
pub async fn public_config(State(state): State<AppState>) -> Json<PublicConfig> {
    let config = state.config();

    Json(PublicConfig {
        supabase_url: config.supabase.url.clone(),
        supabase_anon_key: config.supabase.anon_key.clone(),
        performance_supabase_url: config.performance.url.clone(),
        performance_supabase_anon_key: config.performance.anon_key.clone(),
    })
}

/// Handle login, returning the `ActionState` as JSON.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Json<ActionState> {
    Json(perform_login(&state, &session, &form.email, &form.password).await)
}

/// Handle registration, returning the `ActionState` as JSON.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Json<ActionState> {
    Json(perform_register(&state, &session, &form).await)
}

/// Handle a password reset request, returning the `ActionState` as JSON.
pub async fn forgot_password(
    State(state): State<AppState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Json<ActionState> {
    Json(perform_forgot_password(&state, &form.email).await)
}

/// Complete a password reset, returning the `ActionState` as JSON.
pub async fn reset(
    State(state): State<AppState>,
    Form(form): Form<ResetPasswordForm>,
) -> Json<ActionState> {
    Json(perform_reset(&state, &form).await)
}
