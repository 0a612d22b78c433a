//! Authentication route handlers.
//!
//! Handles login, registration, logout, and the password reset flow. The
//! HTML handlers redirect with the `ActionState` message in the query
//! string; the `/api/auth/*` variants in [`super::api`] return the same
//! `ActionState` as JSON.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use ayka_core::{ActionState, FailureKind, ResetTokenId};

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{clear_current_account, set_current_account};
use crate::models::CurrentAccount;
use crate::services::auth::AuthService;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub display_name: String,
    pub password: String,
    pub password_confirm: String,
}

/// Forgot password form data.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// Reset password form data. `id` and `token` come from the emailed link
/// and travel through hidden form fields.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    pub id: String,
    pub token: String,
    pub password: String,
    pub password_confirm: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Query parameters carried by the emailed reset link.
#[derive(Debug, Deserialize)]
pub struct ResetQuery {
    pub id: Option<String>,
    pub token: Option<String>,
    pub error: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

/// Forgot password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Reset password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/reset_password.html")]
pub struct ResetPasswordTemplate {
    pub error: Option<String>,
    pub token_id: String,
    pub token: String,
}

// =============================================================================
// Actions
// =============================================================================

/// Authenticate and start a session.
pub(crate) async fn perform_login(
    state: &AppState,
    session: &Session,
    email: &str,
    password: &str,
) -> ActionState {
    let auth = AuthService::new(state.admin());

    match auth.login(email, password).await {
        Ok(account) => {
            let current = CurrentAccount::from(&account);
            if let Err(e) = set_current_account(session, &current).await {
                tracing::error!("Failed to set session: {}", e);
                state.analytics().record_action("login", false);
                return ActionState::failure(
                    FailureKind::Session,
                    "Could not start your session. Please try again.",
                );
            }

            set_sentry_user(&account.id, Some(account.email.as_str()));
            state.analytics().record_action("login", true);

            ActionState::success("Welcome back!")
        }
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            state.analytics().record_action("login", false);
            e.to_action_state()
        }
    }
}

/// Create an account and start a session.
pub(crate) async fn perform_register(
    state: &AppState,
    session: &Session,
    form: &RegisterForm,
) -> ActionState {
    if form.password != form.password_confirm {
        return ActionState::failure(FailureKind::Validation, "Passwords do not match.");
    }

    let auth = AuthService::new(state.admin());

    match auth
        .register(&form.email, &form.display_name, &form.password)
        .await
    {
        Ok(account) => {
            let current = CurrentAccount::from(&account);
            if let Err(e) = set_current_account(session, &current).await {
                tracing::error!("Failed to set session after registration: {}", e);
                state.analytics().record_action("register", false);
                return ActionState::failure(
                    FailureKind::Session,
                    "Your account was created but the session could not be started. Please sign in.",
                );
            }

            set_sentry_user(&account.id, Some(account.email.as_str()));
            state.analytics().record_action("register", true);

            ActionState::success("Welcome to AykaSosyal!")
        }
        Err(e) => {
            tracing::warn!("Registration failed: {}", e);
            state.analytics().record_action("register", false);
            e.to_action_state()
        }
    }
}

/// Issue a reset token and email the reset link.
///
/// Always success-shaped for unknown addresses so the endpoint cannot be
/// used to enumerate accounts; a `moka` TTL cache throttles repeat sends
/// to the same address.
pub(crate) async fn perform_forgot_password(state: &AppState, email: &str) -> ActionState {
    let throttle_key = email.trim().to_lowercase();

    // entry() claims the address atomically; of any concurrent requests
    // for the same address, exactly one sees a fresh entry.
    let claim = state
        .reset_throttle()
        .entry(throttle_key.clone())
        .or_insert(())
        .await;
    if !claim.is_fresh() {
        tracing::info!("Password reset request throttled");
        return reset_email_sent();
    }

    let auth = AuthService::new(state.admin());

    let reset = match auth.request_password_reset(email).await {
        Ok(Some(reset)) => reset,
        Ok(None) => {
            // Unknown addresses stay throttled too, so repeat probes look
            // identical to the real flow.
            return reset_email_sent();
        }
        Err(e) => {
            tracing::warn!("Password reset request failed: {}", e);
            state.reset_throttle().invalidate(&throttle_key).await;
            return e.to_action_state();
        }
    };

    let reset_url = format!(
        "{}/auth/reset?id={}&token={}",
        state.config().base_url.trim_end_matches('/'),
        reset.token_id,
        urlencoding::encode(&reset.token),
    );

    if let Err(e) = state
        .mailer()
        .send_password_reset(
            reset.account.email.as_str(),
            &reset.account.display_name,
            &reset_url,
        )
        .await
    {
        tracing::error!("Failed to send password reset email: {}", e);
        // Nothing went out; release the claim so the user can retry.
        state.reset_throttle().invalidate(&throttle_key).await;
        return ActionState::failure(
            FailureKind::Email,
            "Could not send the reset email. Please try again later.",
        );
    }

    reset_email_sent()
}

/// Complete a password reset from the emailed link.
pub(crate) async fn perform_reset(state: &AppState, form: &ResetPasswordForm) -> ActionState {
    if form.password != form.password_confirm {
        return ActionState::failure(FailureKind::Validation, "Passwords do not match.");
    }

    let Ok(token_id) = form.id.parse::<ResetTokenId>() else {
        return ActionState::failure(
            FailureKind::Validation,
            "This reset link is invalid or has expired.",
        );
    };

    let auth = AuthService::new(state.admin());

    match auth
        .reset_password(token_id, &form.token, &form.password)
        .await
    {
        Ok(()) => {
            state.analytics().record_action("password_reset", true);
            ActionState::success("Your password has been updated. You can sign in now.")
        }
        Err(e) => {
            tracing::warn!("Password reset failed: {}", e);
            state.analytics().record_action("password_reset", false);
            e.to_action_state()
        }
    }
}

fn reset_email_sent() -> ActionState {
    ActionState::success("If an account exists for that address, a reset link is on its way.")
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error,
        success: query.success,
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let result = perform_login(&state, &session, &form.email, &form.password).await;

    if result.is_success() {
        Redirect::to("/dashboard/stock").into_response()
    } else {
        redirect_with_error("/auth/login", result.message())
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate { error: query.error }
}

/// Handle registration form submission.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    let result = perform_register(&state, &session, &form).await;

    if result.is_success() {
        Redirect::to("/dashboard/stock").into_response()
    } else {
        redirect_with_error("/auth/register", result.message())
    }
}

// =============================================================================
// Password Reset Routes
// =============================================================================

/// Display the forgot password page.
pub async fn forgot_password_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    ForgotPasswordTemplate {
        error: query.error,
        success: query.success,
    }
}

/// Handle forgot password form submission.
pub async fn forgot_password(
    State(state): State<AppState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Response {
    let result = perform_forgot_password(&state, &form.email).await;

    let url = if result.is_success() {
        format!(
            "/auth/forgot-password?success={}",
            urlencoding::encode(result.message())
        )
    } else {
        format!(
            "/auth/forgot-password?error={}",
            urlencoding::encode(result.message())
        )
    };

    Redirect::to(&url).into_response()
}

/// Display the reset password page.
///
/// Called when the user clicks the reset link in the email.
pub async fn reset_page(Query(query): Query<ResetQuery>) -> Response {
    match (query.id, query.token) {
        (Some(id), Some(token)) => ResetPasswordTemplate {
            error: query.error,
            token_id: id,
            token,
        }
        .into_response(),
        _ => redirect_with_error("/auth/forgot-password", "This reset link is incomplete."),
    }
}

/// Handle reset password form submission.
pub async fn reset(State(state): State<AppState>, Form(form): Form<ResetPasswordForm>) -> Response {
    let result = perform_reset(&state, &form).await;

    if result.is_success() {
        let url = format!(
            "/auth/login?success={}",
            urlencoding::encode(result.message())
        );
        Redirect::to(&url).into_response()
    } else {
        // Preserve the link parameters so the user can correct and retry.
        let url = format!(
            "/auth/reset?id={}&token={}&error={}",
            urlencoding::encode(&form.id),
            urlencoding::encode(&form.token),
            urlencoding::encode(result.message()),
        );
        Redirect::to(&url).into_response()
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Clears the session payload and destroys the session row.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_account(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    clear_sentry_user();

    Redirect::to("/").into_response()
}

fn redirect_with_error(path: &str, message: &str) -> Response {
    let url = format!("{path}?error={}", urlencoding::encode(message));
    Redirect::to(&url).into_response()
}
