//! Session middleware configuration.
//!
//! Sets up Supabase-backed sessions using tower-sessions.

use tower_sessions::{Expiry, SessionManagerLayer};

use crate::config::AppConfig;
use crate::db::SupabaseSessionStore;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "aykasosyal_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with the Supabase store.
///
/// # Arguments
///
/// * `store` - Session store over the service-role client
/// * `config` - Application configuration (for secure-cookie detection)
#[must_use]
pub fn create_session_layer(
    store: SupabaseSessionStore,
    config: &AppConfig,
) -> SessionManagerLayer<SupabaseSessionStore> {
    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
