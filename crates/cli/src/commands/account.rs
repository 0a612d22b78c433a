//! Account management commands.
//!
//! # Usage
//!
//! ```bash
//! ayka account create -e user@example.com -n "Display Name" -p "a strong password"
//! ```
//!
//! Useful for bootstrapping the first account on a fresh deployment;
//! everyone else registers through the site.

use thiserror::Error;

use ayka_web::config::{AppConfig, ConfigError};
use ayka_web::services::auth::{AuthError, AuthService};
use ayka_web::supabase::{Supabase, SupabaseError};

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountCommandError {
    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The Supabase client could not be constructed.
    #[error("supabase client error: {0}")]
    Supabase(#[from] SupabaseError),

    /// Registration failed (validation, conflict, or upstream error).
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Create a new account through the same registration path the site uses.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the email or password
/// fail validation, or the email is already registered.
pub async fn create(email: &str, name: &str, password: &str) -> Result<(), AccountCommandError> {
    let config = AppConfig::from_env()?;
    let admin = Supabase::admin(&config.supabase)?;

    tracing::info!("Creating account: {}", email);

    let auth = AuthService::new(&admin);
    let account = auth.register(email, name, password).await?;

    tracing::info!(
        "Account created successfully! ID: {}, Email: {}",
        account.id,
        account.email
    );

    Ok(())
}
