//! Expired-row pruning.
//!
//! # Usage
//!
//! ```bash
//! ayka prune
//! ```
//!
//! Removes expired rows from the `sessions` and `password_reset_tokens`
//! tables. Intended to run on a schedule (cron or a machine timer); the
//! web binary never deletes expired rows itself, it only filters them out
//! on load.

use thiserror::Error;
use tower_sessions::ExpiredDeletion;

use ayka_web::config::{AppConfig, ConfigError};
use ayka_web::db::{RepositoryError, ResetTokenRepository, SupabaseSessionStore};
use ayka_web::supabase::{Supabase, SupabaseError};

/// Errors that can occur during pruning.
#[derive(Debug, Error)]
pub enum PruneError {
    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The Supabase client could not be constructed.
    #[error("supabase client error: {0}")]
    Supabase(#[from] SupabaseError),

    /// Session store deletion failed.
    #[error("session store error: {0}")]
    Sessions(#[from] tower_sessions::session_store::Error),

    /// Reset token deletion failed.
    #[error("reset token error: {0}")]
    Tokens(#[from] RepositoryError),
}

/// Delete expired sessions and password reset tokens.
///
/// # Errors
///
/// Returns an error if configuration is invalid or either deletion fails.
pub async fn run() -> Result<(), PruneError> {
    let config = AppConfig::from_env()?;
    let admin = Supabase::admin(&config.supabase)?;

    tracing::info!("Pruning expired sessions...");
    let store = SupabaseSessionStore::new(admin.clone());
    store.delete_expired().await?;
    tracing::info!("Expired sessions removed");

    tracing::info!("Pruning expired reset tokens...");
    let tokens = ResetTokenRepository::new(&admin);
    let removed = tokens.delete_expired().await?;
    tracing::info!("Removed {} expired reset tokens", removed);

    Ok(())
}
