//! Configuration and connectivity check.
//!
//! # Usage
//!
//! ```bash
//! ayka check
//! ```
//!
//! Loads the full configuration (the same fail-fast path the web binary
//! takes), prints a redacted summary, and pings both Supabase projects.
//! Exits non-zero on the first problem, so it doubles as a deploy gate.

use thiserror::Error;

use ayka_web::config::{AppConfig, ConfigError};
use ayka_web::supabase::{Supabase, SupabaseError};

/// Errors that can occur during the check.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A Supabase project is unreachable or rejected its key.
    #[error("supabase error: {0}")]
    Supabase(#[from] SupabaseError),
}

/// Validate configuration and ping both Supabase projects.
///
/// # Errors
///
/// Returns an error on the first missing variable, weak secret, or
/// unreachable project.
pub async fn run() -> Result<(), CheckError> {
    let config = AppConfig::from_env()?;

    // Secrets implement redacting Debug; nothing sensitive prints here.
    tracing::info!("Configuration loaded");
    tracing::info!("  bind: {}", config.socket_addr());
    tracing::info!("  base_url: {}", config.base_url);
    tracing::info!("  supabase: {:?}", config.supabase);
    tracing::info!("  performance: {:?}", config.performance);
    tracing::info!("  resend: {:?}", config.resend);
    tracing::info!(
        "  image allowlist: {} patterns",
        config.image_allowlist.patterns().len()
    );

    tracing::info!("Pinging primary project...");
    let admin = Supabase::admin(&config.supabase)?;
    admin.ping("accounts").await?;
    tracing::info!("Primary project reachable");

    tracing::info!("Pinging performance project...");
    let performance = Supabase::performance(&config.performance)?;
    performance.ping("page_views").await?;
    tracing::info!("Performance project reachable");

    tracing::info!("All checks passed");

    Ok(())
}
