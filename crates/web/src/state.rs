//! Application state shared across handlers.

use std::sync::Arc;

use moka::future::Cache;

use crate::config::AppConfig;
use crate::services::auth::RESET_EMAIL_THROTTLE;
use crate::services::{Analytics, Mailer, ResendError};
use crate::supabase::{Supabase, SupabaseError};

/// Reset throttle entries to keep before evicting the oldest.
const RESET_THROTTLE_CAPACITY: u64 = 10_000;

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("supabase client error: {0}")]
    Supabase(#[from] SupabaseError),
    #[error("mailer error: {0}")]
    Mailer(#[from] ResendError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the Supabase clients and configuration.
///
/// The service-role client only exists here, behind server-side state.
/// Nothing in this struct serializes.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    admin: Supabase,
    anon: Supabase,
    performance: Supabase,
    mailer: Mailer,
    analytics: Analytics,
    reset_throttle: Cache<String, ()>,
}

impl AppState {
    /// Create a new application state from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client fails to build.
    pub fn new(config: AppConfig) -> Result<Self, StateError> {
        let admin = Supabase::admin(&config.supabase)?;
        let anon = Supabase::anon(&config.supabase)?;
        let performance = Supabase::performance(&config.performance)?;
        let mailer = Mailer::new(&config.resend)?;
        let analytics = Analytics::new(performance.clone());

        let reset_throttle = Cache::builder()
            .max_capacity(RESET_THROTTLE_CAPACITY)
            .time_to_live(RESET_EMAIL_THROTTLE)
            .build();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                admin,
                anon,
                performance,
                mailer,
                analytics,
                reset_throttle,
            }),
        })
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get the service-role client for the primary project.
    #[must_use]
    pub fn admin(&self) -> &Supabase {
        &self.inner.admin
    }

    /// Get the anon-key client for the primary project.
    #[must_use]
    pub fn anon(&self) -> &Supabase {
        &self.inner.anon
    }

    /// Get the anon-key client for the performance project.
    #[must_use]
    pub fn performance(&self) -> &Supabase {
        &self.inner.performance
    }

    /// Get a reference to the mailer.
    #[must_use]
    pub fn mailer(&self) -> &Mailer {
        &self.inner.mailer
    }

    /// Get a reference to the analytics service.
    #[must_use]
    pub fn analytics(&self) -> &Analytics {
        &self.inner.analytics
    }

    /// Per-address throttle for password reset emails.
    #[must_use]
    pub fn reset_throttle(&self) -> &Cache<String, ()> {
        &self.inner.reset_throttle
    }
}
