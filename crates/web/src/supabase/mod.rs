//! Supabase REST (PostgREST) clients.
//!
//! # Architecture
//!
//! - Talks to PostgREST directly over HTTPS with `reqwest` - no local
//!   database, Supabase is the source of truth
//! - One cheap-to-clone handle per project+key pair
//!
//! # Client handles
//!
//! ## Admin
//! - Service-role key, bypasses row-level security
//! - Server-side only: constructed by `AppState` and the CLI, never
//!   reachable from browser-facing payloads
//!
//! ## Anon
//! - Public anon key, row-level security enforced
//! - The same key the browser receives via `/api/public-config`
//!
//! ## Performance
//! - Anon-keyed handle for the second project (analytics dataset)
//!
//! # Example
//!
//! ```rust,ignore
//! use ayka_web::supabase::Supabase;
//!
//! let supabase = Supabase::admin(&config.supabase)?;
//! let rows: Vec<AccountRow> = supabase
//!     .select("accounts", &[("email", "eq.user@example.com")])
//!     .await?;
//! ```

mod client;

pub use client::{Role, Supabase};

use thiserror::Error;

/// Errors that can occur when talking to Supabase.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// A uniqueness constraint was violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unknown table or endpoint.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Rate limited by Supabase.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}
