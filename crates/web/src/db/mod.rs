//! Database operations against Supabase.
//!
//! # Primary project
//!
//! ## Tables
//!
//! - `accounts` - Site authentication
//! - `sessions` - Tower-sessions storage
//! - `password_reset_tokens`
//! - `stock_items` - Current inventory (quantity maintained by a trigger)
//! - `stock_history` - Inventory movements
//!
//! # Performance project
//!
//! - `page_views`, `action_events` - Analytics dataset
//!
//! There is no direct database connection: all access goes through
//! PostgREST via [`crate::supabase::Supabase`]. Repositories borrow a
//! client handle and convert raw rows into domain types.

pub mod accounts;
pub mod reset_tokens;
pub mod sessions;
pub mod stock;

use thiserror::Error;

pub use accounts::AccountRepository;
pub use reset_tokens::ResetTokenRepository;
pub use sessions::SupabaseSessionStore;
pub use stock::StockRepository;

use crate::supabase::SupabaseError;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Supabase request failed.
    #[error("supabase error: {0}")]
    Supabase(SupabaseError),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl From<SupabaseError> for RepositoryError {
    fn from(err: SupabaseError) -> Self {
        match err {
            SupabaseError::Conflict(message) => Self::Conflict(message),
            other => Self::Supabase(other),
        }
    }
}
