//! Account domain types.
//!
//! These types represent validated domain objects separate from raw
//! PostgREST row types.

use chrono::{DateTime, Utc};

use ayka_core::{AccountId, Email};

/// A registered account (domain type).
///
/// The password hash never travels with this type; the login path fetches
/// it separately and drops it immediately after verification.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique account ID.
    pub id: AccountId,
    /// Account email address.
    pub email: Email,
    /// Public display name.
    pub display_name: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}
