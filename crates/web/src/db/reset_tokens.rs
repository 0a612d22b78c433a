//! Password reset token repository.
//!
//! Tokens are single-use and short-lived. Only the Argon2 hash of the token
//! is stored; the plain token exists solely inside the reset email.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ayka_core::{AccountId, ResetTokenId};

use super::RepositoryError;
use crate::supabase::Supabase;

/// A password reset token record.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordResetToken {
    /// Unique identifier, embedded in the reset link.
    pub id: ResetTokenId,
    /// Account the token belongs to.
    pub account_id: AccountId,
    /// Argon2 hash of the plain token.
    pub token_hash: String,
    /// When the token was created.
    pub created_at: DateTime<Utc>,
    /// When the token expires.
    pub expires_at: DateTime<Utc>,
    /// When the token was used (None if unused).
    pub used_at: Option<DateTime<Utc>>,
}

impl PasswordResetToken {
    /// Returns true if this token has already been used.
    #[must_use]
    pub const fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    /// Returns true if this token has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Returns true if this token can still be used.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_used() && !self.is_expired()
    }
}

/// Insert payload for new tokens.
///
/// The ID is generated client-side so the reset link can be composed
/// without a round trip.
#[derive(Debug, Serialize)]
struct NewTokenRow<'a> {
    id: ResetTokenId,
    account_id: AccountId,
    token_hash: &'a str,
    expires_at: DateTime<Utc>,
}

/// Repository for password reset token operations.
pub struct ResetTokenRepository<'a> {
    supabase: &'a Supabase,
}

impl<'a> ResetTokenRepository<'a> {
    /// Create a new token repository.
    #[must_use]
    pub const fn new(supabase: &'a Supabase) -> Self {
        Self { supabase }
    }

    /// Store a new reset token hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Supabase` if the request fails.
    pub async fn create(
        &self,
        account_id: AccountId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<PasswordResetToken, RepositoryError> {
        let payload = NewTokenRow {
            id: ResetTokenId::generate(),
            account_id,
            token_hash,
            expires_at,
        };

        let rows: Vec<PasswordResetToken> = self
            .supabase
            .insert("password_reset_tokens", &payload)
            .await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| RepositoryError::DataCorruption("insert returned no rows".to_owned()))
    }

    /// Get a token by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Supabase` if the request fails.
    pub async fn get(&self, id: ResetTokenId) -> Result<Option<PasswordResetToken>, RepositoryError> {
        let filter = format!("eq.{id}");
        let rows: Vec<PasswordResetToken> = self
            .supabase
            .select("password_reset_tokens", &[("id", &filter), ("limit", "1")])
            .await?;

        Ok(rows.into_iter().next())
    }

    /// Mark a token as used.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the token doesn't exist or was
    /// already used.
    pub async fn mark_used(&self, id: ResetTokenId) -> Result<(), RepositoryError> {
        let filter = format!("eq.{id}");
        let patch = serde_json::json!({ "used_at": Utc::now() });

        let updated: Vec<serde_json::Value> = self
            .supabase
            .update(
                "password_reset_tokens",
                &[("id", &filter), ("used_at", "is.null")],
                &patch,
            )
            .await?;

        if updated.is_empty() {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete expired tokens (cleanup).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Supabase` if the request fails.
    pub async fn delete_expired(&self) -> Result<u64, RepositoryError> {
        let filter = format!("lt.{}", Utc::now().to_rfc3339());
        let deleted: Vec<serde_json::Value> = self
            .supabase
            .delete("password_reset_tokens", &[("expires_at", &filter)])
            .await?;

        Ok(deleted.len() as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn token(expires_at: DateTime<Utc>, used_at: Option<DateTime<Utc>>) -> PasswordResetToken {
        PasswordResetToken {
            id: ResetTokenId::generate(),
            account_id: AccountId::generate(),
            token_hash: "$argon2id$...".to_owned(),
            created_at: Utc::now(),
            expires_at,
            used_at,
        }
    }

    #[test]
    fn test_fresh_token_is_valid() {
        let t = token(Utc::now() + Duration::minutes(30), None);
        assert!(!t.is_used());
        assert!(!t.is_expired());
        assert!(t.is_valid());
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let t = token(Utc::now() - Duration::minutes(1), None);
        assert!(t.is_expired());
        assert!(!t.is_valid());
    }

    #[test]
    fn test_used_token_is_invalid() {
        let t = token(Utc::now() + Duration::minutes(30), Some(Utc::now()));
        assert!(t.is_used());
        assert!(!t.is_valid());
    }
}
