//! Authentication service.
//!
//! Handles account registration, password login, and the password reset
//! flow. Passwords and reset tokens are both stored as Argon2 hashes; the
//! plain reset token only ever exists inside the emailed link.

mod error;

pub use error::AuthError;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{Duration, Utc};
use rand::RngCore;
use tracing::instrument;

use ayka_core::{Email, ResetTokenId};

use crate::db::{AccountRepository, RepositoryError, ResetTokenRepository};
use crate::models::Account;
use crate::supabase::Supabase;

/// Minimum password length requirement.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Reset tokens expire this long after they are issued.
const RESET_TOKEN_TTL_MINUTES: i64 = 30;

/// Raw entropy in a reset token before base64 encoding.
const RESET_TOKEN_BYTES: usize = 32;

/// Minimum gap between reset emails to the same address.
pub const RESET_EMAIL_THROTTLE: std::time::Duration = std::time::Duration::from_secs(5 * 60);

/// A freshly issued password reset, ready to be emailed.
///
/// `token` is the plain token; it is never persisted. The stored row only
/// carries its hash.
#[derive(Debug)]
pub struct PasswordReset {
    /// Account the reset belongs to.
    pub account: Account,
    /// ID embedded in the reset link alongside the token.
    pub token_id: ResetTokenId,
    /// Plain token for the reset link.
    pub token: String,
}

/// Service for authentication operations.
pub struct AuthService<'a> {
    accounts: AccountRepository<'a>,
    tokens: ResetTokenRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new auth service over the service-role client.
    #[must_use]
    pub const fn new(supabase: &'a Supabase) -> Self {
        Self {
            accounts: AccountRepository::new(supabase),
            tokens: ResetTokenRepository::new(supabase),
        }
    }

    /// Register a new account with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email is malformed.
    /// Returns `AuthError::EmptyDisplayName` if the display name is blank.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::AccountAlreadyExists` if the email is taken.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        display_name: &str,
        password: &str,
    ) -> Result<Account, AuthError> {
        let email = Email::parse(email)?;

        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(AuthError::EmptyDisplayName);
        }

        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let account = self
            .accounts
            .create(&email, display_name, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::AccountAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(account_id = %account.id, "account registered");

        Ok(account)
    }

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a
    /// wrong password; the two cases are not distinguished.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let Some((account, password_hash)) = self.accounts.get_credentials_by_email(&email).await?
        else {
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &password_hash)?;

        Ok(account)
    }

    /// Issue a password reset token for the given email.
    ///
    /// Returns `None` when no account exists for the address. Callers must
    /// answer identically in both cases so the endpoint cannot be used to
    /// enumerate accounts.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email is malformed.
    #[instrument(skip(self))]
    pub async fn request_password_reset(
        &self,
        email: &str,
    ) -> Result<Option<PasswordReset>, AuthError> {
        let email = Email::parse(email)?;

        let Some(account) = self.accounts.get_by_email(&email).await? else {
            tracing::info!("password reset requested for unknown email");
            return Ok(None);
        };

        let token = generate_reset_token();
        let token_hash = hash_password(&token)?;
        let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

        let row = self
            .tokens
            .create(account.id, &token_hash, expires_at)
            .await?;

        tracing::info!(account_id = %account.id, token_id = %row.id, "password reset issued");

        Ok(Some(PasswordReset {
            account,
            token_id: row.id,
            token,
        }))
    }

    /// Complete a password reset with the token from the emailed link.
    ///
    /// The token row is marked used only after the new password is stored,
    /// so an upstream failure on the password write leaves the link usable
    /// for a retry. The `used_at IS NULL` guard on the mark keeps the token
    /// single-use under concurrent submissions.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the new password is too short.
    /// Returns `AuthError::InvalidResetToken` if the token is unknown,
    /// expired, already used, or does not match its stored hash.
    #[instrument(skip(self, token, new_password))]
    pub async fn reset_password(
        &self,
        token_id: ResetTokenId,
        token: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        validate_password(new_password)?;

        let Some(row) = self.tokens.get(token_id).await? else {
            return Err(AuthError::InvalidResetToken);
        };

        if !row.is_valid() {
            return Err(AuthError::InvalidResetToken);
        }

        verify_password(token, &row.token_hash).map_err(|_| AuthError::InvalidResetToken)?;

        let password_hash = hash_password(new_password)?;
        self.accounts
            .update_password(row.account_id, &password_hash)
            .await?;

        self.tokens.mark_used(row.id).await.map_err(|e| match e {
            RepositoryError::NotFound => AuthError::InvalidResetToken,
            other => AuthError::Repository(other),
        })?;

        tracing::info!(account_id = %row.account_id, "password reset completed");

        Ok(())
    }
}

// =============================================================================
// Password Helpers
// =============================================================================

/// Validate password strength requirements.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters."
        )));
    }
    Ok(())
}

/// Hash a password (or reset token) using Argon2.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against an Argon2 hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// Generate a URL-safe reset token with 256 bits of entropy.
fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_produces_different_output() {
        let hash = hash_password("secure_password123").unwrap();
        assert_ne!(hash, "secure_password123");
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_hash_password_uses_unique_salts() {
        let first = hash_password("secure_password123").unwrap();
        let second = hash_password("secure_password123").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_password_accepts_correct_password() {
        let hash = hash_password("secure_password123").unwrap();
        assert!(verify_password("secure_password123", &hash).is_ok());
    }

    #[test]
    fn test_verify_password_rejects_wrong_password() {
        let hash = hash_password("secure_password123").unwrap();
        let result = verify_password("wrong_password", &hash);
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_verify_password_rejects_malformed_hash() {
        let result = verify_password("anything", "not-a-real-hash");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_validate_password_rejects_short_passwords() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long_enough_password").is_ok());
    }

    #[test]
    fn test_generate_reset_token_is_url_safe() {
        let token = generate_reset_token();
        assert_eq!(token.len(), 43);
        assert!(!token.contains('='));
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
    }

    #[test]
    fn test_generate_reset_token_is_unique() {
        assert_ne!(generate_reset_token(), generate_reset_token());
    }

    #[test]
    fn test_reset_token_verifies_against_its_hash() {
        let token = generate_reset_token();
        let hash = hash_password(&token).unwrap();
        assert!(verify_password(&token, &hash).is_ok());
        assert!(verify_password(&generate_reset_token(), &hash).is_err());
    }
}
