//! Authentication error types.

use ayka_core::{ActionState, FailureKind};
use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] ayka_core::EmailError),

    /// Invalid credentials (wrong password or account not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account already exists.
    #[error("account already exists")]
    AccountAlreadyExists,

    /// Display name missing or blank.
    #[error("display name cannot be empty")]
    EmptyDisplayName,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Reset token unknown, expired, already used, or mismatched.
    #[error("invalid reset token")]
    InvalidResetToken,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Map the error into the result shape the UI consumes.
    ///
    /// Internal details (repository and hashing failures) collapse into a
    /// generic upstream message.
    #[must_use]
    pub fn to_action_state(&self) -> ActionState {
        match self {
            Self::InvalidEmail(_) => ActionState::failure(
                FailureKind::Validation,
                "Please enter a valid email address.",
            ),
            Self::InvalidCredentials => ActionState::failure(
                FailureKind::InvalidCredentials,
                "Invalid email or password.",
            ),
            Self::AccountAlreadyExists => ActionState::failure(
                FailureKind::Conflict,
                "An account with this email already exists.",
            ),
            Self::EmptyDisplayName => {
                ActionState::failure(FailureKind::Validation, "Please enter a display name.")
            }
            Self::WeakPassword(message) => {
                ActionState::failure(FailureKind::Validation, message.clone())
            }
            Self::InvalidResetToken => ActionState::failure(
                FailureKind::Validation,
                "This reset link is invalid or has expired.",
            ),
            Self::Repository(_) | Self::PasswordHash => ActionState::failure(
                FailureKind::Upstream,
                "Something went wrong. Please try again.",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_credentials_maps_to_matching_kind() {
        let state = AuthError::InvalidCredentials.to_action_state();
        assert!(!state.is_success());
        assert_eq!(state.kind(), Some(FailureKind::InvalidCredentials));
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let state = AuthError::PasswordHash.to_action_state();
        assert_eq!(state.kind(), Some(FailureKind::Upstream));
        assert!(!state.message().contains("hash"));
    }

    #[test]
    fn test_conflict_maps_to_conflict_kind() {
        let state = AuthError::AccountAlreadyExists.to_action_state();
        assert_eq!(state.kind(), Some(FailureKind::Conflict));
    }
}
