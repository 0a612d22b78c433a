//! Action result type returned by server actions.
//!
//! Every state-changing action (login, register, password reset, stock
//! report) answers with an [`ActionState`]. The type is a tagged enum so a
//! result can never carry a failure kind while claiming success, but it
//! still serializes to the flat `{"success": bool, "message": "..."}` shape
//! the UI consumes, with a `"kind"` discriminator added on failures.

use core::fmt;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

/// Classifies why an action failed.
///
/// The kind decides the HTTP status on the JSON surface and lets the UI
/// pick between inline field errors and page-level banners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Unknown email or wrong password. Deliberately indistinguishable.
    InvalidCredentials,
    /// The submitted input failed validation (bad email, short password).
    Validation,
    /// A uniqueness constraint was violated (email already registered).
    Conflict,
    /// The referenced entity does not exist (stale reset token id).
    NotFound,
    /// The caller has no valid session.
    Session,
    /// An upstream dependency (database) failed.
    Upstream,
    /// Email delivery failed.
    Email,
}

impl FailureKind {
    /// Returns the wire name of this kind (`snake_case`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::Session => "session",
            Self::Upstream => "upstream",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of a server action.
///
/// ## Wire format
///
/// ```json
/// {"success": true,  "message": "Signed in."}
/// {"success": false, "message": "Invalid email or password.", "kind": "invalid_credentials"}
/// ```
///
/// ## Examples
///
/// ```
/// use ayka_core::{ActionState, FailureKind};
///
/// let ok = ActionState::success("Signed in.");
/// assert!(ok.is_success());
/// assert_eq!(ok.kind(), None);
///
/// let err = ActionState::failure(FailureKind::Conflict, "Email already registered.");
/// assert!(!err.is_success());
/// assert_eq!(err.kind(), Some(FailureKind::Conflict));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionState {
    /// The action completed.
    Success {
        /// Human-readable confirmation for the UI.
        message: String,
    },
    /// The action did not complete.
    Failure {
        /// Why it failed.
        kind: FailureKind,
        /// Human-readable explanation for the UI. Never contains internal
        /// error details.
        message: String,
    },
}

impl ActionState {
    /// Build a success result.
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
        }
    }

    /// Build a failure result.
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    /// Whether the action succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success { message } | Self::Failure { message, .. } => message,
        }
    }

    /// The failure kind, if this is a failure.
    #[must_use]
    pub const fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}

impl Serialize for ActionState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Success { message } => {
                let mut s = serializer.serialize_struct("ActionState", 2)?;
                s.serialize_field("success", &true)?;
                s.serialize_field("message", message)?;
                s.end()
            }
            Self::Failure { kind, message } => {
                let mut s = serializer.serialize_struct("ActionState", 3)?;
                s.serialize_field("success", &false)?;
                s.serialize_field("message", message)?;
                s.serialize_field("kind", kind)?;
                s.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for ActionState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wire {
            success: bool,
            message: String,
            #[serde(default)]
            kind: Option<FailureKind>,
        }

        let wire = Wire::deserialize(deserializer)?;
        match (wire.success, wire.kind) {
            (true, None) => Ok(Self::Success {
                message: wire.message,
            }),
            (true, Some(_)) => Err(de::Error::custom(
                "successful action cannot carry a failure kind",
            )),
            (false, Some(kind)) => Ok(Self::Failure {
                kind,
                message: wire.message,
            }),
            (false, None) => Err(de::Error::missing_field("kind")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let state = ActionState::success("Signed in.");
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "message": "Signed in."})
        );
    }

    #[test]
    fn test_failure_shape() {
        let state = ActionState::failure(FailureKind::InvalidCredentials, "Invalid email or password.");
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "message": "Invalid email or password.",
                "kind": "invalid_credentials"
            })
        );
    }

    #[test]
    fn test_roundtrip_success() {
        let state = ActionState::success("Done.");
        let json = serde_json::to_string(&state).unwrap();
        let parsed: ActionState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_roundtrip_failure() {
        let state = ActionState::failure(FailureKind::Upstream, "Something went wrong.");
        let json = serde_json::to_string(&state).unwrap();
        let parsed: ActionState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_rejects_success_with_kind() {
        let json = r#"{"success": true, "message": "ok", "kind": "validation"}"#;
        assert!(serde_json::from_str::<ActionState>(json).is_err());
    }

    #[test]
    fn test_rejects_failure_without_kind() {
        let json = r#"{"success": false, "message": "nope"}"#;
        assert!(serde_json::from_str::<ActionState>(json).is_err());
    }

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(FailureKind::InvalidCredentials.as_str(), "invalid_credentials");
        assert_eq!(FailureKind::NotFound.as_str(), "not_found");
        assert_eq!(
            serde_json::to_value(FailureKind::Conflict).unwrap(),
            serde_json::json!("conflict")
        );
    }

    #[test]
    fn test_message_accessor() {
        assert_eq!(ActionState::success("a").message(), "a");
        assert_eq!(
            ActionState::failure(FailureKind::Session, "b").message(),
            "b"
        );
    }
}
