//! Business logic services.
//!
//! Services own the operations routes call into:
//!
//! - `auth` - registration, login, and the password reset flow
//! - `email` - transactional email via Resend
//! - `analytics` - best-effort event writes to the performance project

pub mod analytics;
pub mod auth;
pub mod email;

pub use analytics::Analytics;
pub use auth::{AuthError, AuthService};
pub use email::{Mailer, ResendError};
