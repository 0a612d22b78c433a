//! Domain models for the web application.

pub mod account;
pub mod session;

pub use account::Account;
pub use session::CurrentAccount;
pub use session::keys as session_keys;
