//! Core types for AykaSosyal.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod action;
pub mod email;
pub mod history;
pub mod id;

pub use action::{ActionState, FailureKind};
pub use email::{Email, EmailError};
pub use history::{HistoryEntry, StockItem};
pub use id::*;
