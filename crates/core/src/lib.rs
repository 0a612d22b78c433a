//! AykaSosyal Core - Shared types library.
//!
//! This crate provides common types used across all AykaSosyal components:
//! - `web` - Public-facing site and JSON API
//! - `cli` - Command-line tools for account management and maintenance
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails, action results,
//!   and stock history records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
