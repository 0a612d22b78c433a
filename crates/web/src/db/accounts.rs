//! Account repository for Supabase operations.
//!
//! All queries go through PostgREST on the primary project; the caller
//! supplies a client with the appropriate role (the service-role handle for
//! anything touching password hashes).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ayka_core::{AccountId, Email};

use super::RepositoryError;
use crate::models::Account;
use crate::supabase::Supabase;

/// Column list fetched for account reads. The password hash is deliberately
/// absent; only [`AccountRepository::get_credentials_by_email`] selects it.
const ACCOUNT_COLUMNS: &str = "id,email,display_name,created_at,updated_at";

/// Internal row type for PostgREST responses.
#[derive(Debug, Deserialize)]
struct AccountRow {
    id: AccountId,
    email: String,
    display_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            email,
            display_name: row.display_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Row type for the login path, carrying the stored password hash.
#[derive(Debug, Deserialize)]
struct CredentialRow {
    #[serde(flatten)]
    account: AccountRow,
    password_hash: String,
}

/// Insert payload for new accounts.
#[derive(Debug, Serialize)]
struct NewAccountRow<'a> {
    email: &'a str,
    display_name: &'a str,
    password_hash: &'a str,
}

/// Repository for account operations.
pub struct AccountRepository<'a> {
    supabase: &'a Supabase,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(supabase: &'a Supabase) -> Self {
        Self { supabase }
    }

    /// Get an account by its email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Supabase` if the request fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        let filter = format!("eq.{}", email.as_str());
        let rows: Vec<AccountRow> = self
            .supabase
            .select(
                "accounts",
                &[
                    ("select", ACCOUNT_COLUMNS),
                    ("email", &filter),
                    ("limit", "1"),
                ],
            )
            .await?;

        rows.into_iter().next().map(TryInto::try_into).transpose()
    }

    /// Get an account by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Supabase` if the request fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let filter = format!("eq.{id}");
        let rows: Vec<AccountRow> = self
            .supabase
            .select(
                "accounts",
                &[
                    ("select", ACCOUNT_COLUMNS),
                    ("id", &filter),
                    ("limit", "1"),
                ],
            )
            .await?;

        rows.into_iter().next().map(TryInto::try_into).transpose()
    }

    /// Get an account together with its stored password hash, for login.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Supabase` if the request fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn get_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        let filter = format!("eq.{}", email.as_str());
        let rows: Vec<CredentialRow> = self
            .supabase
            .select(
                "accounts",
                &[
                    ("select", "id,email,display_name,password_hash,created_at,updated_at"),
                    ("email", &filter),
                    ("limit", "1"),
                ],
            )
            .await?;

        match rows.into_iter().next() {
            Some(row) => {
                let account: Account = row.account.try_into()?;
                Ok(Some((account, row.password_hash)))
            }
            None => Ok(None),
        }
    }

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Supabase` for other request errors.
    pub async fn create(
        &self,
        email: &Email,
        display_name: &str,
        password_hash: &str,
    ) -> Result<Account, RepositoryError> {
        let payload = NewAccountRow {
            email: email.as_str(),
            display_name,
            password_hash,
        };

        let rows: Vec<AccountRow> = self.supabase.insert("accounts", &payload).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| RepositoryError::DataCorruption("insert returned no rows".to_owned()))?
            .try_into()
    }

    /// Replace an account's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    /// Returns `RepositoryError::Supabase` for other request errors.
    pub async fn update_password(
        &self,
        id: AccountId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let filter = format!("eq.{id}");
        let patch = serde_json::json!({
            "password_hash": password_hash,
            "updated_at": Utc::now(),
        });

        let updated: Vec<serde_json::Value> = self
            .supabase
            .update("accounts", &[("id", &filter)], &patch)
            .await?;

        if updated.is_empty() {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
