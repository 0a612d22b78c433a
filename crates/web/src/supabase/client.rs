//! PostgREST client implementation.
//!
//! Uses `reqwest` 0.13 with auth headers baked in at construction. Filters
//! follow PostgREST syntax (`column=eq.value`); mutations ask for
//! `return=representation` so callers can inspect the affected rows.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::config::{PerformanceConfig, SupabaseConfig};

use super::SupabaseError;

/// Access role a client handle authenticates as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Service-role key. Bypasses row-level security; server-side only.
    ServiceRole,
    /// Public anon key. Row-level security enforced.
    Anon,
}

/// Client handle for one Supabase project.
///
/// Cloning is cheap; all clones share the underlying `reqwest::Client`.
#[derive(Clone)]
pub struct Supabase {
    inner: Arc<SupabaseInner>,
}

struct SupabaseInner {
    client: reqwest::Client,
    rest_url: String,
    role: Role,
}

impl Supabase {
    /// Create a service-role client for the primary project.
    ///
    /// The handle bypasses row-level security. It must only ever live in
    /// server-side state, never in anything serialized toward the browser.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn admin(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        Self::build(
            &config.url,
            config.service_role_key.expose_secret(),
            Role::ServiceRole,
        )
    }

    /// Create an anon-key client for the primary project.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn anon(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        Self::build(&config.url, &config.anon_key, Role::Anon)
    }

    /// Create an anon-key client for the performance project.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn performance(config: &PerformanceConfig) -> Result<Self, SupabaseError> {
        Self::build(&config.url, &config.anon_key, Role::Anon)
    }

    fn build(project_url: &str, key: &str, role: Role) -> Result<Self, SupabaseError> {
        let mut headers = HeaderMap::new();

        headers.insert(
            "apikey",
            HeaderValue::from_str(key)
                .map_err(|e| SupabaseError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let auth_value = format!("Bearer {key}");
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&auth_value)
                .map_err(|e| SupabaseError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            inner: Arc::new(SupabaseInner {
                client,
                rest_url: format!("{}/rest/v1", project_url.trim_end_matches('/')),
                role,
            }),
        })
    }

    /// The role this handle authenticates as.
    #[must_use]
    pub fn role(&self) -> Role {
        self.inner.role
    }

    /// Select rows from a table.
    ///
    /// `query` carries PostgREST parameters, e.g.
    /// `[("email", "eq.user@example.com"), ("select", "*")]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// parsed.
    #[instrument(skip(self, query), fields(table = %table))]
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, SupabaseError> {
        let response = self
            .inner
            .client
            .get(self.table_url(table))
            .query(query)
            .send()
            .await?;

        let body = Self::check(response).await?;
        serde_json::from_str(&body).map_err(|e| SupabaseError::Parse(e.to_string()))
    }

    /// Insert one or more rows, returning the inserted representation.
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::Conflict`] on unique violations.
    #[instrument(skip(self, rows), fields(table = %table))]
    pub async fn insert<T, R>(&self, table: &str, rows: &T) -> Result<Vec<R>, SupabaseError>
    where
        T: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .inner
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(rows)
            .send()
            .await?;

        let body = Self::check(response).await?;
        serde_json::from_str(&body).map_err(|e| SupabaseError::Parse(e.to_string()))
    }

    /// Insert or update on primary-key collision.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// parsed.
    #[instrument(skip(self, rows), fields(table = %table))]
    pub async fn upsert<T, R>(&self, table: &str, rows: &T) -> Result<Vec<R>, SupabaseError>
    where
        T: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .inner
            .client
            .post(self.table_url(table))
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(rows)
            .send()
            .await?;

        let body = Self::check(response).await?;
        serde_json::from_str(&body).map_err(|e| SupabaseError::Parse(e.to_string()))
    }

    /// Update rows matching the filters, returning the updated rows.
    ///
    /// An empty result means no row matched; callers decide whether that is
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// parsed.
    #[instrument(skip(self, patch, query), fields(table = %table))]
    pub async fn update<T, R>(
        &self,
        table: &str,
        query: &[(&str, &str)],
        patch: &T,
    ) -> Result<Vec<R>, SupabaseError>
    where
        T: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .inner
            .client
            .patch(self.table_url(table))
            .query(query)
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;

        let body = Self::check(response).await?;
        serde_json::from_str(&body).map_err(|e| SupabaseError::Parse(e.to_string()))
    }

    /// Delete rows matching the filters, returning the deleted rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be
    /// parsed.
    #[instrument(skip(self, query), fields(table = %table))]
    pub async fn delete<R: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<R>, SupabaseError> {
        let response = self
            .inner
            .client
            .delete(self.table_url(table))
            .query(query)
            .header("Prefer", "return=representation")
            .send()
            .await?;

        let body = Self::check(response).await?;
        serde_json::from_str(&body).map_err(|e| SupabaseError::Parse(e.to_string()))
    }

    /// Cheap reachability check: a zero-row select against `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if the project is unreachable or rejects the key.
    pub async fn ping(&self, table: &str) -> Result<(), SupabaseError> {
        let _rows: Vec<serde_json::Value> =
            self.select(table, &[("select", "id"), ("limit", "0")]).await?;
        Ok(())
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.inner.rest_url)
    }

    /// Map response status to the error taxonomy and hand back the body.
    async fn check(response: reqwest::Response) -> Result<String, SupabaseError> {
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(SupabaseError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if status == reqwest::StatusCode::CONFLICT {
            return Err(SupabaseError::Conflict(extract_message(&body)));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SupabaseError::NotFound(extract_message(&body)));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Supabase returned non-success status"
            );
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message: extract_message(&body),
            });
        }

        Ok(body)
    }
}

/// Pull the `message` field out of a PostgREST error body, falling back to
/// the raw (truncated) body.
fn extract_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body).map_or_else(
        |_| body.chars().take(200).collect(),
        |parsed| parsed.message,
    )
}
