//! Tower-sessions store backed by the Supabase `sessions` table.
//!
//! # Schema
//!
//! | Column      | Type               | Description                  |
//! |-------------|--------------------|------------------------------|
//! | id          | TEXT (Primary Key) | Session ID                   |
//! | data        | JSONB              | Serialized session data      |
//! | expiry_date | TIMESTAMPTZ        | Session expiration timestamp |
//!
//! Expired rows are filtered on load and removed by `delete_expired`
//! (invoked from the CLI prune command).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, Error};
use tower_sessions::{ExpiredDeletion, SessionStore};

use crate::supabase::Supabase;

const SESSIONS_TABLE: &str = "sessions";

/// Session store persisting records through PostgREST.
#[derive(Clone)]
pub struct SupabaseSessionStore {
    supabase: Supabase,
}

impl std::fmt::Debug for SupabaseSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseSessionStore").finish_non_exhaustive()
    }
}

/// Full row written on save.
#[derive(Debug, Serialize)]
struct SessionWriteRow {
    id: String,
    data: serde_json::Value,
    expiry_date: String,
}

/// Columns read on load; the ID is already known from the cookie.
#[derive(Debug, Deserialize)]
struct SessionReadRow {
    data: serde_json::Value,
    expiry_date: String,
}

fn to_row(record: &Record) -> session_store::Result<SessionWriteRow> {
    Ok(SessionWriteRow {
        id: record.id.to_string(),
        data: serde_json::to_value(&record.data).map_err(|e| Error::Encode(e.to_string()))?,
        expiry_date: record
            .expiry_date
            .format(&Rfc3339)
            .map_err(|e| Error::Encode(e.to_string()))?,
    })
}

fn from_row(id: Id, row: SessionReadRow) -> session_store::Result<Record> {
    Ok(Record {
        id,
        data: serde_json::from_value(row.data).map_err(|e| Error::Decode(e.to_string()))?,
        expiry_date: OffsetDateTime::parse(&row.expiry_date, &Rfc3339)
            .map_err(|e| Error::Decode(e.to_string()))?,
    })
}

fn now_rfc3339() -> session_store::Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| Error::Backend(e.to_string()))
}

impl SupabaseSessionStore {
    /// Create a store over a Supabase handle.
    ///
    /// Session rows carry account identity, so this wants the service-role
    /// client.
    #[must_use]
    pub const fn new(supabase: Supabase) -> Self {
        Self { supabase }
    }
}

#[async_trait]
impl SessionStore for SupabaseSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        // Retry with a fresh ID on the (vanishingly rare) PK collision.
        loop {
            let row = to_row(record)?;
            let result: Result<Vec<serde_json::Value>, _> =
                self.supabase.insert(SESSIONS_TABLE, &row).await;

            match result {
                Ok(_) => return Ok(()),
                Err(crate::supabase::SupabaseError::Conflict(_)) => {
                    record.id = Id::default();
                }
                Err(e) => return Err(Error::Backend(e.to_string())),
            }
        }
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        let row = to_row(record)?;
        let _rows: Vec<serde_json::Value> = self
            .supabase
            .upsert(SESSIONS_TABLE, &row)
            .await
            .map_err(|e| Error::Backend(e.to_string()))?;

        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let id_filter = format!("eq.{session_id}");
        let expiry_filter = format!("gt.{}", now_rfc3339()?);

        let rows: Vec<SessionReadRow> = self
            .supabase
            .select(
                SESSIONS_TABLE,
                &[
                    ("select", "data,expiry_date"),
                    ("id", &id_filter),
                    ("expiry_date", &expiry_filter),
                    ("limit", "1"),
                ],
            )
            .await
            .map_err(|e| Error::Backend(e.to_string()))?;

        rows.into_iter()
            .next()
            .map(|row| from_row(*session_id, row))
            .transpose()
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        let id_filter = format!("eq.{session_id}");
        let _rows: Vec<serde_json::Value> = self
            .supabase
            .delete(SESSIONS_TABLE, &[("id", &id_filter)])
            .await
            .map_err(|e| Error::Backend(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for SupabaseSessionStore {
    async fn delete_expired(&self) -> session_store::Result<()> {
        let expiry_filter = format!("lt.{}", now_rfc3339()?);
        let _rows: Vec<serde_json::Value> = self
            .supabase
            .delete(SESSIONS_TABLE, &[("expiry_date", &expiry_filter)])
            .await
            .map_err(|e| Error::Backend(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use time::Duration;

    use super::*;

    fn sample_record() -> Record {
        let mut data = HashMap::new();
        data.insert(
            "current_account".to_string(),
            serde_json::json!({"email": "user@example.com"}),
        );

        Record {
            id: Id::default(),
            data,
            expiry_date: OffsetDateTime::now_utc() + Duration::days(7),
        }
    }

    #[test]
    fn test_row_roundtrip() {
        let record = sample_record();

        let row = to_row(&record).unwrap();
        assert_eq!(row.id, record.id.to_string());

        let read = SessionReadRow {
            data: row.data,
            expiry_date: row.expiry_date,
        };
        let restored = from_row(record.id, read).unwrap();

        assert_eq!(restored.id, record.id);
        assert_eq!(restored.data, record.data);
        assert_eq!(restored.expiry_date, record.expiry_date);
    }

    #[test]
    fn test_from_row_rejects_bad_expiry() {
        let read = SessionReadRow {
            data: serde_json::json!({}),
            expiry_date: "not-a-date".to_string(),
        };
        assert!(from_row(Id::default(), read).is_err());
    }
}
