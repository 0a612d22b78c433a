//! Stock inventory repository.
//!
//! `stock_items` holds current quantities; `stock_history` is the
//! append-only movement log. Quantities are maintained by a database
//! trigger on history inserts, so this repository never updates
//! `stock_items` directly.

use serde::Serialize;

use ayka_core::{HistoryEntry, StockItem};

use super::RepositoryError;
use crate::supabase::Supabase;

/// Insert payload for stock movements.
#[derive(Debug, Serialize)]
struct NewHistoryRow<'a> {
    item_name: &'a str,
    sku: &'a str,
    change: i64,
    note: Option<&'a str>,
}

/// Repository for stock operations.
pub struct StockRepository<'a> {
    supabase: &'a Supabase,
}

impl<'a> StockRepository<'a> {
    /// Create a new stock repository.
    #[must_use]
    pub const fn new(supabase: &'a Supabase) -> Self {
        Self { supabase }
    }

    /// List all inventory lines, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Supabase` if the request fails.
    pub async fn list_items(&self) -> Result<Vec<StockItem>, RepositoryError> {
        let items = self
            .supabase
            .select("stock_items", &[("select", "*"), ("order", "name.asc")])
            .await?;

        Ok(items)
    }

    /// The most recent stock movements, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Supabase` if the request fails.
    pub async fn recent_history(&self, limit: usize) -> Result<Vec<HistoryEntry>, RepositoryError> {
        let limit = limit.to_string();
        let entries = self
            .supabase
            .select(
                "stock_history",
                &[
                    ("select", "*"),
                    ("order", "recorded_at.desc"),
                    ("limit", &limit),
                ],
            )
            .await?;

        Ok(entries)
    }

    /// Append a stock movement to the history.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Supabase` if the request fails.
    pub async fn record(
        &self,
        item_name: &str,
        sku: &str,
        change: i64,
        note: Option<&str>,
    ) -> Result<HistoryEntry, RepositoryError> {
        let payload = NewHistoryRow {
            item_name,
            sku,
            change,
            note,
        };

        let rows: Vec<HistoryEntry> = self.supabase.insert("stock_history", &payload).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| RepositoryError::DataCorruption("insert returned no rows".to_owned()))
    }
}
