//! Stock inventory and history records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::{HistoryEntryId, StockItemId};

/// A single inventory line as it currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    /// Row ID.
    pub id: StockItemId,
    /// Display name of the item.
    pub name: String,
    /// Stock-keeping unit code.
    pub sku: String,
    /// Units currently on hand.
    pub quantity: i64,
    /// When the quantity last changed.
    pub updated_at: DateTime<Utc>,
}

/// One recorded stock movement.
///
/// Email composition and templates treat entries as opaque payload: they
/// render the fields they are given and impose no invariants of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Row ID.
    pub id: HistoryEntryId,
    /// Item name at the time of the movement.
    pub item_name: String,
    /// SKU at the time of the movement.
    pub sku: String,
    /// Signed quantity delta.
    pub change: i64,
    /// Optional free-text note from the operator.
    pub note: Option<String>,
    /// When the movement was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// The delta with an explicit sign, for rendering ("+5", "-3").
    #[must_use]
    pub fn signed_change(&self) -> String {
        format!("{:+}", self.change)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_change() {
        let mut entry = HistoryEntry {
            id: HistoryEntryId::generate(),
            item_name: "Widget".to_owned(),
            sku: "WDG-1".to_owned(),
            change: 5,
            note: None,
            recorded_at: Utc::now(),
        };
        assert_eq!(entry.signed_change(), "+5");

        entry.change = -3;
        assert_eq!(entry.signed_change(), "-3");
    }

    #[test]
    fn test_history_entry_serde() {
        let entry = HistoryEntry {
            id: HistoryEntryId::generate(),
            item_name: "Widget".to_owned(),
            sku: "WDG-1".to_owned(),
            change: -2,
            note: Some("damaged in transit".to_owned()),
            recorded_at: Utc::now(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        let parsed: HistoryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
    }
}
