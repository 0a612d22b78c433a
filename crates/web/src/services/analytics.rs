//! Analytics event recording against the performance project.
//!
//! Writes go through the anon-key client of the secondary Supabase
//! project and are best-effort: failures are logged at warn level and
//! never surface to the request that triggered them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::supabase::Supabase;

/// Insert payload for the `page_views` table.
#[derive(Debug, Serialize)]
struct PageViewRow {
    path: String,
    recorded_at: DateTime<Utc>,
}

/// Insert payload for the `action_events` table.
#[derive(Debug, Serialize)]
struct ActionEventRow {
    action: String,
    success: bool,
    recorded_at: DateTime<Utc>,
}

/// Analytics service over the performance project.
#[derive(Clone)]
pub struct Analytics {
    performance: Supabase,
}

impl Analytics {
    /// Create a new analytics service over the performance-project client.
    #[must_use]
    pub const fn new(performance: Supabase) -> Self {
        Self { performance }
    }

    /// Record a landing page view. Fire-and-forget.
    pub fn record_page_view(&self, path: &str) {
        let client = self.performance.clone();
        let row = PageViewRow {
            path: path.to_owned(),
            recorded_at: Utc::now(),
        };

        tokio::spawn(async move {
            if let Err(e) = client
                .insert::<_, serde_json::Value>("page_views", &row)
                .await
            {
                tracing::warn!(error = %e, path = %row.path, "Failed to record page view");
            }
        });
    }

    /// Record the outcome of an auth action. Fire-and-forget.
    pub fn record_action(&self, action: &str, success: bool) {
        let client = self.performance.clone();
        let row = ActionEventRow {
            action: action.to_owned(),
            success,
            recorded_at: Utc::now(),
        };

        tokio::spawn(async move {
            if let Err(e) = client
                .insert::<_, serde_json::Value>("action_events", &row)
                .await
            {
                tracing::warn!(error = %e, action = %row.action, "Failed to record action event");
            }
        });
    }
}
