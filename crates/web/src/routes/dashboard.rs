//! Dashboard route handlers (authenticated area).
//!
//! Stock reads and writes go through the service-role client; the
//! dashboard is server-trusted and sits behind [`RequireAuth`].

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use ayka_core::{ActionState, FailureKind, HistoryEntry, StockItem};

use crate::db::StockRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::CurrentAccount;
use crate::routes::auth::MessageQuery;
use crate::state::AppState;

/// How many history rows the stock page and the report email show.
const RECENT_HISTORY_LIMIT: usize = 20;

// =============================================================================
// Form Types
// =============================================================================

/// Stock movement form data.
#[derive(Debug, Deserialize)]
pub struct RecordForm {
    pub item_name: String,
    pub sku: String,
    pub change: i64,
    pub note: Option<String>,
}

/// Stock report form data.
#[derive(Debug, Deserialize)]
pub struct ReportForm {
    pub recipient: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Stock overview template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/stock.html")]
pub struct StockTemplate {
    pub current_account: CurrentAccount,
    pub items: Vec<StockItem>,
    pub history: Vec<HistoryEntry>,
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display current stock levels and recent movements.
pub async fn stock(
    State(state): State<AppState>,
    RequireAuth(current_account): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<StockTemplate> {
    let repo = StockRepository::new(state.admin());

    let items = repo.list_items().await?;
    let history = repo.recent_history(RECENT_HISTORY_LIMIT).await?;

    Ok(StockTemplate {
        current_account,
        items,
        history,
        error: query.error,
        success: query.success,
    })
}

/// Record a stock movement.
pub async fn record(
    State(state): State<AppState>,
    RequireAuth(_account): RequireAuth,
    Form(form): Form<RecordForm>,
) -> Response {
    let item_name = form.item_name.trim();
    let sku = form.sku.trim();

    if item_name.is_empty() || sku.is_empty() {
        return redirect_with_state(&ActionState::failure(
            FailureKind::Validation,
            "Item name and SKU are required.",
        ));
    }

    let note = form.note.as_deref().map(str::trim).filter(|n| !n.is_empty());

    let repo = StockRepository::new(state.admin());
    let result = match repo.record(item_name, sku, form.change, note).await {
        Ok(entry) => {
            tracing::info!(sku = %entry.sku, change = entry.change, "Stock movement recorded");
            ActionState::success(format!("Recorded {} for {}.", entry.signed_change(), entry.sku))
        }
        Err(e) => {
            tracing::error!("Failed to record stock movement: {}", e);
            ActionState::failure(
                FailureKind::Upstream,
                "Could not record the movement. Please try again.",
            )
        }
    };

    redirect_with_state(&result)
}

/// Email the recent-history report.
///
/// The recipient falls back to `STOCK_REPORT_TO` when the form leaves it
/// blank.
pub async fn report(
    State(state): State<AppState>,
    RequireAuth(_account): RequireAuth,
    Form(form): Form<ReportForm>,
) -> Response {
    let result = perform_report(&state, form.recipient.as_deref()).await;
    redirect_with_state(&result)
}

/// Compose and send the stock report, reporting an `ActionState`.
pub(crate) async fn perform_report(state: &AppState, recipient: Option<&str>) -> ActionState {
    let recipient = recipient
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .or(state.config().resend.report_to.as_deref());

    let Some(recipient) = recipient else {
        return ActionState::failure(
            FailureKind::Validation,
            "No recipient configured. Provide one or set STOCK_REPORT_TO.",
        );
    };

    let repo = StockRepository::new(state.admin());
    let history = match repo.recent_history(RECENT_HISTORY_LIMIT).await {
        Ok(history) => history,
        Err(e) => {
            tracing::error!("Failed to load stock history for report: {}", e);
            return ActionState::failure(
                FailureKind::Upstream,
                "Could not load the stock history. Please try again.",
            );
        }
    };

    if let Err(e) = state.mailer().send_stock_report(recipient, &history).await {
        tracing::error!("Failed to send stock report: {}", e);
        return ActionState::failure(
            FailureKind::Email,
            "Could not send the report email. Please try again later.",
        );
    }

    ActionState::success(format!("Stock report sent to {recipient}."))
}

fn redirect_with_state(result: &ActionState) -> Response {
    let url = if result.is_success() {
        format!(
            "/dashboard/stock?success={}",
            urlencoding::encode(result.message())
        )
    } else {
        format!(
            "/dashboard/stock?error={}",
            urlencoding::encode(result.message())
        )
    };

    Redirect::to(&url).into_response()
}
