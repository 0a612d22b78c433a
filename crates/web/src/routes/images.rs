//! Remote image proxy.
//!
//! `GET /img?url=…` redirects to the target only when the URL passes the
//! configured allowlist; everything else is refused. The redirect keeps
//! image bytes off this server while still giving templates a single,
//! policy-checked origin for remote images.

use axum::{
    extract::{Query, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::state::AppState;

/// Query parameters for the image proxy.
#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub url: String,
}

/// Redirect to an allowlisted remote image, or answer 403.
pub async fn img(State(state): State<AppState>, Query(query): Query<ImageQuery>) -> Response {
    if state.config().image_allowlist.permits(&query.url) {
        (StatusCode::FOUND, [(LOCATION, query.url)]).into_response()
    } else {
        tracing::debug!(url = %query.url, "Image URL rejected by allowlist");
        StatusCode::FORBIDDEN.into_response()
    }
}
