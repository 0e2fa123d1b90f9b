//! Feed conversion followed by a sync into the remote tables

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    routing::post,
};

use tripcal_core::rows::map_rows;
use tripcal_core::sync::SyncReport;
use tripcal_core::sync::http::HttpTable;
use tripcal_core::{TripCalError, convert_feed};

use crate::routes::{ApiError, FeedParams};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/sync", post(sync))
}

/// POST /api/sync?url=...&timeout=... - Convert a feed and sync trips and events
///
/// Answers 200 only when both tables synced; the report is returned either way.
async fn sync(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<SyncReport>), ApiError> {
    let (url, timeout) = params.validate(state.default_timeout())?;
    let token = bearer_token(&headers)?;

    let converted = convert_feed(&url, timeout).await?;
    let rows = map_rows(&converted.events);

    let config = state.config();
    let trips = HttpTable::new(
        &config.table_api_url,
        &config.trips_table,
        token,
        timeout.duration(),
    )?;
    let events = HttpTable::new(
        &config.table_api_url,
        &config.events_table,
        token,
        timeout.duration(),
    )?;

    tracing::debug!(
        %url,
        trips = rows.trips.len(),
        events = rows.events.len(),
        "Syncing rows"
    );
    let report = state.engine().sync_all(&trips, &events, &rows).await;

    let status = if report.success {
        StatusCode::OK
    } else {
        tracing::error!(
            trips = %report.trips.message,
            events = %report.events.message,
            "Sync failed"
        );
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Ok((status, Json(report)))
}

/// Extract the token from `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Result<&str, TripCalError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(TripCalError::MissingCredential)
}
