//! Read-only feed conversion

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use tripcal_core::{ConvertedCalendar, convert_feed};

use crate::routes::{ApiError, FeedParams};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/convert", get(convert))
}

/// GET /api/convert?url=...&timeout=... - Convert a feed to the JSON event graph
async fn convert(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> Result<Json<ConvertedCalendar>, ApiError> {
    let (url, timeout) = params.validate(state.default_timeout())?;

    let converted = convert_feed(&url, timeout).await?;
    tracing::debug!(
        %url,
        top_level = converted.event_count,
        total = converted.total_events,
        "Converted feed"
    );

    Ok(Json(converted))
}
