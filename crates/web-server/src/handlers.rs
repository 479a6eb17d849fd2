use crate::{error::AppError, AppState};
use axum::{extract::State, http::StatusCode};
use core_types::parse_events;
use std::sync::Arc;

/// # POST /event
/// Accepts a plain-text body of `timestamp,x,y` lines.
///
/// Malformed lines are dropped. The request is rejected only when no line parses.
pub async fn post_events(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<StatusCode, AppError> {
    let now = state.clock.now_millis();

    let mut events = Vec::new();
    let mut dropped = 0usize;
    for result in parse_events(&body) {
        match result {
            Ok(event) => events.push(event),
            Err(_) => dropped += 1,
        }
    }

    if events.is_empty() {
        return Err(AppError::InvalidEvent(body));
    }
    if dropped > 0 {
        tracing::debug!(dropped, accepted = events.len(), "Dropped malformed event lines.");
    }

    state.aggregator.add_events(events, now);
    Ok(StatusCode::ACCEPTED)
}

/// # GET /stats
/// Returns `total,sum_x,avg_x,sum_y,avg_y` for the events currently in the window.
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<String, AppError> {
    let now = state.clock.now_millis();
    let stats = state.aggregator.snapshot(now)?;
    Ok(stats.to_plain_text())
}
