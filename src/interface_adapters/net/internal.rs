use crate::interface_adapters::http::ErrorResponse;
use crate::interface_adapters::state::AppState;

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;

/// Latest serialized snapshot, or 503 until the first frame exists.
pub async fn state_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let latest = state.game.world_latest_tx.borrow().clone();
    if latest.is_empty() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "no snapshot yet".to_string(),
            }),
        )
            .into_response();
    }

    (
        [(header::CONTENT_TYPE, "application/json")],
        latest.as_str().to_owned(),
    )
        .into_response()
}
