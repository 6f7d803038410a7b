use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

/// Handler for `GET /readyz`: the document store answers.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.store.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = ?e, "document store not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
