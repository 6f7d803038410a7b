use axum::http::StatusCode;

/// Liveness probe for `GET /healthz`.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
