use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON body shared by every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub kind: &'a str,
    pub message: String,
}

/// Render `{"kind": ..., "message": ...}` with the given status.
pub fn json_error(status: StatusCode, kind: &str, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        kind,
        message: message.into(),
    };
    (status, axum::Json(body)).into_response()
}
