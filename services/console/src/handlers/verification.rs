use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nexza_domain::window::CODE_TTL_SECS;

use crate::error::ConsoleError;
use crate::state::AppState;
use crate::usecase::verification::{CheckCodeUseCase, IssueCodeUseCase};

// ── POST /auth/code ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct IssueCodeRequest {
    pub email: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCodeResponse {
    pub email: String,
    #[serde(serialize_with = "nexza_core::serde::to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
    #[serde(serialize_with = "nexza_core::serde::to_rfc3339_ms")]
    pub resend_available_at: DateTime<Utc>,
    pub code_ttl_secs: i64,
}

pub async fn issue_code(
    State(state): State<AppState>,
    Json(body): Json<IssueCodeRequest>,
) -> Result<(StatusCode, Json<IssueCodeResponse>), ConsoleError> {
    let usecase = IssueCodeUseCase {
        codes: state.verification_code_repo(),
        notifier: state.notifier,
        clock: state.clock.clone(),
    };
    let issued = usecase.execute(&body.email).await?;

    Ok((
        StatusCode::CREATED,
        Json(IssueCodeResponse {
            email: issued.subject,
            expires_at: issued.expires_at,
            resend_available_at: issued.resend_available_at,
            code_ttl_secs: CODE_TTL_SECS,
        }),
    ))
}

// ── POST /auth/code/verify ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeResponse {
    pub valid: bool,
    #[serde(serialize_with = "nexza_core::serde::to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
}

/// Checks the code without consuming it or opening a session.
pub async fn verify_code(
    State(state): State<AppState>,
    Json(body): Json<VerifyCodeRequest>,
) -> Result<Json<VerifyCodeResponse>, ConsoleError> {
    let usecase = CheckCodeUseCase {
        codes: state.verification_code_repo(),
        clock: state.clock.clone(),
    };
    let checked = usecase.execute(&body.email, &body.code).await?;
    Ok(Json(VerifyCodeResponse {
        valid: true,
        expires_at: checked.expires_at,
    }))
}
