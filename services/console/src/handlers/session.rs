use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nexza_domain::id::IdentityId;
use nexza_domain::window::SESSION_CHECK_INTERVAL_SECS;
use nexza_session_types::cookie::{clear_session_cookie, set_session_cookie};
use nexza_session_types::device::is_mobile;

use crate::domain::types::UserProfile;
use crate::error::GateRejection;
use crate::handlers::extract::Session;
use crate::state::AppState;
use crate::usecase::auth::{AuthMode, CompleteAuthInput, CompleteAuthUseCase};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub identity_id: IdentityId,
    pub email: String,
    pub is_admin: bool,
    pub mobile: bool,
    #[serde(serialize_with = "nexza_core::serde::to_rfc3339_ms")]
    pub started_at: DateTime<Utc>,
    /// Seconds left before the mobile ceiling signs the session out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_secs: Option<i64>,
    /// How often clients should call `GET /auth/session`.
    pub check_interval_secs: u64,
    pub profile: UserProfile,
}

// ── POST /auth/session ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    pub email: String,
    pub password: String,
    pub code: String,
    #[serde(default)]
    pub mode: AuthMode,
    #[serde(default)]
    pub username: Option<String>,
}

pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(body): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, GateRejection> {
    let mobile = is_mobile(&headers);
    let usecase = CompleteAuthUseCase {
        codes: state.verification_code_repo(),
        provider: state.identity.clone(),
        users: state.user_repo(),
        usernames: state.username_repo(),
        clock: state.clock.clone(),
        admins: state.admins.clone(),
        session_secret: state.session_secret.clone(),
    };

    let out = usecase
        .execute(CompleteAuthInput {
            email: body.email,
            password: body.password,
            code: body.code,
            mode: body.mode,
            username: body.username,
            mobile,
        })
        .await
        .map_err(|error| GateRejection {
            error,
            cookie_domain: state.cookie_domain.clone(),
        })?;

    let jar = set_session_cookie(jar, out.session_token, state.cookie_domain.clone());
    let body = SessionResponse {
        identity_id: out.profile.identity_id.clone(),
        email: out.profile.email.clone(),
        is_admin: out.is_admin,
        mobile,
        started_at: out.started_at,
        remaining_secs: None,
        check_interval_secs: SESSION_CHECK_INTERVAL_SECS,
        profile: out.profile,
    };
    Ok((StatusCode::CREATED, jar, Json(body)))
}

// ── GET /auth/session ─────────────────────────────────────────────────────────

/// Gate check; clients on mobile call this every `check_interval_secs`.
pub async fn check_session(Session(session): Session) -> Json<SessionResponse> {
    Json(SessionResponse {
        identity_id: session.identity_id,
        email: session.email,
        is_admin: session.is_admin,
        mobile: session.mobile,
        started_at: session.started_at,
        remaining_secs: session.remaining.map(|d| d.num_seconds()),
        check_interval_secs: SESSION_CHECK_INTERVAL_SECS,
        profile: session.profile,
    })
}

// ── DELETE /auth/session ──────────────────────────────────────────────────────

pub async fn delete_session(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    (StatusCode::NO_CONTENT, jar)
}
