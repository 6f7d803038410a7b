use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use nexza_domain::id::AdminMessageId;

use crate::domain::types::{AdminMessage, UserProfile};
use crate::error::ConsoleError;
use crate::handlers::extract::Session;
use crate::state::AppState;
use crate::usecase::direct_message::{InboxUseCase, MarkReadUseCase};
use crate::usecase::profile::SetUsernameUseCase;

// ── GET /users/@me ────────────────────────────────────────────────────────────

pub async fn get_me(Session(session): Session) -> Json<UserProfile> {
    Json(session.profile)
}

// ── PATCH /users/@me ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub username: String,
}

pub async fn update_me(
    State(state): State<AppState>,
    Session(session): Session,
    Json(body): Json<UpdateMeRequest>,
) -> Result<Json<UserProfile>, ConsoleError> {
    let usecase = SetUsernameUseCase {
        users: state.user_repo(),
        usernames: state.username_repo(),
        clock: state.clock.clone(),
    };
    let profile = usecase.execute(&session.profile, &body.username).await?;
    Ok(Json(profile))
}

// ── GET /users/@me/messages ───────────────────────────────────────────────────

pub async fn list_my_messages(
    State(state): State<AppState>,
    Session(session): Session,
) -> Result<Json<Vec<AdminMessage>>, ConsoleError> {
    let usecase = InboxUseCase {
        messages: state.admin_message_repo(),
    };
    Ok(Json(usecase.execute(&session.identity_id).await?))
}

// ── PATCH /users/@me/messages/{id} ────────────────────────────────────────────

pub async fn mark_my_message_read(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<AdminMessageId>,
) -> Result<Json<AdminMessage>, ConsoleError> {
    let usecase = MarkReadUseCase {
        messages: state.admin_message_repo(),
    };
    Ok(Json(usecase.execute(&session.identity_id, id).await?))
}
