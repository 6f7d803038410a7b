use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use nexza_domain::id::{ContactMessageId, IdentityId};

use crate::domain::types::{ContactMessage, MessageStatus};
use crate::error::ConsoleError;
use crate::handlers::extract::{AdminSession, MaybeIdentity};
use crate::state::AppState;
use crate::usecase::contact::{
    DeleteContactMessageUseCase, ListContactInput, ListContactMessagesUseCase,
    SubmitContactInput, SubmitContactUseCase, UpdateContactStatusUseCase,
};
use crate::usecase::direct_message::{ComposeDirectMessageUseCase, ComposeInput};

// ── POST /contact ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

pub async fn submit_contact(
    State(state): State<AppState>,
    MaybeIdentity(user_id): MaybeIdentity,
    Json(body): Json<ContactRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), ConsoleError> {
    let usecase = SubmitContactUseCase {
        messages: state.contact_message_repo(),
        clock: state.clock.clone(),
    };
    let message = usecase
        .execute(SubmitContactInput {
            name: body.name,
            email: body.email,
            message: body.message,
            user_id,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: message.id.to_string(),
        }),
    ))
}

// ── GET /admin/messages ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListMessagesQuery {
    pub search: Option<String>,
    /// A status name, or `all`.
    pub status: Option<String>,
}

fn parse_status_filter(raw: Option<&str>) -> Result<Option<MessageStatus>, ConsoleError> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some("waiting") => Ok(Some(MessageStatus::Waiting)),
        Some("pending") => Ok(Some(MessageStatus::Pending)),
        Some("approved") => Ok(Some(MessageStatus::Approved)),
        Some("success") => Ok(Some(MessageStatus::Success)),
        Some(other) => Err(ConsoleError::invalid_input(format!(
            "unknown message status: {other}"
        ))),
    }
}

pub async fn list_messages(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<Vec<ContactMessage>>, ConsoleError> {
    let usecase = ListContactMessagesUseCase {
        messages: state.contact_message_repo(),
    };
    let rows = usecase
        .execute(ListContactInput {
            search: query.search,
            status: parse_status_filter(query.status.as_deref())?,
        })
        .await?;
    Ok(Json(rows))
}

// ── PATCH /admin/messages/{id} ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: MessageStatus,
}

pub async fn update_message_status(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<ContactMessageId>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<ContactMessage>, ConsoleError> {
    let usecase = UpdateContactStatusUseCase {
        messages: state.contact_message_repo(),
        clock: state.clock.clone(),
    };
    Ok(Json(usecase.execute(id, body.status, &admin.email).await?))
}

// ── DELETE /admin/messages/{id} ───────────────────────────────────────────────

pub async fn delete_message(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<ContactMessageId>,
) -> Result<StatusCode, ConsoleError> {
    let usecase = DeleteContactMessageUseCase {
        messages: state.contact_message_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /admin/direct-messages ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ComposeRequest {
    pub recipients: Vec<IdentityId>,
    pub title: String,
    pub body: String,
}

#[derive(Serialize)]
pub struct ComposeResponse {
    pub sent: usize,
}

pub async fn compose_direct_message(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Json(body): Json<ComposeRequest>,
) -> Result<(StatusCode, Json<ComposeResponse>), ConsoleError> {
    let usecase = ComposeDirectMessageUseCase {
        messages: state.admin_message_repo(),
        clock: state.clock.clone(),
    };
    let sent = usecase
        .execute(
            ComposeInput {
                recipients: body.recipients,
                title: body.title,
                body: body.body,
            },
            &admin.email,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ComposeResponse { sent: sent.len() })))
}
