use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use nexza_domain::id::IdentityId;

use crate::domain::types::{UserFilter, UserProfile, UserStats};
use crate::error::ConsoleError;
use crate::handlers::extract::AdminSession;
use crate::state::AppState;
use crate::usecase::moderation::{
    DeleteUserUseCase, GetUserUseCase, ListUsersInput, ListUsersUseCase, SetBanUseCase,
};

// ── GET /admin/users ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListUsersQuery {
    pub search: Option<String>,
    #[serde(default)]
    pub filter: UserFilter,
}

#[derive(Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserProfile>,
    pub stats: UserStats,
}

pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ListUsersResponse>, ConsoleError> {
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let out = usecase
        .execute(ListUsersInput {
            search: query.search,
            filter: query.filter,
        })
        .await?;
    Ok(Json(ListUsersResponse {
        users: out.users,
        stats: out.stats,
    }))
}

// ── GET /admin/users/{id} ─────────────────────────────────────────────────────

pub async fn get_user(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>, ConsoleError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
    };
    Ok(Json(usecase.execute(&IdentityId(id)).await?))
}

// ── DELETE /admin/users/{id} ──────────────────────────────────────────────────

pub async fn delete_user(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ConsoleError> {
    let usecase = DeleteUserUseCase {
        users: state.user_repo(),
        usernames: state.username_repo(),
    };
    usecase.execute(&IdentityId(id), &admin.email).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST / DELETE /admin/users/{id}/ban ───────────────────────────────────────

pub async fn ban_user(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ConsoleError> {
    set_ban(&state, &admin.email, id, true).await
}

pub async fn unban_user(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<String>,
) -> Result<StatusCode, ConsoleError> {
    set_ban(&state, &admin.email, id, false).await
}

async fn set_ban(
    state: &AppState,
    actor: &str,
    id: String,
    banned: bool,
) -> Result<StatusCode, ConsoleError> {
    let usecase = SetBanUseCase {
        users: state.user_repo(),
        clock: state.clock.clone(),
    };
    usecase.execute(&IdentityId(id), banned, actor).await?;
    Ok(StatusCode::NO_CONTENT)
}
