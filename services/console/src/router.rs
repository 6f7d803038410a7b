use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use tower_http::trace::TraceLayer;

use nexza_core::health::healthz;
use nexza_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    admin::{ban_user, delete_user, get_user, list_users, unban_user},
    announcements::{create_announcement, delete_announcement, feed, list_announcements},
    health::readyz,
    messages::{
        compose_direct_message, delete_message, list_messages, submit_contact,
        update_message_status,
    },
    profile::{get_me, list_my_messages, mark_my_message_read, update_me},
    session::{check_session, create_session, delete_session},
    verification::{issue_code, verify_code},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Verification codes
        .route("/auth/code", post(issue_code))
        .route("/auth/code/verify", post(verify_code))
        // Session
        .route(
            "/auth/session",
            get(check_session).post(create_session).delete(delete_session),
        )
        // Self
        .route("/users/@me", get(get_me).patch(update_me))
        .route("/users/@me/messages", get(list_my_messages))
        .route("/users/@me/messages/{id}", patch(mark_my_message_read))
        // Public surfaces
        .route("/announcements", get(feed))
        .route("/contact", post(submit_contact))
        // Moderation
        .route("/admin/users", get(list_users))
        .route("/admin/users/{id}", get(get_user).delete(delete_user))
        .route("/admin/users/{id}/ban", post(ban_user).delete(unban_user))
        .route("/admin/messages", get(list_messages))
        .route(
            "/admin/messages/{id}",
            patch(update_message_status).delete(delete_message),
        )
        .route("/admin/direct-messages", post(compose_direct_message))
        .route(
            "/admin/announcements",
            get(list_announcements).post(create_announcement),
        )
        .route("/admin/announcements/{id}", delete(delete_announcement))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
