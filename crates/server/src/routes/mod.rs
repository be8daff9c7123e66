pub mod auth;
pub mod conversations;
pub mod hiring;
pub mod notifications;
pub mod posts;
pub mod users;

use crate::ws;
use crate::AppState;
use axum::{routing::{get, post}, Router};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    let auth_routes = Router::new()
        .route("/sign-up/email", post(auth::sign_up))
        .route("/sign-in/email", post(auth::sign_in))
        .route("/sign-out", post(auth::sign_out))
        .route("/get-session", get(auth::get_session));

    let api_routes = Router::new()
        // Users & follows
        .route("/users/me", get(users::get_me).patch(users::update_me))
        .route("/users/{userId}", get(users::get_user))
        .route("/users/{userId}/followers", get(users::list_followers))
        .route("/users/{userId}/following", get(users::list_following))
        .route("/users/{userId}/relationship", get(users::get_relationship))
        .route("/users/{userId}/follow", post(users::follow).delete(users::unfollow))
        // Hiring
        .route("/hiring", post(hiring::create_request).get(hiring::list_requests))
        .route("/hiring/status/{architectId}", get(hiring::get_status))
        .route("/hiring/{requestId}/accept", post(hiring::accept))
        .route("/hiring/{requestId}/reject", post(hiring::reject))
        .route("/hiring/{requestId}/complete", post(hiring::complete))
        // Conversations
        .route(
            "/conversations",
            get(conversations::list_conversations).post(conversations::create_conversation),
        )
        .route("/conversations/unread-count", get(conversations::unread_count))
        .route(
            "/conversations/{conversationId}",
            get(conversations::get_conversation).patch(conversations::update_conversation),
        )
        .route(
            "/conversations/{conversationId}/messages",
            get(conversations::list_messages).post(conversations::send_message),
        )
        .route("/conversations/{conversationId}/read", post(conversations::mark_read))
        // Notifications
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/unread-count", get(notifications::unread_count))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/notifications/{notificationId}/read", post(notifications::mark_read))
        // Posts
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route("/posts/{postId}", get(posts::get_post))
        .route("/posts/{postId}/like", post(posts::like).delete(posts::unlike))
        .route("/posts/{postId}/save", post(posts::save).delete(posts::unsave));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", api_routes)
        .route("/gateway", get(ws::handler::ws_handler))
        .with_state(state)
}
