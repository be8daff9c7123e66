use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::error::AppResult;
use crate::models::{AuthUser, FollowState, Relationship, UpdateUserRequest, UserProfile, UserSummary};
use crate::social::{follows, users};
use crate::AppState;

/// GET /api/users/me
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(users::get_profile(&state.db, &user.id).await?))
}

/// PATCH /api/users/me
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(body): Json<UpdateUserRequest>,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(users::update_profile(&state.db, &user, body).await?))
}

/// GET /api/users/{userId}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(users::get_profile(&state.db, &user_id).await?))
}

/// GET /api/users/{userId}/followers
pub async fn list_followers(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<UserSummary>>> {
    users::fetch_summary(&state.db, &user_id).await?;
    Ok(Json(follows::list_followers(&state.db, &user_id).await?))
}

/// GET /api/users/{userId}/following
pub async fn list_following(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<UserSummary>>> {
    users::fetch_summary(&state.db, &user_id).await?;
    Ok(Json(follows::list_following(&state.db, &user_id).await?))
}

/// GET /api/users/{userId}/relationship
pub async fn get_relationship(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<Relationship>> {
    Ok(Json(follows::relationship(&state.db, &user, &user_id).await?))
}

/// POST /api/users/{userId}/follow
pub async fn follow(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<FollowState>> {
    Ok(Json(follows::follow(&state, &user, &user_id).await?))
}

/// DELETE /api/users/{userId}/follow
pub async fn unfollow(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<FollowState>> {
    Ok(Json(follows::unfollow(&state.db, &user.id, &user_id).await?))
}
