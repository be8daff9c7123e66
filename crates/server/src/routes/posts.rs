use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::AppResult;
use crate::models::{AuthUser, CreatePostRequest, PostStats, PostWithStats};
use crate::social::interactions;
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListQuery {
    pub author_id: Option<String>,
}

/// GET /api/posts
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<PostListQuery>,
) -> AppResult<Json<Vec<PostWithStats>>> {
    let posts =
        interactions::list_posts(&state.db, query.author_id.as_deref(), Some(user.id.as_str())).await?;
    Ok(Json(posts))
}

/// POST /api/posts
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(body): Json<CreatePostRequest>,
) -> AppResult<Json<PostWithStats>> {
    Ok(Json(interactions::create_post(&state.db, &user, body).await?))
}

/// GET /api/posts/{postId}
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(post_id): Path<String>,
) -> AppResult<Json<PostWithStats>> {
    Ok(Json(interactions::get_post(&state.db, &post_id, Some(user.id.as_str())).await?))
}

/// POST /api/posts/{postId}/like
pub async fn like(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(post_id): Path<String>,
) -> AppResult<Json<PostStats>> {
    Ok(Json(interactions::like(&state, &user, &post_id).await?))
}

/// DELETE /api/posts/{postId}/like
pub async fn unlike(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(post_id): Path<String>,
) -> AppResult<Json<PostStats>> {
    Ok(Json(interactions::unlike(&state.db, &user.id, &post_id).await?))
}

/// POST /api/posts/{postId}/save
pub async fn save(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(post_id): Path<String>,
) -> AppResult<Json<PostStats>> {
    Ok(Json(interactions::save(&state.db, &user.id, &post_id).await?))
}

/// DELETE /api/posts/{postId}/save
pub async fn unsave(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(post_id): Path<String>,
) -> AppResult<Json<PostStats>> {
    Ok(Json(interactions::unsave(&state.db, &user.id, &post_id).await?))
}
