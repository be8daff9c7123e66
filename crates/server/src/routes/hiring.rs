use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::AppResult;
use crate::models::{AuthUser, CreateHiringRequest, HiringDirection, HiringRequest, HiringStatusResponse};
use crate::social::hiring;
use crate::AppState;

#[derive(Deserialize)]
pub struct HiringListQuery {
    pub direction: Option<HiringDirection>,
}

/// POST /api/hiring
pub async fn create_request(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(body): Json<CreateHiringRequest>,
) -> AppResult<Json<HiringRequest>> {
    let request = hiring::hire(
        &state,
        &user,
        &body.architect_id,
        &body.message,
        body.post_id.as_deref(),
    )
    .await?;
    Ok(Json(request))
}

/// GET /api/hiring?direction=incoming|outgoing
///
/// Defaults to the direction matching the caller's role.
pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<HiringListQuery>,
) -> AppResult<Json<Vec<HiringRequest>>> {
    let direction = query.direction.unwrap_or(match user.role {
        crate::models::Role::Architect => HiringDirection::Incoming,
        crate::models::Role::Homeowner => HiringDirection::Outgoing,
    });
    Ok(Json(hiring::list_requests(&state.db, &user, direction).await?))
}

/// GET /api/hiring/status/{architectId}
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(architect_id): Path<String>,
) -> AppResult<Json<HiringStatusResponse>> {
    let status = hiring::get_hiring_status(&state.db, &user.id, &architect_id).await?;
    Ok(Json(HiringStatusResponse {
        status,
        hired: status.is_some_and(|s| s.counts_as_hired()),
    }))
}

/// POST /api/hiring/{requestId}/accept
pub async fn accept(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(request_id): Path<String>,
) -> AppResult<Json<HiringRequest>> {
    Ok(Json(hiring::accept(&state, &request_id, &user).await?))
}

/// POST /api/hiring/{requestId}/reject
pub async fn reject(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(request_id): Path<String>,
) -> AppResult<Json<HiringRequest>> {
    Ok(Json(hiring::reject(&state, &request_id, &user).await?))
}

/// POST /api/hiring/{requestId}/complete
pub async fn complete(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(request_id): Path<String>,
) -> AppResult<Json<HiringRequest>> {
    Ok(Json(hiring::complete(&state, &request_id, &user).await?))
}
