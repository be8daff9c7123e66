use sqlx::SqlitePool;

use archlink_shared::validation;

use crate::error::{AppError, AppResult};
use crate::models::{
    AuthUser, HireStatus, HiringDirection, HiringRequest, NotificationKind, Role,
};
use crate::ws::events::ServerEvent;
use crate::ws::gateway::Topic;
use crate::AppState;

use super::{follows, notifications, users};

/// Opens a pending request from a homeowner to an architect they follow.
///
/// At most one request per pair can be pending (partial unique index). A
/// repeated call while one is pending returns that request instead of
/// creating a duplicate. The architect learns of it through the hiring topic;
/// no inbox notification is written until the request changes state.
pub async fn hire(
    state: &AppState,
    homeowner: &AuthUser,
    architect_id: &str,
    message: &str,
    post_id: Option<&str>,
) -> AppResult<HiringRequest> {
    if homeowner.role != Role::Homeowner {
        return Err(AppError::Forbidden("Only homeowners can send hiring requests".into()));
    }
    let message = validation::validate_hire_message(message).map_err(AppError::Validation)?;
    let post_id = post_id.map(str::trim).filter(|p| !p.is_empty());

    let architect = users::fetch_summary(&state.db, architect_id).await?;
    if architect.role != Role::Architect {
        return Err(AppError::Validation("Hiring requests can only target architects".into()));
    }
    if !follows::is_following(&state.db, &homeowner.id, architect_id).await? {
        return Err(AppError::Forbidden("Follow the architect before sending a hiring request".into()));
    }

    let now = crate::db::now();
    let request = HiringRequest {
        id: uuid::Uuid::new_v4().to_string(),
        homeowner_id: homeowner.id.clone(),
        architect_id: architect.id.clone(),
        message: message.to_string(),
        post_id: post_id.map(str::to_string),
        status: HireStatus::Pending,
        created_at: now.clone(),
        updated_at: now,
    };

    let inserted = sqlx::query(
        r#"INSERT INTO hiring_requests
               (id, homeowner_id, architect_id, message, post_id, status, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&request.id)
    .bind(&request.homeowner_id)
    .bind(&request.architect_id)
    .bind(&request.message)
    .bind(&request.post_id)
    .bind(request.status)
    .bind(&request.created_at)
    .bind(&request.updated_at)
    .execute(&state.db)
    .await
    .map_err(AppError::from);

    match inserted {
        Ok(_) => {}
        Err(e) if e.is_conflict() => {
            tracing::debug!(homeowner = %homeowner.id, architect = %architect_id, "Pending request already exists");
            return pending_request(&state.db, &homeowner.id, architect_id)
                .await?
                .ok_or_else(|| AppError::Conflict("Hiring request changed concurrently".into()));
        }
        Err(e) => return Err(e),
    }

    tracing::info!(request = %request.id, homeowner = %homeowner.id, architect = %architect_id, "Hiring request created");

    publish(state, &request).await;

    Ok(request)
}

/// Status of the most recently created request for the pair, if any.
pub async fn get_hiring_status(
    db: &SqlitePool,
    homeowner_id: &str,
    architect_id: &str,
) -> AppResult<Option<HireStatus>> {
    let status = sqlx::query_scalar::<_, HireStatus>(
        r#"SELECT status FROM hiring_requests
           WHERE homeowner_id = ? AND architect_id = ?
           ORDER BY created_at DESC, rowid DESC
           LIMIT 1"#,
    )
    .bind(homeowner_id)
    .bind(architect_id)
    .fetch_optional(db)
    .await?;

    Ok(status)
}

pub async fn get_request(db: &SqlitePool, request_id: &str) -> AppResult<HiringRequest> {
    sqlx::query_as::<_, HiringRequest>("SELECT * FROM hiring_requests WHERE id = ?")
        .bind(request_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Hiring request"))
}

async fn pending_request(
    db: &SqlitePool,
    homeowner_id: &str,
    architect_id: &str,
) -> AppResult<Option<HiringRequest>> {
    let request = sqlx::query_as::<_, HiringRequest>(
        r#"SELECT * FROM hiring_requests
           WHERE homeowner_id = ? AND architect_id = ? AND status = 'pending'"#,
    )
    .bind(homeowner_id)
    .bind(architect_id)
    .fetch_optional(db)
    .await?;

    Ok(request)
}

/// Requests addressed to the caller (incoming) or sent by them (outgoing), newest first.
pub async fn list_requests(
    db: &SqlitePool,
    user: &AuthUser,
    direction: HiringDirection,
) -> AppResult<Vec<HiringRequest>> {
    let column = match direction {
        HiringDirection::Incoming => "architect_id",
        HiringDirection::Outgoing => "homeowner_id",
    };
    let sql = format!(
        "SELECT * FROM hiring_requests WHERE {} = ? ORDER BY created_at DESC, rowid DESC",
        column
    );

    let items = sqlx::query_as::<_, HiringRequest>(&sql)
        .bind(&user.id)
        .fetch_all(db)
        .await?;

    Ok(items)
}

/// Only the addressed architect may accept.
pub async fn accept(state: &AppState, request_id: &str, actor: &AuthUser) -> AppResult<HiringRequest> {
    transition(state, request_id, actor, HireStatus::Accepted).await
}

/// Only the addressed architect may reject.
pub async fn reject(state: &AppState, request_id: &str, actor: &AuthUser) -> AppResult<HiringRequest> {
    transition(state, request_id, actor, HireStatus::Rejected).await
}

/// Either participant may mark accepted work as completed.
pub async fn complete(state: &AppState, request_id: &str, actor: &AuthUser) -> AppResult<HiringRequest> {
    transition(state, request_id, actor, HireStatus::Completed).await
}

async fn transition(
    state: &AppState,
    request_id: &str,
    actor: &AuthUser,
    next: HireStatus,
) -> AppResult<HiringRequest> {
    let current = get_request(&state.db, request_id).await?;

    let allowed = match next {
        HireStatus::Accepted | HireStatus::Rejected => actor.id == current.architect_id,
        HireStatus::Completed => actor.id == current.architect_id || actor.id == current.homeowner_id,
        HireStatus::Pending => false,
    };
    if !allowed {
        return Err(AppError::Forbidden(format!(
            "You cannot mark this request as {}",
            next.as_str()
        )));
    }

    if !current.status.can_transition_to(next) {
        return Err(AppError::Conflict(format!(
            "Cannot move a {} request to {}",
            current.status.as_str(),
            next.as_str()
        )));
    }

    // Compare-and-set on the status read above.
    let result = sqlx::query(
        "UPDATE hiring_requests SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
    )
    .bind(next)
    .bind(crate::db::now())
    .bind(request_id)
    .bind(current.status)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::Conflict("Hiring request changed concurrently".into()));
    }

    let updated = get_request(&state.db, request_id).await?;
    tracing::info!(
        request = %request_id,
        from = current.status.as_str(),
        to = next.as_str(),
        "Hiring request transitioned"
    );

    let recipient = if actor.id == updated.architect_id {
        &updated.homeowner_id
    } else {
        &updated.architect_id
    };
    notifications::notify(
        state,
        recipient,
        NotificationKind::HireUpdate,
        &format!("{} marked your hiring request as {}", actor.name, next.as_str()),
        Some(&updated.id),
    )
    .await?;
    publish(state, &updated).await;

    Ok(updated)
}

async fn publish(state: &AppState, request: &HiringRequest) {
    let event = ServerEvent::HiringRequestUpdated {
        request: request.clone(),
    };
    state
        .gateway
        .publish(&Topic::hiring(&request.homeowner_id), &event)
        .await;
    state
        .gateway
        .publish(&Topic::hiring(&request.architect_id), &event)
        .await;
}
