use sqlx::SqlitePool;

use crate::error::{AppError, AppResult};
use crate::models::{AuthUser, FollowState, NotificationKind, Relationship, Role, UserSummary};
use crate::AppState;

use super::{hiring, notifications, users};

/// Inserts the follow edge and notifies the target. Following twice is a
/// no-op: the unique (follower, following) pair means the second insert
/// changes nothing and no second notification goes out.
pub async fn follow(state: &AppState, follower: &AuthUser, target_id: &str) -> AppResult<FollowState> {
    if follower.id == target_id {
        return Err(AppError::Validation("You cannot follow yourself".into()));
    }
    users::fetch_summary(&state.db, target_id).await?;

    let result = sqlx::query(
        r#"INSERT INTO follows (id, follower_id, following_id, created_at)
           VALUES (?, ?, ?, ?)
           ON CONFLICT(follower_id, following_id) DO NOTHING"#,
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(&follower.id)
    .bind(target_id)
    .bind(crate::db::now())
    .execute(&state.db)
    .await?;

    let changed = result.rows_affected() > 0;
    if changed {
        tracing::info!(follower = %follower.id, target = %target_id, "Follow created");
        notifications::notify(
            state,
            target_id,
            NotificationKind::Follow,
            &format!("{} started following you", follower.name),
            Some(&follower.id),
        )
        .await?;
    } else {
        tracing::debug!(follower = %follower.id, target = %target_id, "Already following");
    }

    Ok(FollowState {
        following: true,
        changed,
        follower_count: follower_count(&state.db, target_id).await?,
    })
}

/// Removes the edge if present. Never notifies.
pub async fn unfollow(db: &SqlitePool, follower_id: &str, target_id: &str) -> AppResult<FollowState> {
    let result = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND following_id = ?")
        .bind(follower_id)
        .bind(target_id)
        .execute(db)
        .await?;

    Ok(FollowState {
        following: false,
        changed: result.rows_affected() > 0,
        follower_count: follower_count(db, target_id).await?,
    })
}

pub async fn is_following(db: &SqlitePool, follower_id: &str, target_id: &str) -> AppResult<bool> {
    let exists = sqlx::query_scalar::<_, i64>(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = ? AND following_id = ?)",
    )
    .bind(follower_id)
    .bind(target_id)
    .fetch_one(db)
    .await?;

    Ok(exists != 0)
}

pub async fn follower_count(db: &SqlitePool, user_id: &str) -> AppResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE following_id = ?")
        .bind(user_id)
        .fetch_one(db)
        .await?;
    Ok(count)
}

pub async fn following_count(db: &SqlitePool, user_id: &str) -> AppResult<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE follower_id = ?")
        .bind(user_id)
        .fetch_one(db)
        .await?;
    Ok(count)
}

/// Users that `user_id` follows, most recent first.
pub async fn list_following(db: &SqlitePool, user_id: &str) -> AppResult<Vec<UserSummary>> {
    let ids = sqlx::query_scalar::<_, String>(
        "SELECT following_id FROM follows WHERE follower_id = ? ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    users::fetch_summaries(db, &ids).await
}

/// Users following `user_id`, most recent first.
pub async fn list_followers(db: &SqlitePool, user_id: &str) -> AppResult<Vec<UserSummary>> {
    let ids = sqlx::query_scalar::<_, String>(
        "SELECT follower_id FROM follows WHERE following_id = ? ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;

    users::fetch_summaries(db, &ids).await
}

/// Everything a profile page needs about the viewer's relation to `target_id`.
pub async fn relationship(db: &SqlitePool, viewer: &AuthUser, target_id: &str) -> AppResult<Relationship> {
    let target = users::fetch_summary(db, target_id).await?;

    let hiring_status = match (viewer.role, target.role) {
        (Role::Homeowner, Role::Architect) => {
            hiring::get_hiring_status(db, &viewer.id, &target.id).await?
        }
        (Role::Architect, Role::Homeowner) => {
            hiring::get_hiring_status(db, &target.id, &viewer.id).await?
        }
        _ => None,
    };

    Ok(Relationship {
        following: is_following(db, &viewer.id, target_id).await?,
        followed_by: is_following(db, target_id, &viewer.id).await?,
        follower_count: follower_count(db, target_id).await?,
        following_count: following_count(db, target_id).await?,
        hired: hiring_status.is_some_and(|s| s.counts_as_hired()),
        hiring_status,
    })
}
