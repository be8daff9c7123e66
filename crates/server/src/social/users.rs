use sqlx::SqlitePool;
use std::collections::HashMap;

use archlink_shared::validation;

use crate::error::{AppError, AppResult};
use crate::models::{AuthUser, Role, UpdateUserRequest, UserProfile, UserSummary};

pub async fn fetch_summary(db: &SqlitePool, user_id: &str) -> AppResult<UserSummary> {
    sqlx::query_as::<_, UserSummary>(
        r#"SELECT id, name, role, image, location FROM "user" WHERE id = ?"#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::not_found("User"))
}

/// Batch profile lookup. Result follows the order of `ids`; unknown ids are skipped.
pub async fn fetch_summaries(db: &SqlitePool, ids: &[String]) -> AppResult<Vec<UserSummary>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders: Vec<&str> = ids.iter().map(|_| "?").collect();
    let sql = format!(
        r#"SELECT id, name, role, image, location FROM "user" WHERE id IN ({})"#,
        placeholders.join(",")
    );
    let mut query = sqlx::query_as::<_, UserSummary>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    let rows = query.fetch_all(db).await?;

    let mut by_id: HashMap<String, UserSummary> =
        rows.into_iter().map(|u| (u.id.clone(), u)).collect();
    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

pub async fn get_profile(db: &SqlitePool, user_id: &str) -> AppResult<UserProfile> {
    sqlx::query_as::<_, UserProfile>(
        r#"SELECT u.id, u.name, u.role, u.image, u.location, u.created_at,
                  (SELECT COUNT(*) FROM follows WHERE following_id = u.id) AS follower_count,
                  (SELECT COUNT(*) FROM follows WHERE follower_id = u.id) AS following_count
           FROM "user" u
           WHERE u.id = ?"#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::not_found("User"))
}

/// Applies a partial profile update. The role is fixed at sign-up: asking for a
/// different one is a conflict, repeating the current one is ignored.
pub async fn update_profile(
    db: &SqlitePool,
    user: &AuthUser,
    body: UpdateUserRequest,
) -> AppResult<UserProfile> {
    if let Some(ref requested) = body.role {
        let requested: Role = requested.parse().map_err(AppError::Validation)?;
        if requested != user.role {
            return Err(AppError::Conflict("Role cannot be changed after sign-up".into()));
        }
    }

    if let Some(ref name) = body.name {
        validation::validate_display_name(name).map_err(AppError::Validation)?;
    }

    let UpdateUserRequest { image, location, .. } = body;
    if let Some(Some(ref loc)) = location {
        validation::validate_location(loc).map_err(AppError::Validation)?;
    }
    if let Some(Some(ref img)) = image {
        if img.len() > 5_000_000 {
            return Err(AppError::Validation("Image too large (max ~4MB)".into()));
        }
    }

    let now = crate::db::now();

    if let Some(ref name) = body.name {
        sqlx::query(r#"UPDATE "user" SET name = ?, updated_at = ? WHERE id = ?"#)
            .bind(name.trim())
            .bind(&now)
            .bind(&user.id)
            .execute(db)
            .await?;
    }

    if let Some(image) = image {
        sqlx::query(r#"UPDATE "user" SET image = ?, updated_at = ? WHERE id = ?"#)
            .bind(image)
            .bind(&now)
            .bind(&user.id)
            .execute(db)
            .await?;
    }

    if let Some(location) = location {
        sqlx::query(r#"UPDATE "user" SET location = ?, updated_at = ? WHERE id = ?"#)
            .bind(location.map(|l| l.trim().to_string()))
            .bind(&now)
            .bind(&user.id)
            .execute(db)
            .await?;
    }

    get_profile(db, &user.id).await
}
