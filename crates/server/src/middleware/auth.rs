use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use axum_extra::extract::CookieJar;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{AuthUser, Role};
use crate::AppState;

pub const SESSION_COOKIE: &str = "archlink.session_token";

/// Session token from `Authorization: Bearer` or the session cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());

    bearer
        .or_else(|| {
            CookieJar::from_headers(headers)
                .get(SESSION_COOKIE)
                .map(|c| c.value().to_string())
        })
        .filter(|t| !t.is_empty())
}

/// Resolves a session token to its user, or `None` if unknown or expired.
pub async fn resolve_session(db: &SqlitePool, token: &str) -> AppResult<Option<AuthUser>> {
    let row = sqlx::query_as::<_, (String, String, Role, String)>(
        r#"SELECT u.id, u.name, u.role, s.expires_at
           FROM "session" s
           JOIN "user" u ON u.id = s.user_id
           WHERE s.token = ?"#,
    )
    .bind(token)
    .fetch_optional(db)
    .await?;

    let Some((id, name, role, expires_at)) = row else {
        return Ok(None);
    };

    if expires_at < crate::db::now() {
        return Ok(None);
    }

    Ok(Some(AuthUser { id, name, role }))
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".into()))?;

        resolve_session(&state.db, &token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".into()))
    }
}
