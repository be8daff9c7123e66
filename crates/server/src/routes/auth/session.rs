use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{token_from_headers, SESSION_COOKIE};
use crate::models::{SessionResponse, SessionUser, SignInRequest};
use crate::AppState;

use super::{create_session, session_cookie};

/// POST /api/auth/sign-in/email
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignInRequest>,
) -> AppResult<impl IntoResponse> {
    use argon2::PasswordVerifier;

    let email = body.email.trim().to_lowercase();
    let invalid = || AppError::Unauthorized("Invalid credentials".into());

    let user = sqlx::query_as::<_, SessionUser>(
        r#"SELECT id, email, name, role, image FROM "user" WHERE email = ?"#,
    )
    .bind(&email)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(invalid)?;

    let stored_hash = sqlx::query_scalar::<_, Option<String>>(
        r#"SELECT password FROM "account" WHERE user_id = ? AND provider_id = 'credential'"#,
    )
    .bind(&user.id)
    .fetch_optional(&state.db)
    .await?
    .flatten()
    .ok_or_else(invalid)?;

    let parsed_hash = argon2::PasswordHash::new(&stored_hash)
        .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {e}")))?;

    if argon2::Argon2::default()
        .verify_password(body.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        tracing::debug!(user = %user.id, "Password mismatch");
        return Err(invalid());
    }

    let token = create_session(&state.db, &user.id, state.config.session_ttl_days).await?;
    let cookie = session_cookie(&token, state.config.session_ttl_days)?;

    Ok((
        cookie,
        Json(SessionResponse {
            user,
            token: Some(token),
        }),
    ))
}

/// POST /api/auth/sign-out
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    if let Some(token) = token_from_headers(&headers) {
        sqlx::query(r#"DELETE FROM "session" WHERE token = ?"#)
            .bind(&token)
            .execute(&state.db)
            .await?;
    }

    let cookie = format!("{SESSION_COOKIE}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0");
    let mut resp_headers = HeaderMap::new();
    resp_headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| AppError::Internal(e.to_string()))?,
    );

    Ok((resp_headers, Json(serde_json::json!({}))))
}

/// GET /api/auth/get-session
///
/// Returns `null` rather than 401 when there is no valid session.
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> AppResult<Json<Option<SessionResponse>>> {
    let Some(token) = token_from_headers(&headers) else {
        return Ok(Json(None));
    };

    let user = sqlx::query_as::<_, SessionUser>(
        r#"SELECT u.id, u.email, u.name, u.role, u.image
           FROM "session" s
           JOIN "user" u ON u.id = s.user_id
           WHERE s.token = ? AND s.expires_at > ?"#,
    )
    .bind(&token)
    .bind(crate::db::now())
    .fetch_optional(&state.db)
    .await?;

    Ok(Json(user.map(|user| SessionResponse { user, token: None })))
}
