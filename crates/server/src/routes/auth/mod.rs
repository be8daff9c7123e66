mod session;

pub use session::*;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use argon2::PasswordHasher;
use archlink_shared::validation;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::SESSION_COOKIE;
use crate::models::{Role, SessionResponse, SessionUser, SignUpRequest};
use crate::AppState;

/// POST /api/auth/sign-up/email
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignUpRequest>,
) -> AppResult<impl IntoResponse> {
    let email = body.email.trim().to_lowercase();
    let name = body.name.trim().to_string();

    let email_re = regex_lite::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !email_re.is_match(&email) {
        return Err(AppError::Validation("Invalid email address".into()));
    }
    validation::validate_password(&body.password).map_err(AppError::Validation)?;
    validation::validate_display_name(&name).map_err(AppError::Validation)?;
    let role: Role = body.role.parse().map_err(AppError::Validation)?;

    let salt = argon2::password_hash::SaltString::generate(&mut rand::rngs::OsRng);
    let password_hash = argon2::Argon2::default()
        .hash_password(body.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))?
        .to_string();

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = crate::db::now();

    // User, credentials and first session land together or not at all.
    let mut tx = state.db.begin().await?;

    let inserted = sqlx::query(
        r#"INSERT INTO "user" (id, name, email, role, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&user_id)
    .bind(&name)
    .bind(&email)
    .bind(role)
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await
    .map_err(AppError::from);

    match inserted {
        Ok(_) => {}
        Err(e) if e.is_conflict() => {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        Err(e) => return Err(e),
    }

    sqlx::query(
        r#"INSERT INTO "account" (id, user_id, provider_id, password, created_at, updated_at)
           VALUES (?, ?, 'credential', ?, ?, ?)"#,
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(&user_id)
    .bind(&password_hash)
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    let token = create_session(&mut *tx, &user_id, state.config.session_ttl_days).await?;
    tx.commit().await?;
    tracing::info!(user = %user_id, role = %role, "User signed up");

    let body = SessionResponse {
        user: SessionUser {
            id: user_id,
            email,
            name,
            role,
            image: None,
        },
        token: Some(token.clone()),
    };

    Ok((session_cookie(&token, state.config.session_ttl_days)?, Json(body)))
}

/// Issues a fresh opaque session token for `user_id`.
pub(crate) async fn create_session<'e>(
    db: impl sqlx::SqliteExecutor<'e>,
    user_id: &str,
    ttl_days: i64,
) -> AppResult<String> {
    let token = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now();
    let expires_at = (now + chrono::Duration::days(ttl_days))
        .to_rfc3339_opts(chrono::SecondsFormat::Micros, true);

    sqlx::query(
        r#"INSERT INTO "session" (id, user_id, token, expires_at, created_at)
           VALUES (?, ?, ?, ?, ?)"#,
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(&token)
    .bind(&expires_at)
    .bind(crate::db::now())
    .execute(db)
    .await?;

    Ok(token)
}

fn session_cookie(token: &str, ttl_days: i64) -> AppResult<HeaderMap> {
    let cookie = format!(
        "{SESSION_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        ttl_days * 24 * 60 * 60
    );
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| AppError::Internal(e.to_string()))?,
    );
    Ok(headers)
}
