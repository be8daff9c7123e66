use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Error type shared by the social operations and the HTTP handlers.
///
/// Store failures are classified on conversion from [`sqlx::Error`] so callers
/// can react to the kind (a uniqueness conflict on like/save is a success, for
/// instance) instead of treating every failure alike.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("{0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(entity: &'static str) -> Self {
        AppError::NotFound { entity }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Conflict(_))
    }

    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            AppError::NotFound { entity } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} not found"),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Unavailable(msg) => {
                tracing::error!(error = %msg, "Store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "UNAVAILABLE",
                    "Service temporarily unavailable".to_string(),
                )
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        }
    }

    /// Message safe to show to the acting user (internal causes are hidden).
    pub fn public_message(&self) -> String {
        self.parts().2
    }
}

/// SQLite extended result code for `RAISE(ABORT, ...)` inside a trigger.
const SQLITE_CONSTRAINT_TRIGGER: &str = "1811";

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::not_found("Row"),
            sqlx::Error::Database(ref db_err) => {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("Duplicate value violates a unique constraint".into());
                }
                if db_err.is_check_violation() {
                    return AppError::Validation("Value violates a store constraint".into());
                }
                if db_err.code().as_deref() == Some(SQLITE_CONSTRAINT_TRIGGER) {
                    return AppError::Conflict(db_err.message().to_string());
                }
                AppError::Database(err)
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::Unavailable(err.to_string())
            }
            other => AppError::Database(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        (
            status,
            Json(serde_json::json!({
                "error": message,
                "code": code,
            })),
        )
            .into_response()
    }
}
