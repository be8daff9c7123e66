use chrono::{SecondsFormat, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;

/// Triggers are applied one by one because their bodies contain semicolons.
const TRIGGERS: &[&str] = &[
    // Roles are permanent once the account exists.
    r#"CREATE TRIGGER IF NOT EXISTS user_role_immutable
       BEFORE UPDATE OF role ON "user"
       WHEN NEW.role <> OLD.role
       BEGIN
           SELECT RAISE(ABORT, 'role is immutable');
       END"#,
    // read_at only ever moves from NULL to a timestamp.
    r#"CREATE TRIGGER IF NOT EXISTS messages_read_at_monotonic
       BEFORE UPDATE OF read_at ON messages
       WHEN OLD.read_at IS NOT NULL AND (NEW.read_at IS NULL OR NEW.read_at <> OLD.read_at)
       BEGIN
           SELECT RAISE(IGNORE);
       END"#,
    r#"CREATE TRIGGER IF NOT EXISTS notifications_read_at_monotonic
       BEFORE UPDATE OF read_at ON notifications
       WHEN OLD.read_at IS NOT NULL AND (NEW.read_at IS NULL OR NEW.read_at <> OLD.read_at)
       BEGIN
           SELECT RAISE(IGNORE);
       END"#,
];

/// Current time in the single timestamp format used by every table.
///
/// Fixed microsecond precision keeps lexical and chronological order identical,
/// which the `ORDER BY created_at` queries rely on.
pub fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub async fn init_pool(database_path: &str) -> Result<SqlitePool, sqlx::Error> {
    // Ensure parent directory exists
    if let Some(parent) = Path::new(database_path).parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let database_url = format!("sqlite:{}?mode=rwc", database_path);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    migrate(&pool).await?;

    tracing::info!("Database initialized at {}", database_path);
    Ok(pool)
}

/// Applies the schema and triggers. Safe to run repeatedly.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    // SQLx doesn't support multi-statement queries directly
    let schema = include_str!("schema.sql");
    for statement in schema.split(';') {
        let trimmed = statement.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(pool).await?;
        }
    }

    for trigger in TRIGGERS {
        sqlx::query(trigger).execute(pool).await?;
    }

    Ok(())
}
