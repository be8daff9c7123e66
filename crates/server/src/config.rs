use std::env;

use archlink_shared::constants::MESSAGE_PAGE_SIZE;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub session_ttl_days: i64,
    pub message_page_size: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "./archlink.db".into()),
            session_ttl_days: env::var("SESSION_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|d| *d > 0)
                .unwrap_or(30),
            message_page_size: env::var("MESSAGE_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(MESSAGE_PAGE_SIZE),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3001,
            database_path: "./archlink.db".into(),
            session_ttl_days: 30,
            message_page_size: MESSAGE_PAGE_SIZE,
        }
    }
}
