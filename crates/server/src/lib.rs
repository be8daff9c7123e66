pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod social;
pub mod ws;

use config::Config;
use std::sync::Arc;

pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub config: Config,
    pub gateway: Arc<ws::gateway::GatewayState>,
}

impl AppState {
    pub fn new(db: sqlx::SqlitePool, config: Config) -> Self {
        Self {
            db,
            config,
            gateway: Arc::new(ws::gateway::GatewayState::new()),
        }
    }
}
