use archlink_server::{config::Config, db, routes, AppState};
use archlink_shared::constants::APP_NAME;
use axum::http::{HeaderName, Method};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "archlink_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env();

    let pool = db::init_pool(&config.database_path)
        .await
        .expect("Failed to initialize database");

    let state = Arc::new(AppState::new(pool, config.clone()));

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::mirror_request())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("cookie"),
            HeaderName::from_static("authorization"),
        ])
        .allow_credentials(true);

    let app = routes::build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    );

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind");

    tracing::info!("{} server running on {}", APP_NAME, addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
