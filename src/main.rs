//! Sweet Shop API Server

use anyhow::{Context, Result};
use std::sync::Arc;
use sweetshop_backend::auth::{JwtHandler, UserStore};
use sweetshop_backend::config::Config;
use sweetshop_backend::db;
use sweetshop_backend::inventory::SweetStore;
use sweetshop_backend::server::{build_router, AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env();

    let conn = db::open(&config.database_path).context("Failed to open database")?;
    info!("Database initialized at: {}", config.database_path);

    let users = UserStore::new(conn.clone());
    users
        .seed_admin(&config.admin_password)
        .context("Failed to seed admin user")?;

    let sweets = SweetStore::new(conn);
    let jwt = Arc::new(JwtHandler::new(
        config.jwt_secret.clone(),
        config.token_ttl_hours,
    ));

    let app = build_router(AppState { users, sweets, jwt });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Sweet shop API listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
