mod config;
mod db;
mod errors;
mod models;
mod records;
mod routes;
mod state;
mod store;
mod tags;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::{AppState, Stores};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job tracker API v{}", env!("CARGO_PKG_VERSION"));

    // Resolve every registered record schema up front so malformed field
    // metadata aborts startup instead of the first request.
    let registered = store::schema::check_registered();
    info!("Registered {registered} record schemas");

    // Initialize PostgreSQL and run migrations
    let pool = create_pool(&config.database_url).await?;

    // Build app state (stores generate their SQL once, here)
    let state = AppState {
        db: pool.clone(),
        stores: Arc::new(Stores::new(&pool)),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
