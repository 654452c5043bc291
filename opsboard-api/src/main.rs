//! # Opsboard API Server
//!
//! Role-based task assignment service: local and federated sign-in,
//! signed cookie sessions, and Admin-gated user/task management.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p opsboard-api
//! ```

use std::sync::Arc;

use opsboard_api::{
    app::{build_router, AppState},
    config::Config,
};
use opsboard_shared::db::pool::{create_pool, DatabaseConfig};
use opsboard_shared::store::postgres::PgStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "opsboard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Opsboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    let store = Arc::new(PgStore::new(pool));
    let state = AppState::new(store.clone(), store, config.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Server listening on http://{}", config.bind_address());

    axum::serve(listener, app).await?;

    Ok(())
}
