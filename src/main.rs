use std::sync::Arc;

use contacts_api::{
    api,
    config::{Config, StoreKind},
    storage::{MemoryContactStore, PgContactStore, SharedStore},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contacts_api=debug,server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load();
    tracing::info!("Starting server in {} mode", config.server.environment);

    let store: SharedStore = match config.store {
        StoreKind::Postgres => {
            let pg = PgContactStore::connect(&config).await?;
            tracing::info!(
                "Connected to PostgreSQL (pool size {})",
                config.database.max_connections
            );

            // Refuse to serve against an unverified schema
            pg.migrate().await?;
            tracing::info!("DB ready (contacts table)");

            Arc::new(pg)
        }
        StoreKind::Memory => {
            tracing::warn!("Using in-memory contact store, data is lost on restart");
            Arc::new(MemoryContactStore::new())
        }
    };

    let addr = config.bind_addr();
    let state = AppState::new(store, config);
    let app = api::router::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Contacts API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
