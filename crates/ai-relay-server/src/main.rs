//! Service entry point.

use std::{net::SocketAddr, sync::Arc};

use ai_relay_core::Relay;
use ai_relay_server::{AppState, build_app, storage::PostStorage};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Connection string for the relational store.
// TODO: take this from deployment config once there is more than one
// deployment to configure.
#[cfg(feature = "sqlite")]
const DATABASE_URL: &str = "sqlite://ai_relay.db?mode=rwc";

#[cfg(feature = "sqlite")]
async fn open_storage() -> anyhow::Result<Arc<dyn PostStorage>> {
    use ai_relay_server::storage::SqliteStorage;
    Ok(Arc::new(SqliteStorage::new(DATABASE_URL).await?))
}

#[cfg(not(feature = "sqlite"))]
async fn open_storage() -> anyhow::Result<Arc<dyn PostStorage>> {
    use ai_relay_server::storage::MemoryStorage;
    Ok(Arc::new(MemoryStorage::new()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let state = AppState {
        relay: Arc::new(Relay::default()),
        storage: open_storage().await?,
    };
    let app = build_app(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 8000));
    tracing::info!("Server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
