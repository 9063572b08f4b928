pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use error::CatalogError;

// Export logic types
pub use logic::{
    compute_aggregate, filter_grants, filter_patents, grant_stats, patent_stats, EditorMode,
    LedgerEditor, ValidationError,
};

// Export all model types
pub use model::*;

// Export store types
pub use store::{EditSessionCache, MemoryStore, Store};

use std::sync::Arc;
use std::time::Duration;

use crate::api::handlers::{AppState, SharedState};
use crate::config::AppConfig;

/// Build the shared state for a store: edit sessions expire after the
/// configured idle time.
pub fn build_state<S: Store + 'static>(store: Arc<S>, config: &AppConfig) -> SharedState<S> {
    Arc::new(AppState::new(
        store,
        EditSessionCache::new(config.session_ttl()),
        config.reporting_year(),
    ))
}

/// Periodically drop edit sessions nobody has touched within the TTL.
pub fn spawn_session_sweeper(sessions: Arc<EditSessionCache>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let evicted = sessions.clear_expired().await;
            if evicted > 0 {
                log::info!("Discarded {} idle funding edit sessions", evicted);
            }
        }
    });
}

/// Start the HTTP server with an in-memory store.
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    use axum::serve;
    use tokio::net::TcpListener;

    let store = Arc::new(MemoryStore::new());

    if config.catalog.load_seed_data {
        log::info!("Loading seed data...");
        seed::load_seed_data(&*store).await?;
    }

    let state = build_state(store, &config);
    spawn_session_sweeper(state.sessions.clone(), Duration::from_secs(60));

    let app = api::routes::build_app(state);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("R&D catalog server running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
