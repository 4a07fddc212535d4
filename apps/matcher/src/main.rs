mod config;
mod db;
mod errors;
mod matching;
mod models;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::db::create_pool;
use crate::matching::skill_gap::ResourceCatalog;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{InMemoryRecordStore, PgRecordStore, RecordStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting placement matcher v{}", env!("CARGO_PKG_VERSION"));

    let store = build_store(&config).await?;
    let resources = Arc::new(load_resources(&config));
    info!("Resource catalog loaded ({} skills)", resources.len());

    let state = AppState {
        store,
        resources,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the host application

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Postgres when `DATABASE_URL` is set, otherwise the seed file, otherwise nothing.
async fn build_store(config: &Config) -> Result<Arc<dyn RecordStore>> {
    if let Some(url) = &config.database_url {
        let pool = create_pool(url).await?;
        info!("Using PostgreSQL record store");
        return Ok(Arc::new(PgRecordStore::new(pool)));
    }

    let Some(path) = &config.seed_path else {
        warn!("Neither DATABASE_URL nor SEED_PATH is set; starting with an empty record store");
        return Ok(Arc::new(InMemoryRecordStore::default()));
    };

    match InMemoryRecordStore::from_path(path) {
        Ok(store) => {
            let (candidates, postings) = store.counts();
            info!("Using in-memory record store: {candidates} candidates, {postings} postings");
            Ok(Arc::new(store))
        }
        Err(e) => {
            warn!("Could not load seed file, starting empty: {e:#}");
            Ok(Arc::new(InMemoryRecordStore::default()))
        }
    }
}

/// The configured catalog, falling back to the built-in one if it cannot be read.
fn load_resources(config: &Config) -> ResourceCatalog {
    let Some(path) = &config.resource_catalog_path else {
        return ResourceCatalog::builtin();
    };
    ResourceCatalog::from_path(path).unwrap_or_else(|e| {
        warn!("Could not load resource catalog, using built-in: {e:#}");
        ResourceCatalog::builtin()
    })
}
