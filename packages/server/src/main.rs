use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{Level, info};

use common::store::memory::MemoryStore;
use server::config::AppConfig;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let store = Arc::new(MemoryStore::new());
    server::seed::seed_default_quota(store.as_ref(), &config.quota).await?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let state = AppState::new(store, Arc::new(config));
    let app = server::build_router(state);

    info!("Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
