use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use gallery_server::access::{AccessGate, SystemClock};
use gallery_server::config::Settings;
use gallery_server::database::{DbPool, PgAlbumRepository};
use gallery_server::routes::build_router;
use gallery_server::state::AppState;
use gallery_server::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    telemetry::init_telemetry();

    info!("🚀 Starting gallery server...");

    // Load configuration
    let settings = Settings::load()?;
    info!("✅ Configuration loaded");

    let gate = AccessGate::new(settings.consent_secret(), Arc::new(SystemClock));
    if !gate.persistent_consent_enabled() {
        warn!("No consent secret configured; NSFW consent will last only for the session");
    }
    if settings.admin_password_hash().is_none() {
        warn!("No admin password hash configured; admin login disabled");
    }

    // Initialize database pool
    let db_pool = DbPool::new(&settings.database).await?;
    info!("✅ Database connection established");

    let state = AppState {
        settings: Arc::new(settings.clone()),
        gate: Arc::new(gate),
        albums: Arc::new(PgAlbumRepository::new(db_pool)),
    };

    let app = build_router(state);

    // Server address
    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));

    info!("🎯 Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
