//! Connect Companion - menu-driven support bot
//!
//! Receives chat platform events over a webhook, walks each conversation
//! through a fixed support menu and keeps per-conversation state in an
//! expiring key-value store.

mod api;
mod config;
mod db;
mod gateway;
mod runtime;
mod state_machine;

use api::{create_router, AppState};
use config::Config;
use db::Database;
use gateway::HttpGateway;
use runtime::{DatabaseSessionStore, SessionLifecycle};
use state_machine::ChatContext;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "connect_companion=info,tower_http=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = Config::from_env();

    // Ensure database directory exists
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %config.db_path.display(), "Opening session store");
    let db = Database::open(&config.db_path)?;
    spawn_purge_task(db.clone(), config.purge_interval);

    if !config.files_dir.is_dir() {
        tracing::warn!(
            files_dir = %config.files_dir.display(),
            "Documents directory does not exist; document delivery will fail"
        );
    }

    let gateway = HttpGateway::new(
        &config.gateway_url,
        config.gateway_token.clone(),
        config.gateway_timeout,
    )?;
    tracing::info!(url = %config.gateway_url, "Messaging gateway configured");

    let lifecycle = SessionLifecycle::new(
        ChatContext::new(config.files_dir.clone()),
        Arc::new(DatabaseSessionStore::new(db, config.session_ttl)),
        Arc::new(gateway),
    );
    let state = AppState::new(lifecycle, config.worker_idle_timeout);

    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Connect Companion listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drop expired sessions from the store
fn spawn_purge_task(db: Database, interval: std::time::Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(std::time::Duration::from_secs(1)));
        loop {
            ticker.tick().await;
            match db.purge_expired() {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "Purged expired sessions"),
                Err(e) => tracing::warn!(error = %e, "Failed to purge expired sessions"),
            }
        }
    });
}
