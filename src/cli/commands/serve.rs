use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use crate::auth::JwtVerifier;
use crate::config::config;
use crate::database::{DatabaseManager, MemoryStore, PgStore, Store};
use crate::state::AppState;

#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    #[arg(long, help = "Serve from a seeded in-memory store instead of PostgreSQL")]
    pub in_memory: bool,

    #[arg(long, help = "Port to listen on (overrides API_PORT)")]
    pub port: Option<u16>,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let config = config();
    info!("Starting course-api in {:?} mode", config.environment);

    let verifier = JwtVerifier::from_config(&config.security).context("token verifier")?;

    let store: Arc<dyn Store> = if args.in_memory {
        warn!("Using in-memory store; data is lost on shutdown");
        Arc::new(MemoryStore::seeded())
    } else {
        let pool = DatabaseManager::connect(&config.database).await?;
        if config.database.run_migrations {
            DatabaseManager::migrate(&pool).await?;
        }
        Arc::new(PgStore::new(pool))
    };

    let state = AppState::new(store, Arc::new(verifier));
    let app = crate::app(state).layer(crate::cors_layer(&config.security));

    let port = args.port.unwrap_or(config.api.port);
    let bind_addr = format!("{}:{}", config.api.bind_address, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Listening on http://{}", bind_addr);
    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
