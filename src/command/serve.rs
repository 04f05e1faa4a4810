//! The `serve` command: run the CRUD web backend.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use crate::internal::{
    config::Config,
    db,
    service::{TaskService, UserService},
    web::{self, AppState},
};

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Listen address, overriding the configured one.
    #[arg(long)]
    pub addr: Option<String>,

    /// Database URL, overriding the configured one.
    #[arg(long)]
    pub database_url: Option<String>,
}

pub async fn execute(args: ServeArgs, config: Config) -> Result<()> {
    let database_url = args.database_url.unwrap_or(config.database.url);
    let addr = args.addr.unwrap_or(config.web.addr);

    let db = db::connect(&database_url)
        .await
        .with_context(|| format!("failed to open database {database_url}"))?;
    let state = AppState {
        users: Arc::new(UserService::new(db.clone())),
        tasks: Arc::new(TaskService::new(db)),
    };
    let app = web::router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr = %listener.local_addr()?, "web backend listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install ctrl-c handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
