// ABOUTME: Server binary: configuration, database migration, router assembly
// ABOUTME: Serves the fitlog API over HTTP with graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitlog Contributors

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fitlog_server::auth::AuthManager;
use fitlog_server::config::ServerConfig;
use fitlog_server::database::Database;
use fitlog_server::llm::openai::OpenAiProvider;
use fitlog_server::llm::LlmProvider;
use fitlog_server::resources::ServerResources;
use fitlog_server::routes;

/// Upper bound on request bodies
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Per-request timeout covering the slowest chat path (three LLM calls)
const REQUEST_TIMEOUT_SECS: u64 = 180;

/// Conversational fitness-tracking API server
#[derive(Parser)]
#[command(name = "fitlog-server", version, about)]
struct Args {
    /// Override the configured HTTP port
    #[arg(long)]
    port: Option<u16>,

    /// Override the configured database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = ServerConfig::from_env().context("failed to load configuration")?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    let database = Database::new(&config.database_url)
        .await
        .context("failed to connect to database")?;
    database.migrate().await.context("migration failed")?;

    let auth = AuthManager::new(&config.jwt_secret);

    let llm: Option<Arc<dyn LlmProvider>> = if config.llm.api_key.is_some() {
        let provider = OpenAiProvider::new(&config.llm).context("failed to build LLM client")?;
        info!(model = %config.llm.model, "LLM provider configured");
        Some(Arc::new(provider))
    } else {
        warn!("no LLM credential; chat and plan generation are disabled");
        None
    };

    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(database, auth, llm, config));

    let app = routes::router(&resources)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    info!(port, "fitlog server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!("failed to install shutdown handler: {error}");
    }
}
