// gemsight - Single-page image text extraction powered by Gemini
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use clap::Parser;
use gemsight::cli::Args;
use gemsight::config::AppConfig;
use gemsight::gemini::GeminiClient;
use gemsight::server::create_router;
use gemsight::utils::logging;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration (.env, file, environment)
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    if args.check_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        println!("api_key_configured = {}", config.has_api_key());
        return Ok(());
    }

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting gemsight v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Build the Gemini client from the loaded credential
    let gemini_client = GeminiClient::new(&config.gemini)?;
    info!(
        "Using model {} at {}",
        config.gemini.model,
        gemini_client.base_url()
    );

    // Phase 4: Build and start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = create_router(config, Arc::new(gemini_client))?;

    info!("Serving page on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 5: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
