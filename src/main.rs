use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use countdown_service::{
    clock::SystemClock,
    config::{Config, defaults::DEFAULT_CONFIG_FILE},
    services::CountdownService,
    web::WebServer,
};

#[derive(Parser)]
#[command(name = "countdown-service")]
#[command(version)]
#[command(about = "Runs named, fire-once countdown jobs behind a small web UI and JSON API")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Listening IP address
    #[arg(short = 'H', long, value_name = "IP")]
    host: Option<String>,

    /// Listening port
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Number of most recent jobs kept in history
    #[arg(long, value_name = "COUNT")]
    max_history: Option<usize>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("countdown_service={},tower_http=trace", cli.log_level)
    } else {
        format!("countdown_service={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Countdown Service v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    // Override config with CLI arguments
    if let Some(host) = cli.host {
        config.web.host = host;
    }
    if let Some(port) = cli.port {
        config.web.port = port;
    }
    if let Some(max_history) = cli.max_history {
        config.jobs.max_history = max_history;
    }
    config.validate()?;

    match config.jobs.max_delay {
        Some(max_delay) => info!(
            "Job history: keeping last {} jobs, max delay {}",
            config.jobs.max_history,
            humantime::format_duration(max_delay)
        ),
        None => info!(
            "Job history: keeping last {} jobs, no delay cap",
            config.jobs.max_history
        ),
    }

    let countdown = CountdownService::new(&config.jobs, Arc::new(SystemClock::new()));
    let web_server = WebServer::new(&config, countdown.clone())?;

    info!(
        "Starting web server on {}:{}",
        web_server.host(),
        web_server.port()
    );

    let cancellation_token = CancellationToken::new();
    let (server_ready_tx, server_ready_rx) = tokio::sync::oneshot::channel();

    let server_token = cancellation_token.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = web_server
            .serve_with_cancellation(server_ready_tx, server_token)
            .await
        {
            tracing::error!("Web server failed: {}", e);
        }
    });

    match server_ready_rx.await {
        Ok(Ok(())) => {
            info!("Web server is now listening");
        }
        Ok(Err(bind_error)) => {
            tracing::error!("Failed to bind web server: {}", bind_error);
            return Err(bind_error);
        }
        Err(_) => {
            tracing::error!("Web server task completed without signaling");
            return Err(anyhow::anyhow!("Web server failed to start"));
        }
    }

    shutdown_signal().await;
    cancellation_token.cancel();
    server_handle.await?;

    countdown.shutdown();
    info!("Countdown Service stopped");

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down gracefully"),
                    _ = sigint.recv() => info!("Received SIGINT (Ctrl+C), shutting down gracefully"),
                }
            }
            _ => {
                tracing::warn!("Failed to install unix signal handlers, falling back to Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received Ctrl+C, shutting down gracefully");
    }
}
