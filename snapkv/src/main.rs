use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snapkv::api::dto::ExtractResponse;
use snapkv::api::{create_router, AppState};
use snapkv::config::Config;
use snapkv::models::RawImage;
use snapkv::pipeline::ExtractionPipeline;

#[derive(Parser)]
#[command(name = "snapkv")]
#[command(about = "Extract key-value pairs from screenshots")]
struct Args {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Bind host, overrides SNAPKV_HOST
        #[arg(long)]
        host: Option<String>,
        /// Bind port, overrides SNAPKV_PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run the pipeline on a local image and print the result as JSON
    Extract {
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    init_tracing(args.log_json);

    let config = Config::from_env();

    match args.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    }) {
        Command::Serve { host, port } => serve(config, host, port).await,
        Command::Extract { path } => extract_file(config, &path).await,
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "snapkv=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    // stdout is reserved for `extract` output.
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn serve(mut config: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Initializing OCR provider: {}...", config.ocr.model);
    let state = AppState::from_config(config.clone());
    if !state.pipeline.recognizer().is_available() {
        tracing::warn!("OCR unavailable - every extraction will return a no-text warning");
    }
    if !state.pipeline.refiner().is_enabled() {
        tracing::info!("Refinement disabled - set REFINE_API_KEY to enable it");
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("snapkv starting on http://{}", addr);
    tracing::info!("  Extract:      POST http://{}/api/extract", addr);
    tracing::info!("  Health check: http://{}/api/health", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn extract_file(config: Config, path: &Path) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let content_type = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string());

    let pipeline = ExtractionPipeline::from_config(&config);
    let report = pipeline
        .run(RawImage::new(bytes, content_type))
        .await
        .map_err(|e| anyhow::anyhow!(e.public_message()))?;

    let response = ExtractResponse::from(report);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}
