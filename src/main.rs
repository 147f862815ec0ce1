//! MediVue: ensemble health-screening service.
//!
//! Main entry point: trains the ensemble once, then serves HTTP.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use medivue::adapters::sanitize::SanitizingMakeWriter;
use medivue::server::{create_router, AppState};
use medivue::{EngineConfig, InferenceContext};

#[derive(Parser, Debug)]
#[command(name = "medivue")]
#[command(about = "MediVue ensemble health-screening service", version)]
struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "5000")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logging goes to stdout unless MEDIVUE_LOG_MODE=file.
    let use_file = std::env::var("MEDIVUE_LOG_MODE")
        .map(|mode| mode.trim().eq_ignore_ascii_case("file"))
        .unwrap_or(false);

    let (writer, _guard) = if use_file {
        let log_file =
            std::env::var("MEDIVUE_LOG_FILE").unwrap_or_else(|_| "medivue.log".to_string());
        if let Some(parent) = std::path::Path::new(&log_file).parent() {
            if !parent.as_os_str().is_empty() {
                let _ = std::fs::create_dir_all(parent);
            }
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    let cli = Cli::parse();
    let config = EngineConfig::from_env_or_default();
    tracing::info!("Starting MediVue {}...", env!("CARGO_PKG_VERSION"));

    // Training is CPU-bound; keep it off the async workers.
    let context = tokio::task::spawn_blocking(move || InferenceContext::initialize(&config)).await??;
    let app = create_router(AppState::new(context));

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    tracing::info!("MediVue shutdown complete.");
    Ok(())
}
