//! riskwatch-web - Health-risk prediction dashboard service
//!
//! Authenticated users submit structured clinical inputs (or an image) to an
//! external inference endpoint; the result is classified into a risk tier,
//! enriched with approximate geolocation, stamped with a verification token,
//! and appended to the per-user prediction history.

use anyhow::Result;
use clap::Parser;
use riskwatch_common::config::{Config, ConfigOverrides};
use riskwatch_common::db::init_database;
use riskwatch_web::{build_router, AppState};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "riskwatch-web", about = "RiskWatch health-risk dashboard service")]
struct Args {
    /// Port to listen on
    #[arg(long, env = "RISKWATCH_PORT")]
    port: Option<u16>,

    /// SQLite database file
    #[arg(long, env = "RISKWATCH_DATABASE")]
    database: Option<PathBuf>,

    /// Administrator account email (case-insensitive match)
    #[arg(long, env = "RISKWATCH_ADMIN_EMAIL")]
    admin_email: Option<String>,

    /// Base URL of the inference endpoints
    #[arg(long, env = "RISKWATCH_INFERENCE_URL")]
    inference_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber before anything that can log
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting RiskWatch web service v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = Config::load(ConfigOverrides {
        port: args.port,
        database: args.database,
        admin_email: args.admin_email,
        inference_base_url: args.inference_url,
    })?;

    info!("Database path: {}", config.database_path.display());
    info!("Inference base URL: {}", config.inference_base_url);

    let pool = init_database(&config.database_path).await?;

    let addr = config.bind_addr()?;
    let state = AppState::new(pool, config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("riskwatch-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
