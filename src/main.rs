//! authgate - JWT authentication server
//! Mission: Issue short-lived tokens for verified credentials and guard the calculator with them

use anyhow::Result;
use authgate::{config, server, Config};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    config::load_env();
    let config = Config::parse();
    init_tracing(&config.log_filter);

    info!("🚀 authgate starting");

    server::run(config).await
}

/// Initialize tracing; RUST_LOG wins over the configured default filter
fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
