use std::sync::Arc;
use tracing::info;

use ethos_miniapp::config::Config;
use ethos_miniapp::engine::CredibilityEngine;
use ethos_miniapp::web::server::WebServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load config first: it decides the log format
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ethos-miniapp.toml".to_string());

    let config = Config::load(&config_path)?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ethos_miniapp=info".into());
    if config.logging.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("🛡️ ethos-miniapp v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("Config loaded from {}", config_path);

    let config = Arc::new(config);
    let engine = Arc::new(CredibilityEngine::new(config)?);

    WebServer::new(engine).run().await
}
