//! Readalong API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p readalong-api
//! ```
//!
//! Configuration is loaded from environment variables and an optional `.env` file.

use readalong_common::{init_tracing, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Tracing depends on the environment, so configuration is loaded first
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        port = config.api.port,
        cache = config.redis.is_some(),
        "Starting Readalong API Server..."
    );

    if let Err(e) = readalong_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
