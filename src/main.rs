// src/main.rs

use dotenvy::dotenv;
use lms_client::api::ApiClient;
use lms_client::app;
use lms_client::auth::AuthContext;
use lms_client::config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    let config = Config::from_env();

    // The terminal is the UI, so the log stream goes to a rolling file.
    let file_appender = tracing_appender::rolling::daily("logs", "client.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("starting client against {}", config.api_base_url);

    let auth = AuthContext::new();
    let client = match ApiClient::new(&config, auth) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("failed to initialize client: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = app::run(client).await {
        eprintln!("session ended: {}", e);
        std::process::exit(1);
    }
}
