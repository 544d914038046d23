use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relaybot::config::Config;
use relaybot::dispatcher::Dispatcher;
use relaybot::platform::telegram::TelegramClient;
use relaybot::platform::PlatformClient;
use relaybot::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,relaybot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let rules = config.keyword_rules()?;

    info!("Configuration loaded successfully");
    info!("  Keyword rules: {}", rules.len());
    if rules.is_empty() {
        warn!("Keyword table is empty, every message gets the fallback reply");
    }
    info!("  Webhook URL: {}", config.webhook_url().unwrap_or("(not set)"));
    info!("  Listen address: {}", config.server.bind_addr());

    let telegram = TelegramClient::new(&config.telegram)?;

    if config.telegram.register_webhook_on_start {
        match config.webhook_url() {
            Some(url) => telegram
                .set_webhook(url)
                .await
                .context("Failed to register webhook on start")?,
            None => warn!("register_webhook_on_start is set but no webhook URL is configured"),
        }
    }

    let state = AppState::new(
        Dispatcher::new(rules),
        Arc::new(telegram),
        config.webhook_url().map(String::from),
    );

    info!("Bot is starting...");
    server::serve(state, &config.server.bind_addr()).await?;

    Ok(())
}
