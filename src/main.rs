use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use homework_bot::bot::schema;
use homework_bot::config::BotConfig;
use homework_bot::registration::{NoopRegistry, UserRegistry};
use homework_bot::requests::ActiveRequests;
use homework_bot::vision::{OpenAiVisionClient, VisionModel};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file, RUST_LOG included
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Homework Telegram Bot");

    let config = Arc::new(BotConfig::from_env()?);

    info!(
        model = %config.vision.model,
        endpoint = %config.vision.endpoint,
        language = %config.language,
        "Configuration loaded"
    );

    let vision: Arc<dyn VisionModel> = Arc::new(OpenAiVisionClient::new(
        config.api_key.clone(),
        config.vision.clone(),
    )?);
    let registry: Arc<dyn UserRegistry> = Arc::new(NoopRegistry);
    let requests = ActiveRequests::new();

    let bot = Bot::new(config.telegram_token.clone());

    info!("Bot initialized, starting dispatcher");

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![config, vision, registry, requests])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
