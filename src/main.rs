use std::error::Error;

use ai_llm_service::telemetry;
use tracing::{Level, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // `.env` is optional; real environment variables win.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", Level::INFO))
        .with(telemetry::layer())
        .try_init()?;

    if let Err(err) = &dotenv {
        if !err.not_found() {
            error!(error = %err, "failed to read .env");
        }
    }

    if let Err(err) = api::start().await {
        error!(error = %err, "site-rag-backend stopped with an error");
        return Err(err.into());
    }
    Ok(())
}
