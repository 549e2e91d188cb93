use ai_llm_service::telemetry;
use tracing::{Level, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real environment variables win.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", Level::INFO))
        .with(telemetry::layer())
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "starting pdf-query-backend");
    api::start().await?;

    Ok(())
}
