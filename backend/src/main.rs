use std::sync::Arc;

use backend::{
    AppState,
    aggregator::RouteWeatherAggregator,
    config::{AppConfig, ServerArgs},
    create_router,
};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = ServerArgs::parse();
    let config = AppConfig::from(&args);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.google_api_key.is_none() {
        tracing::warn!("GOOGLE_API_KEY is not set; route lookups will fail");
    }
    if config.openweather_api_key.is_none() {
        tracing::warn!("OPENWEATHER_API_KEY is not set; weather lookups will fail");
    }
    tracing::info!(
        "running in {} mode, upstream timeout {:?}",
        if config.debug { "development" } else { "production" },
        config.upstream_timeout
    );

    let aggregator = RouteWeatherAggregator::new(Arc::new(config))?;
    let app = create_router(AppState {
        aggregator: Arc::new(aggregator),
    });

    tracing::info!("starting backend on http://{}", args.bind);
    tracing::info!("API endpoints:");
    tracing::info!("  GET /api/get-google-key - Map key for the browser");
    tracing::info!("  POST /api/route-weather - Route plus weather at the destination");

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
