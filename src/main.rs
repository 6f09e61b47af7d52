use std::{sync::Arc, time::Duration};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moodreel_api::{
    api::{create_router, AppState},
    config::Config,
    db::build_history_repository,
    services::{
        providers::{OmdbPosterLookup, OpenAiBackend},
        RecommendationPipeline,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodreel_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let history = build_history_repository(&config).await?;

    let backend = Arc::new(OpenAiBackend::new(
        config.openai_api_key.clone(),
        config.openai_api_url.clone(),
        config.openai_model.clone(),
    ));
    let posters = Arc::new(OmdbPosterLookup::new(
        config.omdb_api_key.clone(),
        config.omdb_api_url.clone(),
    ));

    let pipeline = RecommendationPipeline::new(backend, posters, history);
    let state = AppState::new(
        pipeline,
        Duration::from_secs(config.pipeline_timeout_secs),
    );

    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, model = %config.openai_model, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
