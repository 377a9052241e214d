mod config;
mod errors;
mod llm_client;
mod planner;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::{build_router, cors_layer};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}={},tower_http=info",
            env!("CARGO_PKG_NAME"),
            &config.rust_log
        ))
    });
    if config.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    info!("Starting Meal Planner API v{}", env!("CARGO_PKG_VERSION"));

    if config.api_key().is_none() {
        tracing::warn!(
            "{} is not set; meal requests will fail until it is provided",
            config.api_key_var
        );
    }
    info!(
        "Completion endpoint: {} (model: {}, timeout: {}s, max attempts: {})",
        config.completion_api_url,
        llm_client::MODEL,
        config.completion_timeout.as_secs(),
        config.meal_plan_max_attempts
    );

    let cors = cors_layer(&config.cors_allowed_origin)?;
    let port = config.port;
    let state = AppState::new(config)?;

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
