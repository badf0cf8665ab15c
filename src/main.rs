mod app;
mod config;
mod error;
mod generation;
mod meals;
mod nutrition;
mod state;

use crate::config::AppConfig;
use crate::state::AppState;

const DEFAULT_LOG_FILTER: &str = "meal_planner=debug,axum=info,tower_http=info";

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => subscriber.with_target(false).json().init(),
        _ => subscriber.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::info!(
        model = %config.generation.model,
        nutrition = %config.nutrition.base_url,
        timeout_secs = config.http_timeout_secs,
        "configuration loaded"
    );
    let addr = config.server.bind_addr()?;
    let state = AppState::init(&config)?;

    app::serve(app::build_app(state), addr).await
}
