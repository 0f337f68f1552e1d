mod app;
mod auth;
mod config;
mod error;
mod images;
mod state;
mod storage;
#[cfg(test)]
mod testing;
mod users;

use crate::config::{AppConfig, RunMode};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.run_mode);

    let app_state = AppState::init(config).await?;
    let config = app_state.config.clone();
    let app = app::build_app(app_state);

    match config.run_mode {
        RunMode::Http => app::serve(app, &config.host, config.port).await,
        RunMode::Lambda => app::serve_lambda(app).await,
    }
}

fn init_tracing(run_mode: RunMode) {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "users_api=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else if run_mode == RunMode::Lambda {
        // CloudWatch does not render ANSI colours and stamps its own time.
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_ansi(false)
            .without_time()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}
