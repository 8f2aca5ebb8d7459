use streak_backend::config::BackendConfig;
use streak_backend::module::github::GitHubClient;
use streak_backend::module::handler::CardService;

use anyhow::Result;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let mut config = BackendConfig::load_or_default(&config_path)?;

    let _logging_guard = streak_backend::logging::init_logging(
        &config.log_dir,
        "streak-backend",
        &config.log_level,
    )?;

    if config.github.token.is_none() {
        config.github.token = std::env::var("GITHUB_TOKEN").ok();
    }

    tracing::info!("Streak Backend starting...");
    tracing::info!("Server will listen on {}", config.server_address());

    let client = GitHubClient::new(&config.github)?;
    let service = Arc::new(CardService::new(Arc::new(client), config.card.clone()));

    streak_backend::server::serve(&config, service).await
}
