//! Scene Prompt server binary

use anyhow::{Context, Result};
use scene_prompt::api::{create_router, ApiState};
use scene_prompt::{AiPromptParser, PromptOrchestrator, PromptParser, StudioConfig};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Scene Prompt Server v{}", env!("CARGO_PKG_VERSION"));

    let explicit_path = std::env::args().nth(1);
    let config = load_config(explicit_path.as_deref())?.with_env_overrides();

    let ai = AiPromptParser::from_config(&config.ai).context("Failed to create AI provider")?;
    if ai.is_configured() {
        info!(
            model = config.ai.model,
            api_url = config.ai.api_url,
            "AI parser enabled"
        );
    } else {
        warn!("AI parser disabled (set AI_API_KEY to enable); using rule-based parser only");
    }

    let orchestrator = Arc::new(PromptOrchestrator::new(ai, PromptParser::new()));
    let state = Arc::new(ApiState { orchestrator });

    // Create router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.server.bind))?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// An explicit path must exist; a missing default file means built-in defaults
fn load_config(explicit_path: Option<&str>) -> Result<StudioConfig> {
    let config_path = explicit_path.unwrap_or(DEFAULT_CONFIG_PATH);

    if explicit_path.is_none() && !Path::new(config_path).exists() {
        info!(config_path, "No config file found, using defaults");
        return Ok(StudioConfig::default());
    }

    let config_contents = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path))?;

    let config = StudioConfig::from_toml(&config_contents)
        .with_context(|| format!("Failed to parse config file: {}", config_path))?;

    info!(
        config_path,
        bind = config.server.bind,
        model = config.ai.model,
        "Loaded configuration"
    );
    Ok(config)
}
