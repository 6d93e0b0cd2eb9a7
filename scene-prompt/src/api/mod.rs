//! REST API for the prompt compiler

use crate::action::Action;
use crate::context::SceneContext;
use crate::orchestrator::{CompileOutcome, PromptOrchestrator};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// API state
pub struct ApiState {
    pub orchestrator: Arc<PromptOrchestrator>,
}

/// Request to compile a prompt
#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    /// Natural-language instruction
    pub prompt: String,
    /// Current scene snapshot
    #[serde(default)]
    pub context: Option<SceneContext>,
    /// `false` skips the AI parser, `true` asks for it explicitly
    #[serde(default)]
    pub use_ai: Option<bool>,
}

/// Compiled actions plus a summary for the user
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub actions: Vec<Action>,
    pub message: String,
    pub original_prompt: String,
}

impl ActionResponse {
    pub fn from_outcome(outcome: CompileOutcome, prompt: impl Into<String>) -> Self {
        Self {
            success: outcome.is_understood(),
            message: outcome.summary(),
            actions: outcome.actions,
            original_prompt: prompt.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub ai_enabled: bool,
}

/// Create the API router
pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/prompt", post(parse_prompt))
        .route("/prompt/demo", post(parse_prompt))
        .layer(CatchPanicLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ai_enabled: state.orchestrator.ai_enabled(),
    })
}

/// Compile a prompt into scene actions
async fn parse_prompt(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<PromptRequest>,
) -> Json<ActionResponse> {
    let outcome = state
        .orchestrator
        .compile(&request.prompt, request.context.as_ref(), request.use_ai)
        .await;

    Json(ActionResponse::from_outcome(outcome, request.prompt))
}
