//! Scene Prompt - natural-language to 3D scene action compiler
//!
//! This crate provides:
//! - A rule-based prompt parser that resolves objects against the current scene
//! - An AI-assisted parser backed by any OpenAI-compatible chat endpoint
//! - An orchestrator that prefers AI output and falls back to the rules
//! - REST API for the scene editor

pub mod action;
pub mod ai;
pub mod api;
pub mod commands;
pub mod context;
pub mod extract;
pub mod ids;
pub mod orchestrator;
pub mod provider;

pub use action::{Action, ActionKind, ObjectKind, ParamValue, Vector3};
pub use ai::AiPromptParser;
pub use commands::PromptParser;
pub use context::{SceneContext, SceneObject};
pub use ids::IdAllocator;
pub use orchestrator::{CompileOutcome, PromptOrchestrator};
pub use provider::{LlmProvider, LlmRequest, LlmResponse};

/// Configuration for the studio backend
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct StudioConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// AI parser configuration
    #[serde(default)]
    pub ai: AiConfig,
}

impl StudioConfig {
    /// Parse a TOML document
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Apply `AI_API_KEY`, `AI_API_URL` and `AI_MODEL_NAME` from the process environment
    pub fn with_env_overrides(mut self) -> Self {
        self.ai.apply_overrides(|key| std::env::var(key).ok());
        self
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String { "0.0.0.0:8080".to_string() }

/// Configuration for the AI-assisted parser
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AiConfig {
    /// Full chat-completions URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Bearer credential; AI parsing is disabled without one
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }
}

fn default_api_url() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_model() -> String { "gpt-4o-mini".to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_temperature() -> f32 { 0.2 }

impl AiConfig {
    /// The configured credential, if non-blank
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Override fields from an environment lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup("AI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup("AI_API_URL") {
            self.api_url = url;
        }
        if let Some(model) = lookup("AI_MODEL_NAME") {
            self.model = model;
        }
    }
}
