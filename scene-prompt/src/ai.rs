//! AI-assisted prompt parser
//!
//! Sends the prompt and a textual description of the scene to a
//! chat-completion model and turns its JSON reply into [`Action`]s. Every
//! failure degrades to an empty list so the caller can fall back to the
//! rule-based parser.

use crate::action::Action;
use crate::context::SceneContext;
use crate::provider::{LlmProvider, LlmRequest, OpenAiProvider, ProviderError};
use crate::AiConfig;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Fixed instruction sent as the system message
pub const SYSTEM_PROMPT: &str = r#"You are an expert assistant for a 3D Industrial Simulation Studio.
Your task is to convert user natural language prompts into a list of structured JSON actions that modify the 3D scene.

AVAILABLE ACTIONS:
- add_object: Add a new object. Params: {type, name, position, rotation, scale, color}
- remove_object: Remove an object by ID.
- move_object: Move an object. Params: {position, delta, absolute: bool}
- rotate_object: Rotate an object. Params: {axis, degrees}
- scale_object: Scale an object. Params: {factor}
- set_color: Change object color. Params: {color}
- set_visibility: Show/hide object. Params: {visible: bool}
- highlight_object: Highlight an object. Params: {color, duration}
- camera_zoom: Zoom the camera. Params: {direction: "in" | "out", amount}
- camera_move: Move the camera to a preset view. Params: {position, target}
- camera_focus: Focus camera on an object or area. Params: {position, target}
- add_safety_zone: Add a safety zone. Params: {position, color, size}
- animate_object: Start/stop animation. Params: {animate: bool}
- reset_scene: Reset the scene. Params: {keep_defaults: bool}

Positions, rotations, scales, sizes and deltas are objects of the form {"x": 0, "y": 0, "z": 0}.

OBJECT TYPES:
conveyor, robot_arm, box, safety_zone, cylinder, sphere, custom

OUTPUT FORMAT:
Return ONLY a JSON list of actions. Each action must follow this structure:
{
    "action": "action_type",
    "target": "object_id_or_none",
    "params": { ... }
}

CONTEXT:
You will be provided with the current scene objects and their properties. Use this to identify target objects by name, type, or position.
If the user wants to add an object, generate a unique ID based on the type (e.g., 'robot_arm_3').
If the user's intent is ambiguous, try your best to infer the most logical action based on the context.
"#;

/// Reasons a model reply could not be turned into actions
#[derive(Error, Debug)]
pub enum ReplyError {
    #[error("reply is not valid JSON: {0}")]
    NotJson(#[from] serde_json::Error),

    #[error("reply JSON has an unusable shape: {0}")]
    UnexpectedShape(&'static str),
}

/// Parser backed by a language model
///
/// Without a provider (no credential configured) every call returns an
/// empty list.
#[derive(Clone)]
pub struct AiPromptParser {
    provider: Option<Arc<dyn LlmProvider>>,
    temperature: f32,
    timeout: Duration,
}

impl AiPromptParser {
    pub fn new(provider: Arc<dyn LlmProvider>, temperature: f32, timeout: Duration) -> Self {
        Self {
            provider: Some(provider),
            temperature,
            timeout,
        }
    }

    /// A parser with no model behind it
    pub fn disabled() -> Self {
        Self {
            provider: None,
            temperature: 0.0,
            timeout: Duration::ZERO,
        }
    }

    /// Build from configuration; disabled when no credential is set
    pub fn from_config(config: &AiConfig) -> Result<Self, ProviderError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let Some(api_key) = config.credential() else {
            return Ok(Self::disabled());
        };

        let provider = OpenAiProvider::new(&config.api_url, api_key, &config.model, timeout)?;
        Ok(Self::new(Arc::new(provider), config.temperature, timeout))
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Ask the model for actions; any failure yields an empty list
    pub async fn parse(&self, prompt: &str, context: Option<&SceneContext>) -> Vec<Action> {
        let Some(provider) = &self.provider else {
            warn!("AI_API_KEY not configured, AI parser cannot be used");
            return Vec::new();
        };

        let request = LlmRequest::new(SYSTEM_PROMPT, user_message(prompt, context))
            .with_temperature(self.temperature)
            .with_json_response();

        let response = match tokio::time::timeout(self.timeout, provider.complete(&request)).await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                error!(provider = provider.name(), error = %e, "Error calling AI API");
                return Vec::new();
            }
            Err(_) => {
                error!(
                    provider = provider.name(),
                    timeout_secs = self.timeout.as_secs_f64(),
                    "AI API call timed out"
                );
                return Vec::new();
            }
        };

        debug!(
            model = provider.model(),
            duration_ms = response.duration_ms,
            total_tokens = response.usage.map(|usage| usage.total_tokens),
            "AI reply received"
        );

        match parse_reply(&response.content) {
            Ok(actions) => actions,
            Err(e) => {
                error!(error = %e, content = %response.content, "Failed to parse AI reply");
                Vec::new()
            }
        }
    }
}

/// `Context:\n<description>\n\nPrompt: <prompt>`
fn user_message(prompt: &str, context: Option<&SceneContext>) -> String {
    let description = context.cloned().unwrap_or_default().describe();
    format!("Context:\n{}\n\nPrompt: {}", description, prompt)
}

/// Turn reply content into validated actions
///
/// Accepts a JSON array of actions, an object with an `actions` array, or a
/// single action object. Elements that fail validation are logged and
/// dropped.
pub fn parse_reply(content: &str) -> Result<Vec<Action>, ReplyError> {
    let value: Value = match serde_json::from_str(content.trim()) {
        Ok(value) => value,
        Err(e) => match unwrap_code_fence(content) {
            Some(body) => serde_json::from_str(body)?,
            None => return Err(e.into()),
        },
    };

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("actions") {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(ReplyError::UnexpectedShape("'actions' is not a list")),
            None => vec![Value::Object(map)],
        },
        _ => return Err(ReplyError::UnexpectedShape("expected a list or an object")),
    };

    let mut actions = Vec::with_capacity(items.len());
    for item in items {
        let action: Action = match serde_json::from_value(item.clone()) {
            Ok(action) => action,
            Err(e) => {
                error!(error = %e, action = %item, "Error validating action");
                continue;
            }
        };

        match action.validate() {
            Ok(()) => actions.push(action),
            Err(e) => error!(error = %e, action = %item, "Error validating action"),
        }
    }

    Ok(actions)
}

/// Body of the first Markdown code fence, without its language tag
fn unwrap_code_fence(content: &str) -> Option<&str> {
    let body_start = content.find("```")? + 3;
    let body_len = content[body_start..].find("```")?;
    let body = &content[body_start..body_start + body_len];
    Some(body.trim_start_matches(|c: char| c.is_ascii_alphanumeric()).trim())
}
