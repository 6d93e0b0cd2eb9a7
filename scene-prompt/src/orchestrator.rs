//! Strategy orchestration: AI first, rules as fallback

use crate::action::Action;
use crate::ai::AiPromptParser;
use crate::commands::PromptParser;
use crate::context::SceneContext;
use serde::Serialize;
use tracing::info;

/// Returned when neither strategy produced an action
pub const GUIDANCE_MESSAGE: &str = "Could not understand the prompt. Try commands like 'add robot arm', 'rotate conveyor 45 degrees', or 'zoom to inspection area'.";

/// Appended when AI was requested but no credential is configured
pub const AI_DISABLED_NOTE: &str = "AI parsing is not enabled; used rule-based parser";

/// Which strategy produced the actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Ai,
    Rules,
}

/// Result of compiling one prompt
#[derive(Debug, Clone)]
pub struct CompileOutcome {
    /// Ordered actions (possibly empty)
    pub actions: Vec<Action>,
    /// Strategy whose output was returned
    pub strategy: Strategy,
    /// AI was explicitly requested but is not configured
    pub ai_unavailable: bool,
}

impl CompileOutcome {
    pub fn is_understood(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Human-readable summary, e.g.
    /// `Parsed 2 action(s): rotate_object on robot_arm_1, set_color on conveyor_1`
    pub fn summary(&self) -> String {
        let mut message = if self.actions.is_empty() {
            GUIDANCE_MESSAGE.to_string()
        } else {
            let described: Vec<String> = self.actions.iter().map(Action::describe).collect();
            let mut message = format!(
                "Parsed {} action(s): {}",
                self.actions.len(),
                described.join(", ")
            );
            if self.strategy == Strategy::Ai {
                message.push_str(" (AI-powered)");
            }
            message
        };

        if self.ai_unavailable {
            message.push_str(&format!(" ({})", AI_DISABLED_NOTE));
        }
        message
    }
}

/// Chooses between the AI and rule-based parsers for each prompt
///
/// Pure fallback: only one strategy's output is returned per request.
pub struct PromptOrchestrator {
    ai: AiPromptParser,
    rules: PromptParser,
}

impl PromptOrchestrator {
    pub fn new(ai: AiPromptParser, rules: PromptParser) -> Self {
        Self { ai, rules }
    }

    /// Rule-based parsing only
    pub fn rules_only() -> Self {
        Self::new(AiPromptParser::disabled(), PromptParser::new())
    }

    pub fn ai_enabled(&self) -> bool {
        self.ai.is_configured()
    }

    /// Compile a prompt into actions
    ///
    /// `use_ai`: `None` tries AI when configured, `Some(false)` skips it,
    /// `Some(true)` without a credential falls back and says so.
    pub async fn compile(
        &self,
        prompt: &str,
        context: Option<&SceneContext>,
        use_ai: Option<bool>,
    ) -> CompileOutcome {
        let wants_ai = use_ai.unwrap_or(true);
        let ai_unavailable = use_ai == Some(true) && !self.ai.is_configured();

        if wants_ai && self.ai.is_configured() {
            let actions = self.ai.parse(prompt, context).await;
            if !actions.is_empty() {
                info!(
                    strategy = "ai",
                    actions = actions.len(),
                    "Compiled prompt"
                );
                return CompileOutcome {
                    actions,
                    strategy: Strategy::Ai,
                    ai_unavailable,
                };
            }
            info!("AI parser returned no actions, falling back to rules");
        }

        let actions = self.rules.parse(prompt, context);
        info!(
            strategy = "rules",
            actions = actions.len(),
            "Compiled prompt"
        );

        CompileOutcome {
            actions,
            strategy: Strategy::Rules,
            ai_unavailable,
        }
    }
}
