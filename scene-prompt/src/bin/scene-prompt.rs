//! Scene Prompt CLI - compile one instruction into scene actions
//!
//! Usage:
//!   scene-prompt <PROMPT> [--context <FILE>] [--ai | --no-ai] [--json] [--verbose]
//!
//! Example:
//!   scene-prompt "Add a robotic arm next to the conveyor" --context scene.json
//!   AI_API_KEY=sk-... scene-prompt "Rotate the arm 30 degrees" --ai --json

use anyhow::{Context, Result};
use colored::Colorize;
use scene_prompt::api::ActionResponse;
use scene_prompt::orchestrator::Strategy;
use scene_prompt::{AiPromptParser, PromptOrchestrator, PromptParser, SceneContext, StudioConfig};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn print_usage() {
    eprintln!(
        r#"
{} - Compile natural-language scene edits into structured actions

{}
    scene-prompt <PROMPT> [OPTIONS]

{}
    <PROMPT>    Instruction, e.g. "Add a robotic arm next to the conveyor"

{}
    -c, --context <FILE>    JSON scene snapshot: {{"objects": [{{"id", "type", "name", "position"}}]}}
    --ai                    Ask for the AI parser (needs AI_API_KEY)
    --no-ai                 Use the rule-based parser only
    --json                  Print the full response as JSON
    -v, --verbose           Show debug logging
    -h, --help              Print this help message

{}
    AI_API_KEY              Credential for the chat-completions endpoint
    AI_API_URL              Endpoint URL (default: OpenAI)
    AI_MODEL_NAME           Model name (default: gpt-4o-mini)

{}
    scene-prompt "Add a robotic arm"
    scene-prompt "Rotate the arm 30 degrees" -c scene.json
    scene-prompt "Highlight safety zone in red" --json
    scene-prompt "Zoom camera to inspection area" --no-ai
"#,
        "Scene Prompt CLI".bold(),
        "USAGE:".bold(),
        "ARGS:".bold(),
        "OPTIONS:".bold(),
        "ENVIRONMENT:".bold(),
        "EXAMPLES:".bold(),
    );
}

struct CliArgs {
    prompt: String,
    context: Option<PathBuf>,
    use_ai: Option<bool>,
    json: bool,
    verbose: bool,
}

fn parse_args() -> Result<CliArgs> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        std::process::exit(if args.iter().any(|a| a == "--help" || a == "-h") {
            0
        } else {
            1
        });
    }

    let prompt = args[1].clone();
    let mut context = None;
    let mut use_ai = None;
    let mut json = false;
    let mut verbose = false;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--context" | "-c" => {
                i += 1;
                let path = args.get(i).context("--context requires a file path")?;
                context = Some(PathBuf::from(path));
            }
            "--ai" => use_ai = Some(true),
            "--no-ai" => use_ai = Some(false),
            "--json" => json = true,
            "--verbose" | "-v" => verbose = true,
            other => anyhow::bail!("Unknown option: {}", other),
        }
        i += 1;
    }

    Ok(CliArgs {
        prompt,
        context,
        use_ai,
        json,
        verbose,
    })
}

fn load_context(path: &Path) -> Result<SceneContext> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read context file: {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse context file: {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let context = args.context.as_deref().map(load_context).transpose()?;

    let config = StudioConfig::default().with_env_overrides();
    let ai = AiPromptParser::from_config(&config.ai).context("Failed to create AI provider")?;
    let orchestrator = PromptOrchestrator::new(ai, PromptParser::new());

    let outcome = orchestrator
        .compile(&args.prompt, context.as_ref(), args.use_ai)
        .await;
    let strategy = outcome.strategy;
    let response = ActionResponse::from_outcome(outcome, args.prompt);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if !response.success {
        eprintln!("{} {}", "✗".red().bold(), response.message.yellow());
        std::process::exit(2);
    }

    let source = match strategy {
        Strategy::Ai => "ai".magenta(),
        Strategy::Rules => "rules".cyan(),
    };
    eprintln!("{} {} [{}]", "✓".green().bold(), response.message, source);

    for (index, action) in response.actions.iter().enumerate() {
        println!(
            "{} {}",
            format!("{:>2}.", index + 1).dimmed(),
            action.describe().bold()
        );
        for (key, value) in &action.params {
            println!("      {} {}", format!("{}:", key).dimmed(), serde_json::to_string(value)?);
        }
    }

    Ok(())
}
