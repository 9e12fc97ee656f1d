//! Context Advisor - rule-based agent and skill recommendations for Claude Code hooks
//!
//! Three hook entry points share one detection/ranking engine:
//! - `ctxa agents`: weighted category scoring over a static agent catalog
//! - `ctxa skills`: priority ranking over `skill-rules.json`
//! - `ctxa log <start|end|log-tool>`: redacted append-only session log
//!
//! # Input (via stdin)
//! JSON with fields: prompt, openFiles, toolName, input
//!
//! # Output (via stdout)
//! `{}` or `{"hookSpecificOutput": {"hookEventName": ..., "additionalContext": ...}}`.
//! The process always exits 0; errors go to stderr through `tracing`.

mod catalog;
mod config;
mod detector;
mod error;
mod hook;
mod ranking;
mod report;
mod rules;
mod session_log;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};
use config::{Settings, SettingsArgs};
use error::Result;
use hook::HookInput;
use rules::RuleSet;
use session_log::{EventLogger, LogCommand, Mirror};
use std::io::{self, IsTerminal, Read};
use tracing::{debug, error, warn};

#[derive(Parser)]
#[command(name = "ctxa")]
#[command(about = "Agent and skill recommender hooks for Claude Code")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    settings: SettingsArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recommend expert agents for a planning prompt
    Agents {
        #[arg(long, value_enum, default_value = "hook")]
        format: OutputFormat,
    },

    /// Suggest skills from skill-rules.json for a prompt and its open files
    Skills {
        #[arg(long, value_enum, default_value = "hook")]
        format: OutputFormat,
    },

    /// Record a session lifecycle event
    Log {
        #[arg(value_enum)]
        command: LogCommand,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Claude Code hook response
    Hook,
    /// Machine-readable recommendation report
    Report,
}

const LOG_SUCCESS: &str = r#"{"status":"success"}"#;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            // A hook must still answer with valid JSON
            warn!("Invalid arguments: {}", e);
            println!("{{}}");
            return;
        }
    };

    let output = match run(&cli) {
        Ok(output) => output,
        Err(e) => {
            error!("Error: {}", e);
            fallback_output(&cli.command)
        }
    };

    println!("{}", output);
}

/// Well-formed output when anything upstream failed
fn fallback_output(command: &Command) -> String {
    match command {
        Command::Log { .. } => LOG_SUCCESS.to_string(),
        _ => "{}".to_string(),
    }
}

fn run(cli: &Cli) -> Result<String> {
    match cli.command {
        // The static catalog needs no config paths
        Command::Agents { format } => Ok(agents_output(&read_stdin()?, format)),
        Command::Skills { format } => {
            let settings = resolve_settings(&cli.settings)?;
            let raw = read_stdin()?;
            let rules = RuleSet::load(&settings.rules_path);
            Ok(skills_output(&raw, &rules, format))
        }
        Command::Log { command } => {
            let settings = resolve_settings(&cli.settings)?;
            // Interactive use has no payload; don't block on a terminal
            let input = if io::stdin().is_terminal() {
                None
            } else {
                read_stdin().ok().as_deref().and_then(hook::read_input)
            };
            log_session_event(&settings, command, input.as_ref());
            Ok(LOG_SUCCESS.to_string())
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw)?;
    debug!("Received input: {}", raw);
    Ok(raw)
}

fn resolve_settings(args: &SettingsArgs) -> Result<Settings> {
    let settings = Settings::resolve(args)?;
    debug!("Settings: {:?}", settings);
    Ok(settings)
}

fn agents_output(raw: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Hook => hook::run_agents(raw).to_json(),
        OutputFormat::Report => hook::agent_report(raw).to_value().to_string(),
    }
}

fn skills_output(raw: &str, rules: &RuleSet, format: OutputFormat) -> String {
    match format {
        OutputFormat::Hook => hook::run_skills(raw, rules).to_json(),
        OutputFormat::Report => hook::skill_report(raw, rules).to_value().to_string(),
    }
}

fn log_session_event(settings: &Settings, command: LogCommand, input: Option<&HookInput>) {
    let mirror = settings.mirror.then(Mirror::default);
    let logger = EventLogger::new(settings.log_dir.clone(), settings.session_id.clone(), mirror);
    let (event_type, data) = session_log::session_event(command, input);
    logger.log(event_type, data);
}
