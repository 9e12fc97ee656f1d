//! Claude Code hook framing: stdin payload in, advisory JSON out.
//!
//! Nothing here fails. Missing or malformed input, prompts that do not look
//! like planning requests, and empty rankings all produce `{}`.

use crate::catalog::{AGENT_CATALOG, INTENT_KEYWORDS};
use crate::detector::{detect_agents, detect_skills};
use crate::ranking::{rank_skills, score_agents, select_top, MAX_AGENTS, MAX_SKILLS};
use crate::report::Report;
use crate::rules::RuleSet;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Prompts shorter than this (trimmed, in chars) are not analysed
pub const MIN_PROMPT_CHARS: usize = 20;

/// Event name Claude Code expects alongside additional context
const HOOK_EVENT_NAME: &str = "UserPromptSubmit";

/// Payload from a Claude Code hook
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookInput {
    /// The user's prompt text
    #[serde(default)]
    pub prompt: String,

    /// Files open in the editor
    #[serde(default)]
    pub open_files: Vec<String>,

    /// Tool name for PostToolUse-style events
    #[serde(default)]
    pub tool_name: Option<String>,

    /// Raw tool input
    #[serde(default)]
    pub input: Option<Value>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub hook_event_name: String,
    pub additional_context: String,
}

/// Hook response; serialises to `{}` when there is nothing to add
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HookOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook_specific_output: Option<HookSpecificOutput>,
}

impl HookOutput {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_context(context: String) -> Self {
        Self {
            hook_specific_output: Some(HookSpecificOutput {
                hook_event_name: HOOK_EVENT_NAME.to_string(),
                additional_context: context,
            }),
        }
    }

    pub fn from_report(report: &Report) -> Self {
        match report.summary() {
            Some(context) => Self::with_context(context),
            None => Self::empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hook_specific_output.is_none()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Parse hook stdin; empty or invalid input is `None`
pub fn read_input(raw: &str) -> Option<HookInput> {
    if raw.trim().is_empty() {
        debug!("Empty hook input");
        return None;
    }

    match serde_json::from_str::<HookInput>(raw) {
        Ok(input) => Some(input),
        Err(e) => {
            warn!("Ignoring malformed hook input: {}", e);
            None
        }
    }
}

/// Long enough and phrased like a planning request
pub fn is_planning_prompt(prompt: &str) -> bool {
    if prompt.trim().chars().count() < MIN_PROMPT_CHARS {
        return false;
    }
    let lower = prompt.to_lowercase();
    INTENT_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

fn preview(prompt: &str) -> String {
    prompt.chars().take(50).collect()
}

/// Agent orchestrator: weighted category scoring over the static catalog
pub fn agent_report(raw: &str) -> Report {
    let Some(input) = read_input(raw) else {
        return Report::Empty;
    };

    if !is_planning_prompt(&input.prompt) {
        debug!("Skipping non-planning prompt: {}", preview(&input.prompt));
        return Report::Empty;
    }

    info!("Analysing prompt: {}", preview(&input.prompt));

    let detection = detect_agents(&input.prompt, AGENT_CATALOG);
    debug!("Matched categories: {:?}", detection.matched_categories());

    let ranked = select_top(score_agents(&detection), MAX_AGENTS);
    for (i, agent) in ranked.iter().enumerate() {
        info!(
            "{} {} {} (score: {:.2})",
            "🤖".blue(),
            (i + 1).to_string().dimmed(),
            agent.name.bold(),
            agent.weight()
        );
    }

    Report::agents(&input.prompt, &detection, &ranked)
}

/// Skill activation: rule priority ranking over an external rule-set
pub fn skill_report(raw: &str, rules: &RuleSet) -> Report {
    let Some(input) = read_input(raw) else {
        return Report::Empty;
    };

    if !is_planning_prompt(&input.prompt) {
        debug!("Skipping non-planning prompt: {}", preview(&input.prompt));
        return Report::Empty;
    }

    if rules.is_empty() {
        debug!("No skill rules loaded");
        return Report::Empty;
    }

    let hits = detect_skills(&input.prompt, &input.open_files, rules.rules());
    debug!("{} skill rules matched", hits.len());

    let ranked = rank_skills(hits, MAX_SKILLS);
    for hit in &ranked {
        info!(
            "{} {} [priority {}] - {}",
            "📚".green(),
            hit.skill.bold(),
            hit.priority,
            hit.reason
        );
    }

    Report::skills(&ranked)
}

pub fn run_agents(raw: &str) -> HookOutput {
    HookOutput::from_report(&agent_report(raw))
}

pub fn run_skills(raw: &str, rules: &RuleSet) -> HookOutput {
    HookOutput::from_report(&skill_report(raw, rules))
}
