//! Rendering of ranked recommendations.
//!
//! Each report has a machine-readable form (serde) and a markdown summary
//! that the hook injects as additional context. An empty ranking renders as
//! [`Report::Empty`] so callers can tell "nothing to suggest" from failure.

use crate::catalog::{describe_agent, INSTALL_SOURCE};
use crate::detector::{Detection, SkillHit};
use crate::ranking::ScoredAgent;
use serde::Serialize;
use std::fmt::Write;

/// Rough marginal context cost of one installed agent
pub const TOKENS_PER_AGENT: usize = 650;

/// Rough marginal context cost of one activated skill
pub const TOKENS_PER_SKILL: usize = 650;

/// Description for a skill whose rule gives no reason text
pub const FALLBACK_SKILL_DESCRIPTION: &str = "Specialized skill";

/// Prompt prefix echoed back in the agent analysis
const REQUIREMENTS_PREVIEW_CHARS: usize = 200;

const NEXT_STEPS: [&str; 4] = [
    "Review recommended agents above",
    "Confirm installation (agents will be installed automatically)",
    "Restart Claude Code when prompted",
    "Continue with /speckit.plan with expert agents available",
];

pub fn estimate_token_overhead(agent_count: usize) -> usize {
    agent_count * TOKENS_PER_AGENT
}

pub fn estimate_skill_overhead(skill_count: usize) -> usize {
    skill_count * TOKENS_PER_SKILL
}

pub fn install_command(agent: &str) -> String {
    format!("/plugin install {}@{}", agent, INSTALL_SOURCE)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Analysis {
    pub requirements_detected: String,
    pub agents_recommended: usize,
    pub estimated_token_overhead: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AgentEntry {
    pub name: String,
    pub description: String,
    pub score: f64,
    pub estimated_tokens: usize,
    pub install_command: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AgentReport {
    pub analysis: Analysis,
    pub detected_categories: Vec<String>,
    pub agents: Vec<AgentEntry>,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkillEntry {
    pub skill: String,
    pub description: String,
    pub priority: i64,
    pub reason: String,
    pub estimated_tokens: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SkillReport {
    pub skills: Vec<SkillEntry>,
    pub estimated_token_overhead: usize,
}

/// Outcome of a recommender run
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Report {
    Agents(AgentReport),
    Skills(SkillReport),
    Empty,
}

impl Report {
    pub fn agents(prompt: &str, detection: &Detection, ranked: &[ScoredAgent]) -> Self {
        if ranked.is_empty() {
            return Report::Empty;
        }

        let agents = ranked
            .iter()
            .map(|agent| AgentEntry {
                name: agent.name.to_string(),
                description: describe_agent(agent.name).to_string(),
                score: agent.weight(),
                estimated_tokens: TOKENS_PER_AGENT,
                install_command: install_command(agent.name),
            })
            .collect();

        Report::Agents(AgentReport {
            analysis: Analysis {
                requirements_detected: prompt.chars().take(REQUIREMENTS_PREVIEW_CHARS).collect(),
                agents_recommended: ranked.len(),
                estimated_token_overhead: estimate_token_overhead(ranked.len()),
            },
            detected_categories: detection
                .matched_categories()
                .into_iter()
                .map(String::from)
                .collect(),
            agents,
            next_steps: NEXT_STEPS.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn skills(ranked: &[SkillHit]) -> Self {
        if ranked.is_empty() {
            return Report::Empty;
        }

        Report::Skills(SkillReport {
            skills: ranked
                .iter()
                .map(|hit| SkillEntry {
                    skill: hit.skill.clone(),
                    description: describe_skill(&hit.reason),
                    priority: hit.priority,
                    reason: hit.reason.clone(),
                    estimated_tokens: TOKENS_PER_SKILL,
                })
                .collect(),
            estimated_token_overhead: estimate_skill_overhead(ranked.len()),
        })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Report::Empty)
    }

    /// Markdown summary for the hook's additional context, `None` when empty
    pub fn summary(&self) -> Option<String> {
        match self {
            Report::Agents(report) => Some(render_agent_summary(report)),
            Report::Skills(report) => Some(render_skill_summary(report)),
            Report::Empty => None,
        }
    }

    /// Machine-readable form; the empty report is `{}`
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Report::Empty => serde_json::json!({}),
            other => serde_json::to_value(other).unwrap_or_else(|_| serde_json::json!({})),
        }
    }
}

fn describe_skill(reason: &str) -> String {
    if reason.trim().is_empty() {
        FALLBACK_SKILL_DESCRIPTION.to_string()
    } else {
        reason.to_string()
    }
}

fn render_agent_summary(report: &AgentReport) -> String {
    let mut out = String::new();

    // write! into a String cannot fail
    let _ = write!(
        out,
        "\n\n🤖 **Agent Orchestrator Analysis**\n\nDetected project requirements:\n{}\n\n📦 Recommended Agents ({}):\n",
        report.detected_categories.join(", "),
        report.agents.len()
    );

    for (i, agent) in report.agents.iter().enumerate() {
        let _ = write!(out, "\n{}. **{}** - {}", i + 1, agent.name, agent.description);
    }

    let _ = write!(
        out,
        "\n\n💡 Token overhead: ~{} tokens\n\n\
         Would you like me to:\n\
         1. Install these agents automatically\n\
         2. Customize the selection\n\
         3. Skip agent orchestration\n\n\
         Note: After installation, you'll need to restart Claude Code to activate agents.\n",
        report.analysis.estimated_token_overhead
    );

    out
}

fn render_skill_summary(report: &SkillReport) -> String {
    let mut out = String::from("\n\nRelevant skills detected:\n");
    for (i, entry) in report.skills.iter().enumerate() {
        let _ = writeln!(out, "{}. **{}** - {}", i + 1, entry.skill, entry.description);
    }
    let _ = writeln!(
        out,
        "\nToken overhead: ~{} tokens",
        report.estimated_token_overhead
    );
    out
}
