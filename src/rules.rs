//! Skill activation rules loaded from `skill-rules.json`.
//!
//! The file is either a bare array of rule objects or `{"rules": [...]}`.
//! Anything else, a missing file, or malformed JSON resolves to an empty
//! rule-set. Individual rules that fail to decode are skipped.

use crate::error::{HookError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Priority used when a rule does not set one
pub const DEFAULT_PRIORITY: i64 = 5;

fn default_priority() -> i64 {
    DEFAULT_PRIORITY
}

/// A single skill activation rule
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SkillRule {
    /// Name of the skill to suggest
    pub skill: String,

    /// Case-insensitive substrings of the prompt
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Glob-ish patterns matched against open file paths
    #[serde(default)]
    pub file_patterns: Vec<String>,

    /// Higher wins
    #[serde(default = "default_priority")]
    pub priority: i64,

    #[serde(default)]
    pub reason: Option<String>,
}

impl SkillRule {
    pub fn reason(&self) -> String {
        match &self.reason {
            Some(reason) => reason.clone(),
            None => format!("Detected context for {}", self.skill),
        }
    }
}

/// Accepted top-level shapes of the rule file
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RuleDocument {
    Bare(Vec<Value>),
    Wrapped { rules: Vec<Value> },
}

/// Immutable rule-set for one invocation
#[derive(Debug, Default, Clone)]
pub struct RuleSet {
    rules: Vec<SkillRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<SkillRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[SkillRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Load rules, resolving every failure to an empty set
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!("Skill rules not found at {:?}, using empty rule-set", path);
            return Self::default();
        }

        match read_rules(path) {
            Ok(rules) => {
                debug!("Loaded {} skill rules from {:?}", rules.len(), path);
                Self::new(rules)
            }
            Err(e) => {
                warn!("Failed to load skill rules: {}", e);
                Self::default()
            }
        }
    }
}

fn read_rules(path: &Path) -> Result<Vec<SkillRule>> {
    let content = fs::read_to_string(path).map_err(|e| HookError::RulesRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_rules(&content)
}

/// Decode a rule document, keeping every rule that decodes on its own
pub fn parse_rules(content: &str) -> Result<Vec<SkillRule>> {
    let document: RuleDocument =
        serde_json::from_str(content).map_err(|e| HookError::RulesParse(e.to_string()))?;

    let raw = match document {
        RuleDocument::Bare(rules) | RuleDocument::Wrapped { rules } => rules,
    };

    let rules = raw
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value::<SkillRule>(value) {
            Ok(rule) => Some(rule),
            Err(e) => {
                warn!("Skipping malformed skill rule #{}: {}", i, e);
                None
            }
        })
        .collect();

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_rules(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_bare_array() {
        let rules = parse_rules(r#"[{"skill": "pytest", "keywords": ["pytest"]}]"#).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].skill, "pytest");
        assert_eq!(rules[0].priority, DEFAULT_PRIORITY);
        assert!(rules[0].file_patterns.is_empty());
    }

    #[test]
    fn test_parse_wrapped_object() {
        let rules = parse_rules(
            r#"{"rules": [{"skill": "docker", "file_patterns": ["Dockerfile"], "priority": 8, "reason": "Dockerfile open"}]}"#,
        )
        .unwrap();
        assert_eq!(
            rules,
            vec![SkillRule {
                skill: "docker".to_string(),
                keywords: vec![],
                file_patterns: vec!["Dockerfile".to_string()],
                priority: 8,
                reason: Some("Dockerfile open".to_string()),
            }]
        );
    }

    #[test]
    fn test_unexpected_shape_is_an_error() {
        assert!(parse_rules(r#"{"skills": []}"#).is_err());
        assert!(parse_rules(r#""rules""#).is_err());
        assert!(parse_rules("not json").is_err());
    }

    #[test]
    fn test_malformed_rules_are_skipped() {
        let rules = parse_rules(
            r#"[{"keywords": ["orphan"]}, {"skill": "ok"}, {"skill": "bad", "priority": "high"}, 42]"#,
        )
        .unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].skill, "ok");
    }

    #[test]
    fn test_default_reason() {
        let rule = SkillRule {
            skill: "terraform".to_string(),
            keywords: vec![],
            file_patterns: vec![],
            priority: DEFAULT_PRIORITY,
            reason: None,
        };
        assert_eq!(rule.reason(), "Detected context for terraform");
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let rules = RuleSet::load(&dir.path().join("skill-rules.json"));
        assert!(rules.is_empty());
    }

    #[test]
    fn test_load_malformed_file_is_empty() {
        let file = write_rules("{ this is not json");
        assert!(RuleSet::load(file.path()).is_empty());
    }

    #[test]
    fn test_load_valid_file() {
        let file = write_rules(r#"[{"skill": "a"}, {"skill": "b", "priority": 9}]"#);
        let rules = RuleSet::load(file.path());
        assert_eq!(rules.rules().len(), 2);
        assert_eq!(rules.rules()[1].priority, 9);
    }
}
