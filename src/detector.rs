//! Detection: turn prompt text and open file paths into raw matches.
//!
//! Agent detection scans every category of the catalog with plain
//! case-insensitive substring checks. Skill detection evaluates each rule
//! independently and keeps every hit; collapsing happens in `ranking`.

use crate::catalog::Category;
use crate::rules::SkillRule;
use glob::Pattern;

/// Agents triggered within a single category, in first-detected order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMatch {
    pub name: &'static str,
    pub agents: Vec<&'static str>,
}

impl CategoryMatch {
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

/// Per-category match sets for one prompt, in catalog scan order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    pub categories: Vec<CategoryMatch>,
}

impl Detection {
    /// Names of categories that matched at least one keyword
    pub fn matched_categories(&self) -> Vec<&'static str> {
        self.categories
            .iter()
            .filter(|c| !c.is_empty())
            .map(|c| c.name)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(CategoryMatch::is_empty)
    }
}

/// Scan `text` against every category of `catalog`
pub fn detect_agents(text: &str, catalog: &[Category]) -> Detection {
    let text_lower = text.to_lowercase();

    let categories = catalog
        .iter()
        .map(|category| {
            let mut agents: Vec<&'static str> = Vec::new();
            for (keyword, triggered) in category.entries {
                if keyword.is_empty() || !text_lower.contains(&keyword.to_lowercase()) {
                    continue;
                }
                for &agent in *triggered {
                    if !agents.contains(&agent) {
                        agents.push(agent);
                    }
                }
            }
            CategoryMatch {
                name: category.name,
                agents,
            }
        })
        .collect();

    Detection { categories }
}

/// A rule that fired, carrying its priority and reason through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillHit {
    pub skill: String,
    pub priority: i64,
    pub reason: String,
}

/// Evaluate every rule against the prompt and the open files
pub fn detect_skills(prompt: &str, open_files: &[String], rules: &[SkillRule]) -> Vec<SkillHit> {
    let prompt_lower = prompt.to_lowercase();

    rules
        .iter()
        .filter(|rule| rule_matches(&prompt_lower, open_files, rule))
        .map(|rule| SkillHit {
            skill: rule.skill.clone(),
            priority: rule.priority,
            reason: rule.reason(),
        })
        .collect()
}

fn rule_matches(prompt_lower: &str, open_files: &[String], rule: &SkillRule) -> bool {
    let keyword_match = rule
        .keywords
        .iter()
        .filter(|kw| !kw.is_empty())
        .any(|kw| prompt_lower.contains(&kw.to_lowercase()));

    keyword_match
        || open_files.iter().any(|path| {
            rule.file_patterns
                .iter()
                .any(|pattern| path_matches(pattern, path))
        })
}

/// Forgiving file pattern match.
///
/// Both sides have `\` normalised to `/`. The pattern matches when the glob
/// `*pattern*` matches, when the bare glob matches, or when the path simply
/// ends with the pattern text. `*` crosses directory separators, fnmatch style.
pub fn path_matches(pattern: &str, path: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }

    let pattern = pattern.replace('\\', "/");
    let path = path.replace('\\', "/");

    glob_matches(&format!("*{}*", pattern), &path)
        || glob_matches(&pattern, &path)
        || path.ends_with(&pattern)
}

/// Collapse runs of `*` into one. With `require_literal_separator` off a
/// single `*` already spans `/`, and the glob crate rejects `**` that is not
/// a whole path component (`**.ts*`, `*Docker**`).
fn collapse_stars(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && out.ends_with('*') {
            continue;
        }
        out.push(c);
    }
    out
}

fn glob_matches(pattern: &str, path: &str) -> bool {
    // Anything still rejected (e.g. an unclosed "[") just fails this branch
    match Pattern::new(&collapse_stars(pattern)) {
        Ok(p) => p.matches(path),
        Err(_) => false,
    }
}
