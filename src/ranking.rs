//! Scoring and top-K selection for both recommender variants.
//!
//! Agents accumulate the weight of every category that triggered them.
//! Skills keep the highest priority among their matching rules. Both sorts
//! are stable so ties keep first-detected order.

use crate::catalog::category_weight;
use crate::detector::{Detection, SkillHit};

/// Maximum number of agents to recommend
pub const MAX_AGENTS: usize = 6;

/// Maximum number of skills to suggest
pub const MAX_SKILLS: usize = 3;

/// An agent with its accumulated category weight (hundredths)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredAgent {
    pub name: &'static str,
    pub score: u32,
}

impl ScoredAgent {
    /// Score on the 0.0..=1.0-ish scale the weight table is written in
    pub fn weight(&self) -> f64 {
        f64::from(self.score) / 100.0
    }
}

/// Sum category weights per agent, in first-detected order
pub fn score_agents(detection: &Detection) -> Vec<ScoredAgent> {
    let mut scores: Vec<ScoredAgent> = Vec::new();

    for category in &detection.categories {
        let weight = category_weight(category.name);
        for &agent in &category.agents {
            match scores.iter_mut().find(|s| s.name == agent) {
                Some(existing) => existing.score += weight,
                None => scores.push(ScoredAgent {
                    name: agent,
                    score: weight,
                }),
            }
        }
    }

    scores
}

/// Highest scores first, zero scores dropped, at most `limit` entries
pub fn select_top(mut scores: Vec<ScoredAgent>, limit: usize) -> Vec<ScoredAgent> {
    scores.retain(|s| s.score > 0);
    scores.sort_by(|a, b| b.score.cmp(&a.score));
    scores.truncate(limit);
    scores
}

/// Collapse hits to one entry per skill (max priority), then rank
pub fn rank_skills(hits: Vec<SkillHit>, limit: usize) -> Vec<SkillHit> {
    let mut best: Vec<SkillHit> = Vec::new();

    for hit in hits {
        match best.iter_mut().find(|b| b.skill == hit.skill) {
            // Strictly greater so the first reason at a tied priority wins
            Some(existing) if hit.priority > existing.priority => *existing = hit,
            Some(_) => {}
            None => best.push(hit),
        }
    }

    best.sort_by(|a, b| b.priority.cmp(&a.priority));
    best.truncate(limit);
    best
}
