//! Dead-symbol analysis: scoring and the phase-driven engine.

mod engine;

pub use engine::AnalysisEngine;

use crate::symbols::{Declaration, Location, SymbolId, SymbolKind};
use serde::{Deserialize, Serialize};

/// Phases of one analysis run, in order. The engine only ever moves
/// forward through these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AnalysisPhase {
    Collecting,
    Resolving,
    Scored,
    Aggregated,
}

impl AnalysisPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisPhase::Collecting => "collecting",
            AnalysisPhase::Resolving => "resolving",
            AnalysisPhase::Scored => "scored",
            AnalysisPhase::Aggregated => "aggregated",
        }
    }
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One symbol reported dead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadCandidate {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    pub accessibility: String,
    pub location: Location,
    /// Confidence score, clamped to 10..=95. Heuristic analysis never
    /// reaches certainty in either direction.
    pub confidence: u8,
    pub reason: String,
    pub project: String,
}

/// Confidence bucket boundaries are reporting sugar only; filtering and
/// sorting use the raw score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBucket {
    High,
    Medium,
    Low,
}

impl ConfidenceBucket {
    pub fn of(confidence: u8) -> Self {
        match confidence {
            80.. => ConfidenceBucket::High,
            60..=79 => ConfidenceBucket::Medium,
            _ => ConfidenceBucket::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceBucket::High => "high",
            ConfidenceBucket::Medium => "medium",
            ConfidenceBucket::Low => "low",
        }
    }
}

/// Score a dead finding: start at 70, reward tight accessibility, punish
/// the dynamic-dispatch escape hatches heuristic evidence cannot see.
pub fn confidence_for(decl: &Declaration) -> u8 {
    use crate::symbols::Accessibility;

    let mut score: i32 = 70;
    match decl.accessibility {
        Accessibility::Private => score += 20,
        Accessibility::Protected => score -= 30,
        _ => {}
    }
    if decl.is_virtual || decl.is_abstract {
        score -= 20;
    }
    score.clamp(10, 95) as u8
}

pub fn reason_for(decl: &Declaration) -> String {
    format!(
        "No references found to this {} {}.",
        decl.accessibility.label(),
        decl.kind.label()
    )
}
