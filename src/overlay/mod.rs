//! Heuristic overlays: additive usage evidence for patterns the baseline
//! resolver cannot see (DI containers, factories, lambda bodies, local
//! data flow, interface dispatch).
//!
//! Overlays only ever add to the used set. Disabling an overlay removes
//! its findings and nothing else.

mod data_flow;
mod factory;
mod interface_impl;
mod lambda;
mod registration;

pub use interface_impl::InterfacePropagator;

use crate::config::Config;
use crate::evidence::UnitTokens;
use crate::symbols::{SymbolId, SymbolRegistry, UsageReference};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::debug;

/// Which overlay produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeuristicKind {
    Registration,
    ConstructorInjection,
    InjectionMarker,
    InterfaceImplementation,
    FactoryReturn,
    DataFlow,
    LambdaBody,
}

impl HeuristicKind {
    pub fn label(&self) -> &'static str {
        match self {
            HeuristicKind::Registration => "DI registration",
            HeuristicKind::ConstructorInjection => "constructor injection",
            HeuristicKind::InjectionMarker => "injection attribute",
            HeuristicKind::InterfaceImplementation => "interface implementation",
            HeuristicKind::FactoryReturn => "factory return",
            HeuristicKind::DataFlow => "data flow",
            HeuristicKind::LambdaBody => "lambda body",
        }
    }
}

/// One piece of overlay evidence tying a tracked symbol to a usage site.
#[derive(Debug, Clone)]
pub struct HeuristicFinding {
    pub target: SymbolId,
    pub kind: HeuristicKind,
    pub file: PathBuf,
    pub line: usize,
}

/// Read-only view the overlays scan.
pub struct OverlayContext<'a> {
    pub registry: &'a SymbolRegistry,
    pub units: &'a [UnitTokens],
    pub references: &'a [UsageReference],
}

pub trait Overlay: Sync {
    fn name(&self) -> &'static str;

    fn scan(&self, ctx: &OverlayContext<'_>) -> Vec<HeuristicFinding>;
}

/// Runs the configured overlays and merges their findings.
pub struct OverlayEngine {
    overlays: Vec<Box<dyn Overlay>>,
}

impl OverlayEngine {
    pub fn from_config(config: &Config) -> Self {
        let mut overlays: Vec<Box<dyn Overlay>> = Vec::new();
        if config.enable_di_heuristics {
            overlays.push(Box::new(registration::RegistrationOverlay));
            overlays.push(Box::new(factory::FactoryOverlay));
        }
        if config.enable_data_flow_heuristics {
            overlays.push(Box::new(data_flow::DataFlowOverlay));
            overlays.push(Box::new(lambda::LambdaOverlay));
        }
        Self { overlays }
    }

    pub fn run(&self, ctx: &OverlayContext<'_>) -> Vec<HeuristicFinding> {
        let findings: Vec<HeuristicFinding> = self
            .overlays
            .par_iter()
            .flat_map(|overlay| {
                let found = overlay.scan(ctx);
                debug!("overlay {} produced {} findings", overlay.name(), found.len());
                found
            })
            .collect();
        findings
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }
}

/// The symbols an overlay run marks as used.
pub fn used_from_findings(findings: &[HeuristicFinding]) -> HashSet<SymbolId> {
    findings.iter().map(|f| f.target.clone()).collect()
}

/// `name` starts with `prefix` and the character after the prefix (if any)
/// is uppercase. Keeps `Address` from matching the `Add` prefix.
pub(crate) fn has_verb_prefix(name: &str, prefix: &str) -> bool {
    if !name.starts_with(prefix) {
        return false;
    }
    name[prefix.len()..]
        .chars()
        .next()
        .map(|c| c.is_ascii_uppercase())
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_prefix_boundary() {
        assert!(has_verb_prefix("AddScoped", "Add"));
        assert!(has_verb_prefix("Add", "Add"));
        assert!(!has_verb_prefix("Address", "Add"));
        assert!(!has_verb_prefix("Radd", "Add"));
    }

    #[test]
    fn test_heuristic_kind_labels() {
        assert_eq!(HeuristicKind::Registration.label(), "DI registration");
        assert_eq!(HeuristicKind::FactoryReturn.label(), "factory return");
        assert_eq!(HeuristicKind::LambdaBody.label(), "lambda body");
    }

    #[test]
    fn test_engine_respects_toggles() {
        let mut config = Config::default();
        let engine = OverlayEngine::from_config(&config);
        assert_eq!(engine.overlay_count(), 4);

        config.enable_di_heuristics = false;
        let engine = OverlayEngine::from_config(&config);
        assert_eq!(engine.overlay_count(), 2);

        config.enable_data_flow_heuristics = false;
        let engine = OverlayEngine::from_config(&config);
        assert_eq!(engine.overlay_count(), 0);
    }
}
