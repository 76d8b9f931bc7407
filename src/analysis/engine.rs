use super::{confidence_for, reason_for, AnalysisPhase, DeadCandidate};
use crate::config::Config;
use crate::discovery::SourceUnit;
use crate::error::AnalysisError;
use crate::evidence::{Evidence, EvidenceSource, HeuristicSource, UnitTokens};
use crate::exclusion::ExclusionPolicy;
use crate::overlay::{used_from_findings, InterfacePropagator, OverlayContext, OverlayEngine};
use crate::report::{Aggregator, RunReport, UnitFailure};
use crate::resolve::UsageResolver;
use crate::symbols::{
    Declaration, EvidenceMode, SymbolId, SymbolKind, SymbolRegistry, UsageReference,
};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Orchestrates one full analysis run over a set of source units.
///
/// The run moves through the phases in order: collect evidence per unit
/// in parallel, merge and resolve into a usage graph, score the dead set,
/// aggregate into a report. Units are independent until the merge, so the
/// collect phase is a plain parallel map.
pub struct AnalysisEngine {
    config: Config,
    policy: ExclusionPolicy,
    overlays: OverlayEngine,
    source: Box<dyn EvidenceSource>,
}

struct CollectedUnit {
    path: PathBuf,
    project: String,
    evidence: Evidence,
}

enum CollectOutcome {
    Analyzed(Box<CollectedUnit>),
    Excluded,
    Failed(UnitFailure),
}

impl AnalysisEngine {
    pub fn new(config: Config) -> Self {
        let policy = ExclusionPolicy::from_config(&config);
        let overlays = OverlayEngine::from_config(&config);
        Self { config, policy, overlays, source: Box::new(HeuristicSource::new()) }
    }

    /// Swap in a different evidence source (a semantic front-end). The
    /// heuristic extractor remains the per-unit fallback.
    pub fn with_source(mut self, source: Box<dyn EvidenceSource>) -> Self {
        self.source = source;
        self
    }

    pub fn run(&self, units: &[SourceUnit]) -> RunReport {
        let started = Instant::now();
        info!(phase = %AnalysisPhase::Collecting, "analyzing {} source units", units.len());

        let fallback = HeuristicSource::new();
        let outcomes: Vec<CollectOutcome> = units
            .par_iter()
            .map(|unit| self.collect_unit(unit, &fallback))
            .collect();

        let mut collected: Vec<CollectedUnit> = Vec::new();
        let mut errors: Vec<String> = Vec::new();
        let mut failures: Vec<UnitFailure> = Vec::new();
        let mut excluded = 0usize;
        for outcome in outcomes {
            match outcome {
                CollectOutcome::Analyzed(unit) => collected.push(*unit),
                CollectOutcome::Excluded => excluded += 1,
                CollectOutcome::Failed(failure) => {
                    warn!("{}", failure.error);
                    errors.push(failure.error.clone());
                    failures.push(failure);
                }
            }
        }

        if collected.is_empty() {
            let err = AnalysisError::NoAnalyzableUnits;
            warn!("{err}");
            errors.push(err.to_string());
            return RunReport::failed(errors, units.len(), excluded, started.elapsed());
        }

        // Merge: registry, reference pool, token streams, entry points
        let mut registry = SymbolRegistry::new(self.source.mode());
        let mut references: Vec<UsageReference> = Vec::new();
        let mut unit_tokens: Vec<UnitTokens> = Vec::new();
        let mut projects: HashMap<PathBuf, String> = HashMap::new();
        let mut entry_points: Vec<Declaration> = Vec::new();

        for unit in collected {
            projects.insert(unit.path.clone(), unit.project);
            for decl in unit.evidence.declarations {
                if decl.is_entry_point() {
                    entry_points.push(decl.clone());
                }
                registry.register(decl);
            }
            references.extend(unit.evidence.references);
            unit_tokens.push(UnitTokens { path: unit.path, tokens: unit.evidence.tokens });
        }
        debug!("registry holds {} tracked symbols", registry.len());

        info!(phase = %AnalysisPhase::Resolving, "resolving usage");
        let graph = UsageResolver::new(&registry).resolve(&references);

        let ctx = OverlayContext {
            registry: &registry,
            units: &unit_tokens,
            references: &references,
        };
        let findings = self.overlays.run(&ctx);
        let mut overlay_used = used_from_findings(&findings);

        // Types hosting an entry point are roots
        for main in &entry_points {
            if let Some(container) = &main.containing_type {
                for decl in registry.find_by_name(container) {
                    if decl.kind == SymbolKind::Type && decl.id.file == main.id.file {
                        overlay_used.insert(decl.id.clone());
                    }
                }
            }
        }

        let propagated = InterfacePropagator::propagate(&registry, &graph, &overlay_used);
        for finding in findings.iter().chain(propagated.iter()) {
            debug!(
                "{} kept by {} evidence ({}:{})",
                finding.target,
                finding.kind.label(),
                finding.file.display(),
                finding.line
            );
        }
        overlay_used.extend(propagated.iter().map(|f| f.target.clone()));

        info!(phase = %AnalysisPhase::Scored, "scoring candidates");
        let candidates = self.score(&registry, &graph.used_set(), &overlay_used, &projects);

        info!(phase = %AnalysisPhase::Aggregated, "aggregating report");
        Aggregator::new(&registry, &projects).aggregate(
            candidates,
            errors,
            failures,
            units.len(),
            excluded,
            started.elapsed(),
        )
    }

    fn collect_unit(&self, unit: &SourceUnit, fallback: &HeuristicSource) -> CollectOutcome {
        let failed = |err: AnalysisError| {
            CollectOutcome::Failed(UnitFailure {
                file: unit.path.clone(),
                project: unit.project.clone(),
                error: err.to_string(),
            })
        };

        let text = match unit.read_text() {
            Ok(text) => text,
            Err(err) => return failed(err),
        };
        if let Some(reason) = self.policy.excluded(unit, &text) {
            debug!("excluded {} file {}", reason.label(), unit.path.display());
            return CollectOutcome::Excluded;
        }

        let evidence = match self.source.extract(&unit.path, &text) {
            Ok(evidence) => evidence,
            Err(err) => {
                // Per-unit degradation: one unit falling back never fails
                // the run
                warn!("{err}; falling back to heuristic extraction");
                match fallback.extract(&unit.path, &text) {
                    Ok(evidence) => evidence,
                    Err(err) => return failed(err),
                }
            }
        };

        CollectOutcome::Analyzed(Box::new(CollectedUnit {
            path: unit.path.clone(),
            project: unit.project.clone(),
            evidence,
        }))
    }

    /// Dead = tracked − used − overlay-used − exempt, minus the absolute
    /// guard: a public non-extension member is never reported, whatever
    /// the evidence says.
    fn score(
        &self,
        registry: &SymbolRegistry,
        used: &HashSet<SymbolId>,
        overlay_used: &HashSet<SymbolId>,
        projects: &HashMap<PathBuf, String>,
    ) -> Vec<DeadCandidate> {
        use crate::symbols::Accessibility;

        let mut candidates: Vec<DeadCandidate> = registry
            .declarations()
            .filter(|decl| {
                !used.contains(&decl.id)
                    && !overlay_used.contains(&decl.id)
                    && !self.policy.exempt(decl)
                    && !(decl.kind.is_member()
                        && decl.accessibility == Accessibility::Public
                        && !decl.is_extension)
            })
            .map(|decl| DeadCandidate {
                id: decl.id.clone(),
                name: decl.name.clone(),
                kind: decl.kind,
                accessibility: decl.accessibility.label().to_string(),
                location: decl.location.clone(),
                confidence: confidence_for(decl),
                reason: reason_for(decl),
                project: projects
                    .get(&decl.id.file)
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
            })
            .filter(|c| c.confidence >= self.config.min_confidence)
            .collect();

        candidates.sort_by(|a, b| {
            (&a.location.file, a.location.line).cmp(&(&b.location.file, b.location.line))
        });
        candidates
    }
}
