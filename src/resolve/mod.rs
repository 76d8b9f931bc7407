//! Baseline usage resolution: turning raw references into usage-graph
//! edges against the registry.

use crate::symbols::{EvidenceMode, SymbolRegistry, UsageGraph, UsageReference};
use tracing::debug;

/// Resolves references to tracked symbols and builds the usage graph.
///
/// Exact evidence carries resolved target identities and maps one-to-one.
/// Heuristic evidence matches by simple name: a name that occurs anywhere
/// marks every same-named tracked symbol as used, trading precision for
/// recall. References tagged with a receiver (generic arguments of an
/// invocation) and non-baseline contexts are left to the overlays.
pub struct UsageResolver<'a> {
    registry: &'a SymbolRegistry,
}

impl<'a> UsageResolver<'a> {
    pub fn new(registry: &'a SymbolRegistry) -> Self {
        Self { registry }
    }

    pub fn resolve(&self, references: &[UsageReference]) -> UsageGraph {
        let mut graph = UsageGraph::new();
        for reference in references {
            self.resolve_one(reference, &mut graph);
        }
        debug!(
            "resolved {} references into {} edges and {} roots",
            references.len(),
            graph.edge_count(),
            graph.root_count()
        );
        graph
    }

    fn resolve_one(&self, reference: &UsageReference, graph: &mut UsageGraph) {
        if !reference.kind.is_baseline() || reference.receiver.is_some() {
            return;
        }

        let source = self
            .registry
            .enclosing(&reference.file, reference.line)
            .map(|d| d.id.clone());

        match self.registry.mode() {
            EvidenceMode::Exact => {
                let Some(target) = &reference.target else {
                    return;
                };
                if self.registry.contains(target) {
                    graph.add_usage(source.as_ref(), target, reference.kind, reference.line);
                }
            }
            EvidenceMode::Heuristic => {
                for decl in self.registry.find_by_name(&reference.target_name) {
                    graph.add_usage(source.as_ref(), &decl.id, reference.kind, reference.line);
                }
            }
        }
    }
}
