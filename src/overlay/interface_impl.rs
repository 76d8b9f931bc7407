use super::{HeuristicFinding, HeuristicKind};
use crate::symbols::{SymbolId, SymbolKind, SymbolRegistry, UsageGraph};
use std::collections::HashSet;
use tracing::debug;

/// Interface/base-type propagation, always on.
///
/// A type whose interface or base class is in use is reachable through
/// dispatch even when nothing names the concrete type. Propagation runs
/// to a fixed point so that chains (interface → base class → subclass)
/// resolve fully.
///
/// A class's own base-list mention of its interface is not enough: the
/// super type must be used from somewhere other than the class itself,
/// otherwise every `class C : I` pair would keep itself alive.
pub struct InterfacePropagator;

impl InterfacePropagator {
    pub fn propagate(
        registry: &SymbolRegistry,
        graph: &UsageGraph,
        overlay_used: &HashSet<SymbolId>,
    ) -> Vec<HeuristicFinding> {
        let mut findings = Vec::new();
        let mut propagated: HashSet<SymbolId> = HashSet::new();

        loop {
            let mut changed = false;

            for decl in registry.declarations() {
                if decl.kind != SymbolKind::Type || propagated.contains(&decl.id) {
                    continue;
                }
                let super_used = decl.super_types.iter().any(|name| {
                    registry.find_by_name(name).iter().any(|sup| {
                        sup.kind == SymbolKind::Type
                            && (overlay_used.contains(&sup.id)
                                || propagated.contains(&sup.id)
                                || graph.used_excluding(&sup.id, &decl.id))
                    })
                });
                if super_used {
                    propagated.insert(decl.id.clone());
                    findings.push(HeuristicFinding {
                        target: decl.id.clone(),
                        kind: HeuristicKind::InterfaceImplementation,
                        file: decl.id.file.clone(),
                        line: decl.location.line,
                    });
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        debug!("interface propagation marked {} types", propagated.len());
        findings
    }
}
