use super::{has_verb_prefix, HeuristicFinding, HeuristicKind, Overlay, OverlayContext};
use crate::symbols::{SymbolKind, UsageKind};
use std::collections::HashSet;

/// Verb prefixes of factory-shaped method names.
const FACTORY_VERBS: &[&str] = &["Create", "Build", "Make", "New", "Get", "Resolve", "Generate"];

fn is_factory_name(name: &str) -> bool {
    FACTORY_VERBS.iter().any(|v| has_verb_prefix(name, v))
}

/// Factory overlay: a type returned by a factory-named method, or passed
/// as a generic argument to a factory-named call, is constructed
/// indirectly and counts as used.
pub struct FactoryOverlay;

impl Overlay for FactoryOverlay {
    fn name(&self) -> &'static str {
        "factory"
    }

    fn scan(&self, ctx: &OverlayContext<'_>) -> Vec<HeuristicFinding> {
        let mut findings = Vec::new();

        // A factory that nobody calls constructs nothing
        let invoked: HashSet<&str> = ctx
            .references
            .iter()
            .filter(|r| matches!(r.kind, UsageKind::Invocation | UsageKind::MemberAccess))
            .map(|r| r.target_name.as_str())
            .collect();

        for decl in ctx.registry.declarations() {
            if decl.kind != SymbolKind::Method || !is_factory_name(&decl.name) {
                continue;
            }
            if !invoked.contains(decl.name.as_str()) {
                continue;
            }
            let Some(returned) = &decl.type_name else {
                continue;
            };
            for target in ctx.registry.find_by_name(returned) {
                if target.kind == SymbolKind::Type {
                    findings.push(HeuristicFinding {
                        target: target.id.clone(),
                        kind: HeuristicKind::FactoryReturn,
                        file: decl.id.file.clone(),
                        line: decl.location.line,
                    });
                }
            }
        }

        // CreateInstance<Widget>() and friends
        for reference in ctx.references {
            if reference.kind != UsageKind::GenericArgument {
                continue;
            }
            let factory_call = reference
                .receiver
                .as_deref()
                .map(is_factory_name)
                .unwrap_or(false);
            if !factory_call {
                continue;
            }
            for decl in ctx.registry.find_by_name(&reference.target_name) {
                if decl.kind == SymbolKind::Type {
                    findings.push(HeuristicFinding {
                        target: decl.id.clone(),
                        kind: HeuristicKind::FactoryReturn,
                        file: reference.file.clone(),
                        line: reference.line,
                    });
                }
            }
        }

        findings
    }
}
