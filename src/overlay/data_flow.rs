use super::{HeuristicFinding, HeuristicKind, Overlay, OverlayContext};
use crate::lexer::{self, Token, TokenKind};
use crate::symbols::{SymbolKind, SymbolRegistry};
use std::collections::HashMap;

/// Local data-flow overlay: tracks what type a local variable holds and
/// marks members accessed through it as used, with the containing type
/// checked rather than matched by bare name.
///
/// Three binding shapes are recognized:
/// - `Widget w = ...`
/// - `var w = new Widget(...)`
/// - `var w = CreateWidget(...)` where the method's return type is tracked
pub struct DataFlowOverlay;

impl Overlay for DataFlowOverlay {
    fn scan(&self, ctx: &OverlayContext<'_>) -> Vec<HeuristicFinding> {
        let mut findings = Vec::new();
        for unit in ctx.units {
            scan_unit(&unit.tokens, ctx.registry, &unit.path, &mut findings);
        }
        findings
    }

    fn name(&self) -> &'static str {
        "data-flow"
    }
}

fn scan_unit(
    tokens: &[Token],
    registry: &SymbolRegistry,
    path: &std::path::Path,
    findings: &mut Vec<HeuristicFinding>,
) {
    let mut bindings: HashMap<String, String> = HashMap::new();

    let mut i = 0;
    while i < tokens.len() {
        if let Some((local, ty, next)) = binding_at(tokens, i, registry) {
            bindings.insert(local, ty);
            i = next;
            continue;
        }

        // local.Member through a known binding
        if let (Some(local), Some(TokenKind::Dot)) =
            (tokens[i].ident(), tokens.get(i + 1).map(|t| &t.kind))
        {
            if let (Some(ty), Some(member)) =
                (bindings.get(local), tokens.get(i + 2).and_then(|t| t.ident()))
            {
                for decl in registry.find_by_name(member) {
                    if decl.kind.is_member() && decl.containing_type.as_deref() == Some(ty.as_str())
                    {
                        findings.push(HeuristicFinding {
                            target: decl.id.clone(),
                            kind: HeuristicKind::DataFlow,
                            file: path.to_path_buf(),
                            line: tokens[i + 2].line,
                        });
                    }
                }
            }
        }

        i += 1;
    }
}

/// Recognize a local binding starting at `i`. Returns (local, type, next index).
fn binding_at(
    tokens: &[Token],
    i: usize,
    registry: &SymbolRegistry,
) -> Option<(String, String, usize)> {
    let first = tokens[i].ident()?;
    let local = tokens.get(i + 1).and_then(|t| t.ident())?;
    if lexer::is_keyword(local) {
        return None;
    }
    if tokens.get(i + 2).map(|t| &t.kind) != Some(&TokenKind::Assign) {
        return None;
    }

    if first == "var" {
        // var w = new Widget(...)  or  var w = CreateWidget(...)
        let rhs = i + 3;
        if tokens.get(rhs).map(|t| t.is_ident("new")).unwrap_or(false) {
            let ty = tokens.get(rhs + 1).and_then(|t| t.ident())?;
            return Some((local.to_string(), ty.to_string(), rhs + 2));
        }
        // Walk a dotted chain to the final invoked name
        let mut k = rhs;
        let mut last: Option<&str> = None;
        while let Some(word) = tokens.get(k).and_then(|t| t.ident()) {
            last = Some(word);
            if tokens.get(k + 1).map(|t| &t.kind) == Some(&TokenKind::Dot) {
                k += 2;
            } else {
                break;
            }
        }
        let invoked = tokens.get(k + 1).map(|t| &t.kind) == Some(&TokenKind::LParen);
        if let (Some(method), true) = (last, invoked) {
            let ty = registry
                .find_by_name(method)
                .into_iter()
                .find(|d| d.kind == SymbolKind::Method)
                .and_then(|d| d.type_name.clone())?;
            return Some((local.to_string(), ty, k + 1));
        }
        None
    } else if !lexer::is_keyword(first) {
        // Widget w = ...
        Some((local.to_string(), first.to_string(), i + 3))
    } else {
        None
    }
}
