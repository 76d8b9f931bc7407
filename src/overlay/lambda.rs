use super::{HeuristicFinding, HeuristicKind, Overlay, OverlayContext};
use crate::evidence::scan_window;
use crate::lexer::TokenKind;

/// Lambda-body overlay: the baseline extractor does not descend into
/// closure bodies, so this overlay re-scans every `=>` body with the same
/// shape catalog and matches the names it finds against the registry.
pub struct LambdaOverlay;

impl Overlay for LambdaOverlay {
    fn name(&self) -> &'static str {
        "lambda"
    }

    fn scan(&self, ctx: &OverlayContext<'_>) -> Vec<HeuristicFinding> {
        let mut findings = Vec::new();

        for unit in ctx.units {
            for (idx, token) in unit.tokens.iter().enumerate() {
                if token.kind != TokenKind::Arrow {
                    continue;
                }
                let Some(end) = crate::evidence::lambda_body_end(&unit.tokens, idx) else {
                    continue;
                };
                // scan_window recurses into nested closures naturally: the
                // outer window covers them
                for raw in scan_window(&unit.tokens, idx + 1, end + 1) {
                    if !raw.kind.is_baseline() {
                        continue;
                    }
                    for decl in ctx.registry.find_by_name(&raw.name) {
                        findings.push(HeuristicFinding {
                            target: decl.id.clone(),
                            kind: HeuristicKind::LambdaBody,
                            file: unit.path.clone(),
                            line: raw.line,
                        });
                    }
                }
            }
        }

        findings
    }
}
