use super::{has_verb_prefix, HeuristicFinding, HeuristicKind, Overlay, OverlayContext};
use crate::symbols::{SymbolKind, UsageKind};

/// Method-name prefixes of container registration calls
/// (`services.AddScoped<I, T>()`, `builder.RegisterType<T>()`, ...).
const REGISTRATION_PREFIXES: &[&str] = &["Add", "TryAdd", "Register", "Bind", "Configure", "Use", "For"];

/// Attributes that mark a member as framework-injected.
const INJECTION_MARKERS: &[&str] = &["Inject", "FromServices", "FromKeyedServices", "Dependency"];

pub(crate) fn is_registration_call(name: &str) -> bool {
    REGISTRATION_PREFIXES.iter().any(|p| has_verb_prefix(name, p))
}

/// DI overlay: marks types wired through a container as used.
///
/// Three shapes count: generic arguments of registration-prefixed calls,
/// types appearing as constructor parameters (constructor injection), and
/// members carrying an injection attribute.
pub struct RegistrationOverlay;

impl Overlay for RegistrationOverlay {
    fn name(&self) -> &'static str {
        "registration"
    }

    fn scan(&self, ctx: &OverlayContext<'_>) -> Vec<HeuristicFinding> {
        let mut findings = Vec::new();

        for reference in ctx.references {
            match reference.kind {
                UsageKind::GenericArgument => {
                    let registered = reference
                        .receiver
                        .as_deref()
                        .map(is_registration_call)
                        .unwrap_or(false);
                    if !registered {
                        continue;
                    }
                    for decl in ctx.registry.find_by_name(&reference.target_name) {
                        if decl.kind == SymbolKind::Type {
                            findings.push(HeuristicFinding {
                                target: decl.id.clone(),
                                kind: HeuristicKind::Registration,
                                file: reference.file.clone(),
                                line: reference.line,
                            });
                        }
                    }
                }
                UsageKind::ConstructorParameter => {
                    for decl in ctx.registry.find_by_name(&reference.target_name) {
                        if decl.kind == SymbolKind::Type {
                            findings.push(HeuristicFinding {
                                target: decl.id.clone(),
                                kind: HeuristicKind::ConstructorInjection,
                                file: reference.file.clone(),
                                line: reference.line,
                            });
                        }
                    }
                }
                UsageKind::AttributeParameter => {
                    if !INJECTION_MARKERS.contains(&reference.target_name.as_str()) {
                        continue;
                    }
                    // The injected member is the next tracked declaration
                    // below the attribute in the same file
                    let injected = ctx
                        .registry
                        .declarations()
                        .filter(|d| {
                            d.kind.is_member()
                                && d.id.file == reference.file
                                && d.span.0 >= reference.line
                        })
                        .min_by_key(|d| d.span.0);
                    if let Some(member) = injected {
                        findings.push(HeuristicFinding {
                            target: member.id.clone(),
                            kind: HeuristicKind::InjectionMarker,
                            file: reference.file.clone(),
                            line: reference.line,
                        });
                    }
                }
                _ => {}
            }
        }

        findings
    }
}
