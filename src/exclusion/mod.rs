//! Exclusion policy: which files never enter analysis, and which symbols
//! are exempt from being reported dead.
//!
//! Each rule is an independent toggle. A file is excluded when any enabled
//! rule matches; disabling one rule never weakens another.

use crate::config::Config;
use crate::discovery::SourceUnit;
use crate::symbols::{Declaration, SymbolKind};
use tracing::trace;

/// Why a unit was dropped before analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    Test,
    Migration,
    Generated,
    Controller,
}

impl ExclusionReason {
    pub fn label(&self) -> &'static str {
        match self {
            ExclusionReason::Test => "test",
            ExclusionReason::Migration => "migration",
            ExclusionReason::Generated => "generated",
            ExclusionReason::Controller => "controller",
        }
    }
}

/// Filename keywords that mark a file as test code.
const TEST_NAME_KEYWORDS: &[&str] = &["Test", "Tests", "Spec", "Fixture", "Mock", "Fake", "Stub"];

/// Generated-source filename suffixes.
const GENERATED_SUFFIXES: &[&str] = &[".g.cs", ".Designer.cs", ".generated.cs", ".g.i.cs"];

/// Content markers of generated sources.
const GENERATED_MARKERS: &[&str] = &["<auto-generated", "GeneratedCode"];

/// Attributes that mark a type as an MVC/Web API controller.
const CONTROLLER_ATTRIBUTES: &[&str] =
    &["[ApiController]", "[Route(", "[HttpGet", "[HttpPost", "[HttpPut", "[HttpDelete", "[HttpPatch"];

/// Type-name suffixes exempt from dead reporting: frameworks instantiate
/// and invoke these reflectively or through DI, so absence of source
/// references is not evidence.
const EXEMPT_TYPE_SUFFIXES: &[&str] = &[
    "Controller",
    "Service",
    "Repository",
    "Handler",
    "Middleware",
    "Factory",
    "Provider",
    "Validator",
    "DbContext",
    "Attribute",
    "Hub",
    "Worker",
    "Job",
    "Options",
    "Settings",
];

#[derive(Debug, Clone)]
pub struct ExclusionPolicy {
    exclude_tests: bool,
    exclude_migrations: bool,
    exclude_generated: bool,
    exclude_controllers: bool,
}

impl ExclusionPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            exclude_tests: config.exclude_tests,
            exclude_migrations: config.exclude_migrations,
            exclude_generated: config.exclude_generated,
            exclude_controllers: config.exclude_controllers,
        }
    }

    /// Apply every enabled file rule. `text` is the unit's source, already
    /// read; rules that only need the path never look at it.
    pub fn excluded(&self, unit: &SourceUnit, text: &str) -> Option<ExclusionReason> {
        if self.exclude_generated && is_generated(unit, text) {
            trace!("excluding generated file {}", unit.path.display());
            return Some(ExclusionReason::Generated);
        }
        if self.exclude_tests && is_test(unit) {
            trace!("excluding test file {}", unit.path.display());
            return Some(ExclusionReason::Test);
        }
        if self.exclude_migrations && is_migration(unit, text) {
            trace!("excluding migration file {}", unit.path.display());
            return Some(ExclusionReason::Migration);
        }
        if self.exclude_controllers && is_controller(unit, text) {
            trace!("excluding controller file {}", unit.path.display());
            return Some(ExclusionReason::Controller);
        }
        None
    }

    /// Whether a tracked symbol is exempt from dead reporting. The suffix
    /// catalog is matched against the declaring type: a framework-role type
    /// is exempt, and so are its members, since the container invokes them
    /// without source-visible references.
    pub fn exempt(&self, decl: &Declaration) -> bool {
        let type_name = match decl.kind {
            SymbolKind::Type => Some(decl.name.as_str()),
            _ => decl.containing_type.as_deref(),
        };
        let Some(type_name) = type_name else {
            return false;
        };
        EXEMPT_TYPE_SUFFIXES
            .iter()
            .any(|suffix| type_name.len() > suffix.len() && type_name.ends_with(suffix))
    }
}

fn is_test(unit: &SourceUnit) -> bool {
    if unit.project_has_test_dependency {
        return true;
    }
    let stem = unit
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    TEST_NAME_KEYWORDS.iter().any(|kw| stem.contains(kw))
}

fn is_migration(unit: &SourceUnit, text: &str) -> bool {
    let name = unit.file_name();
    if name.contains("Migration") {
        return true;
    }
    let in_migrations_dir = unit
        .path
        .components()
        .any(|c| c.as_os_str() == "Migrations");
    in_migrations_dir || text.contains(": Migration")
}

fn is_generated(unit: &SourceUnit, text: &str) -> bool {
    let name = unit.file_name();
    if GENERATED_SUFFIXES.iter().any(|s| name.ends_with(s)) {
        return true;
    }
    // Generated headers sit at the top of the file
    let head: String = text.chars().take(512).collect();
    GENERATED_MARKERS.iter().any(|m| head.contains(m))
}

fn is_controller(unit: &SourceUnit, text: &str) -> bool {
    if unit.file_name().ends_with("Controller.cs") {
        return true;
    }
    if text.contains(": Controller") || text.contains(": ControllerBase") {
        return true;
    }
    CONTROLLER_ATTRIBUTES.iter().any(|a| text.contains(a))
}
