//! Symbol data model: declarations, identities, and usage references.

mod graph;
mod registry;

pub use graph::UsageGraph;
pub use registry::{EvidenceMode, SymbolRegistry};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Stable identity for a declared symbol.
///
/// One scheme is used uniformly across every pass: file path + containing
/// type + simple name. Two same-named symbols in different files or
/// different types are always distinct; same-file overloads collapse onto
/// one entry, which is the conservative direction for dead-code reporting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolId {
    pub file: PathBuf,
    pub containing_type: Option<String>,
    pub name: String,
}

impl SymbolId {
    pub fn new(file: PathBuf, containing_type: Option<String>, name: String) -> Self {
        Self { file, containing_type, name }
    }
}

impl std::fmt::Display for SymbolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.containing_type {
            Some(parent) => write!(f, "{}:{}.{}", self.file.display(), parent, self.name),
            None => write!(f, "{}:{}", self.file.display(), self.name),
        }
    }
}

/// Kind of a declared symbol. Closed set, matched exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Type,
    Method,
    Property,
    Field,
}

impl SymbolKind {
    pub fn label(&self) -> &'static str {
        match self {
            SymbolKind::Type => "type",
            SymbolKind::Method => "method",
            SymbolKind::Property => "property",
            SymbolKind::Field => "field",
        }
    }

    pub fn is_member(&self) -> bool {
        matches!(self, SymbolKind::Method | SymbolKind::Property | SymbolKind::Field)
    }
}

/// Declared accessibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Accessibility {
    Public,
    #[default]
    Internal,
    Protected,
    Private,
}

impl Accessibility {
    /// Derive accessibility from modifier keywords. `fallback` supplies the
    /// language default when no access modifier is present (private for
    /// members, internal for top-level types).
    pub fn from_modifiers(modifiers: &[String], fallback: Accessibility) -> Self {
        // `protected internal` widens to protected for our purposes
        if modifiers.iter().any(|m| m == "private") {
            Accessibility::Private
        } else if modifiers.iter().any(|m| m == "protected") {
            Accessibility::Protected
        } else if modifiers.iter().any(|m| m == "public") {
            Accessibility::Public
        } else if modifiers.iter().any(|m| m == "internal") {
            Accessibility::Internal
        } else {
            fallback
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Accessibility::Public => "public",
            Accessibility::Internal => "internal",
            Accessibility::Protected => "protected",
            Accessibility::Private => "private",
        }
    }
}

/// Location in source code (1-indexed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self { file, line, column }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file.display(), self.line, self.column)
    }
}

/// A declaration extracted from a source unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declaration {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    pub accessibility: Accessibility,

    pub is_static: bool,
    pub is_virtual: bool,
    pub is_abstract: bool,
    /// Static method whose first parameter is a `this` receiver.
    pub is_extension: bool,
    /// For `kind == Type`: declared with `interface`.
    pub is_interface: bool,
    pub is_constructor: bool,
    /// Compiler-synthesized (accessors, backing fields); never tracked.
    pub is_synthesized: bool,

    pub containing_type: Option<String>,
    /// Base/interface list simple names, for types.
    pub super_types: Vec<String>,
    /// Return type for methods, declared type for properties and fields.
    pub type_name: Option<String>,

    pub location: Location,
    /// First and last source line of the declaration, body included.
    pub span: (usize, usize),
}

impl Declaration {
    pub fn new(id: SymbolId, name: String, kind: SymbolKind, location: Location) -> Self {
        let span = (location.line, location.line);
        Self {
            id,
            name,
            kind,
            accessibility: Accessibility::default(),
            is_static: false,
            is_virtual: false,
            is_abstract: false,
            is_extension: false,
            is_interface: false,
            is_constructor: false,
            is_synthesized: false,
            containing_type: None,
            super_types: Vec::new(),
            type_name: None,
            location,
            span,
        }
    }

    /// Entry points are never candidates for removal.
    pub fn is_entry_point(&self) -> bool {
        self.kind == SymbolKind::Method && self.name == "Main"
    }

    pub fn display(&self) -> String {
        format!("{} {} ({})", self.kind.label(), self.name, self.location)
    }
}

/// Context a usage reference was observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsageKind {
    Invocation,
    MemberAccess,
    TypeReference,
    ObjectCreation,
    GenericArgument,
    ConstructorParameter,
    AttributeParameter,
}

impl UsageKind {
    /// Whether this context is direct evidence for the baseline resolver.
    /// Constructor-parameter and attribute-parameter contexts only count
    /// through the DI overlays.
    pub fn is_baseline(&self) -> bool {
        !matches!(self, UsageKind::ConstructorParameter | UsageKind::AttributeParameter)
    }
}

/// A reference to a (possibly undeclared) symbol name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageReference {
    /// Simple name observed at the usage site.
    pub target_name: String,

    /// Resolved target identity, when the evidence source is semantic.
    pub target: Option<SymbolId>,

    pub kind: UsageKind,

    /// For generic arguments of an invocation, the invoked method's name.
    /// Such references are overlay evidence, not baseline evidence.
    pub receiver: Option<String>,

    pub file: PathBuf,
    pub line: usize,
}

impl UsageReference {
    pub fn new(target_name: String, kind: UsageKind, file: PathBuf, line: usize) -> Self {
        Self { target_name, target: None, kind, receiver: None, file, line }
    }

    pub fn with_receiver(mut self, receiver: String) -> Self {
        self.receiver = Some(receiver);
        self
    }

    pub fn with_target(mut self, target: SymbolId) -> Self {
        self.target = Some(target);
        self
    }
}
