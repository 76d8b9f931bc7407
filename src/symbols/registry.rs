use super::{Declaration, SymbolId, SymbolKind};
use std::collections::HashMap;
use std::path::Path;
use tracing::trace;

/// Quality of the evidence feeding the registry and resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvidenceMode {
    /// A semantic front-end resolved references to exact identities.
    Exact,
    /// Textual extraction; references are matched by name.
    Heuristic,
}

/// Canonical, deduplicated store of tracked declarations.
///
/// The admission rule here is the primary recall/precision tunable:
/// symbols it rejects can never be reported dead, symbols it admits are
/// dead unless some evidence or exemption says otherwise.
#[derive(Debug)]
pub struct SymbolRegistry {
    mode: EvidenceMode,
    symbols: HashMap<SymbolId, Declaration>,
    name_index: HashMap<String, Vec<SymbolId>>,
}

impl SymbolRegistry {
    pub fn new(mode: EvidenceMode) -> Self {
        Self {
            mode,
            symbols: HashMap::new(),
            name_index: HashMap::new(),
        }
    }

    pub fn mode(&self) -> EvidenceMode {
        self.mode
    }

    /// Register a declaration. Returns false when the admission rule
    /// rejects it or an identical identity is already present.
    pub fn register(&mut self, decl: Declaration) -> bool {
        if !self.admits(&decl) {
            trace!("rejected from tracking: {}", decl.display());
            return false;
        }
        if self.symbols.contains_key(&decl.id) {
            return false;
        }

        self.name_index
            .entry(decl.name.clone())
            .or_default()
            .push(decl.id.clone());
        self.symbols.insert(decl.id.clone(), decl);
        true
    }

    /// The admission rule:
    /// - compiler-synthesized symbols are never tracked;
    /// - constructors are never tracked (implicit call sites are unreliable);
    /// - entry points are never tracked;
    /// - in exact mode, public non-extension members are treated as external
    ///   API surface and not tracked;
    /// - extension methods are always tracked regardless of accessibility.
    fn admits(&self, decl: &Declaration) -> bool {
        if decl.is_synthesized || decl.is_constructor || decl.is_entry_point() {
            return false;
        }
        if decl.is_extension {
            return true;
        }
        if self.mode == EvidenceMode::Exact
            && decl.kind.is_member()
            && decl.accessibility == super::Accessibility::Public
        {
            return false;
        }
        true
    }

    pub fn contains(&self, id: &SymbolId) -> bool {
        self.symbols.contains_key(id)
    }

    pub fn get(&self, id: &SymbolId) -> Option<&Declaration> {
        self.symbols.get(id)
    }

    pub fn find_by_name(&self, name: &str) -> Vec<&Declaration> {
        self.name_index
            .get(name)
            .map(|ids| ids.iter().filter_map(|id| self.symbols.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.symbols.values()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Innermost tracked declaration whose span contains the given line of
    /// the given file. Used to attribute references to their enclosing
    /// symbol when building the usage graph.
    pub fn enclosing(&self, file: &Path, line: usize) -> Option<&Declaration> {
        self.symbols
            .values()
            .filter(|d| d.id.file == file && d.span.0 <= line && line <= d.span.1)
            .min_by_key(|d| (d.span.1 - d.span.0, d.span.0, &d.name))
    }

    /// Count of declarations in one file.
    pub fn declared_in(&self, file: &Path) -> usize {
        self.symbols.values().filter(|d| d.id.file == file).count()
    }
}
