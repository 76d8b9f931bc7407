use super::{SymbolId, UsageKind};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

/// Resolved usage edge between two tracked symbols.
#[derive(Debug, Clone)]
pub struct UsageEdge {
    pub kind: UsageKind,
    pub line: usize,
}

/// Directed usage graph over tracked symbols.
///
/// Nodes are symbol identities; an edge A → B means a reference inside A's
/// span resolved to B. References with no tracked enclosing symbol (file
/// scope, or inside an untracked member) land in the root set instead of
/// an edge — they still count as usage.
#[derive(Debug)]
pub struct UsageGraph {
    inner: DiGraph<SymbolId, UsageEdge>,
    node_map: HashMap<SymbolId, NodeIndex>,
    roots: HashSet<SymbolId>,
}

impl UsageGraph {
    pub fn new() -> Self {
        Self {
            inner: DiGraph::new(),
            node_map: HashMap::new(),
            roots: HashSet::new(),
        }
    }

    fn node(&mut self, id: &SymbolId) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(id) {
            return idx;
        }
        let idx = self.inner.add_node(id.clone());
        self.node_map.insert(id.clone(), idx);
        idx
    }

    /// Record a resolved usage. Self-references (recursion, initializer
    /// artifacts) are dropped; they are not evidence of outside use.
    pub fn add_usage(&mut self, from: Option<&SymbolId>, to: &SymbolId, kind: UsageKind, line: usize) {
        match from {
            Some(source) if source == to => {}
            Some(source) => {
                let from_idx = self.node(source);
                let to_idx = self.node(to);
                self.inner.add_edge(from_idx, to_idx, UsageEdge { kind, line });
            }
            None => {
                self.roots.insert(to.clone());
            }
        }
    }

    /// Whether any usage evidence points at this symbol.
    pub fn is_used(&self, id: &SymbolId) -> bool {
        if self.roots.contains(id) {
            return true;
        }
        self.node_map
            .get(id)
            .map(|&idx| {
                self.inner
                    .edges_directed(idx, petgraph::Direction::Incoming)
                    .next()
                    .is_some()
            })
            .unwrap_or(false)
    }

    /// Like [`is_used`](Self::is_used), but ignores edges originating from
    /// `except`. The interface propagator uses this so that a class's own
    /// base-list mention of its interface does not loop back and keep the
    /// class alive.
    pub fn used_excluding(&self, id: &SymbolId, except: &SymbolId) -> bool {
        if self.roots.contains(id) {
            return true;
        }
        let Some(&idx) = self.node_map.get(id) else {
            return false;
        };
        self.inner
            .edges_directed(idx, petgraph::Direction::Incoming)
            .any(|edge| &self.inner[edge.source()] != except)
    }

    /// All symbols with at least one piece of usage evidence.
    pub fn used_set(&self) -> HashSet<SymbolId> {
        let mut used: HashSet<SymbolId> = self.roots.clone();
        for idx in self.inner.node_indices() {
            if self
                .inner
                .edges_directed(idx, petgraph::Direction::Incoming)
                .next()
                .is_some()
            {
                used.insert(self.inner[idx].clone());
            }
        }
        used
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }
}

impl Default for UsageGraph {
    fn default() -> Self {
        Self::new()
    }
}
