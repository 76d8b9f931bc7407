//! Evidence sources: the collaborators that turn raw source text into
//! declarations and usage references.
//!
//! The shipped implementation is the heuristic extractor built on the
//! typed token scanner. A semantic front-end plugs in behind the same
//! trait and reports `EvidenceMode::Exact`; the engine falls back to the
//! heuristic extractor per unit when a semantic source fails.

mod extract;

pub use extract::{scan_window, Extractor, RawRef};
pub(crate) use extract::lambda_body_end;

use crate::error::AnalysisError;
use crate::lexer::Token;
use crate::symbols::{Declaration, EvidenceMode, UsageReference};
use std::path::{Path, PathBuf};

/// Everything extracted from one source unit.
#[derive(Debug, Default)]
pub struct Evidence {
    pub declarations: Vec<Declaration>,
    pub references: Vec<UsageReference>,
    /// Token stream kept for the overlays, which re-scan token windows.
    pub tokens: Vec<Token>,
}

/// Token stream of one unit, handed to overlays as a read-only view.
#[derive(Debug)]
pub struct UnitTokens {
    pub path: PathBuf,
    pub tokens: Vec<Token>,
}

/// A source of declarations and usage references.
pub trait EvidenceSource: Sync {
    fn mode(&self) -> EvidenceMode;

    fn extract(&self, path: &Path, text: &str) -> Result<Evidence, AnalysisError>;
}

/// The built-in heuristic evidence source.
pub struct HeuristicSource {
    extractor: Extractor,
}

impl HeuristicSource {
    pub fn new() -> Self {
        Self { extractor: Extractor::new() }
    }
}

impl Default for HeuristicSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EvidenceSource for HeuristicSource {
    fn mode(&self) -> EvidenceMode {
        EvidenceMode::Heuristic
    }

    fn extract(&self, path: &Path, text: &str) -> Result<Evidence, AnalysisError> {
        Ok(self.extractor.extract(path, text))
    }
}
