use std::path::PathBuf;
use thiserror::Error;

/// Failures the analysis core can surface.
///
/// No variant escapes a run as a panic; everything except `Configuration`
/// is folded into the run report as data.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Invalid or missing input location; fails before the run starts.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The semantic front-end could not produce evidence for a unit.
    /// Recovered locally by falling back to heuristic extraction.
    #[error("semantic evidence unavailable for {path}: {reason}")]
    EvidenceUnavailable { path: PathBuf, reason: String },

    /// A single unit could not be read; recorded on that file's result.
    #[error("failed to read {path}: {reason}")]
    FileRead { path: PathBuf, reason: String },

    /// Zero units survived filtering; fatal for the run.
    #[error("no analyzable source units remain after filtering")]
    NoAnalyzableUnits,
}
