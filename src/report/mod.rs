mod json;
mod terminal;

pub use json::JsonReporter;
pub use terminal::TerminalReporter;

use crate::analysis::DeadCandidate;
use crate::symbols::{SymbolKind, SymbolRegistry};
use miette::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

/// Declared/dead counters broken down by symbol kind.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct KindCounts {
    pub types: usize,
    pub methods: usize,
    pub properties: usize,
    pub fields: usize,
}

impl KindCounts {
    pub fn add(&mut self, kind: SymbolKind) {
        match kind {
            SymbolKind::Type => self.types += 1,
            SymbolKind::Method => self.methods += 1,
            SymbolKind::Property => self.properties += 1,
            SymbolKind::Field => self.fields += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.types + self.methods + self.properties + self.fields
    }
}

/// Findings for one source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub file: PathBuf,
    pub project: String,
    /// Tracked declarations in the file, dead or not.
    pub declared: usize,
    pub candidates: Vec<DeadCandidate>,
    /// Set when the unit could not be read or analyzed. The failure is
    /// attributed here without failing the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A unit that dropped out of the run with an error.
#[derive(Debug, Clone)]
pub struct UnitFailure {
    pub file: PathBuf,
    pub project: String,
    pub error: String,
}

/// Per-project rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub project: String,
    pub declared: KindCounts,
    pub dead: KindCounts,
    pub dead_percentage: f64,
}

/// The complete result of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub success: bool,
    pub files: Vec<FileReport>,
    pub projects: Vec<ProjectSummary>,
    pub total_declared: usize,
    pub total_dead: usize,
    pub files_scanned: usize,
    pub files_excluded: usize,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

impl RunReport {
    /// A run that produced nothing to analyze.
    pub fn failed(
        errors: Vec<String>,
        files_scanned: usize,
        files_excluded: usize,
        duration: Duration,
    ) -> Self {
        Self {
            success: false,
            files: Vec::new(),
            projects: Vec::new(),
            total_declared: 0,
            total_dead: 0,
            files_scanned,
            files_excluded,
            errors,
            duration_ms: duration.as_millis() as u64,
        }
    }

    pub fn candidates(&self) -> impl Iterator<Item = &DeadCandidate> {
        self.files.iter().flat_map(|f| f.candidates.iter())
    }
}

/// Folds scored candidates and registry totals into the final report.
pub struct Aggregator<'a> {
    registry: &'a SymbolRegistry,
    projects: &'a HashMap<PathBuf, String>,
}

impl<'a> Aggregator<'a> {
    pub fn new(registry: &'a SymbolRegistry, projects: &'a HashMap<PathBuf, String>) -> Self {
        Self { registry, projects }
    }

    pub fn aggregate(
        &self,
        candidates: Vec<DeadCandidate>,
        errors: Vec<String>,
        failures: Vec<UnitFailure>,
        files_scanned: usize,
        files_excluded: usize,
        duration: Duration,
    ) -> RunReport {
        let total_dead = candidates.len();
        let total_declared = self.registry.len();

        let mut by_file: HashMap<PathBuf, Vec<DeadCandidate>> = HashMap::new();
        for candidate in candidates {
            by_file.entry(candidate.id.file.clone()).or_default().push(candidate);
        }

        let mut files: Vec<FileReport> = by_file
            .into_iter()
            .map(|(file, mut candidates)| {
                candidates.sort_by_key(|c| c.location.line);
                let project = self
                    .projects
                    .get(&file)
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string());
                let declared = self.registry.declared_in(&file);
                FileReport { file, project, declared, candidates, error: None }
            })
            .collect();
        for failure in failures {
            files.push(FileReport {
                file: failure.file,
                project: failure.project,
                declared: 0,
                candidates: Vec::new(),
                error: Some(failure.error),
            });
        }
        files.sort_by(|a, b| a.file.cmp(&b.file));

        let mut declared_by_project: HashMap<String, KindCounts> = HashMap::new();
        for decl in self.registry.declarations() {
            let project = self
                .projects
                .get(&decl.id.file)
                .cloned()
                .unwrap_or_else(|| "unknown".to_string());
            declared_by_project.entry(project).or_default().add(decl.kind);
        }
        let mut dead_by_project: HashMap<String, KindCounts> = HashMap::new();
        for file in &files {
            for candidate in &file.candidates {
                dead_by_project
                    .entry(candidate.project.clone())
                    .or_default()
                    .add(candidate.kind);
            }
        }

        let mut projects: Vec<ProjectSummary> = declared_by_project
            .into_iter()
            .map(|(project, declared)| {
                let dead = dead_by_project.get(&project).copied().unwrap_or_default();
                let dead_percentage = if declared.total() > 0 {
                    dead.total() as f64 * 100.0 / declared.total() as f64
                } else {
                    0.0
                };
                ProjectSummary { project, declared, dead, dead_percentage }
            })
            .collect();
        projects.sort_by(|a, b| a.project.cmp(&b.project));

        RunReport {
            success: true,
            files,
            projects,
            total_declared,
            total_dead,
            files_scanned,
            files_excluded,
            errors,
            duration_ms: duration.as_millis() as u64,
        }
    }
}

/// Dispatches a run report to the selected renderer.
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self { format, output_path }
    }

    pub fn report(&self, report: &RunReport) -> Result<()> {
        match self.format {
            ReportFormat::Terminal => TerminalReporter::new().report(report),
            ReportFormat::Json => JsonReporter::new(self.output_path.clone()).report(report),
        }
    }
}
