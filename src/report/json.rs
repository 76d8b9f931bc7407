use super::RunReport;
use crate::analysis::ConfidenceBucket;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, report: &RunReport) -> Result<()> {
        let json = serde_json::to_string_pretty(&JsonEnvelope::from_run(report)).into_diagnostic()?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        } else {
            println!("{json}");
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct JsonEnvelope<'a> {
    version: &'static str,
    success: bool,
    total_declared: usize,
    total_dead: usize,
    files_scanned: usize,
    files_excluded: usize,
    duration_ms: u64,
    by_confidence: JsonConfidenceSummary,
    files: &'a [super::FileReport],
    projects: &'a [super::ProjectSummary],
    errors: &'a [String],
}

#[derive(Serialize)]
struct JsonConfidenceSummary {
    high: usize,
    medium: usize,
    low: usize,
}

impl<'a> JsonEnvelope<'a> {
    fn from_run(report: &'a RunReport) -> Self {
        let mut high = 0;
        let mut medium = 0;
        let mut low = 0;
        for candidate in report.candidates() {
            match ConfidenceBucket::of(candidate.confidence) {
                ConfidenceBucket::High => high += 1,
                ConfidenceBucket::Medium => medium += 1,
                ConfidenceBucket::Low => low += 1,
            }
        }

        Self {
            version: "1.0",
            success: report.success,
            total_declared: report.total_declared,
            total_dead: report.total_dead,
            files_scanned: report.files_scanned,
            files_excluded: report.files_excluded,
            duration_ms: report.duration_ms,
            by_confidence: JsonConfidenceSummary { high, medium, low },
            files: &report.files,
            projects: &report.projects,
            errors: &report.errors,
        }
    }
}
