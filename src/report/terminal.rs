use super::RunReport;
use crate::analysis::ConfidenceBucket;
use colored::Colorize;
use miette::Result;

/// Terminal reporter with colored output
pub struct TerminalReporter;

impl TerminalReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report(&self, report: &RunReport) -> Result<()> {
        if !report.success {
            println!("{}", "Analysis produced no results.".red().bold());
            for error in &report.errors {
                println!("  {} {}", "error:".red(), error);
            }
            return Ok(());
        }

        if report.total_dead == 0 {
            println!("{}", "No dead code found!".green().bold());
            self.print_footer(report);
            return Ok(());
        }

        println!();
        println!(
            "{}",
            format!("Found {} dead symbols:", report.total_dead).yellow().bold()
        );
        println!();

        for file in &report.files {
            if file.candidates.is_empty() {
                continue;
            }
            println!("{}", file.file.display().to_string().cyan().bold());

            for candidate in &file.candidates {
                let marker = match ConfidenceBucket::of(candidate.confidence) {
                    ConfidenceBucket::High => "◉".red(),
                    ConfidenceBucket::Medium => "○".yellow(),
                    ConfidenceBucket::Low => "◌".dimmed(),
                };
                println!(
                    "  {} {:>4} {} {} {} {}",
                    marker,
                    candidate.location.line,
                    candidate.kind.label().blue(),
                    candidate.name.bold(),
                    format!("({}%)", candidate.confidence).dimmed(),
                    candidate.reason.dimmed()
                );
            }
            println!();
        }

        if report.projects.len() > 1 {
            println!("{}", "Per project:".bold());
            for project in &report.projects {
                println!(
                    "  {} {} dead of {} declared ({:.1}%)",
                    project.project.cyan(),
                    project.dead.total(),
                    project.declared.total(),
                    project.dead_percentage
                );
            }
            println!();
        }

        self.print_footer(report);
        Ok(())
    }

    fn print_footer(&self, report: &RunReport) {
        for error in &report.errors {
            println!("{} {}", "warning:".yellow(), error);
        }
        println!(
            "{}",
            format!(
                "Scanned {} files ({} excluded), {} symbols tracked, in {}ms",
                report.files_scanned,
                report.files_excluded,
                report.total_declared,
                report.duration_ms
            )
            .dimmed()
        );
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
