use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use deadsharp::analysis::AnalysisEngine;
use deadsharp::config::Config;
use deadsharp::discovery::FileFinder;
use deadsharp::report::{ReportFormat, Reporter};

/// deadsharp - Fast dead code detection for C# and .NET solutions
#[derive(Parser, Debug)]
#[command(name = "deadsharp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the directory to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file (.deadsharp.yml or deadsharp.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Analyze test files instead of skipping them
    #[arg(long)]
    include_tests: bool,

    /// Analyze EF migration files instead of skipping them
    #[arg(long)]
    include_migrations: bool,

    /// Analyze generated files instead of skipping them
    #[arg(long)]
    include_generated: bool,

    /// Analyze controller files instead of skipping them
    #[arg(long)]
    include_controllers: bool,

    /// Disable the DI registration and factory heuristics
    #[arg(long)]
    no_di_heuristics: bool,

    /// Disable the data-flow and lambda-body heuristics
    #[arg(long)]
    no_data_flow_heuristics: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: OutputFormat,

    /// Output file (for json format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Minimum confidence score to report (0-100)
    #[arg(long)]
    min_confidence: Option<u8>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, Default)]
enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    info!("deadsharp v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;

    info!("Discovering files...");
    let finder = FileFinder::new(&cli.path);
    let units = finder.find_units().into_diagnostic()?;
    info!("Found {} C# files to analyze", units.len());

    if units.is_empty() {
        println!("{}", "No C# files found.".yellow());
        std::process::exit(1);
    }

    let spinner = if cli.quiet || matches!(cli.format, OutputFormat::Json) {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .into_diagnostic()?,
        );
        pb.set_message(format!("Analyzing {} files...", units.len()));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    };

    let engine = AnalysisEngine::new(config);
    let report = engine.run(&units);
    spinner.finish_and_clear();

    Reporter::new(cli.format.into(), cli.output.clone()).report(&report)?;

    if !report.success {
        std::process::exit(1);
    }
    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    fmt().with_env_filter(filter).with_target(false).init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path).into_diagnostic()?
    } else {
        Config::from_default_locations(&cli.path).into_diagnostic()?
    };

    // CLI flags override the file
    if cli.include_tests {
        config.exclude_tests = false;
    }
    if cli.include_migrations {
        config.exclude_migrations = false;
    }
    if cli.include_generated {
        config.exclude_generated = false;
    }
    if cli.include_controllers {
        config.exclude_controllers = false;
    }
    if cli.no_di_heuristics {
        config.enable_di_heuristics = false;
    }
    if cli.no_data_flow_heuristics {
        config.enable_data_flow_heuristics = false;
    }
    if let Some(min_confidence) = cli.min_confidence {
        config.min_confidence = min_confidence;
    }
    if cli.verbose {
        config.verbose = true;
    }

    Ok(config)
}
