//! deadsharp - Fast dead code detection for C# and .NET solutions
//!
//! This library provides static analysis capabilities to detect unused
//! symbols in C# codebases without a compiler in the loop.
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **Discovery** - Find .cs files and their owning projects
//! 2. **Exclusion** - Drop tests, migrations, generated code, controllers
//! 3. **Evidence** - Extract declarations and usage references per file
//! 4. **Resolution** - Build the usage graph from baseline evidence
//! 5. **Overlays** - Add DI, factory, data-flow and lambda evidence
//! 6. **Scoring** - Compute the dead set with confidence scores
//! 7. **Reporting** - Render terminal or JSON output

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod error;
pub mod evidence;
pub mod exclusion;
pub mod lexer;
pub mod overlay;
pub mod report;
pub mod resolve;
pub mod symbols;

pub use analysis::{AnalysisEngine, DeadCandidate};
pub use config::Config;
pub use discovery::{FileFinder, SourceUnit};
pub use error::AnalysisError;
pub use exclusion::ExclusionPolicy;
pub use report::{ReportFormat, Reporter, RunReport};
pub use symbols::{Declaration, SymbolId, SymbolKind, SymbolRegistry, UsageGraph};
