//! Configuration loading from YAML or TOML files, with CLI overrides
//! applied on top by the binary.

use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Analysis configuration. Every toggle defaults to on; the flags on the
/// CLI turn individual protections off.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Skip files that belong to test projects or look like tests.
    pub exclude_tests: bool,
    /// Skip EF migration files.
    pub exclude_migrations: bool,
    /// Skip generated sources (`.g.cs`, `.Designer.cs`, auto-generated headers).
    pub exclude_generated: bool,
    /// Skip MVC/Web API controller files.
    pub exclude_controllers: bool,
    /// Run the DI registration, injection and factory overlays.
    pub enable_di_heuristics: bool,
    /// Run the data-flow and lambda-body overlays.
    pub enable_data_flow_heuristics: bool,
    /// Findings below this confidence are dropped from reports.
    pub min_confidence: u8,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude_tests: true,
            exclude_migrations: true,
            exclude_generated: true,
            exclude_controllers: true,
            enable_di_heuristics: true,
            enable_data_flow_heuristics: true,
            min_confidence: 0,
            verbose: false,
        }
    }
}

/// File names probed, in order, when no explicit config path is given.
const DEFAULT_LOCATIONS: &[&str] = &[
    ".deadsharp.yml",
    ".deadsharp.yaml",
    ".deadsharp.toml",
    "deadsharp.yml",
    "deadsharp.yaml",
    "deadsharp.toml",
];

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, AnalysisError> {
        let content = fs::read_to_string(path).map_err(|e| {
            AnalysisError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let config = match ext {
            "yml" | "yaml" => serde_yaml::from_str(&content).map_err(|e| {
                AnalysisError::Configuration(format!("invalid YAML in {}: {e}", path.display()))
            })?,
            "toml" => toml::from_str(&content).map_err(|e| {
                AnalysisError::Configuration(format!("invalid TOML in {}: {e}", path.display()))
            })?,
            other => {
                return Err(AnalysisError::Configuration(format!(
                    "unsupported config format '{other}' for {}",
                    path.display()
                )))
            }
        };
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Look for a config file in the analyzed directory, falling back to
    /// defaults when none exists.
    pub fn from_default_locations(root: &Path) -> Result<Self, AnalysisError> {
        for name in DEFAULT_LOCATIONS {
            let candidate = root.join(name);
            if candidate.is_file() {
                return Self::from_file(&candidate);
            }
        }
        Ok(Self::default())
    }
}
