//! Source discovery: walking the target tree for C# source units and
//! attributing each unit to its nearest project.

use crate::error::AnalysisError;
use ignore::WalkBuilder;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One C# file queued for analysis, tagged with its owning project.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub path: PathBuf,
    /// Name of the nearest enclosing `.csproj`, or the root directory name
    /// for loose files.
    pub project: String,
    /// The owning project references a test framework or mocking library.
    pub project_has_test_dependency: bool,
    /// Pre-loaded source text. `None` means read from disk at analysis
    /// time; tests inject units with the text already set.
    pub text: Option<String>,
}

impl SourceUnit {
    pub fn new(path: PathBuf, project: String) -> Self {
        Self { path, project, project_has_test_dependency: false, text: None }
    }

    pub fn with_text(path: PathBuf, project: String, text: String) -> Self {
        Self { path, project, project_has_test_dependency: false, text: Some(text) }
    }

    /// Source text of the unit, reading from disk when not pre-loaded.
    pub fn read_text(&self) -> Result<String, AnalysisError> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        fs::read_to_string(&self.path).map_err(|e| AnalysisError::FileRead {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    pub fn file_name(&self) -> &str {
        self.path.file_name().and_then(|n| n.to_str()).unwrap_or("")
    }
}

/// Substrings that mark a project file as test-flavored.
const TEST_PACKAGES: &[&str] = &["xunit", "nunit", "mstest", "moq"];

/// Walks a directory tree and produces source units.
///
/// Respects `.gitignore` and skips hidden directories via the `ignore`
/// walker, plus the build output directories the walker does not know
/// about.
pub struct FileFinder {
    root: PathBuf,
}

const SKIP_DIRS: &[&str] = &["bin", "obj", "packages", "node_modules"];

impl FileFinder {
    pub fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf() }
    }

    pub fn find_units(&self) -> Result<Vec<SourceUnit>, AnalysisError> {
        if !self.root.exists() {
            return Err(AnalysisError::Configuration(format!(
                "path does not exist: {}",
                self.root.display()
            )));
        }

        let mut projects: ProjectCache = HashMap::new();
        let mut units = Vec::new();

        let walker = WalkBuilder::new(&self.root)
            .hidden(true)
            .git_ignore(true)
            .filter_entry(|entry| {
                let name = entry.file_name().to_str().unwrap_or("");
                !(entry.file_type().map(|t| t.is_dir()).unwrap_or(false)
                    && SKIP_DIRS.contains(&name))
            })
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("walk error: {e}");
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some("cs") {
                continue;
            }

            let (project, has_test_dep) = self.owning_project(path, &mut projects);
            let mut unit = SourceUnit::new(path.to_path_buf(), project);
            unit.project_has_test_dependency = has_test_dep;
            units.push(unit);
        }

        units.sort_by(|a, b| a.path.cmp(&b.path));
        debug!("discovered {} source units under {}", units.len(), self.root.display());
        Ok(units)
    }

    /// Walk up from the file toward the root looking for a `.csproj`;
    /// results are cached per directory.
    fn owning_project(&self, file: &Path, cache: &mut ProjectCache) -> (String, bool) {
        let mut dir = file.parent();
        while let Some(d) = dir {
            if let Some(found) = cache.get(d) {
                return found.clone();
            }
            if let Some(info) = project_in_dir(d) {
                cache.insert(d.to_path_buf(), info.clone());
                return info;
            }
            if d == self.root {
                break;
            }
            dir = d.parent();
        }

        let fallback = (
            self.root
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string(),
            false,
        );
        fallback
    }
}

type ProjectCache = HashMap<PathBuf, (String, bool)>;

fn project_in_dir(dir: &Path) -> Option<(String, bool)> {
    let entries = fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csproj") {
            continue;
        }
        let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("unknown").to_string();
        let has_test_dep = fs::read_to_string(&path)
            .map(|content| {
                let lower = content.to_lowercase();
                TEST_PACKAGES.iter().any(|p| lower.contains(p))
            })
            .unwrap_or(false);
        return Some((name, has_test_dep));
    }
    None
}
