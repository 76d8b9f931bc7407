//! CLI integration tests
//!
//! These tests run the compiled binary against small fixture trees built
//! in temporary directories.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// A minimal project with one dead private method.
fn fixture_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "App/App.csproj", "<Project Sdk=\"Microsoft.NET.Sdk\"></Project>");
    write(
        root,
        "App/Widget.cs",
        r#"
        class Widget
        {
            internal void Render() { }
            private void Lonely() { }
        }
        "#,
    );
    write(
        root,
        "App/Program.cs",
        r#"
        class Program
        {
            static void Main()
            {
                var w = new Widget();
                w.Render();
            }
        }
        "#,
    );
    dir
}

fn deadsharp() -> Command {
    Command::cargo_bin("deadsharp").unwrap()
}

#[test]
fn test_cli_help() {
    deadsharp()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deadsharp"))
        .stdout(predicate::str::contains("--no-di-heuristics"))
        .stdout(predicate::str::contains("--min-confidence"));
}

#[test]
fn test_cli_version() {
    deadsharp()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("deadsharp"));
}

#[test]
fn test_cli_reports_dead_method() {
    let project = fixture_project();

    deadsharp()
        .arg(project.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Lonely"))
        .stdout(predicate::str::contains("Render").not());
}

#[test]
fn test_cli_json_output() {
    let project = fixture_project();

    let output = deadsharp()
        .arg(project.path())
        .arg("--format")
        .arg("json")
        .arg("--quiet")
        .output()
        .unwrap();

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["success"], true);
    assert!(parsed["total_dead"].as_u64().unwrap() >= 1);
}

#[test]
fn test_cli_json_output_to_file() {
    let project = fixture_project();
    let out_path = project.path().join("report.json");

    deadsharp()
        .arg(project.path())
        .arg("--format")
        .arg("json")
        .arg("--output")
        .arg(&out_path)
        .arg("--quiet")
        .assert()
        .success();

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(parsed["success"], true);
}

#[test]
fn test_cli_empty_directory_fails() {
    let dir = TempDir::new().unwrap();

    deadsharp()
        .arg(dir.path())
        .arg("--quiet")
        .assert()
        .failure()
        .stdout(predicate::str::contains("No C# files found"));
}

#[test]
fn test_cli_min_confidence() {
    let project = fixture_project();
    // Internal unused type scores 70; private method scores 90
    write(project.path(), "App/Orphan.cs", "internal class Orphan { }");

    deadsharp()
        .arg(project.path())
        .arg("--min-confidence")
        .arg("85")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Lonely"))
        .stdout(predicate::str::contains("Orphan").not());
}

#[test]
fn test_cli_include_tests_flag() {
    let project = fixture_project();
    write(
        project.path(),
        "App/WidgetTests.cs",
        "class WidgetTests { private void Probe() { } }",
    );

    // Excluded by default
    deadsharp()
        .arg(project.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Probe").not());

    deadsharp()
        .arg(project.path())
        .arg("--include-tests")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Probe"));
}

#[test]
fn test_cli_config_file_respected() {
    let project = fixture_project();
    write(project.path(), ".deadsharp.yml", "min_confidence: 95\n");

    // Lonely scores 90, below the configured floor
    deadsharp()
        .arg(project.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Lonely").not());
}
