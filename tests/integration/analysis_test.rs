//! Integration tests for deadsharp analysis
//!
//! These tests drive the complete pipeline over in-memory source units.

use deadsharp::analysis::AnalysisEngine;
use deadsharp::config::Config;
use deadsharp::discovery::SourceUnit;
use deadsharp::report::RunReport;
use std::path::PathBuf;

fn units(sources: &[(&str, &str)]) -> Vec<SourceUnit> {
    sources
        .iter()
        .map(|(path, src)| {
            SourceUnit::with_text(PathBuf::from(path), "App".to_string(), src.to_string())
        })
        .collect()
}

fn run(sources: &[(&str, &str)]) -> RunReport {
    AnalysisEngine::new(Config::default()).run(&units(sources))
}

fn run_with(config: Config, sources: &[(&str, &str)]) -> RunReport {
    AnalysisEngine::new(config).run(&units(sources))
}

fn dead_names(report: &RunReport) -> Vec<String> {
    report.candidates().map(|c| c.name.clone()).collect()
}

#[test]
fn test_reports_unreferenced_private_method() {
    let report = run(&[(
        "Widget.cs",
        r#"
        class Widget
        {
            internal void Render() { }
            private void Lonely() { }
        }
        class Program
        {
            static void Main()
            {
                var w = new Widget();
                w.Render();
            }
        }
        "#,
    )]);

    assert!(report.success);
    let dead = dead_names(&report);
    assert!(dead.contains(&"Lonely".to_string()));
    assert!(!dead.contains(&"Render".to_string()));
    assert!(!dead.contains(&"Widget".to_string()));
    assert!(!dead.contains(&"Program".to_string()));

    let lonely = report.candidates().find(|c| c.name == "Lonely").unwrap();
    assert_eq!(lonely.confidence, 90);
    assert_eq!(lonely.reason, "No references found to this private method.");
}

#[test]
fn test_reports_unreferenced_type() {
    let report = run(&[
        ("Orphan.cs", "internal class Orphan { }"),
        ("Program.cs", "class Program { static void Main() { } }"),
    ]);

    let dead = dead_names(&report);
    assert!(dead.contains(&"Orphan".to_string()));

    let orphan = report.candidates().find(|c| c.name == "Orphan").unwrap();
    assert_eq!(orphan.confidence, 70);
    assert_eq!(orphan.reason, "No references found to this internal type.");
}

#[test]
fn test_unused_extension_method_reported() {
    let report = run(&[
        (
            "Extensions.cs",
            r#"
            static class StringExtensions
            {
                public static string ToSlug(this string input) { return input; }
            }
            "#,
        ),
        ("Program.cs", "class Program { static void Main() { } }"),
    ]);

    // Public members are normally off the table, extension methods are not
    assert!(dead_names(&report).contains(&"ToSlug".to_string()));
}

#[test]
fn test_used_extension_method_not_reported() {
    let report = run(&[
        (
            "Extensions.cs",
            r#"
            static class StringExtensions
            {
                public static string ToSlug(this string input) { return input; }
            }
            "#,
        ),
        (
            "Program.cs",
            r#"class Program { static void Main(string[] args) { var s = "x".ToSlug(); } }"#,
        ),
    ]);

    assert!(!dead_names(&report).contains(&"ToSlug".to_string()));
}

#[test]
fn test_exempt_suffix_types_not_reported() {
    let report = run(&[
        (
            "Services.cs",
            r#"
            internal class OrderService
            {
                private void Stale() { }
            }
            internal class Order
            {
                private void Rot() { }
            }
            "#,
        ),
        ("Program.cs", "class Program { static void Main() { var o = new Order(); } }"),
    ]);

    let dead = dead_names(&report);
    // The service type and its members are framework-invoked; an ordinary
    // type's members stay reportable
    assert!(!dead.contains(&"OrderService".to_string()));
    assert!(!dead.contains(&"Stale".to_string()));
    assert!(dead.contains(&"Rot".to_string()));
}

#[test]
fn test_same_named_dead_types_reported_per_file() {
    let report = run(&[
        ("Core/Helper.cs", "internal class Helper { }"),
        ("Web/Helper.cs", "internal class Helper { }"),
        ("Program.cs", "class Program { static void Main() { } }"),
    ]);

    let helpers: Vec<_> = report.candidates().filter(|c| c.name == "Helper").collect();
    assert_eq!(helpers.len(), 2);
    assert_ne!(helpers[0].location.file, helpers[1].location.file);
}

#[test]
fn test_fields_and_properties_tracked() {
    let report = run(&[(
        "Widget.cs",
        r#"
        class Widget
        {
            private int _unusedField;
            private int _count;
            internal string Title { get; set; }
            private string Legacy { get; set; }

            internal int Bump() { _count = _count + 1; return _count; }
        }
        class Program
        {
            static void Main()
            {
                var w = new Widget();
                w.Bump();
                var t = w.Title;
            }
        }
        "#,
    )]);

    let dead = dead_names(&report);
    assert!(dead.contains(&"_unusedField".to_string()));
    assert!(dead.contains(&"Legacy".to_string()));
    assert!(!dead.contains(&"_count".to_string()));
    assert!(!dead.contains(&"Title".to_string()));
}

#[test]
fn test_empty_input_yields_failed_report() {
    let report = run(&[]);
    assert!(!report.success);
    assert!(report.errors.iter().any(|e| e.contains("no analyzable")));
    assert_eq!(report.total_dead, 0);
}

#[test]
fn test_all_units_excluded_yields_failed_report() {
    let report = run(&[
        ("WidgetTests.cs", "class WidgetTests { private void Check() { } }"),
        ("Form1.Designer.cs", "class Form1 { private void Hidden() { } }"),
    ]);
    assert!(!report.success);
    assert_eq!(report.files_excluded, 2);
}

#[test]
fn test_excluded_files_produce_no_candidates() {
    let report = run(&[
        ("Widget.cs", "internal class Widget { }"),
        ("WidgetTests.cs", "class WidgetTests { private void Check() { } }"),
        ("Program.cs", "class Program { static void Main() { } }"),
    ]);

    assert!(report.success);
    assert_eq!(report.files_excluded, 1);
    assert!(!dead_names(&report).contains(&"Check".to_string()));
}

#[test]
fn test_confidence_stays_in_bounds() {
    let report = run(&[
        (
            "Zoo.cs",
            r#"
            internal abstract class Base
            {
                private void A() { }
                protected virtual void B() { }
                protected abstract void C();
                internal void D() { }
            }
            "#,
        ),
        ("Program.cs", "class Program { static void Main() { } }"),
    ]);

    assert!(report.total_dead > 0);
    for candidate in report.candidates() {
        assert!(
            (10..=95).contains(&candidate.confidence),
            "{} scored {}",
            candidate.name,
            candidate.confidence
        );
    }
}

#[test]
fn test_min_confidence_filter() {
    let mut config = Config::default();
    config.min_confidence = 85;

    let report = run_with(
        config,
        &[(
            "W.cs",
            r#"
            class W
            {
                private void Dead() { }
                internal void AlsoDead() { }
            }
            class Keep { private W _w; }
            class Program { static void Main() { } }
            "#,
        )],
    );

    let dead = dead_names(&report);
    assert!(dead.contains(&"Dead".to_string()));
    assert!(!dead.contains(&"AlsoDead".to_string()));
}

#[test]
fn test_repeated_runs_identical() {
    let sources = [
        (
            "Widget.cs",
            r#"
            class Widget
            {
                private void Lonely() { }
                internal void Render() { }
            }
            "#,
        ),
        (
            "Program.cs",
            "class Program { static void Main() { new Widget().Render(); } }",
        ),
    ];

    let first = run(&sources);
    let second = run(&sources);

    assert_eq!(dead_names(&first), dead_names(&second));
    assert_eq!(first.total_declared, second.total_declared);
    assert_eq!(first.total_dead, second.total_dead);
}

#[test]
fn test_per_project_aggregation() {
    let mut all = units(&[("Core/A.cs", "internal class Alpha { }")]);
    all[0].project = "Core".to_string();
    all.push(SourceUnit::with_text(
        PathBuf::from("Web/B.cs"),
        "Web".to_string(),
        "class Program { static void Main() { } }".to_string(),
    ));

    let report = AnalysisEngine::new(Config::default()).run(&all);
    assert!(report.success);
    assert_eq!(report.projects.len(), 2);
    let core = report.projects.iter().find(|p| p.project == "Core").unwrap();
    assert_eq!(core.dead.types, 1);
    assert!(core.dead_percentage > 0.0);
}

#[test]
fn test_file_read_failure_recorded_not_fatal() {
    let mut all = units(&[("Good.cs", "class Program { static void Main() { } }")]);
    // A unit pointing at a path that does not exist, with no inline text
    all.push(SourceUnit::new(PathBuf::from("/nonexistent/Bad.cs"), "App".to_string()));

    let report = AnalysisEngine::new(Config::default()).run(&all);
    assert!(report.success);
    assert!(report.errors.iter().any(|e| e.contains("Bad.cs")));

    // The failure is attributed to the file's own entry
    let bad = report
        .files
        .iter()
        .find(|f| f.file.ends_with("Bad.cs"))
        .unwrap();
    assert!(bad.error.as_ref().unwrap().contains("failed to read"));
    assert!(bad.candidates.is_empty());
    let good = report.files.iter().find(|f| f.file.ends_with("Good.cs"));
    assert!(good.map_or(true, |f| f.error.is_none()));
}
