//! False-positive guard tests: code that is alive through indirect
//! mechanisms must never be reported dead.
//!
//! Covered mechanisms:
//! 1. Public API surface
//! 2. Framework-instantiated types (controllers, services, attributes)
//! 3. DI container wiring
//! 4. Interface dispatch
//! 5. Entry points
//! 6. Generated and migration files

use deadsharp::analysis::AnalysisEngine;
use deadsharp::config::Config;
use deadsharp::discovery::SourceUnit;
use deadsharp::report::RunReport;
use std::path::PathBuf;

fn run(sources: &[(&str, &str)]) -> RunReport {
    let units: Vec<SourceUnit> = sources
        .iter()
        .map(|(path, src)| {
            SourceUnit::with_text(PathBuf::from(path), "App".to_string(), src.to_string())
        })
        .collect();
    AnalysisEngine::new(Config::default()).run(&units)
}

fn dead_names(report: &RunReport) -> Vec<String> {
    report.candidates().map(|c| c.name.clone()).collect()
}

#[test]
fn test_public_members_never_reported() {
    let report = run(&[
        (
            "Api.cs",
            r#"
            internal class Library
            {
                public void Export() { }
                public string Version { get; set; }
                public int Build;
            }
            "#,
        ),
        (
            "Program.cs",
            "class Program { static void Main() { var l = new Library(); } }",
        ),
    ]);

    let dead = dead_names(&report);
    assert!(!dead.contains(&"Export".to_string()));
    assert!(!dead.contains(&"Version".to_string()));
    assert!(!dead.contains(&"Build".to_string()));
}

#[test]
fn test_controller_files_excluded() {
    let report = run(&[
        (
            "Api/OrdersController.cs",
            r#"
            public class OrdersController : ControllerBase
            {
                private void FormatInternal() { }
            }
            "#,
        ),
        ("Program.cs", "class Program { static void Main() { } }"),
    ]);

    // The whole file is framework-invoked; even its private helpers are
    // out of scope
    assert!(!dead_names(&report).contains(&"FormatInternal".to_string()));
}

#[test]
fn test_attribute_routed_file_excluded() {
    let report = run(&[
        (
            "Api/Orders.cs",
            r#"
            [ApiController]
            public class Orders
            {
                private void Helper() { }
            }
            "#,
        ),
        ("Program.cs", "class Program { static void Main() { } }"),
    ]);

    assert!(!dead_names(&report).contains(&"Helper".to_string()));
}

#[test]
fn test_framework_suffix_types_exempt() {
    let report = run(&[
        (
            "Infra.cs",
            r#"
            internal class OrderRepository { }
            internal class RetryAttribute { }
            internal class EmailWorker { }
            internal class CacheOptions { }
            "#,
        ),
        ("Program.cs", "class Program { static void Main() { } }"),
    ]);

    let dead = dead_names(&report);
    assert!(!dead.contains(&"OrderRepository".to_string()));
    assert!(!dead.contains(&"RetryAttribute".to_string()));
    assert!(!dead.contains(&"EmailWorker".to_string()));
    assert!(!dead.contains(&"CacheOptions".to_string()));
}

#[test]
fn test_di_wired_implementation_not_reported() {
    let report = run(&[
        (
            "Mailer.cs",
            "internal interface IMailer { }\ninternal class SmtpMailer : IMailer { }",
        ),
        (
            "Startup.cs",
            r#"
            class Startup
            {
                internal void Register(IServiceCollection services)
                {
                    services.AddSingleton<IMailer, SmtpMailer>();
                }
            }
            class Program { static void Main() { new Startup().Register(null); } }
            "#,
        ),
    ]);

    let dead = dead_names(&report);
    assert!(!dead.contains(&"SmtpMailer".to_string()));
    assert!(!dead.contains(&"IMailer".to_string()));
}

#[test]
fn test_typeof_registration_not_reported() {
    let report = run(&[
        ("Job.cs", "internal class NightlyJobRunner { }"),
        (
            "Program.cs",
            r#"
            class Program
            {
                static void Main()
                {
                    var t = typeof(NightlyJobRunner);
                }
            }
            "#,
        ),
    ]);

    assert!(!dead_names(&report).contains(&"NightlyJobRunner".to_string()));
}

#[test]
fn test_interface_implementations_kept_alive() {
    let report = run(&[
        (
            "Handlers.cs",
            r#"
            internal interface INotifier { }
            internal class SlackNotifier : INotifier { }
            internal class EmailNotifier : INotifier { }
            "#,
        ),
        (
            "Program.cs",
            "class Program { static void Main(string[] args) { INotifier n = null; } }",
        ),
    ]);

    let dead = dead_names(&report);
    assert!(!dead.contains(&"SlackNotifier".to_string()));
    assert!(!dead.contains(&"EmailNotifier".to_string()));
}

#[test]
fn test_entry_points_never_reported() {
    let report = run(&[(
        "Program.cs",
        r#"
        class Program
        {
            static void Main(string[] args) { }
        }
        "#,
    )]);

    let dead = dead_names(&report);
    assert!(!dead.contains(&"Main".to_string()));
    assert!(!dead.contains(&"Program".to_string()));
}

#[test]
fn test_generated_and_migration_files_skipped() {
    let report = run(&[
        (
            "Data/Migrations/20240101_Init.cs",
            "public partial class Init { private void Up() { } }",
        ),
        (
            "Models/Order.g.cs",
            "class Order { private void Synth() { } }",
        ),
        (
            "Models/Auto.cs",
            "// <auto-generated />\nclass Auto { private void Gen() { } }",
        ),
        ("Program.cs", "class Program { static void Main() { } }"),
    ]);

    assert_eq!(report.files_excluded, 3);
    let dead = dead_names(&report);
    assert!(!dead.contains(&"Up".to_string()));
    assert!(!dead.contains(&"Synth".to_string()));
    assert!(!dead.contains(&"Gen".to_string()));
}

#[test]
fn test_nameof_counts_as_usage() {
    let report = run(&[
        ("Widget.cs", "internal class Widget { }"),
        (
            "Program.cs",
            r#"
            class Program
            {
                static void Main()
                {
                    var n = nameof(Widget);
                }
            }
            "#,
        ),
    ]);

    assert!(!dead_names(&report).contains(&"Widget".to_string()));
}

#[test]
fn test_constructors_and_synthesized_never_tracked() {
    let report = run(&[
        (
            "Widget.cs",
            r#"
            internal class Widget
            {
                public Widget() { }
            }
            "#,
        ),
        (
            "Program.cs",
            "class Program { static void Main() { var w = new Widget(); } }",
        ),
    ]);

    // The constructor is not a candidate even though nothing calls it by name
    assert!(report.candidates().all(|c| c.name != "Widget" || c.kind != deadsharp::SymbolKind::Method));
}
