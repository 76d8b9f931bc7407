//! Integration tests for the heuristic overlays: DI registration,
//! constructor injection, factories, data flow, lambda bodies, and
//! interface propagation.

use deadsharp::analysis::AnalysisEngine;
use deadsharp::config::Config;
use deadsharp::discovery::SourceUnit;
use deadsharp::report::RunReport;
use std::path::PathBuf;

fn run_with(config: Config, sources: &[(&str, &str)]) -> RunReport {
    let units: Vec<SourceUnit> = sources
        .iter()
        .map(|(path, src)| {
            SourceUnit::with_text(PathBuf::from(path), "App".to_string(), src.to_string())
        })
        .collect();
    AnalysisEngine::new(config).run(&units)
}

fn run(sources: &[(&str, &str)]) -> RunReport {
    run_with(Config::default(), sources)
}

fn dead_names(report: &RunReport) -> Vec<String> {
    report.candidates().map(|c| c.name.clone()).collect()
}

const DI_SOURCES: &[(&str, &str)] = &[
    (
        "Widget.cs",
        "internal interface IWidget { }\ninternal class Widget : IWidget { }",
    ),
    (
        "Startup.cs",
        r#"
        class Startup
        {
            internal void Configure(IServiceCollection services)
            {
                services.AddScoped<IWidget, Widget>();
            }
        }
        class Program
        {
            static void Main() { new Startup().Configure(null); }
        }
        "#,
    ),
];

#[test]
fn test_di_registered_type_survives() {
    let report = run(DI_SOURCES);
    let dead = dead_names(&report);
    assert!(!dead.contains(&"Widget".to_string()));
    assert!(!dead.contains(&"IWidget".to_string()));
}

#[test]
fn test_di_registered_type_dead_when_heuristics_off() {
    let mut config = Config::default();
    config.enable_di_heuristics = false;

    let report = run_with(config, DI_SOURCES);
    // The AddScoped generic arguments are not baseline evidence, and
    // Widget's own base list cannot keep it alive
    assert!(dead_names(&report).contains(&"Widget".to_string()));
}

#[test]
fn test_overlays_only_shrink_the_dead_set() {
    let mut off = Config::default();
    off.enable_di_heuristics = false;
    off.enable_data_flow_heuristics = false;

    let with_overlays = run(DI_SOURCES);
    let without = run_with(off, DI_SOURCES);

    let with_names = dead_names(&with_overlays);
    for name in &with_names {
        assert!(
            dead_names(&without).contains(name),
            "{name} reported only when overlays are on"
        );
    }
    assert!(with_names.len() <= dead_names(&without).len());
}

#[test]
fn test_constructor_injection_keeps_service_type() {
    let report = run(&[
        ("Clock.cs", "internal interface IClock { }"),
        (
            "Consumer.cs",
            r#"
            class Consumer
            {
                private readonly IClock _clock;
                public Consumer(IClock clock) { _clock = clock; }
            }
            class Program { static void Main() { var c = new Consumer(null); } }
            "#,
        ),
    ]);

    assert!(!dead_names(&report).contains(&"IClock".to_string()));
}

#[test]
fn test_factory_return_type_survives() {
    let report = run(&[
        ("Report.cs", "internal class Report { }"),
        (
            "Builder.cs",
            r#"
            class Printer
            {
                internal Report CreateReport() { return null; }
            }
            class Program { static void Main() { new Printer().CreateReport(); } }
            "#,
        ),
    ]);

    assert!(!dead_names(&report).contains(&"Report".to_string()));
}

#[test]
fn test_lambda_body_usage_counts() {
    let report = run(&[
        (
            "Item.cs",
            "internal class Item { internal bool IsActive() { return true; } }",
        ),
        (
            "Program.cs",
            r#"
            class Program
            {
                static void Main(string[] args)
                {
                    var items = new List<Item>();
                    var kept = items.Where(x => x.IsActive());
                }
            }
            "#,
        ),
    ]);

    assert!(!dead_names(&report).contains(&"IsActive".to_string()));
}

#[test]
fn test_lambda_usage_ignored_when_data_flow_off() {
    let mut config = Config::default();
    config.enable_data_flow_heuristics = false;

    let report = run_with(
        config,
        &[
            (
                "Item.cs",
                "internal class Item { internal bool IsActive() { return true; } }",
            ),
            (
                "Program.cs",
                r#"
                class Program
                {
                    static void Main(string[] args)
                    {
                        var items = new List<Item>();
                        var kept = items.Where(x => x.IsActive());
                    }
                }
                "#,
            ),
        ],
    );

    assert!(dead_names(&report).contains(&"IsActive".to_string()));
}

#[test]
fn test_interface_implementor_survives_when_interface_used() {
    let report = run(&[
        (
            "Shapes.cs",
            "internal interface IShape { }\ninternal class Circle : IShape { }",
        ),
        (
            "Program.cs",
            r#"
            class Program
            {
                static void Main()
                {
                    IShape shape = null;
                }
            }
            "#,
        ),
    ]);

    let dead = dead_names(&report);
    assert!(!dead.contains(&"IShape".to_string()));
    assert!(!dead.contains(&"Circle".to_string()));
}

#[test]
fn test_self_implementation_does_not_resurrect() {
    // IShape is referenced only from Circle's own base list, so it cannot
    // propagate usage back to Circle
    let report = run(&[
        (
            "Shapes.cs",
            "internal interface IShape { }\ninternal class Circle : IShape { }",
        ),
        ("Program.cs", "class Program { static void Main() { } }"),
    ]);

    assert!(dead_names(&report).contains(&"Circle".to_string()));
}

#[test]
fn test_base_class_chain_propagates() {
    let report = run(&[
        (
            "Chain.cs",
            r#"
            internal interface IBase { }
            internal class Middle : IBase { }
            internal class Leaf : Middle { }
            "#,
        ),
        (
            "Program.cs",
            "class Program { static void Main() { IBase b = null; } }",
        ),
    ]);

    let dead = dead_names(&report);
    assert!(!dead.contains(&"Middle".to_string()));
    assert!(!dead.contains(&"Leaf".to_string()));
}

#[test]
fn test_data_flow_tracks_typed_locals() {
    let report = run(&[
        (
            "Widget.cs",
            r#"
            internal class Widget
            {
                internal void Render() { }
            }
            internal class Shop
            {
                internal Widget CreateWidget() { return new Widget(); }
            }
            "#,
        ),
        (
            "Program.cs",
            r#"
            class Program
            {
                static void Main()
                {
                    var shop = new Shop();
                    var w = shop.CreateWidget();
                    w.Render();
                }
            }
            "#,
        ),
    ]);

    assert!(!dead_names(&report).contains(&"Render".to_string()));
}

#[test]
fn test_injection_attribute_keeps_member() {
    let report = run(&[(
        "Page.cs",
        r#"
        class CartPage
        {
            [Inject]
            private NavigationManager Nav { get; set; }
        }
        class Program { static void Main() { var p = new CartPage(); } }
        "#,
    )]);

    assert!(!dead_names(&report).contains(&"Nav".to_string()));
}
