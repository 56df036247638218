// Tests for report generation functionality

use tempfile::TempDir;
use trellis_core::ContentGraph;
use trellis_core::report::{
    ReportFormat, gather_report_data, generate_check_report, generate_document_report,
    generate_json_report, generate_markdown_report, generate_report, generate_text_report,
    save_report,
};

fn sample_graph() -> ContentGraph {
    ContentGraph::build([
        ("index", "[guide](./guides/setup.md) [gone](./gone.md)"),
        ("guides/setup", "Back [home](../index.md). [bad](./a//b.md)"),
        ("orphan", "Nobody links here."),
    ])
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert!(matches!(ReportFormat::from_str("text"), Some(ReportFormat::Text)));
    assert!(matches!(ReportFormat::from_str("json"), Some(ReportFormat::Json)));
    assert!(matches!(
        ReportFormat::from_str("markdown"),
        Some(ReportFormat::Markdown)
    ));
    assert!(matches!(ReportFormat::from_str("md"), Some(ReportFormat::Markdown)));
}

#[test]
fn test_report_format_from_str_case_insensitive() {
    assert!(matches!(ReportFormat::from_str("TEXT"), Some(ReportFormat::Text)));
    assert!(matches!(ReportFormat::from_str("Json"), Some(ReportFormat::Json)));
}

#[test]
fn test_report_format_from_str_invalid() {
    assert!(ReportFormat::from_str("csv").is_none());
    assert!(ReportFormat::from_str("").is_none());
}

// ============================================================================
// Report Data Tests
// ============================================================================

#[test]
fn test_gather_report_data() {
    let graph = sample_graph();
    let data = gather_report_data(&graph, "./content", false);

    assert_eq!(data.root, "./content");
    assert_eq!(data.stats.documents, 3);
    assert_eq!(data.stats.dangling, 1);
    assert_eq!(data.stats.unresolved, 1);
    assert_eq!(data.stats.orphans, 1);
    assert_eq!(data.documents.len(), 3);
    assert_eq!(data.documents[0].id, "index");
    assert_eq!(data.documents[0].links, 2);
    assert_eq!(data.documents[0].backlinks, 1);
    assert!(data.tree.is_none());
}

#[test]
fn test_gather_report_data_with_tree() {
    let graph = sample_graph();
    let data = gather_report_data(&graph, "./content", true);
    assert_eq!(data.tree.unwrap(), vec!["index", "guides/setup", "orphan"]);
}

// ============================================================================
// Rendering Tests
// ============================================================================

#[test]
fn test_text_report_sections() {
    let graph = sample_graph();
    let report = generate_text_report(&gather_report_data(&graph, "./content", true));

    assert!(report.contains("TRELLIS CONTENT GRAPH REPORT"));
    assert!(report.contains("Content Root: ./content"));
    assert!(report.contains("DOCUMENT TREE"));
    assert!(report.contains("└── setup"));
    assert!(report.contains("Documents:          3"));
    assert!(report.contains("[DANGLING]     index → gone"));
    assert!(report.contains("[UNRESOLVABLE] guides/setup → ./a//b.md"));
    assert!(report.contains("End of Report"));
}

#[test]
fn test_text_report_without_broken_links() {
    let graph = ContentGraph::build([("a", "[b](./b.md)"), ("b", "")]);
    let report = generate_text_report(&gather_report_data(&graph, "docs", false));
    assert!(!report.contains("BROKEN LINKS"));
    assert!(!report.contains("DOCUMENT TREE"));
}

#[test]
fn test_json_report_structure() {
    let graph = sample_graph();
    let json = generate_json_report(&gather_report_data(&graph, "./content", false)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let report = &value["report"];
    assert_eq!(report["metadata"]["generator"], "Trellis");
    assert_eq!(report["metadata"]["format"], "json");
    assert!(report["metadata"]["generated_at"].is_string());
    assert_eq!(report["summary"]["documents"], 3);
    assert_eq!(report["dangling_links"][0]["target"], "gone");
    assert_eq!(report["unresolved_links"][0]["source"], "guides/setup");
    assert!(report["tree"].is_null());
}

#[test]
fn test_markdown_report() {
    let graph = sample_graph();
    let md = generate_markdown_report(&gather_report_data(&graph, "./content", false));

    assert!(md.starts_with("# Trellis Content Graph Report"));
    assert!(md.contains("| Documents | 3 |"));
    assert!(md.contains("| `guides/setup` | 1 | 1 |"));
    assert!(md.contains("## Dangling Links"));
    assert!(md.contains("## Unresolvable Links"));
}

#[test]
fn test_generate_report_dispatches_by_format() {
    let graph = sample_graph();
    let data = gather_report_data(&graph, "./content", false);

    let text = generate_report(&data, ReportFormat::Text).unwrap();
    let json = generate_report(&data, ReportFormat::Json).unwrap();
    assert!(text.contains("SUMMARY"));
    assert!(json.trim_start().starts_with('{'));
}

#[test]
fn test_document_report() {
    let graph = sample_graph();
    let deep = graph.get_deep("guides/setup").unwrap();
    let report = generate_document_report(&deep);

    assert!(report.contains("Identifier: guides/setup"));
    assert!(report.contains("Links (1):"));
    assert!(report.contains("→ index"));
    assert!(report.contains("Backlinks (1):"));
    assert!(report.contains("← index"));
}

#[test]
fn test_check_report() {
    let clean = ContentGraph::build([("a", "")]);
    assert_eq!(
        generate_check_report(&clean),
        "All links resolve (1 documents checked)\n"
    );

    let report = generate_check_report(&sample_graph());
    assert!(report.starts_with("1 dangling, 1 unresolvable"));
}

// ============================================================================
// Save Tests
// ============================================================================

#[test]
fn test_save_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("report.txt");

    save_report("hello", &path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");
}
