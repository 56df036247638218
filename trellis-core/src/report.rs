// Report generation from a built content graph

use crate::error::Result;
use crate::graph::ContentGraph;
use crate::model::{DanglingLink, DeepDocument, GraphStats, UnresolvedLink};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const HEAVY_RULE: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";
const LIGHT_RULE: &str =
    "────────────────────────────────────────────────────────────────────────────────\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub root: String,
    pub stats: GraphStats,
    pub documents: Vec<DocumentSummary>,
    pub dangling: Vec<DanglingLink>,
    pub unresolved: Vec<UnresolvedLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    pub links: usize,
    pub backlinks: usize,
}

pub fn gather_report_data(graph: &ContentGraph, root: &str, include_tree: bool) -> ReportData {
    let documents = graph
        .documents()
        .map(|node| DocumentSummary {
            id: node.id.clone(),
            title: node.title.clone(),
            links: node.links.len(),
            backlinks: node.backlinks.len(),
        })
        .collect();

    ReportData {
        root: root.to_string(),
        stats: graph.stats(),
        documents,
        dangling: graph.dangling_links(),
        unresolved: graph.unresolved_links().to_vec(),
        tree: include_tree.then(|| graph.ids().map(String::from).collect()),
    }
}

pub fn generate_report(data: &ReportData, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(data)),
        ReportFormat::Json => Ok(generate_json_report(data)?),
        ReportFormat::Markdown => Ok(generate_markdown_report(data)),
    }
}

fn push_heading(report: &mut String, title: &str) {
    report.push_str(HEAVY_RULE);
    report.push_str(title);
    report.push('\n');
    report.push_str(HEAVY_RULE);
    report.push('\n');
}

pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();

    report.push_str(HEAVY_RULE);
    report.push_str("                          TRELLIS CONTENT GRAPH REPORT\n");
    report.push_str(HEAVY_RULE);
    report.push('\n');

    report.push_str(&format!("Content Root: {}\n", data.root));
    report.push_str(&format!(
        "Generated:    {}\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    report.push('\n');

    if let Some(ref ids) = data.tree {
        push_heading(&mut report, "DOCUMENT TREE");
        report.push_str(&generate_document_tree(ids));
        report.push('\n');
    }

    push_heading(&mut report, "SUMMARY");
    report.push_str(&format!("  Documents:          {}\n", data.stats.documents));
    report.push_str(&format!("  Outbound links:     {}\n", data.stats.links));
    report.push_str(&format!("  Backlinks:          {}\n", data.stats.backlinks));
    report.push_str(&format!("  Dangling links:     {}\n", data.stats.dangling));
    report.push_str(&format!("  Unresolvable links: {}\n", data.stats.unresolved));
    report.push_str(&format!("  Orphan documents:   {}\n", data.stats.orphans));
    report.push('\n');

    if !data.documents.is_empty() {
        push_heading(&mut report, "DOCUMENTS");
        for doc in &data.documents {
            report.push_str(&format!(
                "  {:<48} {:>3} out {:>3} in\n",
                doc.id, doc.links, doc.backlinks
            ));
        }
        report.push('\n');
    }

    if !data.dangling.is_empty() || !data.unresolved.is_empty() {
        push_heading(&mut report, "BROKEN LINKS");
        report.push_str(&format_broken_links(&data.dangling, &data.unresolved));
        report.push('\n');
    }

    report.push_str(HEAVY_RULE);
    report.push_str("                                 End of Report\n");
    report.push_str(HEAVY_RULE);

    report
}

pub fn generate_json_report(data: &ReportData) -> std::result::Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Trellis",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "root": data.root,
            "summary": data.stats,
            "documents": data.documents,
            "dangling_links": data.dangling,
            "unresolved_links": data.unresolved,
            "tree": data.tree.as_ref().map(|ids| {
                serde_json::json!({
                    "total_documents": ids.len(),
                    "documents": ids
                })
            })
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_markdown_report(data: &ReportData) -> String {
    let mut report = String::new();

    report.push_str("# Trellis Content Graph Report\n\n");
    report.push_str(&format!("- **Content root:** `{}`\n", data.root));
    report.push_str(&format!(
        "- **Generated:** {}\n\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    report.push_str("## Summary\n\n");
    report.push_str("| Metric | Count |\n|---|---:|\n");
    report.push_str(&format!("| Documents | {} |\n", data.stats.documents));
    report.push_str(&format!("| Outbound links | {} |\n", data.stats.links));
    report.push_str(&format!("| Backlinks | {} |\n", data.stats.backlinks));
    report.push_str(&format!("| Dangling links | {} |\n", data.stats.dangling));
    report.push_str(&format!("| Unresolvable links | {} |\n", data.stats.unresolved));
    report.push_str(&format!("| Orphan documents | {} |\n\n", data.stats.orphans));

    if let Some(ref ids) = data.tree {
        report.push_str("## Document Tree\n\n```\n");
        report.push_str(&generate_document_tree(ids));
        report.push_str("```\n\n");
    }

    if !data.documents.is_empty() {
        report.push_str("## Documents\n\n");
        report.push_str("| Document | Links | Backlinks |\n|---|---:|---:|\n");
        for doc in &data.documents {
            report.push_str(&format!(
                "| `{}` | {} | {} |\n",
                doc.id, doc.links, doc.backlinks
            ));
        }
        report.push('\n');
    }

    if !data.dangling.is_empty() {
        report.push_str("## Dangling Links\n\n");
        for link in &data.dangling {
            report.push_str(&format!("- `{}` → `{}`\n", link.source, link.target));
        }
        report.push('\n');
    }

    if !data.unresolved.is_empty() {
        report.push_str("## Unresolvable Links\n\n");
        for link in &data.unresolved {
            report.push_str(&format!(
                "- `{}` → `{}` ({})\n",
                link.source, link.target, link.reason
            ));
        }
        report.push('\n');
    }

    report
}

/// Plain-text view of one document and its neighbors.
pub fn generate_document_report(doc: &DeepDocument<'_>) -> String {
    let mut report = String::new();

    report.push_str(HEAVY_RULE);
    report.push_str(&format!("{}\n", doc.title));
    report.push_str(HEAVY_RULE);
    report.push_str(&format!("Identifier: {}\n\n", doc.id));

    report.push_str(&format!("Links ({}):\n", doc.links.len()));
    if doc.links.is_empty() {
        report.push_str("  (none)\n");
    }
    for node in &doc.links {
        report.push_str(&format!("  → {}\n", node.id));
    }
    report.push('\n');

    report.push_str(&format!("Backlinks ({}):\n", doc.backlinks.len()));
    if doc.backlinks.is_empty() {
        report.push_str("  (none)\n");
    }
    for node in &doc.backlinks {
        report.push_str(&format!("  ← {}\n", node.id));
    }
    report.push('\n');

    report.push_str(LIGHT_RULE);
    report.push_str(&wrap_text(doc.content, 80, "  "));

    report
}

/// Plain-text listing of dangling and unresolvable links.
pub fn generate_check_report(graph: &ContentGraph) -> String {
    let dangling = graph.dangling_links();
    let unresolved = graph.unresolved_links();

    if dangling.is_empty() && unresolved.is_empty() {
        return format!("All links resolve ({} documents checked)\n", graph.len());
    }

    let mut report = format!(
        "{} dangling, {} unresolvable ({} documents checked)\n\n",
        dangling.len(),
        unresolved.len(),
        graph.len()
    );
    report.push_str(&format_broken_links(&dangling, unresolved));
    report
}

fn format_broken_links(dangling: &[DanglingLink], unresolved: &[UnresolvedLink]) -> String {
    let mut out = String::new();
    for link in dangling {
        out.push_str(&format!(
            "  [DANGLING]     {} → {}\n",
            link.source, link.target
        ));
    }
    for link in unresolved {
        out.push_str(&format!(
            "  [UNRESOLVABLE] {} → {} ({})\n",
            link.source, link.target, link.reason
        ));
    }
    out
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

#[derive(Default)]
struct TreeEntry {
    name: String,
    is_document: bool,
    children: Vec<TreeEntry>,
}

impl TreeEntry {
    fn child(&mut self, name: &str) -> &mut TreeEntry {
        let pos = match self.children.iter().position(|c| c.name == name) {
            Some(pos) => pos,
            None => {
                self.children.push(TreeEntry {
                    name: name.to_string(),
                    ..TreeEntry::default()
                });
                self.children.len() - 1
            }
        };
        &mut self.children[pos]
    }

    fn render(&self, prefix: &str, out: &mut String) {
        // A document that is also a directory gets one row for each role.
        let mut rows: Vec<(String, Option<&TreeEntry>)> = Vec::new();
        for child in &self.children {
            if child.is_document {
                rows.push((child.name.clone(), None));
            }
            if !child.children.is_empty() {
                rows.push((format!("{}/", child.name), Some(child)));
            }
        }

        for (i, (label, directory)) in rows.iter().enumerate() {
            let is_last = i == rows.len() - 1;
            let branch = if is_last { "└── " } else { "├── " };
            out.push_str(&format!("{}{}{}\n", prefix, branch, label));

            if let Some(directory) = directory {
                let next = format!("{}{}", prefix, if is_last { "    " } else { "│   " });
                directory.render(&next, out);
            }
        }
    }
}

/// Render identifiers as a directory tree, keeping first-seen order.
pub fn generate_document_tree(ids: &[String]) -> String {
    if ids.is_empty() {
        return "  (empty)\n".to_string();
    }

    let mut root = TreeEntry::default();
    for id in ids {
        let mut entry = &mut root;
        for segment in id.split('/').filter(|s| !s.is_empty()) {
            entry = entry.child(segment);
        }
        entry.is_document = true;
    }

    let mut out = String::new();
    root.render("", &mut out);
    out
}

fn wrap_text(text: &str, width: usize, indent: &str) -> String {
    let mut result = String::new();

    for paragraph in text.lines() {
        let mut current_line = String::new();
        for word in paragraph.split_whitespace() {
            if current_line.len() + word.len() + 1 > width - indent.len()
                && !current_line.is_empty()
            {
                result.push_str(indent);
                result.push_str(&current_line);
                result.push('\n');
                current_line.clear();
            }

            if !current_line.is_empty() {
                current_line.push(' ');
            }
            current_line.push_str(word);
        }

        result.push_str(indent);
        result.push_str(&current_line);
        result.push('\n');
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_respects_width() {
        let wrapped = wrap_text("one two three four five six", 12, "  ");
        for line in wrapped.lines() {
            assert!(line.len() <= 12, "line too long: {:?}", line);
        }
        assert!(wrapped.contains("one two"));
    }

    #[test]
    fn test_wrap_text_keeps_paragraphs() {
        let wrapped = wrap_text("first\n\nsecond", 80, "");
        assert_eq!(wrapped, "first\n\nsecond\n");
    }

    #[test]
    fn test_tree_groups_shared_directories() {
        let ids = vec!["a/b".to_string(), "a/c".to_string(), "x".to_string()];
        let tree = generate_document_tree(&ids);
        assert_eq!(tree, "├── a/\n│   ├── b\n│   └── c\n└── x\n");
    }

    #[test]
    fn test_tree_keeps_document_that_is_also_a_directory() {
        let ids = vec!["a".to_string(), "a/b".to_string()];
        let tree = generate_document_tree(&ids);
        assert_eq!(tree, "├── a\n└── a/\n    └── b\n");
    }
}
