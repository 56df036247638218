use serde::{Deserialize, Serialize};
use trellis_scanner::result::title_for;

/// A document in the content graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNode {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Resolved outbound identifiers, deduplicated, in first-seen order.
    pub links: Vec<String>,
    /// Identifiers of documents linking here, in finalize order.
    pub backlinks: Vec<String>,
}

impl DocumentNode {
    pub fn new(id: &str, content: &str, links: Vec<String>) -> Self {
        Self {
            id: id.to_string(),
            title: title_for(id).to_string(),
            content: content.to_string(),
            links,
            backlinks: Vec::new(),
        }
    }

    pub fn links_to(&self, id: &str) -> bool {
        self.links.iter().any(|l| l == id)
    }

    pub fn is_linked_from(&self, id: &str) -> bool {
        self.backlinks.iter().any(|b| b == id)
    }

    /// Returns false if `source` was already recorded.
    pub(crate) fn add_backlink(&mut self, source: &str) -> bool {
        if self.is_linked_from(source) {
            return false;
        }
        self.backlinks.push(source.to_string());
        true
    }
}

/// A document with its one-hop neighbors resolved to full nodes.
#[derive(Debug, Clone, Serialize)]
pub struct DeepDocument<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub content: &'a str,
    pub links: Vec<&'a DocumentNode>,
    pub backlinks: Vec<&'a DocumentNode>,
}

/// Per-document payload for an external full-text index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDocument {
    pub identifier: String,
    pub title: String,
    pub content: String,
}

/// A resolved link whose target is not in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DanglingLink {
    pub source: String,
    pub target: String,
}

/// A raw link dropped during construction because it could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedLink {
    pub source: String,
    pub target: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub documents: usize,
    pub links: usize,
    pub backlinks: usize,
    pub dangling: usize,
    pub unresolved: usize,
    pub orphans: usize,
}
