// The content graph.
//
// Construction happens in two phases. `GraphBuilder` inserts documents with
// their resolved outbound links only; `GraphBuilder::finish` then computes
// every backlink in one pass over the fully populated node map, so the order
// in which documents arrive never changes the result. The finished
// `ContentGraph` has no mutation API.

use crate::error::{GraphError, Result};
use crate::model::{
    DanglingLink, DeepDocument, DocumentNode, GraphStats, SearchDocument, UnresolvedLink,
};
use crate::neighborhood::{Neighborhood, expand};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};
use trellis_scanner::{DEFAULT_EXTENSION, LinkExtractor, Resolver, ScanError, ScannedDocument};

pub struct GraphBuilder {
    extractor: LinkExtractor,
    resolver: Resolver,
    nodes: HashMap<String, DocumentNode>,
    order: Vec<String>,
    unresolved: Vec<UnresolvedLink>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::with_extension(DEFAULT_EXTENSION)
    }

    pub fn with_extension(extension: &str) -> Self {
        Self {
            extractor: LinkExtractor::new(extension),
            resolver: Resolver::new(extension),
            nodes: HashMap::new(),
            order: Vec::new(),
            unresolved: Vec::new(),
        }
    }

    /// Parse and insert one raw document. Returns false for a duplicate id.
    pub fn insert(&mut self, id: &str, raw_text: &str) -> bool {
        let document = ScannedDocument::parse(id, raw_text, &self.extractor);
        self.insert_scanned(document)
    }

    /// Insert a document whose raw links were already extracted.
    ///
    /// The first document with a given identifier wins; later ones are
    /// skipped with a warning.
    pub fn insert_scanned(&mut self, document: ScannedDocument) -> bool {
        if self.nodes.contains_key(&document.id) {
            warn!("Skipping duplicate document identifier: {}", document.id);
            return false;
        }

        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for raw in &document.raw_links {
            match self.resolver.resolve(&document.id, raw) {
                Ok(target) => {
                    if seen.insert(target.clone()) {
                        links.push(target);
                    }
                }
                Err(e) => {
                    debug!("Dropping link in {}: {}", document.id, e);
                    let reason = match e {
                        ScanError::UnresolvableLink { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    self.unresolved.push(UnresolvedLink {
                        source: document.id.clone(),
                        target: raw.clone(),
                        reason,
                    });
                }
            }
        }

        let node = DocumentNode::new(&document.id, &document.content, links);
        self.order.push(document.id.clone());
        self.nodes.insert(document.id, node);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Compute backlinks and freeze the graph.
    pub fn finish(self) -> ContentGraph {
        let GraphBuilder {
            mut nodes,
            order,
            unresolved,
            ..
        } = self;

        let mut pairs = Vec::new();
        for id in &order {
            for target in &nodes[id].links {
                if nodes.contains_key(target) {
                    pairs.push((target.clone(), id.clone()));
                }
            }
        }

        let mut backlinks = 0usize;
        for (target, source) in pairs {
            if let Some(node) = nodes.get_mut(&target)
                && node.add_backlink(&source)
            {
                backlinks += 1;
            }
        }

        info!(
            "Content graph built: {} documents, {} backlinks, {} unresolved links",
            order.len(),
            backlinks,
            unresolved.len()
        );

        ContentGraph {
            nodes,
            order,
            unresolved,
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only document graph keyed by canonical identifier.
#[derive(Debug, Clone, Default)]
pub struct ContentGraph {
    nodes: HashMap<String, DocumentNode>,
    order: Vec<String>,
    unresolved: Vec<UnresolvedLink>,
}

impl ContentGraph {
    /// Build a graph from `(identifier, raw_text)` pairs.
    pub fn build<I, S, T>(documents: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut builder = GraphBuilder::new();
        for (id, raw) in documents {
            builder.insert(id.as_ref(), raw.as_ref());
        }
        builder.finish()
    }

    /// Build a graph from documents the scanner already parsed.
    pub fn from_scanned<I>(documents: I, extension: &str) -> Self
    where
        I: IntoIterator<Item = ScannedDocument>,
    {
        let mut builder = GraphBuilder::with_extension(extension);
        for document in documents {
            builder.insert_scanned(document);
        }
        builder.finish()
    }

    pub fn get(&self, id: &str) -> Option<&DocumentNode> {
        self.nodes.get(id)
    }

    pub fn require(&self, id: &str) -> Result<&DocumentNode> {
        self.get(id)
            .ok_or_else(|| GraphError::DocumentNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Documents in insertion order.
    pub fn documents(&self) -> impl Iterator<Item = &DocumentNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// The document plus its known outbound and backlink documents.
    pub fn get_deep(&self, id: &str) -> Option<DeepDocument<'_>> {
        let node = self.get(id)?;
        Some(DeepDocument {
            id: &node.id,
            title: &node.title,
            content: &node.content,
            links: node.links.iter().filter_map(|l| self.get(l)).collect(),
            backlinks: node.backlinks.iter().filter_map(|b| self.get(b)).collect(),
        })
    }

    /// Depth-2 neighborhood of `id`; empty when `id` is unknown.
    pub fn neighborhood(&self, id: &str) -> Neighborhood {
        match self.get(id) {
            Some(node) => expand(node, self),
            None => Neighborhood::default(),
        }
    }

    pub fn search_documents(&self) -> Vec<SearchDocument> {
        self.documents()
            .map(|node| SearchDocument {
                identifier: node.id.clone(),
                title: node.title.clone(),
                content: node.content.clone(),
            })
            .collect()
    }

    /// Outbound links whose target is not a known document.
    pub fn dangling_links(&self) -> Vec<DanglingLink> {
        self.documents()
            .flat_map(|node| {
                node.links
                    .iter()
                    .filter(|target| !self.contains(target))
                    .map(|target| DanglingLink {
                        source: node.id.clone(),
                        target: target.clone(),
                    })
            })
            .collect()
    }

    pub fn unresolved_links(&self) -> &[UnresolvedLink] {
        &self.unresolved
    }

    /// Documents with no known outbound link and no backlink.
    pub fn orphans(&self) -> Vec<&DocumentNode> {
        self.documents()
            .filter(|node| node.backlinks.is_empty() && !node.links.iter().any(|l| self.contains(l)))
            .collect()
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            documents: self.len(),
            links: self.documents().map(|n| n.links.len()).sum(),
            backlinks: self.documents().map(|n| n.backlinks.len()).sum(),
            dangling: self.dangling_links().len(),
            unresolved: self.unresolved.len(),
            orphans: self.orphans().len(),
        }
    }
}
