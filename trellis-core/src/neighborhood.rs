// Bounded neighborhood expansion around a focal document.

use crate::graph::ContentGraph;
use crate::model::DocumentNode;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};

/// Hops from the focal document included in a neighborhood.
pub const MAX_DEPTH: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeighborNode {
    pub id: String,
    pub label: String,
    /// 0 for the focal document, otherwise the hop at which it was first reached.
    pub depth: usize,
}

/// Directed edge from referrer to referent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighborhood {
    pub nodes: Vec<NeighborNode>,
    pub edges: Vec<Edge>,
}

impl Neighborhood {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn focal(&self) -> Option<&NeighborNode> {
        self.nodes.iter().find(|n| n.depth == 0)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        self.edges
            .iter()
            .any(|e| e.source == source && e.target == target)
    }

    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// Flat element list in the shape graph renderers such as Cytoscape accept.
    pub fn to_elements(&self) -> Value {
        let mut elements = Vec::with_capacity(self.nodes.len() + self.edges.len());
        for node in &self.nodes {
            elements.push(json!({
                "data": { "id": node.id, "label": node.label },
                "selected": node.depth == 0,
            }));
        }
        for edge in &self.edges {
            elements.push(json!({
                "data": { "source": edge.source, "target": edge.target },
            }));
        }
        Value::Array(elements)
    }

    pub fn to_graph(&self) -> DiGraph<String, &'static str> {
        let mut graph = DiGraph::new();
        let mut indices: HashMap<&str, NodeIndex> = HashMap::new();
        for node in &self.nodes {
            indices.insert(&node.id, graph.add_node(node.id.clone()));
        }
        for edge in &self.edges {
            if let (Some(&a), Some(&b)) = (
                indices.get(edge.source.as_str()),
                indices.get(edge.target.as_str()),
            ) {
                graph.add_edge(a, b, "");
            }
        }
        graph
    }

    /// Graphviz rendering.
    pub fn to_dot(&self) -> String {
        let graph = self.to_graph();
        format!("{}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
    }
}

#[derive(Default)]
struct Collector {
    nodes: Vec<NeighborNode>,
    edges: Vec<Edge>,
    seen_nodes: HashSet<String>,
    seen_edges: HashSet<Edge>,
}

impl Collector {
    /// Returns true when the node was not yet part of the neighborhood.
    fn add_node(&mut self, node: &DocumentNode, depth: usize) -> bool {
        if !self.seen_nodes.insert(node.id.clone()) {
            return false;
        }
        self.nodes.push(NeighborNode {
            id: node.id.clone(),
            label: node.title.clone(),
            depth,
        });
        true
    }

    fn add_edge(&mut self, source: &str, target: &str) {
        let edge = Edge {
            source: source.to_string(),
            target: target.to_string(),
        };
        if self.seen_edges.insert(edge.clone()) {
            self.edges.push(edge);
        }
    }

    fn finish(self) -> Neighborhood {
        Neighborhood {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

/// Collect every known document within two hops of `focal`, following
/// links and backlinks alike.
///
/// Depth 1 lists backlinks before links. Each depth-1 document then
/// contributes its own links and backlinks at depth 2. Identifiers that are
/// not in the graph are skipped.
pub fn expand(focal: &DocumentNode, graph: &ContentGraph) -> Neighborhood {
    let mut collector = Collector::default();
    collector.add_node(focal, 0);

    let mut frontier: Vec<&DocumentNode> = Vec::new();

    for source in &focal.backlinks {
        if let Some(node) = graph.get(source) {
            if collector.add_node(node, 1) {
                frontier.push(node);
            }
            collector.add_edge(&node.id, &focal.id);
        }
    }
    for target in &focal.links {
        if let Some(node) = graph.get(target) {
            if collector.add_node(node, 1) {
                frontier.push(node);
            }
            collector.add_edge(&focal.id, &node.id);
        }
    }

    for hop in frontier {
        for target in &hop.links {
            if let Some(node) = graph.get(target) {
                collector.add_node(node, MAX_DEPTH);
                collector.add_edge(&hop.id, &node.id);
            }
        }
        for source in &hop.backlinks {
            if let Some(node) = graph.get(source) {
                collector.add_node(node, MAX_DEPTH);
                collector.add_edge(&node.id, &hop.id);
            }
        }
    }

    collector.finish()
}
