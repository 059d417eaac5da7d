//! Node table shared by the graph renderers (DOT, GML, GraphXML).
//!
//! Each printed record becomes one node, keyed by its cache key. Edges are
//! resolved at the end of the session, so a parent logged after its child
//! still gets linked.

use crate::record::UrlRecord;
use std::collections::HashMap;

/// A node of the link graph.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: usize,
    pub url: String,
    pub name: String,
    pub parent_url: Option<String>,
    pub valid: bool,
    pub is_extern: Option<bool>,
    pub dltime: Option<f64>,
    pub dlsize: Option<u64>,
    pub checktime: f64,
}

/// Nodes in insertion order plus lookup by key and URL.
#[derive(Debug, Default)]
pub struct GraphNodes {
    nodes: Vec<Node>,
    by_key: HashMap<String, usize>,
    by_url: HashMap<String, usize>,
}

impl GraphNodes {
    /// Adds a node for `record`. Returns `None` if its key was already seen.
    pub fn add(&mut self, record: &UrlRecord) -> Option<&Node> {
        let key = record.node_key().to_string();
        if self.by_key.contains_key(&key) {
            return None;
        }
        let id = self.nodes.len();
        let url = record.url.clone().unwrap_or_default();
        self.by_key.insert(key, id);
        self.by_url.entry(url.clone()).or_insert(id);
        self.nodes.push(Node {
            id,
            url,
            name: record.name.clone(),
            parent_url: record.parent_url.clone(),
            valid: record.valid,
            is_extern: record.is_extern,
            dltime: record.dltime,
            dlsize: record.dlsize,
            checktime: record.checktime,
        });
        self.nodes.last()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `(parent, child)` pairs for every node whose parent is also a node.
    pub fn edges(&self) -> Vec<(&Node, &Node)> {
        self.nodes
            .iter()
            .filter_map(|child| {
                let parent_url = child.parent_url.as_ref()?;
                let parent = self.by_url.get(parent_url)?;
                Some((&self.nodes[*parent], child))
            })
            .collect()
    }
}

/// Label of a node: its name, or the URL when the name is empty.
pub fn node_label(node: &Node) -> &str {
    if node.name.is_empty() {
        &node.url
    } else {
        &node.name
    }
}
