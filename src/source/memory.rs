//! In-memory graph source.
//!
//! The reference implementation of `GraphSource`. Both file loaders build
//! one of these; tests build them by hand.
//!
//! ## Semantics
//!
//! - Nodes keep insertion order. Re-adding an existing key merges the new
//!   attributes into the old node without moving it.
//! - Edges keep insertion order. Duplicates and self loops are kept.
//! - `add_edge` does NOT create missing endpoints, so a malformed source
//!   graph stays malformed and the indexer can reject it.

use hashbrown::HashMap;

use crate::model::*;
use super::GraphSource;

/// In-memory attributed graph.
#[derive(Debug, Clone, Default)]
pub struct MemoryGraph {
    directed: bool,
    nodes: Vec<Node>,
    /// key → position in `nodes`
    lookup: HashMap<NodeKey, usize>,
    edges: Vec<Edge>,
}

impl MemoryGraph {
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            ..Self::default()
        }
    }

    /// Insert a node, or merge attributes into an existing one.
    /// Returns true if the node was new.
    pub fn add_node(&mut self, node: Node) -> bool {
        if let Some(&pos) = self.lookup.get(&node.key) {
            self.nodes[pos].properties.extend(node.properties);
            return false;
        }
        self.lookup.insert(node.key.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    /// Append an edge. Endpoints are not checked.
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn contains_node(&self, key: &NodeKey) -> bool {
        self.lookup.contains_key(key)
    }

    pub fn node(&self, key: &NodeKey) -> Option<&Node> {
        self.lookup.get(key).map(|&pos| &self.nodes[pos])
    }

    /// Build a graph from node keys and bare edges, endpoints included as
    /// given.
    pub fn from_edges<K: Into<NodeKey>>(
        directed: bool,
        nodes: impl IntoIterator<Item = K>,
        edges: impl IntoIterator<Item = (K, K)>,
    ) -> Self {
        let mut graph = Self::new(directed);
        for key in nodes {
            graph.add_node(Node::new(key));
        }
        for (src, dst) in edges {
            graph.add_edge(Edge::new(src, dst));
        }
        graph
    }
}

impl GraphSource for MemoryGraph {
    fn is_directed(&self) -> bool { self.directed }

    fn node_count(&self) -> usize { self.nodes.len() }

    fn edge_count(&self) -> usize { self.edges.len() }

    fn nodes(&self) -> impl Iterator<Item = &NodeKey> {
        self.nodes.iter().map(|n| &n.key)
    }

    fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    fn node_attributes(&self, key: &NodeKey) -> Option<&PropertyMap> {
        self.node(key).map(|n| &n.properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_kept() {
        let g = MemoryGraph::from_edges(true, ["C", "A", "B"], []);
        let keys: Vec<String> = g.nodes().map(ToString::to_string).collect();
        assert_eq!(keys, ["C", "A", "B"]);
    }

    #[test]
    fn test_readd_merges_attributes() {
        let mut g = MemoryGraph::new(true);
        assert!(g.add_node(Node::new("a").with_property("x", 1)));
        assert!(g.add_node(Node::new("b")));
        assert!(!g.add_node(Node::new("a").with_property("y", 2)));

        assert_eq!(g.node_count(), 2);
        assert_eq!(g.nodes().next(), Some(&NodeKey::from("a")));
        let attrs = g.node_attributes(&"a".into()).unwrap();
        assert_eq!(attrs.get("x"), Some(&Value::Int(1)));
        assert_eq!(attrs.get("y"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_duplicates_and_self_loops_kept() {
        let g = MemoryGraph::from_edges(true, ["a", "b"], [("a", "b"), ("a", "b"), ("b", "b")]);
        assert_eq!(g.edge_count(), 3);
        let last = g.edges().last().unwrap();
        assert_eq!(last.src, last.dst);
    }

    #[test]
    fn test_dangling_edge_not_autocreated() {
        let g = MemoryGraph::from_edges(true, ["a"], [("a", "ghost")]);
        assert_eq!(g.node_count(), 1);
        assert!(!g.contains_node(&"ghost".into()));
        assert!(g.node_attributes(&"ghost".into()).is_none());
    }
}
