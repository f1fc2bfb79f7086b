//! # Graph Source Trait
//!
//! This is the contract between the encoding pipeline and whatever produced
//! the graph. The pipeline only ever iterates nodes, iterates edges with
//! their attributes, and looks up node attribute maps.
//!
//! ## Implementations
//!
//! | Source | Module | Description |
//! |--------|--------|-------------|
//! | `MemoryGraph` | `memory` | In-memory graph; every loader produces one |
//!
//! ## Loaders
//!
//! | Extension | Module | Format |
//! |-----------|--------|--------|
//! | `.graphml` | `graphml` | GraphML markup |
//! | `.json` | `node_link` | Node-link JSON |

pub mod memory;
pub mod graphml;
pub mod node_link;

use std::path::Path;

use crate::model::*;
use crate::{Error, Result};

pub use memory::MemoryGraph;

// ============================================================================
// GraphSource Trait
// ============================================================================

/// Read-only view of an attributed graph.
///
/// Node order is whatever the source exposes; it is never sorted. Edge order
/// likewise. Implementations must return the same order on every call.
pub trait GraphSource {
    /// Whether edges are directed.
    fn is_directed(&self) -> bool;

    /// Total number of nodes.
    fn node_count(&self) -> usize;

    /// Total number of edges, duplicates included.
    fn edge_count(&self) -> usize;

    /// Node identities in source order.
    fn nodes(&self) -> impl Iterator<Item = &NodeKey>;

    /// Edges in source order.
    fn edges(&self) -> impl Iterator<Item = &Edge>;

    /// Attribute map of a node. None if the node is unknown.
    fn node_attributes(&self, key: &NodeKey) -> Option<&PropertyMap>;

    /// True if any edge declares an `edge_type`.
    ///
    /// Default: scans every edge.
    fn has_typed_edges(&self) -> bool {
        self.edges().any(|e| e.edge_type().is_some())
    }
}

// ============================================================================
// Input formats
// ============================================================================

/// Supported on-disk graph formats, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// `.graphml`
    GraphMl,
    /// `.json` node-link document
    NodeLink,
}

impl InputFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("graphml") => Ok(InputFormat::GraphMl),
            Some("json") => Ok(InputFormat::NodeLink),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Load a graph file into memory, dispatching on its extension.
///
/// The extension is checked before the file is opened, so an unsupported
/// path fails without touching the filesystem.
pub fn load(path: &Path) -> Result<MemoryGraph> {
    let format = InputFormat::from_path(path)?;
    tracing::info!(path = %path.display(), ?format, "loading graph");
    let text = std::fs::read_to_string(path)?;
    let graph = match format {
        InputFormat::GraphMl => graphml::parse_graphml(&text)?,
        InputFormat::NodeLink => node_link::parse_node_link(&text)?,
    };
    tracing::info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        directed = graph.is_directed(),
        "loaded graph"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a/b.graphml")).unwrap(), InputFormat::GraphMl);
        assert_eq!(InputFormat::from_path(Path::new("b.GraphML")).unwrap(), InputFormat::GraphMl);
        assert_eq!(InputFormat::from_path(Path::new("net.json")).unwrap(), InputFormat::NodeLink);
    }

    #[test]
    fn test_unsupported_extension() {
        for p in ["graph.gpickle", "graph.csv", "graph"] {
            let err = InputFormat::from_path(Path::new(p)).unwrap_err();
            assert!(matches!(err, Error::UnsupportedFormat(_)), "{p}: {err}");
        }
    }

    #[test]
    fn test_load_unsupported_does_not_read() {
        let err = load(Path::new("/definitely/missing/graph.txt")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_has_typed_edges_default() {
        let mut g = MemoryGraph::new(true);
        g.add_node(Node::new("a"));
        g.add_edge(Edge::new("a", "a"));
        assert!(!g.has_typed_edges());
        g.add_edge(Edge::new("a", "a").with_property(EDGE_TYPE_KEY, "trajectory"));
        assert!(g.has_typed_edges());
    }
}
