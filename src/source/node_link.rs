//! Node-link JSON reader.
//!
//! ```json
//! {
//!   "directed": true,
//!   "multigraph": false,
//!   "nodes": [{"id": "A", "pseudotime": 0.1}, {"id": "B"}],
//!   "links": [{"source": "A", "target": "B", "edge_type": "trajectory"}]
//! }
//! ```
//!
//! `"edges"` is accepted in place of `"links"`. Every member other than the
//! identity fields becomes an attribute.

use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use crate::model::*;
use crate::{Error, Result};
use super::MemoryGraph;

#[derive(Debug, Deserialize)]
struct NodeLinkDocument {
    #[serde(default)]
    directed: bool,
    #[serde(default)]
    multigraph: bool,
    nodes: Vec<Map<String, JsonValue>>,
    #[serde(default, alias = "edges")]
    links: Vec<Map<String, JsonValue>>,
}

/// Parse a node-link document into a `MemoryGraph`.
pub fn parse_node_link(text: &str) -> Result<MemoryGraph> {
    let doc: NodeLinkDocument = serde_json::from_str(text)?;
    let mut graph = MemoryGraph::new(doc.directed);

    for (pos, mut fields) in doc.nodes.into_iter().enumerate() {
        let id = fields
            .remove("id")
            .ok_or_else(|| Error::InvalidGraph(format!("node #{pos} has no \"id\"")))?;
        let mut node = Node::new(json_key(id, "node id")?);
        node.properties = fields.into_iter().map(|(k, v)| (k, v.into())).collect();
        graph.add_node(node);
    }

    for (pos, mut fields) in doc.links.into_iter().enumerate() {
        let src = fields
            .remove("source")
            .ok_or_else(|| Error::InvalidGraph(format!("link #{pos} has no \"source\"")))?;
        let dst = fields
            .remove("target")
            .ok_or_else(|| Error::InvalidGraph(format!("link #{pos} has no \"target\"")))?;
        if doc.multigraph {
            fields.remove("key");
        }
        let mut edge = Edge::new(json_key(src, "link source")?, json_key(dst, "link target")?);
        edge.properties = fields.into_iter().map(|(k, v)| (k, v.into())).collect();
        graph.add_edge(edge);
    }

    Ok(graph)
}

/// Scalars become node identities; integers stay integers.
fn json_key(value: JsonValue, what: &str) -> Result<NodeKey> {
    match value {
        JsonValue::String(s) => Ok(NodeKey::Str(s)),
        JsonValue::Number(n) => Ok(match n.as_i64() {
            Some(i) => NodeKey::Int(i),
            None => NodeKey::Str(n.to_string()),
        }),
        JsonValue::Bool(b) => Ok(NodeKey::Str(b.to_string())),
        other => Err(Error::InvalidGraph(format!("{what} must be a scalar, got {other}"))),
    }
}
