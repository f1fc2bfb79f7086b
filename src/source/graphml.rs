//! GraphML reader.
//!
//! Reads the subset of GraphML that graph libraries actually emit:
//!
//! ```text
//! <key id attr.name attr.type for/>   → attribute schema
//! <graph edgedefault>                 → directedness
//! <node id> <data key>..</data> </node>
//! <edge source target> <data key>..</data> </edge>
//! ```
//!
//! Key `<default>` values describe the schema and are not copied onto
//! elements. Ports and hyperedges are ignored. A `<graph>` nested inside a
//! `<node>` is flattened: its nodes and edges join the outer graph, after
//! the enclosing node, whose `<data>` is merged when its `</node>` closes.
//!
//! Text of string-typed `<data>` is kept verbatim; numeric and boolean
//! values are trimmed before parsing.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::model::*;
use crate::{Error, Result};
use super::MemoryGraph;

/// Declared type of a `<key>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrKind {
    Int,
    Float,
    Bool,
    String,
}

impl AttrKind {
    fn from_decl(decl: Option<&str>) -> Self {
        match decl {
            Some("int") | Some("long") => AttrKind::Int,
            Some("float") | Some("double") => AttrKind::Float,
            Some("boolean") => AttrKind::Bool,
            _ => AttrKind::String,
        }
    }

    /// Typed conversion; text that does not parse is kept as a string and
    /// left for the attribute extractor to reject.
    fn convert(self, text: String) -> Value {
        let trimmed = text.trim();
        let parsed = match self {
            AttrKind::Int => trimmed.parse::<i64>().ok().map(Value::Int),
            AttrKind::Float => trimmed.parse::<f64>().ok().map(Value::Float),
            AttrKind::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" => Some(Value::Bool(true)),
                "false" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
            AttrKind::String => None,
        };
        parsed.unwrap_or(Value::String(text))
    }
}

#[derive(Debug, Clone)]
struct KeySpec {
    name: String,
    kind: AttrKind,
}

/// An open element that can own `<data>` children.
enum Scope {
    Graph,
    Node(Node),
    Edge(Edge),
}

struct GraphMlParser {
    keys: HashMap<String, KeySpec>,
    graph: Option<MemoryGraph>,
    /// Open `<graph>`, `<node>` and `<edge>` elements, innermost last.
    scopes: Vec<Scope>,
    /// Key id of the open `<data>` element and its accumulated text.
    data: Option<(String, String)>,
    in_key_default: bool,
}

/// Parse a GraphML document into a `MemoryGraph`.
pub fn parse_graphml(text: &str) -> Result<MemoryGraph> {
    let mut reader = Reader::from_str(text);

    let mut parser = GraphMlParser {
        keys: HashMap::new(),
        graph: None,
        scopes: Vec::new(),
        data: None,
        in_key_default: false,
    };

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::GraphMl(format!("at byte {}: {e}", reader.buffer_position()))
        })?;
        match event {
            Event::Start(e) => parser.start(&e)?,
            Event::Empty(e) => {
                parser.start(&e)?;
                parser.end(e.local_name().as_ref());
            }
            Event::End(e) => parser.end(e.local_name().as_ref()),
            Event::Text(t) => {
                let chunk = t.unescape().map_err(|e| Error::GraphMl(e.to_string()))?;
                parser.text(&chunk);
            }
            Event::CData(t) => {
                let raw = t.into_inner();
                parser.text(&String::from_utf8_lossy(&raw));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    parser
        .graph
        .ok_or_else(|| Error::GraphMl("document has no <graph> element".into()))
}

impl GraphMlParser {
    fn start(&mut self, e: &BytesStart<'_>) -> Result<()> {
        match e.local_name().as_ref() {
            b"key" => {
                let id = required_attr(e, b"id", "key")?;
                let name = attr(e, b"attr.name")?.unwrap_or_else(|| id.clone());
                let kind = AttrKind::from_decl(attr(e, b"attr.type")?.as_deref());
                self.keys.insert(id, KeySpec { name, kind });
            }
            b"default" => self.in_key_default = true,
            b"graph" => {
                if self.graph.is_none() {
                    let directed = attr(e, b"edgedefault")?.as_deref() != Some("undirected");
                    self.graph = Some(MemoryGraph::new(directed));
                } else if let (Some(Scope::Node(outer)), Some(graph)) =
                    (self.scopes.last(), self.graph.as_mut())
                {
                    if !graph.contains_node(&outer.key) {
                        graph.add_node(Node::new(outer.key.clone()));
                    }
                    tracing::debug!(node = %outer.key, "nested <graph> flattened into the outer graph");
                }
                self.scopes.push(Scope::Graph);
            }
            b"node" if self.graph.is_some() => {
                let id = required_attr(e, b"id", "node")?;
                self.scopes.push(Scope::Node(Node::new(id)));
            }
            b"edge" if self.graph.is_some() => {
                let src = required_attr(e, b"source", "edge")?;
                let dst = required_attr(e, b"target", "edge")?;
                self.scopes.push(Scope::Edge(Edge::new(src, dst)));
            }
            b"data" if !self.in_key_default => {
                let key = required_attr(e, b"key", "data")?;
                self.data = Some((key, String::new()));
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"default" => self.in_key_default = false,
            b"graph" | b"node" | b"edge" => {
                let (Some(scope), Some(graph)) = (self.scopes.pop(), self.graph.as_mut()) else {
                    return;
                };
                match scope {
                    Scope::Node(node) => { graph.add_node(node); }
                    Scope::Edge(edge) => graph.add_edge(edge),
                    Scope::Graph => {}
                }
            }
            b"data" => {
                if let Some((key, text)) = self.data.take() {
                    self.assign(key, text);
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, chunk: &str) {
        if let Some((_, text)) = self.data.as_mut() {
            text.push_str(chunk);
        }
    }

    /// Attach a finished `<data>` value to the open node or edge.
    fn assign(&mut self, key: String, text: String) {
        let (name, value) = match self.keys.get(&key) {
            Some(spec) => (spec.name.clone(), spec.kind.convert(text)),
            None => (key, Value::String(text)),
        };
        match self.scopes.last_mut() {
            Some(Scope::Node(node)) => { node.properties.insert(name, value); }
            Some(Scope::Edge(edge)) => { edge.properties.insert(name, value); }
            // graph-level data is not part of the encoding
            Some(Scope::Graph) | None => {}
        }
    }
}

fn attr(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for a in e.attributes() {
        let a = a.map_err(|err| Error::GraphMl(err.to_string()))?;
        if a.key.local_name().as_ref() == name {
            let value = a.unescape_value().map_err(|err| Error::GraphMl(err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn required_attr(e: &BytesStart<'_>, name: &[u8], element: &str) -> Result<String> {
    attr(e, name)?.ok_or_else(|| {
        Error::GraphMl(format!(
            "<{element}> is missing its '{}' attribute",
            String::from_utf8_lossy(name)
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::GraphSource;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns">
  <key id="d0" for="node" attr.name="pseudotime" attr.type="double"/>
  <key id="d1" for="node" attr.name="attractor_size" attr.type="long">
    <default>0</default>
  </key>
  <key id="d2" for="edge" attr.name="edge_type" attr.type="string"/>
  <graph edgedefault="directed">
    <node id="A"><data key="d0">0.5</data><data key="d1">3</data></node>
    <node id="B"/>
    <node id="C"><data key="d0">not-a-number</data></node>
    <edge source="A" target="B"><data key="d2">trajectory</data></edge>
    <edge source="B" target="C"/>
  </graph>
</graphml>"#;

    #[test]
    fn test_parse_nodes_in_document_order() {
        let g = parse_graphml(SAMPLE).unwrap();
        let keys: Vec<String> = g.nodes().map(ToString::to_string).collect();
        assert_eq!(keys, ["A", "B", "C"]);
        assert!(g.is_directed());
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_typed_data() {
        let g = parse_graphml(SAMPLE).unwrap();
        let a = g.node_attributes(&"A".into()).unwrap();
        assert_eq!(a.get("pseudotime"), Some(&Value::Float(0.5)));
        assert_eq!(a.get("attractor_size"), Some(&Value::Int(3)));

        // defaults are not applied
        let b = g.node_attributes(&"B".into()).unwrap();
        assert!(b.is_empty());

        // unparsable typed text survives as a string
        let c = g.node_attributes(&"C".into()).unwrap();
        assert_eq!(c.get("pseudotime"), Some(&Value::from("not-a-number")));
    }

    #[test]
    fn test_edge_attributes() {
        let g = parse_graphml(SAMPLE).unwrap();
        let edges: Vec<&Edge> = g.edges().collect();
        assert_eq!(edges[0].edge_type(), Some(&Value::from("trajectory")));
        assert!(edges[1].edge_type().is_none());
    }

    #[test]
    fn test_undirected_default() {
        let doc = r#"<graphml><graph edgedefault="undirected"><node id="x"/></graph></graphml>"#;
        assert!(!parse_graphml(doc).unwrap().is_directed());
    }

    #[test]
    fn test_missing_graph_is_error() {
        let err = parse_graphml("<graphml></graphml>").unwrap_err();
        assert!(matches!(err, Error::GraphMl(_)));
    }

    #[test]
    fn test_node_without_id_is_error() {
        let doc = r#"<graphml><graph><node/></graph></graphml>"#;
        assert!(matches!(parse_graphml(doc).unwrap_err(), Error::GraphMl(_)));
    }

    #[test]
    fn test_nested_graph_keeps_enclosing_node() {
        let doc = r#"<graphml>
  <key id="t" for="node" attr.name="pseudotime" attr.type="double"/>
  <graph edgedefault="directed">
    <node id="n0">
      <data key="t">0.25</data>
      <graph edgedefault="directed">
        <node id="n0::a"><data key="t">0.75</data></node>
      </graph>
    </node>
    <node id="n1"/>
    <edge source="n0" target="n1"/>
  </graph>
</graphml>"#;
        let g = parse_graphml(doc).unwrap();
        let keys: Vec<String> = g.nodes().map(ToString::to_string).collect();
        assert_eq!(keys, ["n0", "n0::a", "n1"]);
        assert_eq!(
            g.node_attributes(&"n0".into()).unwrap().get("pseudotime"),
            Some(&Value::Float(0.25))
        );
        assert_eq!(
            g.node_attributes(&"n0::a".into()).unwrap().get("pseudotime"),
            Some(&Value::Float(0.75))
        );
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_string_data_not_trimmed() {
        let doc = r#"<graphml>
  <key id="r" for="node" attr.name="disease_region" attr.type="string"/>
  <key id="t" for="node" attr.name="pseudotime" attr.type="double"/>
  <graph><node id="a"><data key="r">  core </data><data key="t"> 1.5
</data></node></graph>
</graphml>"#;
        let g = parse_graphml(doc).unwrap();
        let a = g.node_attributes(&"a".into()).unwrap();
        assert_eq!(a.get("disease_region"), Some(&Value::from("  core ")));
        assert_eq!(a.get("pseudotime"), Some(&Value::Float(1.5)));
    }

    #[test]
    fn test_malformed_xml_is_error() {
        let doc = r#"<graphml><graph><node id="a"></edge></graph></graphml>"#;
        assert!(matches!(parse_graphml(doc).unwrap_err(), Error::GraphMl(_)));
    }
}
