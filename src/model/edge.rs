//! Edge in the source graph.

use serde::{Deserialize, Serialize};
use super::{NodeKey, PropertyMap, Value};

/// Attribute naming an edge's type.
pub const EDGE_TYPE_KEY: &str = "edge_type";

/// A directed edge between two node identities.
///
/// Duplicates and self loops are legal; nothing here checks that the
/// endpoints exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub src: NodeKey,
    pub dst: NodeKey,
    pub properties: PropertyMap,
}

impl Edge {
    pub fn new(src: impl Into<NodeKey>, dst: impl Into<NodeKey>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            properties: PropertyMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The declared `edge_type`, if any. Non-null values of any type count
    /// as declared.
    pub fn edge_type(&self) -> Option<&Value> {
        self.properties.get(EDGE_TYPE_KEY).filter(|v| !v.is_null())
    }
}
