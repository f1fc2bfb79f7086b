//! Node indexer.
//!
//! Assigns every node a dense id in `0..N` following the source's node
//! order. Every output array is addressed by these ids, so the index is
//! built once, before any other stage, and never modified.

use hashbrown::HashMap;

use crate::model::NodeKey;
use crate::source::GraphSource;
use crate::{Error, Result};

/// Largest node count whose ids are all exactly representable as `f32`.
pub const MAX_EXACT_F32_INDEX: usize = 1 << 24;

/// Bijection between node identities and dense ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeIndex {
    keys: Vec<NodeKey>,
    ids: HashMap<NodeKey, u32>,
}

impl NodeIndex {
    /// Index the source's nodes in the order it yields them.
    ///
    /// A key seen twice keeps its first id; a conforming source never
    /// yields duplicates.
    pub fn build<G: GraphSource>(graph: &G) -> Self {
        let mut index = Self {
            keys: Vec::with_capacity(graph.node_count()),
            ids: HashMap::with_capacity(graph.node_count()),
        };
        for key in graph.nodes() {
            if index.ids.contains_key(key) {
                tracing::debug!(%key, "duplicate node key ignored by indexer");
                continue;
            }
            index.ids.insert(key.clone(), index.keys.len() as u32);
            index.keys.push(key.clone());
        }
        index
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn get(&self, key: &NodeKey) -> Option<u32> {
        self.ids.get(key).copied()
    }

    /// Look up a key that must exist. A miss means the source graph
    /// references a node it never declared.
    pub fn resolve(&self, key: &NodeKey) -> Result<u32> {
        self.get(key).ok_or_else(|| Error::UnknownNode(key.to_string()))
    }

    /// Keys in id order.
    pub fn keys(&self) -> &[NodeKey] {
        &self.keys
    }

    /// Display names in id order.
    pub fn names(&self) -> Vec<String> {
        self.keys.iter().map(ToString::to_string).collect()
    }

    /// True when every id survives the trip through `f32`.
    pub fn fits_f32(&self) -> bool {
        self.keys.len() <= MAX_EXACT_F32_INDEX
    }
}
