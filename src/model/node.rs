//! Node in the source graph.

use std::fmt;

use serde::{Deserialize, Serialize};
use super::{PropertyMap, Value};

/// Opaque node identity as the source graph names it.
///
/// Never assumed numeric: an integer key `1` and a string key `"1"` are
/// different nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeKey {
    Int(i64),
    Str(String),
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Int(i) => write!(f, "{i}"),
            NodeKey::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for NodeKey { fn from(v: &str) -> Self { NodeKey::Str(v.to_owned()) } }
impl From<String> for NodeKey { fn from(v: String) -> Self { NodeKey::Str(v) } }
impl From<i64> for NodeKey { fn from(v: i64) -> Self { NodeKey::Int(v) } }
impl From<i32> for NodeKey { fn from(v: i32) -> Self { NodeKey::Int(v as i64) } }

/// A node: identity plus its attribute map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub key: NodeKey,
    pub properties: PropertyMap,
}

impl Node {
    pub fn new(key: impl Into<NodeKey>) -> Self {
        Self {
            key: key.into(),
            properties: PropertyMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display_is_bare() {
        assert_eq!(NodeKey::from("Gata1").to_string(), "Gata1");
        assert_eq!(NodeKey::from(12).to_string(), "12");
    }

    #[test]
    fn test_int_and_string_keys_differ() {
        assert_ne!(NodeKey::from(1), NodeKey::from("1"));
    }
}
