//! PropertyMap — the key-value attributes on nodes and edges.

use std::collections::HashMap;
use super::Value;

/// A map of attribute names to values.
pub type PropertyMap = HashMap<String, Value>;
