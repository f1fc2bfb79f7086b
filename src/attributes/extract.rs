//! Per-node attribute extraction.
//!
//! Walks nodes in index order and coerces each recognized attribute to its
//! target type. Nothing here fails: a value that is missing, null or does
//! not coerce becomes the attribute's default.

use crate::index::NodeIndex;
use crate::model::{PropertyMap, Value};
use crate::source::GraphSource;

pub const PSEUDOTIME_KEY: &str = "pseudotime";
pub const ATTRACTOR_SIZE_KEY: &str = "attractor_size";
pub const CONDITION_BIAS_KEY: &str = "condition_bias";
pub const DISEASE_REGION_KEY: &str = "disease_region";

/// An optional per-node attribute together with its graph-wide presence
/// flag.
///
/// The flag is the OR of "this node had a usable value" over every pushed
/// node. It decides whether the column is emitted at all; the values are
/// never inspected to recover it.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeColumn<T> {
    present: bool,
    values: Vec<Option<T>>,
}

impl<T> Default for AttributeColumn<T> {
    fn default() -> Self {
        Self { present: false, values: Vec::new() }
    }
}

impl<T> AttributeColumn<T> {
    pub fn with_capacity(n: usize) -> Self {
        Self { present: false, values: Vec::with_capacity(n) }
    }

    pub fn push(&mut self, value: Option<T>) {
        self.present |= value.is_some();
        self.values.push(value);
    }

    /// Whether any node supplied a usable value.
    pub fn is_present(&self) -> bool {
        self.present
    }

    pub fn values(&self) -> &[Option<T>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The values if the column is present, None otherwise.
    pub fn emitted(&self) -> Option<&[Option<T>]> {
        self.present.then_some(self.values.as_slice())
    }
}

impl<T> FromIterator<Option<T>> for AttributeColumn<T> {
    fn from_iter<I: IntoIterator<Item = Option<T>>>(iter: I) -> Self {
        let mut column = Self::default();
        for v in iter {
            column.push(v);
        }
        column
    }
}

/// All recognized attributes, aligned with the node index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeAttributes {
    pub pseudotime: AttributeColumn<f64>,
    /// Always emitted; 0 where absent or unusable.
    pub attractor_sizes: Vec<u64>,
    pub has_attractor_sizes: bool,
    pub condition_bias: AttributeColumn<f64>,
    pub disease_region: AttributeColumn<String>,
}

/// Extract every recognized attribute for every indexed node.
pub fn extract_attributes<G: GraphSource>(graph: &G, index: &NodeIndex) -> NodeAttributes {
    let n = index.len();
    let empty = PropertyMap::new();
    let mut out = NodeAttributes {
        pseudotime: AttributeColumn::with_capacity(n),
        attractor_sizes: Vec::with_capacity(n),
        has_attractor_sizes: false,
        condition_bias: AttributeColumn::with_capacity(n),
        disease_region: AttributeColumn::with_capacity(n),
    };

    for key in index.keys() {
        let attrs = graph.node_attributes(key).unwrap_or(&empty);

        out.pseudotime.push(attrs.get(PSEUDOTIME_KEY).and_then(coerce_real));

        let size = attrs.get(ATTRACTOR_SIZE_KEY).and_then(coerce_count);
        out.has_attractor_sizes |= size.is_some();
        out.attractor_sizes.push(size.unwrap_or(0));

        out.condition_bias.push(attrs.get(CONDITION_BIAS_KEY).and_then(coerce_real));
        out.disease_region.push(attrs.get(DISEASE_REGION_KEY).and_then(coerce_text));
    }

    tracing::debug!(
        pseudotime = out.pseudotime.is_present(),
        attractor_sizes = out.has_attractor_sizes,
        condition_bias = out.condition_bias.is_present(),
        disease_region = out.disease_region.is_present(),
        "extracted node attributes"
    );
    out
}

/// Finite real from a number or a numeric string.
pub fn coerce_real(value: &Value) -> Option<f64> {
    let v = match value {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        other => other.as_float()?,
    };
    v.is_finite().then_some(v)
}

/// Non-negative integer from an integer, an integral float or an integer
/// string.
pub fn coerce_count(value: &Value) -> Option<u64> {
    let v = match value {
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        other => other.as_int()?,
    };
    u64::try_from(v).ok()
}

/// Text from a string or a scalar; containers and null are unusable.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Int(_) | Value::Float(_) | Value::Bool(_) => Some(value.to_string()),
        _ => None,
    }
}
