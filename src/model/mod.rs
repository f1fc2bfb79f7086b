//! # Attributed Graph Model
//!
//! Plain DTOs shared by every pipeline stage: source loaders produce them,
//! the indexer, encoder and extractor only read them.
//!
//! Design rule: this module is pure data — no I/O, no randomness.

pub mod node;
pub mod edge;
pub mod value;
pub mod property_map;

pub use node::{Node, NodeKey};
pub use edge::{Edge, EDGE_TYPE_KEY};
pub use value::Value;
pub use property_map::PropertyMap;
