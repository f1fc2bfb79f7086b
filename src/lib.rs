//! # graphbin — Attributed Graph → GPU Renderer Binaries
//!
//! Turns an attributed graph into the flat `Float32Array` blobs a
//! GPU force-directed renderer loads directly, plus a JSON sidecar that
//! describes them.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `GraphSource` is the contract between loaders and the pipeline
//! 2. **One index**: array position *i* means the same node in every output
//! 3. **Encode, then write**: a failing stage leaves the output directory untouched
//! 4. **Explicit randomness**: one seeded RNG, passed in, never global
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use graphbin::{convert_file, ConvertConfig};
//!
//! # fn example() -> graphbin::Result<()> {
//! let config = ConvertConfig::default()
//!     .with_output_dir("public/data")
//!     .with_sample(Some(100_000));
//! let report = convert_file(Path::new("network.graphml"), &config)?;
//!
//! for warning in &report.warnings {
//!     eprintln!("warning: {warning}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Input Formats
//!
//! | Extension | Loader | Description |
//! |-----------|--------|-------------|
//! | `.graphml` | `source::graphml` | GraphML markup |
//! | `.json` | `source::node_link` | Node-link JSON document |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod source;
pub mod index;
pub mod encode;
pub mod attributes;
pub mod layout;
pub mod export;
pub mod config;
pub mod pipeline;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{Node, NodeKey, Edge, Value, PropertyMap};

// ============================================================================
// Re-exports: Sources
// ============================================================================

pub use source::{GraphSource, MemoryGraph, InputFormat};

// ============================================================================
// Re-exports: Pipeline
// ============================================================================

pub use config::{ConvertConfig, ArtifactPaths};
pub use export::Metadata;
pub use index::NodeIndex;
pub use pipeline::{
    convert_file, convert_graph, convert_with_rng, encode_graph,
    ConversionReport, EncodedGraph, Warning,
};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsupported input file '{0}': expected a .graphml or .json graph")]
    UnsupportedFormat(String),

    #[error("Edge references unknown node '{0}'")]
    UnknownNode(String),

    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    #[error("GraphML error: {0}")]
    GraphMl(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Errors caused by how the tool was invoked rather than by the input
    /// data.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::UnsupportedFormat(_) | Error::InvalidConfig(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
