//! Conversion pipeline.
//!
//! ```text
//! GraphSource → NodeIndex → { encode edges, extract attributes, seed positions }
//!             → normalize → ArtifactSet → files
//! ```
//!
//! One seeded RNG is threaded through every random draw: edge sampling
//! first, then position seeding. The same seed and input always give the
//! same bytes.

use std::fmt;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::attributes::{coerce_real, extract_attributes, NodeAttributes, PSEUDOTIME_KEY};
use crate::config::{ArtifactPaths, ConvertConfig};
use crate::encode::{encode_edges, EncodedEdges};
use crate::export::{write_artifacts, ArtifactSet};
use crate::index::{NodeIndex, MAX_EXACT_F32_INDEX};
use crate::layout::seed_positions;
use crate::source::{self, GraphSource};
use crate::Result;

// ============================================================================
// Advisories
// ============================================================================

/// Non-fatal conditions the caller must be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Edges of a trajectory-like graph were sampled, so kept edges lose
    /// their neighbors along the path.
    SampledSequentialGraph { kept: usize, total: usize },
    /// Node ids above 2^24 are not exact in `f32`.
    IndexPrecision { num_nodes: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::SampledSequentialGraph { kept, total } => write!(
                f,
                "sampled {kept} of {total} edges from a sequential graph; \
                 trajectories in the output are disconnected"
            ),
            Warning::IndexPrecision { num_nodes } => write!(
                f,
                "{num_nodes} nodes exceed {MAX_EXACT_F32_INDEX}; edge indices lose precision as f32"
            ),
        }
    }
}

/// A directed graph whose structure is a state sequence: typed edges,
/// a usable pseudotime on any node, or path-like degrees (in ≤ 1 and
/// out ≤ 1 everywhere).
pub fn is_sequential<G: GraphSource>(graph: &G, index: &NodeIndex) -> bool {
    if !graph.is_directed() {
        return false;
    }
    if graph.has_typed_edges() {
        return true;
    }
    let has_pseudotime = index.keys().iter().any(|k| {
        graph
            .node_attributes(k)
            .and_then(|attrs| attrs.get(PSEUDOTIME_KEY))
            .and_then(coerce_real)
            .is_some()
    });
    has_pseudotime || is_path_like(graph, index)
}

fn is_path_like<G: GraphSource>(graph: &G, index: &NodeIndex) -> bool {
    let mut in_deg = vec![0u32; index.len()];
    let mut out_deg = vec![0u32; index.len()];
    for edge in graph.edges() {
        let (Some(s), Some(d)) = (index.get(&edge.src), index.get(&edge.dst)) else {
            continue;
        };
        out_deg[s as usize] += 1;
        in_deg[d as usize] += 1;
        if out_deg[s as usize] > 1 || in_deg[d as usize] > 1 {
            return false;
        }
    }
    true
}

// ============================================================================
// In-memory encoding
// ============================================================================

/// Every array of one run, before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedGraph {
    pub index: NodeIndex,
    pub edges: EncodedEdges,
    pub positions: Vec<f32>,
    pub attributes: NodeAttributes,
    pub warnings: Vec<Warning>,
}

/// Run every stage in memory. Fails before producing anything if the
/// graph is inconsistent.
pub fn encode_graph<G: GraphSource, R: Rng + ?Sized>(
    graph: &G,
    config: &ConvertConfig,
    rng: &mut R,
) -> Result<EncodedGraph> {
    config.validate()?;

    let index = NodeIndex::build(graph);
    let mut warnings = Vec::new();
    if !index.fits_f32() {
        warnings.push(Warning::IndexPrecision { num_nodes: index.len() });
    }

    let edges = encode_edges(graph, &index, config.sample, rng)?;
    if edges.sampled && is_sequential(graph, &index) {
        warnings.push(Warning::SampledSequentialGraph {
            kept: edges.edge_count(),
            total: edges.total_edges,
        });
    }

    let attributes = extract_attributes(graph, &index);
    let positions = seed_positions(index.len(), config.position_extent, rng);

    for w in &warnings {
        tracing::warn!("{w}");
    }

    Ok(EncodedGraph { index, edges, positions, attributes, warnings })
}

// ============================================================================
// Full conversion
// ============================================================================

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    pub num_nodes: usize,
    /// After sampling.
    pub num_edges: usize,
    /// Before sampling.
    pub total_edges: usize,
    pub has_edge_types: bool,
    /// Every file written, metadata last.
    pub written: Vec<PathBuf>,
    pub warnings: Vec<Warning>,
}

/// Encode a graph and write its artifacts, drawing randomness from `rng`.
pub fn convert_with_rng<G: GraphSource, R: Rng + ?Sized>(
    graph: &G,
    paths: &ArtifactPaths,
    config: &ConvertConfig,
    rng: &mut R,
) -> Result<ConversionReport> {
    let encoded = encode_graph(graph, config, rng)?;
    let set = ArtifactSet::assemble(
        &encoded.index,
        &encoded.edges,
        &encoded.positions,
        &encoded.attributes,
        paths,
    );
    let written = write_artifacts(&set, &paths.dir)?;

    Ok(ConversionReport {
        num_nodes: encoded.index.len(),
        num_edges: encoded.edges.edge_count(),
        total_edges: encoded.edges.total_edges,
        has_edge_types: encoded.edges.is_partitioned(),
        written,
        warnings: encoded.warnings,
    })
}

/// Encode a graph and write its artifacts with a `StdRng` seeded from the
/// config.
pub fn convert_graph<G: GraphSource>(
    graph: &G,
    paths: &ArtifactPaths,
    config: &ConvertConfig,
) -> Result<ConversionReport> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    convert_with_rng(graph, paths, config, &mut rng)
}

/// Load a graph file and convert it. Artifact names derive from the file
/// stem.
pub fn convert_file(input: &Path, config: &ConvertConfig) -> Result<ConversionReport> {
    config.validate()?;
    let graph = source::load(input)?;
    let paths = config.artifact_paths(input);
    convert_graph(&graph, &paths, config)
}
