//! Edge encoder.
//!
//! Turns the source's edge sequence into flat `f32` arrays of interleaved
//! node ids:
//!
//! ```text
//! edges (u0,v0) (u1,v1) ...  →  [id(u0), id(v0), id(u1), id(v1), ...]
//! ```
//!
//! Order of work:
//! 1. resolve every edge's endpoints through the `NodeIndex` (a miss aborts)
//! 2. optionally sample S edges without replacement
//! 3. encode the sampled sequence into the combined array
//! 4. if any edge in the graph declares an `edge_type`, split the sampled
//!    sequence into trajectory and similarity arrays

use rand::Rng;

use crate::index::NodeIndex;
use crate::model::Edge;
use crate::source::GraphSource;
use crate::Result;

/// `edge_type` value that routes an edge to the similarity stream.
pub const SIMILARITY_TAG: &str = "similarity";

/// Which typed stream an edge belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Trajectory,
    Similarity,
}

impl EdgeKind {
    /// Similarity only when tagged so; untyped and other tags are trajectory.
    pub fn of(edge: &Edge) -> Self {
        match edge.edge_type().and_then(|v| v.as_str()) {
            Some(SIMILARITY_TAG) => EdgeKind::Similarity,
            _ => EdgeKind::Trajectory,
        }
    }
}

/// An edge after index resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedEdge {
    pub src: u32,
    pub dst: u32,
    pub kind: EdgeKind,
}

/// Typed edge streams, present only when partitioning is active.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgePartition {
    pub trajectory: Vec<f32>,
    pub similarity: Vec<f32>,
}

impl EdgePartition {
    pub fn trajectory_count(&self) -> usize { self.trajectory.len() / 2 }
    pub fn similarity_count(&self) -> usize { self.similarity.len() / 2 }
}

/// Output of the edge encoder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedEdges {
    /// All edges after sampling, interleaved.
    pub combined: Vec<f32>,
    pub partition: Option<EdgePartition>,
    /// Edge count before sampling.
    pub total_edges: usize,
    /// Whether sampling actually removed edges.
    pub sampled: bool,
}

impl EncodedEdges {
    /// Edge count after sampling.
    pub fn edge_count(&self) -> usize {
        self.combined.len() / 2
    }

    pub fn is_partitioned(&self) -> bool {
        self.partition.is_some()
    }
}

/// Resolve every edge's endpoints. Fails on the first unknown node.
pub fn resolve_edges<G: GraphSource>(graph: &G, index: &NodeIndex) -> Result<Vec<IndexedEdge>> {
    graph
        .edges()
        .map(|edge| -> Result<IndexedEdge> {
            Ok(IndexedEdge {
                src: index.resolve(&edge.src)?,
                dst: index.resolve(&edge.dst)?,
                kind: EdgeKind::of(edge),
            })
        })
        .collect()
}

/// Keep `sample` edges chosen uniformly without replacement, in draw order.
///
/// Returns the input untouched (and draws nothing from `rng`) when `sample`
/// is None or not smaller than the edge count. The bool reports whether
/// sampling happened.
pub fn sample_edges<R: Rng + ?Sized>(
    edges: Vec<IndexedEdge>,
    sample: Option<usize>,
    rng: &mut R,
) -> (Vec<IndexedEdge>, bool) {
    match sample {
        Some(s) if s < edges.len() => {
            let picked = rand::seq::index::sample(rng, edges.len(), s);
            (picked.into_iter().map(|i| edges[i]).collect(), true)
        }
        _ => (edges, false),
    }
}

/// Interleave `(src, dst)` ids as `f32`.
pub fn encode_pairs<'a>(edges: impl IntoIterator<Item = &'a IndexedEdge>) -> Vec<f32> {
    let edges = edges.into_iter();
    let mut out = Vec::with_capacity(edges.size_hint().0 * 2);
    for e in edges {
        out.push(e.src as f32);
        out.push(e.dst as f32);
    }
    out
}

/// Split edges by kind, each stream keeping the input order.
pub fn partition_edges(edges: &[IndexedEdge]) -> EdgePartition {
    EdgePartition {
        trajectory: encode_pairs(edges.iter().filter(|e| e.kind == EdgeKind::Trajectory)),
        similarity: encode_pairs(edges.iter().filter(|e| e.kind == EdgeKind::Similarity)),
    }
}

/// Run the whole encoder: resolve, sample, encode, partition.
pub fn encode_edges<G: GraphSource, R: Rng + ?Sized>(
    graph: &G,
    index: &NodeIndex,
    sample: Option<usize>,
    rng: &mut R,
) -> Result<EncodedEdges> {
    let resolved = resolve_edges(graph, index)?;
    let total_edges = resolved.len();

    let (edges, sampled) = sample_edges(resolved, sample, rng);
    if sampled {
        tracing::info!(kept = edges.len(), total = total_edges, "sampled edges");
    }

    let partition = graph.has_typed_edges().then(|| partition_edges(&edges));
    if let Some(p) = &partition {
        tracing::debug!(
            trajectory = p.trajectory_count(),
            similarity = p.similarity_count(),
            "partitioned edges by type"
        );
    }

    Ok(EncodedEdges {
        combined: encode_pairs(&edges),
        partition,
        total_edges,
        sampled,
    })
}
