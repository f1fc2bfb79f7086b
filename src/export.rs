//! Binary + metadata export.
//!
//! Every numeric array is written as a headerless blob of native-endian
//! `f32`. Lengths live only in the JSON sidecar:
//!
//! ```text
//! <base>_edges.bin              [src, dst, src, dst, ...]      always
//! <base>_edges_trajectory.bin   same layout, trajectory edges   partitioned + non-empty
//! <base>_edges_similarity.bin   same layout, similarity edges   partitioned + non-empty
//! <base>_positions.bin          [x, y, x, y, ...]               always
//! <base>_metadata.json          `Metadata`                      always
//! ```
//!
//! Everything is encoded into an `ArtifactSet` in memory first; nothing
//! touches the filesystem until `write_artifacts`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::attributes::{
    normalize_condition_bias, normalize_pseudotime, NodeAttributes,
};
use crate::config::ArtifactPaths;
use crate::encode::EncodedEdges;
use crate::index::NodeIndex;
use crate::Result;

/// The JSON sidecar. Field order is the serialized order.
///
/// Optional fields are omitted, not nulled, when their gate is off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub num_nodes: usize,
    /// After sampling.
    pub num_edges: usize,
    pub has_edge_types: bool,
    pub num_trajectory_edges: usize,
    pub num_similarity_edges: usize,
    pub edges_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trajectory_edges_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_edges_file: Option<String>,
    pub positions_file: String,
    /// Node identities in index order.
    pub names: Vec<String>,
    pub attractor_sizes: Vec<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pseudotime_raw: Option<Vec<Option<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pseudotime_norm: Option<Vec<Option<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pseudotime_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pseudotime_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_bias_raw: Option<Vec<Option<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_bias_norm: Option<Vec<Option<f64>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease_region: Option<Vec<Option<String>>>,
}

impl Metadata {
    pub fn build(
        index: &NodeIndex,
        edges: &EncodedEdges,
        attrs: &NodeAttributes,
        paths: &ArtifactPaths,
    ) -> Self {
        let (num_trajectory_edges, num_similarity_edges) = edges
            .partition
            .as_ref()
            .map(|p| (p.trajectory_count(), p.similarity_count()))
            .unwrap_or((0, 0));

        let pseudotime = attrs
            .pseudotime
            .emitted()
            .and_then(normalize_pseudotime);
        let condition_bias = attrs
            .condition_bias
            .emitted()
            .map(normalize_condition_bias);

        Self {
            num_nodes: index.len(),
            num_edges: edges.edge_count(),
            has_edge_types: edges.is_partitioned(),
            num_trajectory_edges,
            num_similarity_edges,
            edges_file: paths.edges(),
            trajectory_edges_file: (num_trajectory_edges > 0).then(|| paths.trajectory_edges()),
            similarity_edges_file: (num_similarity_edges > 0).then(|| paths.similarity_edges()),
            positions_file: paths.positions(),
            names: index.names(),
            attractor_sizes: attrs.attractor_sizes.clone(),
            pseudotime_min: pseudotime.as_ref().map(|p| p.bounds.min),
            pseudotime_max: pseudotime.as_ref().map(|p| p.bounds.max),
            pseudotime_raw: pseudotime.as_ref().map(|p| p.raw.clone()),
            pseudotime_norm: pseudotime.map(|p| p.norm),
            condition_bias_raw: condition_bias.as_ref().map(|c| c.raw.clone()),
            condition_bias_norm: condition_bias.map(|c| c.norm),
            disease_region: attrs.disease_region.emitted().map(<[_]>::to_vec),
        }
    }
}

/// One file's name and full contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Every file of one run, fully encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactSet {
    pub binaries: Vec<Artifact>,
    pub metadata: Metadata,
    pub metadata_file: String,
}

impl ArtifactSet {
    /// Encode the arrays and metadata. Typed edge files are only produced
    /// for non-empty partitions, matching the names the metadata carries.
    pub fn assemble(
        index: &NodeIndex,
        edges: &EncodedEdges,
        positions: &[f32],
        attrs: &NodeAttributes,
        paths: &ArtifactPaths,
    ) -> Self {
        let metadata = Metadata::build(index, edges, attrs, paths);

        let mut binaries = vec![Artifact {
            file_name: metadata.edges_file.clone(),
            bytes: f32_bytes(&edges.combined),
        }];
        if let Some(partition) = &edges.partition {
            if let Some(name) = &metadata.trajectory_edges_file {
                binaries.push(Artifact { file_name: name.clone(), bytes: f32_bytes(&partition.trajectory) });
            }
            if let Some(name) = &metadata.similarity_edges_file {
                binaries.push(Artifact { file_name: name.clone(), bytes: f32_bytes(&partition.similarity) });
            }
        }
        binaries.push(Artifact {
            file_name: metadata.positions_file.clone(),
            bytes: f32_bytes(positions),
        });

        Self { binaries, metadata, metadata_file: paths.metadata() }
    }

    pub fn metadata_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.metadata)?)
    }
}

/// Native-endian bytes of an `f32` slice.
pub fn f32_bytes(values: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 4);
    for v in values {
        out.extend_from_slice(&v.to_ne_bytes());
    }
    out
}

/// Inverse of `f32_bytes`. Trailing bytes that do not fill an `f32` are
/// ignored.
pub fn f32_from_bytes(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// Create `dir` if needed and write every artifact, overwriting existing
/// files. Returns the written paths, metadata last.
pub fn write_artifacts(set: &ArtifactSet, dir: &Path) -> Result<Vec<PathBuf>> {
    // encode before creating anything on disk
    let metadata = set.metadata_json()?;

    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(set.binaries.len() + 1);
    for artifact in &set.binaries {
        let path = dir.join(&artifact.file_name);
        tracing::info!(path = %path.display(), bytes = artifact.bytes.len(), "writing binary");
        std::fs::write(&path, &artifact.bytes)?;
        written.push(path);
    }

    let path = dir.join(&set.metadata_file);
    tracing::info!(path = %path.display(), "writing metadata");
    std::fs::write(&path, metadata)?;
    written.push(path);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeColumn;
    use crate::encode::EdgePartition;

    fn four_nodes() -> NodeIndex {
        let g = crate::source::MemoryGraph::from_edges(true, ["A", "B", "C", "D"], []);
        NodeIndex::build(&g)
    }

    fn bare_attrs(n: usize) -> NodeAttributes {
        NodeAttributes {
            pseudotime: std::iter::repeat_n(None, n).collect(),
            attractor_sizes: vec![0; n],
            has_attractor_sizes: false,
            condition_bias: std::iter::repeat_n(None, n).collect(),
            disease_region: std::iter::repeat_n(None, n).collect(),
        }
    }

    fn paths() -> ArtifactPaths {
        ArtifactPaths::new(Path::new("out"), "g")
    }

    #[test]
    fn test_f32_bytes_native_endian() {
        let bytes = f32_bytes(&[1.0, 2.5]);
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[..4], &1.0f32.to_ne_bytes());
        assert_eq!(f32_from_bytes(&bytes), vec![1.0, 2.5]);
    }

    #[test]
    fn test_metadata_omits_absent_attributes() {
        let edges = EncodedEdges {
            combined: vec![0.0, 1.0, 1.0, 2.0, 2.0, 3.0],
            total_edges: 3,
            ..Default::default()
        };
        let meta = Metadata::build(&four_nodes(), &edges, &bare_attrs(4), &paths());
        let json = serde_json::to_value(&meta).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj["num_nodes"], 4);
        assert_eq!(obj["num_edges"], 3);
        assert_eq!(obj["has_edge_types"], false);
        assert_eq!(obj["edges_file"], "g_edges.bin");
        assert_eq!(obj["attractor_sizes"], serde_json::json!([0, 0, 0, 0]));
        for key in [
            "trajectory_edges_file", "similarity_edges_file",
            "pseudotime_raw", "pseudotime_norm", "pseudotime_min", "pseudotime_max",
            "condition_bias_raw", "condition_bias_norm", "disease_region",
        ] {
            assert!(!obj.contains_key(key), "{key} should be omitted");
        }
    }

    #[test]
    fn test_metadata_with_attributes() {
        let mut attrs = bare_attrs(4);
        attrs.pseudotime = [None, None, Some(5.0), None].into_iter().collect();
        attrs.condition_bias = [Some(2.0), None, None, Some(-1.0)].into_iter().collect();
        attrs.disease_region = [None, Some("LN".to_string()), None, None].into_iter().collect();

        let meta = Metadata::build(&four_nodes(), &EncodedEdges::default(), &attrs, &paths());
        assert_eq!(meta.pseudotime_raw, Some(vec![None, None, Some(5.0), None]));
        assert_eq!(meta.pseudotime_norm, Some(vec![None, None, Some(1.0), None]));
        assert_eq!(meta.pseudotime_min, Some(5.0));
        assert_eq!(meta.pseudotime_max, Some(5.0));
        assert_eq!(meta.condition_bias_norm, Some(vec![Some(1.5), None, None, Some(0.0)]));
        assert_eq!(meta.disease_region, Some(vec![None, Some("LN".into()), None, None]));

        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["pseudotime_raw"], serde_json::json!([null, null, 5.0, null]));
    }

    #[test]
    fn test_flag_gates_output_not_contents() {
        // an all-null column with the flag off renders like no column
        let mut attrs = bare_attrs(2);
        attrs.pseudotime = AttributeColumn::default();
        let index = NodeIndex::build(&crate::source::MemoryGraph::from_edges(true, ["x", "y"], []));
        let a = Metadata::build(&index, &EncodedEdges::default(), &attrs, &paths());
        let b = Metadata::build(&index, &EncodedEdges::default(), &bare_attrs(2), &paths());
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_partition_file_omitted() {
        let edges = EncodedEdges {
            combined: vec![0.0, 1.0],
            partition: Some(EdgePartition { trajectory: vec![0.0, 1.0], similarity: vec![] }),
            total_edges: 1,
            sampled: false,
        };
        let set = ArtifactSet::assemble(&four_nodes(), &edges, &[0.0; 8], &bare_attrs(4), &paths());
        assert!(set.metadata.has_edge_types);
        assert_eq!(set.metadata.num_trajectory_edges, 1);
        assert_eq!(set.metadata.num_similarity_edges, 0);
        assert_eq!(set.metadata.trajectory_edges_file.as_deref(), Some("g_edges_trajectory.bin"));
        assert!(set.metadata.similarity_edges_file.is_none());

        let names: Vec<&str> = set.binaries.iter().map(|a| a.file_name.as_str()).collect();
        assert_eq!(names, ["g_edges.bin", "g_edges_trajectory.bin", "g_positions.bin"]);
    }

    #[test]
    fn test_write_creates_dir_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested/out");
        let edges = EncodedEdges { combined: vec![0.0, 1.0], total_edges: 1, ..Default::default() };
        let set = ArtifactSet::assemble(&four_nodes(), &edges, &[0.5; 8], &bare_attrs(4), &paths());

        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("g_edges.bin"), b"stale contents that are longer").unwrap();

        let written = write_artifacts(&set, &dir).unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(written.last().unwrap(), &dir.join("g_metadata.json"));
        assert_eq!(f32_from_bytes(&std::fs::read(dir.join("g_edges.bin")).unwrap()), vec![0.0, 1.0]);

        let meta: Metadata =
            serde_json::from_slice(&std::fs::read(dir.join("g_metadata.json")).unwrap()).unwrap();
        assert_eq!(meta, set.metadata);
    }
}
