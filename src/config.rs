//! Conversion settings and derived artifact paths.

use std::path::{Path, PathBuf};

use crate::layout::DEFAULT_EXTENT;
use crate::{Error, Result};

/// Seed used when the caller gives none.
pub const DEFAULT_SEED: u64 = 42;

/// Output directory used when the caller gives none.
pub const DEFAULT_OUTPUT_DIR: &str = "public/data";

/// Everything one conversion run needs besides the graph itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertConfig {
    pub output_dir: PathBuf,
    /// Keep this many edges, chosen at random. None keeps all.
    pub sample: Option<usize>,
    pub seed: u64,
    /// Half-width of the position seeding square.
    pub position_extent: f32,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            sample: None,
            seed: DEFAULT_SEED,
            position_extent: DEFAULT_EXTENT,
        }
    }
}

impl ConvertConfig {
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_sample(mut self, sample: Option<usize>) -> Self {
        self.sample = sample;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_position_extent(mut self, extent: f32) -> Self {
        self.position_extent = extent;
        self
    }

    /// Reject settings no run could honor.
    pub fn validate(&self) -> Result<()> {
        if !(self.position_extent.is_finite() && self.position_extent > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "position extent must be a positive finite number, got {}",
                self.position_extent
            )));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("output directory is empty".into()));
        }
        Ok(())
    }

    /// Artifact paths for a given input file.
    pub fn artifact_paths(&self, input: &Path) -> ArtifactPaths {
        let base = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "graph".to_string());
        ArtifactPaths::new(&self.output_dir, &base)
    }
}

/// Where each artifact of one run goes: `<dir>/<base>_<suffix>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
    pub base: String,
}

impl ArtifactPaths {
    pub fn new(dir: &Path, base: &str) -> Self {
        Self { dir: dir.to_path_buf(), base: base.to_string() }
    }

    pub fn file_name(&self, suffix: &str) -> String {
        format!("{}_{suffix}", self.base)
    }

    pub fn path(&self, suffix: &str) -> PathBuf {
        self.dir.join(self.file_name(suffix))
    }

    pub fn edges(&self) -> String { self.file_name("edges.bin") }
    pub fn trajectory_edges(&self) -> String { self.file_name("edges_trajectory.bin") }
    pub fn similarity_edges(&self) -> String { self.file_name("edges_similarity.bin") }
    pub fn positions(&self) -> String { self.file_name("positions.bin") }
    pub fn metadata(&self) -> String { self.file_name("metadata.json") }
}
