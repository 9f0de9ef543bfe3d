//! Plane segmentation of organized clouds
//!
//! Two strategies share the [`PlaneSegmenter`] seam:
//! - [`CpuSegmenter`]: sequential region growing with plane refinement
//! - [`AcceleratedSegmenter`]: data-parallel label propagation over a
//!   lock-free [`DisjointSet`]

/// Concurrent union-find arena
pub mod disjoint_set;
/// Parallel label propagation and coloring
pub mod labeling;
/// Fixed color palette
pub mod palette;
/// Least-squares plane fitting
pub mod plane_fit;
/// Region growing
pub mod region_growing;

pub use disjoint_set::{DisjointSet, ElementId, PlaneDescriptor};
pub use labeling::AcceleratedSegmenter;
pub use palette::{PALETTE, color_for};
pub use plane_fit::PlaneModel;
pub use region_growing::CpuSegmenter;

use crate::config::SegmenterKind;
use crate::error::{Error, Result};
use crate::models::{Cloud, NormalCloud, PointXyz};
use plane_fit::PlaneAccumulator;

/// Label of pixels that belong to no retained region
pub const NO_LABEL: u32 = u32::MAX;

/// A strategy that splits an organized cloud into planar regions
pub trait PlaneSegmenter: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Segment `cloud` using its per-pixel `normals`
    ///
    /// Both inputs must share width and height.
    fn segment(&self, cloud: &Cloud, normals: &NormalCloud) -> Result<Segmentation>;
}

/// Build the segmenter for `kind` with default settings
pub fn segmenter_for(kind: SegmenterKind) -> Box<dyn PlaneSegmenter> {
    match kind {
        SegmenterKind::Cpu => Box::new(CpuSegmenter::default()),
        SegmenterKind::Accelerated => Box::new(AcceleratedSegmenter::default()),
    }
}

pub(crate) fn check_shapes(cloud: &Cloud, normals: &NormalCloud) -> Result<()> {
    if cloud.width() != normals.width() || cloud.height() != normals.height() {
        return Err(Error::NormalsMissing);
    }
    Ok(())
}

/// One planar region: member pixels plus its fitted plane
#[derive(Debug, Clone)]
pub struct PlaneRegion {
    /// Row-major pixel indices, in the order they joined the region
    pub indices: Vec<usize>,
    /// Least-squares plane through the initial members
    pub model: PlaneModel,
    /// Mean of the initial members
    pub centroid: PointXyz,
    /// Surface variation of the initial members
    pub curvature: f32,
}

impl PlaneRegion {
    /// Number of member pixels
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True when the region has no members
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub(crate) fn from_accumulator(indices: Vec<usize>, acc: &PlaneAccumulator) -> Option<Self> {
        let (model, curvature) = acc.fit()?;
        let centroid = acc.centroid()?;
        Some(Self {
            indices,
            model,
            centroid,
            curvature,
        })
    }
}

/// Result of a segmentation pass
///
/// `labels` has one entry per pixel. For the region-growing path an entry is
/// the index of the owning region or [`NO_LABEL`]; for label propagation it
/// is the pixel's representative, whether or not that component was large
/// enough to be listed in `regions`.
#[derive(Debug, Clone)]
pub struct Segmentation {
    width: usize,
    height: usize,
    labels: Vec<u32>,
    regions: Vec<PlaneRegion>,
}

impl Segmentation {
    /// Assemble a segmentation result
    pub fn new(width: usize, height: usize, labels: Vec<u32>, regions: Vec<PlaneRegion>) -> Self {
        Self {
            width,
            height,
            labels,
            regions,
        }
    }

    /// Width of the segmented cloud
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the segmented cloud
    pub fn height(&self) -> usize {
        self.height
    }

    /// Per-pixel labels in row-major order
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Retained regions
    pub fn regions(&self) -> &[PlaneRegion] {
        &self.regions
    }

    /// Take the retained regions
    pub fn into_regions(self) -> Vec<PlaneRegion> {
        self.regions
    }

    /// Number of retained regions
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Label of pixel `(u, v)`, `None` if out of bounds or unlabeled
    pub fn label_at(&self, u: usize, v: usize) -> Option<u32> {
        if u >= self.width || v >= self.height {
            return None;
        }
        self.labels
            .get(v * self.width + u)
            .copied()
            .filter(|&l| l != NO_LABEL)
    }

    /// One unorganized cloud per retained region, in region order
    pub fn extract(&self, cloud: &Cloud) -> Result<Vec<Cloud>> {
        self.regions
            .iter()
            .map(|region| cloud.extract(&region.indices))
            .collect()
    }
}
