//! A single depth frame and the operations run on it
//!
//! A [`Frame`] owns the organized cloud back-projected from one depth image
//! and, once estimated, its normal field. Both segmentation paths recompute
//! the normals first; a transform replaces the cloud but leaves the stored
//! normals untouched until the next estimation.

use crate::config::{NormalConfig, SegmentationConfig};
use crate::debug::debug_enabled;
use crate::error::{Error, Result};
use crate::models::{Cloud, ColoredCloud, Intrinsics, NormalCloud, RigidTransform, intrinsics};
use crate::normals::NormalEstimator;
use crate::projection::{DepthImage, load_depth_image, project_parallel};
use crate::segmentation::{
    AcceleratedSegmenter, CpuSegmenter, PlaneRegion, PlaneSegmenter, Segmentation,
};
use nalgebra::Affine3;
use std::path::Path;

/// Organized cloud of one depth frame plus its normal field
#[derive(Debug, Clone)]
pub struct Frame {
    cloud: Cloud,
    normals: Option<NormalCloud>,
    estimator: NormalEstimator,
}

impl Frame {
    /// Project `depth` with explicit intrinsics
    pub fn from_depth_image(depth: &DepthImage, intrinsics: &Intrinsics) -> Self {
        Self::from_cloud(project_parallel(depth, intrinsics))
    }

    /// Decode and project a depth image file
    pub fn from_depth_file<P: AsRef<Path>>(path: P, intrinsics: &Intrinsics) -> Result<Self> {
        let depth = load_depth_image(path)?;
        Ok(Self::from_depth_image(&depth, intrinsics))
    }

    /// Decode and project a depth image file with the process-wide intrinsics
    pub fn from_depth_file_global<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_depth_file(path, &intrinsics::global())
    }

    /// Wrap an existing organized cloud
    pub fn from_cloud(cloud: Cloud) -> Self {
        Self {
            cloud,
            normals: None,
            estimator: NormalEstimator::default(),
        }
    }

    /// Use different normal estimation parameters
    pub fn with_normal_config(mut self, config: NormalConfig) -> Self {
        self.estimator = NormalEstimator::new(config);
        self
    }

    /// Current owned cloud
    pub fn cloud(&self) -> &Cloud {
        &self.cloud
    }

    /// Last estimated normal field, if any
    ///
    /// After [`Frame::transform`] this still describes the previous cloud.
    pub fn normals(&self) -> Option<&NormalCloud> {
        self.normals.as_ref()
    }

    /// Cloud width in pixels
    pub fn width(&self) -> usize {
        self.cloud.width()
    }

    /// Cloud height in pixels
    pub fn height(&self) -> usize {
        self.cloud.height()
    }

    /// Estimate and store the normal field, replacing any previous one
    pub fn estimate_normals(&mut self) -> &NormalCloud {
        self.normals.insert(self.estimator.compute(&self.cloud))
    }

    /// Run `segmenter` on freshly estimated normals
    pub fn segment(&mut self, segmenter: &dyn PlaneSegmenter) -> Result<Segmentation> {
        self.estimate_normals();
        let normals = self.normals.as_ref().ok_or(Error::NormalsMissing)?;
        let segmentation = segmenter.segment(&self.cloud, normals)?;
        log::debug!(
            "{}: {} planes on {}x{} frame",
            segmenter.name(),
            segmentation.region_count(),
            self.width(),
            self.height()
        );
        if debug_enabled() {
            dump_regions(&segmentation);
        }
        Ok(segmentation)
    }

    /// Region-growing segmentation returning regions with their plane models
    ///
    /// `curvature_threshold` is accepted but not enforced.
    pub fn plane_regions(
        &mut self,
        distance_threshold: f32,
        angle_threshold_deg: f32,
        curvature_threshold: f32,
    ) -> Result<Vec<PlaneRegion>> {
        let config =
            SegmentationConfig::new(distance_threshold, angle_threshold_deg, curvature_threshold);
        Ok(self.segment(&CpuSegmenter::new(config))?.into_regions())
    }

    /// Region-growing segmentation returning one cloud per plane
    ///
    /// Clouds come in discovery order; points keep the order in which the
    /// region collected them. `curvature_threshold` is accepted but not
    /// enforced.
    pub fn segment_planes(
        &mut self,
        distance_threshold: f32,
        angle_threshold_deg: f32,
        curvature_threshold: f32,
    ) -> Result<Vec<Cloud>> {
        let config =
            SegmentationConfig::new(distance_threshold, angle_threshold_deg, curvature_threshold);
        self.segment(&CpuSegmenter::new(config))?.extract(&self.cloud)
    }

    /// Label propagation returning the frame colored by plane membership
    ///
    /// The output has the frame's width and height and row-major order.
    pub fn segment_planes_labeled(&mut self) -> Result<ColoredCloud> {
        self.segment_planes_labeled_with(&AcceleratedSegmenter::default())
    }

    /// [`Frame::segment_planes_labeled`] with explicit tolerances
    pub fn segment_planes_labeled_with(
        &mut self,
        segmenter: &AcceleratedSegmenter,
    ) -> Result<ColoredCloud> {
        self.estimate_normals();
        let normals = self.normals.as_ref().ok_or(Error::NormalsMissing)?;
        let set = segmenter.label(&self.cloud, normals)?;
        segmenter.colorize(&self.cloud, &set)
    }

    /// Replace the cloud with its image under `transform` and return it
    pub fn transform(&mut self, transform: &Affine3<f32>) -> &Cloud {
        self.transform_with(&RigidTransform::from(*transform))
    }

    /// [`Frame::transform`] taking the crate's transform wrapper
    pub fn transform_with(&mut self, transform: &RigidTransform) -> &Cloud {
        self.cloud = transform.apply_cloud(&self.cloud);
        &self.cloud
    }
}

fn dump_regions(segmentation: &Segmentation) {
    for (i, region) in segmentation.regions().iter().enumerate() {
        let [a, b, c, d] = region.model.coefficients();
        log::debug!(
            "  plane {}: {} points, n=({:.3}, {:.3}, {:.3}) d={:.3} curvature={:.5}",
            i,
            region.len(),
            a,
            b,
            c,
            d,
            region.curvature
        );
    }
}
