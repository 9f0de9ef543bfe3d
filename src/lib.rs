//! depth_planes - planar surface segmentation for depth-camera frames
//!
//! A depth image is back-projected into an organized point cloud, a normal
//! field is estimated from integral images, and the frame is split into
//! planar regions by one of two strategies: sequential region growing, or
//! data-parallel label propagation over a lock-free union-find.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Thresholds, tolerances and environment overrides
pub mod config;
mod debug;
/// Error type shared by every fallible operation
pub mod error;
/// Frame: owned cloud, normal field, segmentation and transforms
pub mod frame;
/// Core data structures (grids, clouds, intrinsics, transforms)
pub mod models;
/// Surface normal estimation
pub mod normals;
/// Depth decoding and back-projection
pub mod projection;
/// Plane segmentation strategies
pub mod segmentation;
/// Helpers for the CLI, benches and tests
pub mod tools;

pub use config::{LabelingConfig, NormalConfig, SegmentationConfig, SegmenterKind};
pub use error::{Error, Result};
pub use frame::Frame;
pub use models::{
    Cloud, ColoredCloud, Intrinsics, Normal, NormalCloud, PointCloud, PointXyz, PointXyzRgb,
    RigidTransform,
};
pub use projection::DepthImage;
pub use segmentation::{
    AcceleratedSegmenter, CpuSegmenter, PlaneRegion, PlaneSegmenter, Segmentation,
};

use std::path::Path;

/// Segment a depth image file into planar regions
///
/// Decodes `path`, projects it with `intrinsics`, estimates normals and runs
/// the strategy selected by `kind` with its default settings.
pub fn segment_depth_file<P: AsRef<Path>>(
    path: P,
    intrinsics: &Intrinsics,
    kind: SegmenterKind,
) -> Result<Segmentation> {
    let mut frame = Frame::from_depth_file(path, intrinsics)?;
    let segmenter = segmentation::segmenter_for(kind);
    frame.segment(segmenter.as_ref())
}
