//! Tunables for normal estimation and both segmentation paths
//!
//! Defaults suit a VGA depth camera at room scale. A few knobs can be overridden from
//! the environment; each variable is read once per process.

use std::sync::OnceLock;

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_f32(name: &str, default: f32) -> f32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Degrees to radians, truncated to five digits
pub const DEG_TO_RAD: f32 = 0.017453;

/// Regions with fewer members than this are dropped
pub const DEFAULT_MIN_INLIERS: usize = 1000;

static MIN_INLIERS: OnceLock<usize> = OnceLock::new();

pub(crate) fn min_inliers() -> usize {
    *MIN_INLIERS.get_or_init(|| parse_env_usize("PLANES_MIN_INLIERS", DEFAULT_MIN_INLIERS).max(1))
}

static LABEL_ANGLE_DEG: OnceLock<f32> = OnceLock::new();

pub(crate) fn label_angle_deg() -> f32 {
    *LABEL_ANGLE_DEG.get_or_init(|| parse_env_f32("PLANES_LABEL_ANGLE_DEG", 5.0).clamp(0.1, 90.0))
}

static LABEL_DISTANCE: OnceLock<f32> = OnceLock::new();

pub(crate) fn label_distance() -> f32 {
    *LABEL_DISTANCE.get_or_init(|| parse_env_f32("PLANES_LABEL_DISTANCE", 0.02).max(0.0))
}

/// Integral-image normal estimation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalConfig {
    /// Relative depth jump (fraction of depth) treated as a discontinuity
    pub max_depth_change_factor: f32,
    /// Side length of the averaging window, in pixels
    pub normal_smoothing_size: f32,
}

impl Default for NormalConfig {
    fn default() -> Self {
        Self {
            max_depth_change_factor: 0.02,
            normal_smoothing_size: 10.0,
        }
    }
}

/// Region-growing thresholds for the CPU path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentationConfig {
    /// Maximum plane offset difference between neighbors, in meters
    pub distance_threshold: f32,
    /// Maximum angle between neighboring normals, in degrees
    pub angle_threshold_deg: f32,
    /// Accepted for interface compatibility; not enforced
    pub curvature_threshold: f32,
    /// Minimum members a region needs to be reported
    pub min_inliers: usize,
    /// Grow retained regions into unassigned pixels lying on their fitted plane
    pub refine: bool,
}

impl SegmentationConfig {
    /// Build a config from the three thresholds of the public segmentation call
    ///
    /// The minimum region size is always [`DEFAULT_MIN_INLIERS`];
    /// `PLANES_MIN_INLIERS` only affects [`SegmentationConfig::default`].
    pub fn new(distance_threshold: f32, angle_threshold_deg: f32, curvature_threshold: f32) -> Self {
        Self {
            distance_threshold,
            angle_threshold_deg,
            curvature_threshold,
            min_inliers: DEFAULT_MIN_INLIERS,
            refine: true,
        }
    }

    /// Angular threshold in radians
    pub fn angle_threshold_rad(&self) -> f32 {
        DEG_TO_RAD * self.angle_threshold_deg
    }
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            distance_threshold: 0.02,
            angle_threshold_deg: 3.0,
            curvature_threshold: 0.001,
            min_inliers: min_inliers(),
            refine: true,
        }
    }
}

/// Pairwise agreement tolerances for the accelerated labeling kernel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelingConfig {
    /// Maximum angle between neighboring normals, in degrees
    pub angle_tolerance_deg: f32,
    /// Maximum plane offset difference between neighbors, in meters
    pub distance_tolerance: f32,
    /// Minimum members for a component to be listed as a region
    pub min_inliers: usize,
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            angle_tolerance_deg: label_angle_deg(),
            distance_tolerance: label_distance(),
            min_inliers: min_inliers(),
        }
    }
}

/// Which segmentation strategy a frame should run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmenterKind {
    /// Sequential region growing with plane refinement
    #[default]
    Cpu,
    /// Parallel union-find label propagation
    Accelerated,
}
