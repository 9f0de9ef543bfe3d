//! `PLANES_MIN_INLIERS` overrides the configurable defaults only
//!
//! The override is cached on first use, so this binary sets it before
//! touching the crate and holds a single test.

use depth_planes::config::DEFAULT_MIN_INLIERS;
use depth_planes::tools::flat_depth;
use depth_planes::{AcceleratedSegmenter, CpuSegmenter, Frame, Intrinsics};

#[test]
fn env_override_leaves_fixed_plane_size_alone() {
    // SAFETY: the only test in this binary, run before any other thread reads the env
    unsafe { std::env::set_var("PLANES_MIN_INLIERS", "10") };

    let mut frame = Frame::from_depth_image(&flat_depth(40, 30, 10000), &Intrinsics::default());
    assert_eq!(frame.cloud().len(), 1200);

    // 1200 finite points, still below the fixed minimum
    assert!(frame.segment_planes(0.02, 3.0, 0.001).unwrap().is_empty());
    assert!(frame.plane_regions(0.02, 3.0, 0.001).unwrap().is_empty());

    // Configurable defaults pick up the override
    assert_eq!(CpuSegmenter::default().config().min_inliers, 10);
    assert_eq!(AcceleratedSegmenter::default().config().min_inliers, 10);
    assert_eq!(frame.segment(&CpuSegmenter::default()).unwrap().region_count(), 1);
    assert_ne!(DEFAULT_MIN_INLIERS, 10);
}
