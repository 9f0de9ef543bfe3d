//! Helpers shared by the CLI, benches and integration tests

use crate::models::ColoredCloud;
use crate::projection::DepthImage;
use crate::segmentation::{PALETTE, PlaneRegion};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Summary statistics for raw depth samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthStats {
    /// Smallest non-zero sample, 0 if every sample is zero
    pub min: u16,
    /// Largest sample
    pub max: u16,
    /// Mean over non-zero samples
    pub mean: f64,
    /// Count of zero (missing) samples
    pub zero_count: usize,
    /// Total samples
    pub total: usize,
}

/// Compute min/max/mean over the valid samples of a depth image
pub fn depth_stats(depth: &DepthImage) -> DepthStats {
    let mut min = u16::MAX;
    let mut max = 0u16;
    let mut sum: u64 = 0;
    let mut zero_count = 0usize;
    for &d in depth.as_slice() {
        if d == 0 {
            zero_count += 1;
            continue;
        }
        min = min.min(d);
        max = max.max(d);
        sum += d as u64;
    }
    let valid = depth.len() - zero_count;
    let mean = if valid == 0 { 0.0 } else { sum as f64 / valid as f64 };
    DepthStats {
        min: if valid == 0 { 0 } else { min },
        max,
        mean,
        zero_count,
        total: depth.len(),
    }
}

/// One-line description of a segmented plane
pub fn describe_region(index: usize, region: &PlaneRegion) -> String {
    let [a, b, c, d] = region.model.coefficients();
    format!(
        "plane {}: {} points, normal=({:.3}, {:.3}, {:.3}), offset={:.3}, curvature={:.5}",
        index,
        region.len(),
        a,
        b,
        c,
        d,
        region.curvature
    )
}

/// Points per palette entry of a labeled cloud, in palette order
pub fn color_histogram(cloud: &ColoredCloud) -> [usize; 6] {
    let mut counts = [0usize; 6];
    for p in cloud {
        if let Some(slot) = PALETTE.iter().position(|&c| c == p.rgb()) {
            counts[slot] += 1;
        }
    }
    counts
}

/// Depth image of a fronto-parallel wall at `ticks`
pub fn flat_depth(width: usize, height: usize, ticks: u16) -> DepthImage {
    DepthImage::filled(width, height, ticks)
}

/// Depth image with a near wall on the left half and a far wall on the right
pub fn two_wall_depth(width: usize, height: usize, near: u16, far: u16) -> DepthImage {
    let mut depth = DepthImage::filled(width, height, near);
    for row in depth.as_mut_slice().chunks_mut(width.max(1)) {
        for d in row.iter_mut().skip(width / 2) {
            *d = far;
        }
    }
    depth
}

/// Default dataset root from environment variables
pub fn dataset_root_from_env() -> PathBuf {
    env::var("PLANES_DATASET_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("benches/data"))
}

/// Default bench limit from environment variables
///
/// Returns `None` (full dataset) when `PLANES_BENCH_LIMIT` is unset or `0`
pub fn bench_limit_from_env() -> Option<usize> {
    match env::var("PLANES_BENCH_LIMIT") {
        Ok(value) => value.trim().parse::<usize>().ok().filter(|&v| v != 0),
        Err(_) => None,
    }
}

/// Sorted depth PNGs under `root`, recursively, truncated to `limit`
pub fn dataset_iter<P: AsRef<Path>>(root: P, limit: Option<usize>) -> impl Iterator<Item = PathBuf> {
    let mut images = collect_depth_images(root.as_ref());
    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

fn collect_depth_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            let is_png = path
                .extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("png"));
            if is_png {
                images.push(path);
            }
        }
    }

    images
}
