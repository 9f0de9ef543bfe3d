//! Organized multi-plane segmentation by region growing
//!
//! Seeds are visited row-major. A region absorbs a 4-connected neighbor when
//! their normals are within the angular threshold and their plane offsets
//! (`-n · p`) are within the distance threshold. Regions under the inlier
//! minimum are dropped and never merged into others. Retained regions are then
//! refined: unassigned neighbors lying on the region's fitted plane join it.

use super::plane_fit::PlaneAccumulator;
use super::{NO_LABEL, PlaneRegion, PlaneSegmenter, Segmentation, check_shapes};
use crate::config::SegmentationConfig;
use crate::error::Result;
use crate::models::{Cloud, NormalCloud, point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unvisited,
    Grown,
}

/// Sequential region-growing segmenter
#[derive(Debug, Clone, Default)]
pub struct CpuSegmenter {
    config: SegmentationConfig,
}

impl CpuSegmenter {
    /// Segmenter with the given thresholds
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    /// Thresholds in use
    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }
}

struct Grower<'a> {
    cloud: &'a Cloud,
    normals: &'a NormalCloud,
    offsets: Vec<f32>,
    state: Vec<State>,
    labels: Vec<u32>,
    stack: Vec<usize>,
    width: usize,
    height: usize,
    cos_threshold: f32,
    distance_threshold: f32,
}

impl<'a> Grower<'a> {
    fn new(cloud: &'a Cloud, normals: &'a NormalCloud, config: &SegmentationConfig) -> Self {
        let offsets = cloud
            .iter()
            .zip(normals.iter())
            .map(|(p, n)| if n.is_valid() { -n.normal.dot(&p.coords) } else { f32::NAN })
            .collect();
        Self {
            cloud,
            normals,
            offsets,
            state: vec![State::Unvisited; cloud.len()],
            labels: vec![NO_LABEL; cloud.len()],
            stack: Vec::with_capacity(256),
            width: cloud.width(),
            height: cloud.height(),
            cos_threshold: config.angle_threshold_rad().cos(),
            distance_threshold: config.distance_threshold,
        }
    }

    fn is_seed(&self, index: usize) -> bool {
        self.state[index] == State::Unvisited && self.offsets[index].is_finite()
    }

    fn similar(&self, a: usize, b: usize) -> bool {
        let offset_b = self.offsets[b];
        if !offset_b.is_finite() {
            return false;
        }
        let dot = self.normals.points()[a].normal.dot(&self.normals.points()[b].normal);
        dot > self.cos_threshold && (self.offsets[a] - offset_b).abs() < self.distance_threshold
    }

    /// 4-connected neighbors: left, right, up, down
    fn neighbors(&self, index: usize) -> [Option<usize>; 4] {
        let (width, height) = (self.width, self.height);
        let (u, v) = (index % width, index / width);
        [
            (u > 0).then(|| index - 1),
            (u + 1 < width).then(|| index + 1),
            (v > 0).then(|| index - width),
            (v + 1 < height).then(|| index + width),
        ]
    }

    /// Grow one region from `seed`; members come back in collection order
    fn grow(&mut self, seed: usize) -> Vec<usize> {
        let mut members = vec![seed];
        self.state[seed] = State::Grown;
        self.stack.clear();
        self.stack.push(seed);

        while let Some(index) = self.stack.pop() {
            for neighbor in self.neighbors(index).into_iter().flatten() {
                if self.state[neighbor] == State::Grown || !self.similar(index, neighbor) {
                    continue;
                }
                self.state[neighbor] = State::Grown;
                self.stack.push(neighbor);
                members.push(neighbor);
            }
        }
        members
    }

    /// Absorb unlabeled neighbors within `distance_threshold` of the fitted plane
    fn refine(&mut self, label: u32, region: &mut PlaneRegion) {
        let cloud = self.cloud;
        let points = cloud.points();
        let mut cursor = 0;
        while cursor < region.indices.len() {
            let index = region.indices[cursor];
            cursor += 1;
            for neighbor in self.neighbors(index).into_iter().flatten() {
                if self.labels[neighbor] != NO_LABEL {
                    continue;
                }
                let p = &points[neighbor];
                if !point::is_finite(p) || region.model.distance(p) >= self.distance_threshold {
                    continue;
                }
                self.labels[neighbor] = label;
                region.indices.push(neighbor);
            }
        }
    }
}

impl PlaneSegmenter for CpuSegmenter {
    fn name(&self) -> &'static str {
        "cpu-region-growing"
    }

    fn segment(&self, cloud: &Cloud, normals: &NormalCloud) -> Result<Segmentation> {
        check_shapes(cloud, normals)?;
        let mut grower = Grower::new(cloud, normals, &self.config);
        let mut regions: Vec<PlaneRegion> = Vec::new();
        let mut discarded = 0usize;

        for seed in 0..cloud.len() {
            if !grower.is_seed(seed) {
                continue;
            }
            let members = grower.grow(seed);
            if members.len() < self.config.min_inliers {
                discarded += 1;
                continue;
            }

            let mut acc = PlaneAccumulator::new();
            for &i in &members {
                acc.push(&cloud.points()[i]);
            }
            let Some(region) = PlaneRegion::from_accumulator(members, &acc) else {
                discarded += 1;
                continue;
            };

            let label = regions.len() as u32;
            for &i in &region.indices {
                grower.labels[i] = label;
            }
            regions.push(region);
        }

        if self.config.refine {
            for (label, region) in regions.iter_mut().enumerate() {
                let before = region.len();
                grower.refine(label as u32, region);
                log::trace!("region {} refined {} -> {} points", label, before, region.len());
            }
        }

        for (label, region) in regions.iter().enumerate() {
            // Accepted but not enforced; kept visible for tuning
            if region.curvature > self.config.curvature_threshold {
                log::debug!(
                    "region {} curvature {:.5} exceeds {:.5} (not enforced)",
                    label,
                    region.curvature,
                    self.config.curvature_threshold
                );
            }
        }

        log::debug!(
            "region growing: {} planes kept, {} small regions dropped",
            regions.len(),
            discarded
        );

        Ok(Segmentation::new(
            cloud.width(),
            cloud.height(),
            grower.labels,
            regions,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Normal, PointXyz};
    use nalgebra::Vector3;

    /// Organized cloud on z = 1 with normals facing the camera
    fn wall(width: usize, height: usize) -> (Cloud, NormalCloud) {
        let points = (0..width * height)
            .map(|i| PointXyz::new((i % width) as f32 * 0.01, (i / width) as f32 * 0.01, 1.0))
            .collect();
        let normals = vec![Normal::new(-Vector3::z(), 0.0); width * height];
        (
            Cloud::organized(width, height, points).unwrap(),
            NormalCloud::organized(width, height, normals).unwrap(),
        )
    }

    fn config(min_inliers: usize) -> SegmentationConfig {
        SegmentationConfig {
            min_inliers,
            ..SegmentationConfig::new(0.02, 3.0, 0.001)
        }
    }

    #[test]
    fn test_single_wall_is_one_region() {
        let (cloud, normals) = wall(40, 30);
        let seg = CpuSegmenter::new(config(100)).segment(&cloud, &normals).unwrap();
        assert_eq!(seg.regions().len(), 1);
        assert_eq!(seg.regions()[0].len(), 1200);
        assert_eq!(seg.regions()[0].indices[0], 0);
    }

    #[test]
    fn test_small_regions_dropped() {
        let (cloud, normals) = wall(20, 20);
        let seg = CpuSegmenter::new(config(1000)).segment(&cloud, &normals).unwrap();
        assert!(seg.regions().is_empty());
        assert!(seg.labels().iter().all(|&l| l == NO_LABEL));
    }

    #[test]
    fn test_orthogonal_normals_split() {
        let (cloud, mut normals) = wall(40, 30);
        let mut raw = normals.clone().into_points();
        for (i, n) in raw.iter_mut().enumerate() {
            if i % 40 >= 20 {
                *n = Normal::new(Vector3::x(), 0.0);
            }
        }
        normals = NormalCloud::organized(40, 30, raw).unwrap();

        let mut cfg = config(100);
        cfg.refine = false;
        let seg = CpuSegmenter::new(cfg).segment(&cloud, &normals).unwrap();
        assert_eq!(seg.regions().len(), 2);
        assert_eq!(seg.label_at(0, 0), Some(0));
        assert_eq!(seg.label_at(39, 29), Some(1));
    }

    #[test]
    fn test_refine_absorbs_invalid_normals_on_plane() {
        let (cloud, normals) = wall(40, 30);
        let mut raw = normals.into_points();
        // Punch a column of missing normals through the wall
        for v in 0..30 {
            raw[v * 40 + 2] = Normal::invalid();
        }
        let normals = NormalCloud::organized(40, 30, raw).unwrap();

        let mut cfg = config(100);
        cfg.refine = false;
        let unrefined = CpuSegmenter::new(cfg).segment(&cloud, &normals).unwrap();
        let refined = CpuSegmenter::new(config(100)).segment(&cloud, &normals).unwrap();

        // The 2-wide strip on the left is too small on its own
        assert_eq!(unrefined.regions().len(), 1);
        assert_eq!(unrefined.regions()[0].len(), 37 * 30);
        // Refinement pulls the gap and the strip back in
        assert_eq!(refined.regions().len(), 1);
        assert_eq!(refined.regions()[0].len(), 1200);
    }

    #[test]
    fn test_shape_mismatch() {
        let (cloud, _) = wall(10, 10);
        let (_, normals) = wall(10, 9);
        assert!(CpuSegmenter::default().segment(&cloud, &normals).is_err());
    }
}
