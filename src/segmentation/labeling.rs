use super::disjoint_set::{DisjointSet, ElementId, PlaneDescriptor};
use super::palette::color_for;
use super::plane_fit::PlaneAccumulator;
use super::{PlaneRegion, PlaneSegmenter, Segmentation, check_shapes};
use crate::config::{DEG_TO_RAD, LabelingConfig};
use crate::error::Result;
use crate::models::{Cloud, ColoredCloud, NormalCloud, PointXyzRgb};
use rayon::prelude::*;
use std::collections::HashMap;

/// Parallel connected-component labeling over the normal field
///
/// Every pixel owns one disjoint-set element. Workers visit pixels in
/// parallel and union each with its right and lower neighbor whenever their
/// local planes agree. Afterwards an element's representative identifies its
/// plane.
#[derive(Debug, Clone, Default)]
pub struct AcceleratedSegmenter {
    config: LabelingConfig,
}

impl AcceleratedSegmenter {
    /// Segmenter with the given tolerances
    pub fn new(config: LabelingConfig) -> Self {
        Self { config }
    }

    /// Tolerances in use
    pub fn config(&self) -> &LabelingConfig {
        &self.config
    }

    /// Run the union pass and return the populated arena
    pub fn label(&self, cloud: &Cloud, normals: &NormalCloud) -> Result<DisjointSet> {
        check_shapes(cloud, normals)?;
        let width = cloud.width();
        let height = cloud.height();

        let descriptors = cloud
            .iter()
            .zip(normals.iter())
            .map(|(p, n)| PlaneDescriptor::new(p, n))
            .collect();
        let set = DisjointSet::new(descriptors)?;

        let cos_tolerance = (DEG_TO_RAD * self.config.angle_tolerance_deg).cos();
        let distance_tolerance = self.config.distance_tolerance;

        (0..set.len()).into_par_iter().for_each(|i| {
            let here = ElementId::from_index(i);
            let descriptor = set.descriptor(here);
            if !descriptor.is_valid() {
                return;
            }
            let (u, v) = (i % width, i / width);
            let right = (u + 1 < width).then(|| i + 1);
            let down = (v + 1 < height).then(|| i + width);
            for j in [right, down].into_iter().flatten() {
                let there = ElementId::from_index(j);
                if descriptor.agrees(set.descriptor(there), cos_tolerance, distance_tolerance) {
                    set.union(here, there);
                }
            }
        });

        log::debug!(
            "label propagation: {} sets over {}x{} pixels",
            set.set_count(),
            width,
            height
        );
        Ok(set)
    }

    /// Color every pixel by its representative
    ///
    /// Output keeps row-major order: pixel `(u, v)` is point `v * width + u`.
    pub fn colorize(&self, cloud: &Cloud, set: &DisjointSet) -> Result<ColoredCloud> {
        let mut points = Vec::with_capacity(cloud.len());
        for (i, p) in cloud.iter().enumerate() {
            let root = set.find_index(i)?;
            points.push(PointXyzRgb::new(p, color_for(root.get())));
        }
        ColoredCloud::organized(cloud.width(), cloud.height(), points)
    }
}

impl PlaneSegmenter for AcceleratedSegmenter {
    fn name(&self) -> &'static str {
        "accelerated-label-propagation"
    }

    fn segment(&self, cloud: &Cloud, normals: &NormalCloud) -> Result<Segmentation> {
        let set = self.label(cloud, normals)?;
        let labels = set.roots();

        // Representatives are set minima, so first appearance in row-major
        // order is also ascending representative order.
        let mut order: Vec<u32> = Vec::new();
        let mut members: HashMap<u32, Vec<usize>> = HashMap::new();
        for (i, &root) in labels.iter().enumerate() {
            members
                .entry(root)
                .or_insert_with(|| {
                    order.push(root);
                    Vec::new()
                })
                .push(i);
        }

        let mut regions = Vec::new();
        for root in order {
            let Some(indices) = members.remove(&root) else {
                continue;
            };
            if indices.len() < self.config.min_inliers {
                continue;
            }
            let mut acc = PlaneAccumulator::new();
            for &i in &indices {
                acc.push(&cloud.points()[i]);
            }
            if let Some(region) = PlaneRegion::from_accumulator(indices, &acc) {
                regions.push(region);
            }
        }

        Ok(Segmentation::new(cloud.width(), cloud.height(), labels, regions))
    }
}
