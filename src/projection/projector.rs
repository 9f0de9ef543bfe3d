//! Back-project raw depth samples into an organized point cloud
//!
//! z = d / 5000, x = (u - cx) * z / fx, y = (v - cy) * z / fy
//!
//! Zero samples are kept as points at the origin so the cloud stays organized
//! pixel-for-pixel with the depth image.

use super::depth::DepthImage;
use crate::models::{Cloud, Grid, Intrinsics, PointXyz};
use rayon::prelude::*;

/// Sensor ticks per meter
pub const DEPTH_SCALE: f64 = 5000.0;

#[inline]
fn project_pixel(u: usize, v: usize, raw: u16, k: &Intrinsics) -> PointXyz {
    // Scale in f64 like the sensor driver, then store as f32
    let z = (raw as f64 / DEPTH_SCALE) as f32;
    let [x, y, z] = k.back_project(u as f32, v as f32, z);
    PointXyz::new(x, y, z)
}

/// Project a depth image sequentially, row-major
pub fn project(depth: &DepthImage, intrinsics: &Intrinsics) -> Cloud {
    let points = depth.map_indexed(|u, v, &raw| project_pixel(u, v, raw, intrinsics));
    log::trace!("projected {}x{} depth image", depth.width(), depth.height());
    Cloud::from_grid(points)
}

/// Project a depth image with rows processed in parallel
///
/// Produces exactly the same points as [`project`].
pub fn project_parallel(depth: &DepthImage, intrinsics: &Intrinsics) -> Cloud {
    let width = depth.width();
    let mut points = Grid::filled(width, depth.height(), PointXyz::origin());

    if width > 0 {
        // Process rows in parallel
        points
            .as_mut_slice()
            .par_chunks_mut(width)
            .zip(depth.as_slice().par_chunks(width))
            .enumerate()
            .for_each(|(v, (out, row))| {
                for (u, (p, &raw)) in out.iter_mut().zip(row).enumerate() {
                    *p = project_pixel(u, v, raw, intrinsics);
                }
            });
    }

    Cloud::from_grid(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize) -> DepthImage {
        let data = (0..width * height).map(|i| (i * 37 % 9000) as u16).collect();
        DepthImage::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn test_projection_formula() {
        let k = Intrinsics::new(500.0, 400.0, 2.0, 1.0).unwrap();
        let depth = DepthImage::from_raw(4, 3, vec![10000; 12]).unwrap();
        let cloud = project(&depth, &k);

        assert_eq!(cloud.width(), 4);
        assert_eq!(cloud.height(), 3);
        let p = cloud.at(3, 2).unwrap();
        assert!((p.z - 2.0).abs() < 1e-6);
        assert!((p.x - (3.0 - 2.0) * 2.0 / 500.0).abs() < 1e-6);
        assert!((p.y - (2.0 - 1.0) * 2.0 / 400.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_depth_retained() {
        let k = Intrinsics::default();
        let depth = DepthImage::from_raw(2, 2, vec![0, 5000, 0, 0]).unwrap();
        let cloud = project(&depth, &k);
        assert_eq!(cloud.len(), 4);
        assert_eq!(*cloud.at(0, 0).unwrap(), PointXyz::origin());
        assert!((cloud.at(1, 0).unwrap().z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let k = Intrinsics::default();
        let depth = ramp(64, 48);
        assert_eq!(project(&depth, &k), project_parallel(&depth, &k));
    }

    #[test]
    fn test_empty_image() {
        let depth = DepthImage::from_raw(0, 0, Vec::new()).unwrap();
        assert!(project(&depth, &Intrinsics::default()).is_empty());
        assert!(project_parallel(&depth, &Intrinsics::default()).is_empty());
    }
}
