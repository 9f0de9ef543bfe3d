use super::integral::IntegralImage;
use crate::config::NormalConfig;
use crate::models::{Cloud, Grid, Normal, NormalCloud, PointXyz};
use nalgebra::Vector3;
use rayon::prelude::*;

/// Windows at or below this size produce no normal
const MIN_WINDOW: f32 = 2.0;

/// Average 3D gradient normal estimation over integral images
///
/// For every pixel the horizontal and vertical central differences of the
/// organized cloud are summed over a square window; the normal is the cross
/// product of the two average gradients, oriented toward the sensor.
///
/// The window shrinks near depth discontinuities (a chamfer distance map to
/// the nearest jump bounds it) and pixels closer to the image border than the
/// smoothing size get no normal.
#[derive(Debug, Clone, Default)]
pub struct NormalEstimator {
    config: NormalConfig,
}

impl NormalEstimator {
    /// Estimator with the given parameters
    pub fn new(config: NormalConfig) -> Self {
        Self { config }
    }

    /// Parameters in use
    pub fn config(&self) -> &NormalConfig {
        &self.config
    }

    /// Compute the normal field of an organized cloud
    ///
    /// The result has the same width and height as `cloud`.
    pub fn compute(&self, cloud: &Cloud) -> NormalCloud {
        let width = cloud.width();
        let height = cloud.height();
        let mut normals = Grid::filled(width, height, Normal::invalid());

        let smoothing = self.config.normal_smoothing_size;
        let border = smoothing as usize;
        if width <= 2 * border || height <= 2 * border {
            log::debug!(
                "cloud {}x{} too small for smoothing window {}, no normals",
                width,
                height,
                smoothing
            );
            return NormalCloud::from_grid(normals);
        }

        let points = cloud.points();
        let (diff_x, diff_y) = central_differences(points, width, height);
        let ix = IntegralImage::new(width, height, &diff_x);
        let iy = IntegralImage::new(width, height, &diff_y);
        let distance = distance_map(&self.depth_changes(points, width, height), width, height);

        normals
            .as_mut_slice()
            .par_chunks_mut(width)
            .enumerate()
            .skip(border)
            .take(height - 2 * border)
            .for_each(|(v, row)| {
                for u in border..width - border {
                    let index = v * width + u;
                    let point = &points[index];
                    if !point.z.is_finite() {
                        continue;
                    }
                    let window = distance[index].min(smoothing);
                    if window <= MIN_WINDOW {
                        continue;
                    }
                    row[u] = average_gradient_normal(&ix, &iy, point, u, v, window as usize);
                }
            });

        let normals = NormalCloud::from_grid(normals);
        log::debug!(
            "estimated {} valid normals on {}x{} cloud",
            normals.iter().filter(|n| n.is_valid()).count(),
            width,
            height
        );
        normals
    }

    /// Mark pixels adjacent to a depth jump (or a non-finite depth)
    fn depth_changes(&self, points: &[PointXyz], width: usize, height: usize) -> Vec<bool> {
        let factor = self.config.max_depth_change_factor;
        let mut changes = vec![false; width * height];

        let jump = |a: f32, b: f32| {
            let limit = factor * (a.abs() + 1.0) * 2.0;
            !a.is_finite() || !b.is_finite() || (a - b).abs() > limit
        };

        for v in 0..height {
            for u in 0..width {
                let index = v * width + u;
                let depth = points[index].z;
                if u + 1 < width && jump(depth, points[index + 1].z) {
                    changes[index] = true;
                    changes[index + 1] = true;
                }
                if v + 1 < height && jump(depth, points[index + width].z) {
                    changes[index] = true;
                    changes[index + width] = true;
                }
            }
        }
        changes
    }
}

/// Horizontal and vertical central differences; border pixels are NaN
fn central_differences(
    points: &[PointXyz],
    width: usize,
    height: usize,
) -> (Vec<Vector3<f32>>, Vec<Vector3<f32>>) {
    let nan = Vector3::new(f32::NAN, f32::NAN, f32::NAN);
    let mut diff_x = vec![nan; width * height];
    let mut diff_y = vec![nan; width * height];

    for v in 1..height.saturating_sub(1) {
        for u in 1..width.saturating_sub(1) {
            let index = v * width + u;
            diff_x[index] = points[index + 1] - points[index - 1];
            diff_y[index] = points[index + width] - points[index - width];
        }
    }
    (diff_x, diff_y)
}

/// Two-pass chamfer distance (1, sqrt 2) to the nearest depth change
fn distance_map(changes: &[bool], width: usize, height: usize) -> Vec<f32> {
    const DIAGONAL: f32 = std::f32::consts::SQRT_2;
    let far = (width + height) as f32;
    let mut distance: Vec<f32> = changes.iter().map(|&c| if c { 0.0 } else { far }).collect();

    // Forward pass: top-left to bottom-right
    for v in 0..height {
        for u in 0..width {
            let index = v * width + u;
            let mut d = distance[index];
            if u > 0 {
                d = d.min(distance[index - 1] + 1.0);
            }
            if v > 0 {
                d = d.min(distance[index - width] + 1.0);
                if u > 0 {
                    d = d.min(distance[index - width - 1] + DIAGONAL);
                }
                if u + 1 < width {
                    d = d.min(distance[index - width + 1] + DIAGONAL);
                }
            }
            distance[index] = d;
        }
    }

    // Backward pass: bottom-right to top-left
    for v in (0..height).rev() {
        for u in (0..width).rev() {
            let index = v * width + u;
            let mut d = distance[index];
            if u + 1 < width {
                d = d.min(distance[index + 1] + 1.0);
            }
            if v + 1 < height {
                d = d.min(distance[index + width] + 1.0);
                if u + 1 < width {
                    d = d.min(distance[index + width + 1] + DIAGONAL);
                }
                if u > 0 {
                    d = d.min(distance[index + width - 1] + DIAGONAL);
                }
            }
            distance[index] = d;
        }
    }

    distance
}

fn average_gradient_normal(
    ix: &IntegralImage,
    iy: &IntegralImage,
    point: &PointXyz,
    u: usize,
    v: usize,
    window: usize,
) -> Normal {
    let half = window / 2;
    let (u0, v0) = (u.saturating_sub(half), v.saturating_sub(half));

    let (gradient_x, count_x) = ix.block(u0, v0, window, window);
    let (gradient_y, count_y) = iy.block(u0, v0, window, window);
    if count_x == 0 || count_y == 0 {
        return Normal::invalid();
    }

    let normal = gradient_y.cross(&gradient_x);
    let length_sq = normal.norm_squared();
    if length_sq == 0.0 || !length_sq.is_finite() {
        return Normal::invalid();
    }
    let mut normal = (normal / length_sq.sqrt()).cast::<f32>();

    // Orient toward the viewpoint at the origin
    if normal.dot(&(-point.coords)) < 0.0 {
        normal = -normal;
    }
    Normal::new(normal, 0.0)
}
