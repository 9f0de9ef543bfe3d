use crate::models::PointXyz;
use nalgebra::{Matrix3, SymmetricEigen, Vector3};

/// Plane `normal · p + offset = 0` with a unit normal facing the sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneModel {
    /// Unit normal
    pub normal: Vector3<f32>,
    /// Signed offset from the origin
    pub offset: f32,
}

impl PlaneModel {
    /// Plane through `point` with normal `normal` (assumed unit length)
    pub fn from_point_normal(point: &PointXyz, normal: Vector3<f32>) -> Self {
        Self {
            normal,
            offset: -normal.dot(&point.coords),
        }
    }

    /// Signed distance of `point` to the plane
    #[inline]
    pub fn signed_distance(&self, point: &PointXyz) -> f32 {
        self.normal.dot(&point.coords) + self.offset
    }

    /// Absolute distance of `point` to the plane
    #[inline]
    pub fn distance(&self, point: &PointXyz) -> f32 {
        self.signed_distance(point).abs()
    }

    /// Coefficients `[a, b, c, d]` of `ax + by + cz + d = 0`
    pub fn coefficients(&self) -> [f32; 4] {
        [self.normal.x, self.normal.y, self.normal.z, self.offset]
    }
}

/// Running first and second moments of a point set
#[derive(Debug, Clone)]
pub(crate) struct PlaneAccumulator {
    count: usize,
    sum: Vector3<f64>,
    sum_sq: Matrix3<f64>,
}

impl PlaneAccumulator {
    pub(crate) fn new() -> Self {
        Self {
            count: 0,
            sum: Vector3::zeros(),
            sum_sq: Matrix3::zeros(),
        }
    }

    pub(crate) fn push(&mut self, point: &PointXyz) {
        let p = point.coords.cast::<f64>();
        self.count += 1;
        self.sum += p;
        self.sum_sq += p * p.transpose();
    }

    pub(crate) fn centroid(&self) -> Option<PointXyz> {
        if self.count == 0 {
            return None;
        }
        Some(PointXyz::from((self.sum / self.count as f64).cast::<f32>()))
    }

    /// Least-squares plane and surface curvature (`λmin / Σλ`)
    ///
    /// Needs at least three points spanning more than a line.
    pub(crate) fn fit(&self) -> Option<(PlaneModel, f32)> {
        if self.count < 3 {
            return None;
        }
        let n = self.count as f64;
        let mean = self.sum / n;
        let covariance = self.sum_sq / n - mean * mean.transpose();

        let eig = SymmetricEigen::new(covariance);
        let (min_idx, min_val) = eig
            .eigenvalues
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, &v)| (i, v))?;

        let mut normal = eig.eigenvectors.column(min_idx).into_owned();
        if normal.norm_squared() == 0.0 || !normal.iter().all(|c| c.is_finite()) {
            return None;
        }
        normal.normalize_mut();
        // Face the sensor at the origin
        if normal.dot(&mean) > 0.0 {
            normal = -normal;
        }

        let total: f64 = eig.eigenvalues.iter().sum();
        let curvature = if total > 0.0 { (min_val.max(0.0) / total) as f32 } else { 0.0 };

        let model = PlaneModel {
            normal: normal.cast::<f32>(),
            offset: (-normal.dot(&mean)) as f32,
        };
        Some((model, curvature))
    }
}
