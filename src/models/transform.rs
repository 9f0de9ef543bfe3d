use super::cloud::Cloud;
use super::point::PointXyz;
use nalgebra::{Affine3, Isometry3, Matrix3, Matrix4, Rotation3, Translation3, Vector3};

/// Rigid (or general affine) 3D transform applied to whole clouds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    /// Underlying affine map
    pub transform: Affine3<f32>,
}

impl RigidTransform {
    /// The identity transform
    pub fn identity() -> Self {
        Self {
            transform: Affine3::identity(),
        }
    }

    /// Rotation followed by translation
    pub fn from_parts(rotation: Rotation3<f32>, translation: Vector3<f32>) -> Self {
        let iso = Isometry3::from_parts(Translation3::from(translation), rotation.into());
        Self::from(iso)
    }

    /// Homogeneous 4x4 matrix; `None` when the last row is not `[0, 0, 0, 1]`
    pub fn from_matrix(matrix: Matrix4<f32>) -> Option<Self> {
        let last = matrix.row(3);
        if last[0] != 0.0 || last[1] != 0.0 || last[2] != 0.0 || last[3] != 1.0 {
            return None;
        }
        Some(Self {
            transform: Affine3::from_matrix_unchecked(matrix),
        })
    }

    /// Linear 3x3 block
    pub fn linear(&self) -> Matrix3<f32> {
        self.transform.matrix().fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// Translation column
    pub fn translation(&self) -> Vector3<f32> {
        self.transform.matrix().fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Map a single point
    #[inline]
    pub fn apply(&self, point: &PointXyz) -> PointXyz {
        self.transform.transform_point(point)
    }

    /// Map every point into a new cloud of the same shape
    pub fn apply_cloud(&self, cloud: &Cloud) -> Cloud {
        cloud.map(|p| self.apply(p))
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Affine3<f32>> for RigidTransform {
    fn from(transform: Affine3<f32>) -> Self {
        Self { transform }
    }
}

impl From<Isometry3<f32>> for RigidTransform {
    fn from(iso: Isometry3<f32>) -> Self {
        Self {
            transform: Affine3::from_matrix_unchecked(iso.to_homogeneous()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_noop() {
        let p = PointXyz::new(0.5, -1.0, 2.0);
        assert_eq!(RigidTransform::identity().apply(&p), p);
    }

    #[test]
    fn test_rotation_and_translation() {
        let rot = Rotation3::from_axis_angle(&Vector3::z_axis(), std::f32::consts::FRAC_PI_2);
        let t = RigidTransform::from_parts(rot, Vector3::new(1.0, 0.0, 0.0));
        let out = t.apply(&PointXyz::new(1.0, 0.0, 0.0));
        assert!((out - PointXyz::new(1.0, 1.0, 0.0)).norm() < 1e-6);
        assert!((t.translation() - Vector3::new(1.0, 0.0, 0.0)).norm() < 1e-6);
        assert!((t.linear() - rot.matrix()).norm() < 1e-6);
    }

    #[test]
    fn test_from_matrix_rejects_projective() {
        let mut m = Matrix4::identity();
        m[(3, 0)] = 0.5;
        assert!(RigidTransform::from_matrix(m).is_none());
        assert!(RigidTransform::from_matrix(Matrix4::identity()).is_some());
    }
}
