use nalgebra::{Point3, Vector3};

/// 3D point in camera coordinates, meters
pub type PointXyz = Point3<f32>;

/// Surface normal with its curvature estimate
///
/// Invalid normals (no usable neighborhood) carry NaN components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normal {
    /// Unit normal, oriented toward the sensor
    pub normal: Vector3<f32>,
    /// Surface variation; NaN when unknown
    pub curvature: f32,
}

impl Normal {
    /// Create a normal from its components
    pub fn new(normal: Vector3<f32>, curvature: f32) -> Self {
        Self { normal, curvature }
    }

    /// The marker for points without a valid normal
    pub fn invalid() -> Self {
        Self {
            normal: Vector3::new(f32::NAN, f32::NAN, f32::NAN),
            curvature: f32::NAN,
        }
    }

    /// True when all components are finite
    pub fn is_valid(&self) -> bool {
        self.normal.iter().all(|c| c.is_finite())
    }
}

impl Default for Normal {
    fn default() -> Self {
        Self::invalid()
    }
}

/// 3D point with an 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointXyzRgb {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
    /// Z coordinate
    pub z: f32,
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl PointXyzRgb {
    /// Combine a position and a color
    pub fn new(point: &PointXyz, [r, g, b]: [u8; 3]) -> Self {
        Self {
            x: point.x,
            y: point.y,
            z: point.z,
            r,
            g,
            b,
        }
    }

    /// Position part
    pub fn position(&self) -> PointXyz {
        PointXyz::new(self.x, self.y, self.z)
    }

    /// Color part
    pub fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// True when every coordinate is finite
pub fn is_finite(point: &PointXyz) -> bool {
    point.x.is_finite() && point.y.is_finite() && point.z.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_validity() {
        assert!(!Normal::invalid().is_valid());
        assert!(!Normal::default().is_valid());
        assert!(Normal::new(Vector3::z(), 0.0).is_valid());
    }

    #[test]
    fn test_colored_point() {
        let p = PointXyzRgb::new(&PointXyz::new(1.0, 2.0, 3.0), [255, 0, 255]);
        assert_eq!(p.position(), PointXyz::new(1.0, 2.0, 3.0));
        assert_eq!(p.rgb(), [255, 0, 255]);
    }
}
