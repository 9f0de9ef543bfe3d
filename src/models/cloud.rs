use super::grid::Grid;
use super::point::{Normal, PointXyz, PointXyzRgb};
use crate::error::Result;

/// Point cloud that may keep the 2D arrangement of its source image
///
/// Organized clouds have `height > 1` and point `(u, v)` at `v * width + u`.
/// Clouds built by [`PointCloud::extract`] are unorganized: `height == 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCloud<P> {
    grid: Grid<P>,
}

/// Plain XYZ cloud
pub type Cloud = PointCloud<PointXyz>;
/// Per-point normal field
pub type NormalCloud = PointCloud<Normal>;
/// XYZ cloud with colors, used for labeled output
pub type ColoredCloud = PointCloud<PointXyzRgb>;

impl<P> PointCloud<P> {
    /// Organized cloud from a row-major buffer
    pub fn organized(width: usize, height: usize, points: Vec<P>) -> Result<Self> {
        Ok(Self {
            grid: Grid::from_vec(width, height, points)?,
        })
    }

    /// Cloud backed by an existing grid
    pub fn from_grid(grid: Grid<P>) -> Self {
        Self { grid }
    }

    /// Unorganized cloud (`height == 1`)
    pub fn unorganized(points: Vec<P>) -> Self {
        Self {
            grid: Grid::single_row(points),
        }
    }

    /// Cloud width; the point count for unorganized clouds
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Cloud height; 1 for unorganized clouds
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Whether the cloud keeps its image arrangement
    pub fn is_organized(&self) -> bool {
        self.grid.height() > 1
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    /// True when the cloud holds no points
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Point at pixel `(u, v)`
    pub fn at(&self, u: usize, v: usize) -> Option<&P> {
        self.grid.at(u, v)
    }

    /// Points in row-major order
    pub fn points(&self) -> &[P] {
        self.grid.as_slice()
    }

    /// Iterate points in row-major order
    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.grid.as_slice().iter()
    }

    /// Backing grid
    pub fn grid(&self) -> &Grid<P> {
        &self.grid
    }

    /// True when `other` has the same width and height
    pub fn same_shape<Q>(&self, other: &PointCloud<Q>) -> bool {
        self.width() == other.width() && self.height() == other.height()
    }

    /// Map every point into a new cloud of the same shape
    pub fn map<Q, F: FnMut(&P) -> Q>(&self, f: F) -> PointCloud<Q> {
        PointCloud {
            grid: self.grid.map(f),
        }
    }

    /// Consume the cloud and return its points
    pub fn into_points(self) -> Vec<P> {
        self.grid.into_vec()
    }
}

impl<P: Clone> PointCloud<P> {
    /// Copy the points at `indices` into a new unorganized cloud
    ///
    /// Points keep the order of `indices`. Any index past the end is an
    /// `IndexOutOfRange` error and nothing is returned.
    pub fn extract(&self, indices: &[usize]) -> Result<Self> {
        let mut points = Vec::with_capacity(indices.len());
        for &i in indices {
            points.push(self.grid.try_get(i)?.clone());
        }
        Ok(Self::unorganized(points))
    }
}

impl<P: Clone + Default> Default for PointCloud<P> {
    fn default() -> Self {
        Self {
            grid: Grid::default(),
        }
    }
}

impl<'a, P> IntoIterator for &'a PointCloud<P> {
    type Item = &'a P;
    type IntoIter = std::slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn small_cloud() -> Cloud {
        let points = (0..6).map(|i| PointXyz::new(i as f32, 0.0, 1.0)).collect();
        Cloud::organized(3, 2, points).unwrap()
    }

    #[test]
    fn test_organized_access() {
        let cloud = small_cloud();
        assert!(cloud.is_organized());
        assert_eq!(cloud.at(1, 1).unwrap().x, 4.0);
        assert!(cloud.at(3, 0).is_none());
    }

    #[test]
    fn test_extract_keeps_index_order() {
        let cloud = small_cloud();
        let sub = cloud.extract(&[5, 0, 3]).unwrap();
        assert!(!sub.is_organized());
        assert_eq!(sub.height(), 1);
        assert_eq!(sub.width(), 3);
        let xs: Vec<f32> = sub.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![5.0, 0.0, 3.0]);
    }

    #[test]
    fn test_extract_out_of_range() {
        let cloud = small_cloud();
        assert!(matches!(
            cloud.extract(&[0, 6]),
            Err(Error::IndexOutOfRange { index: 6, len: 6 })
        ));
    }
}
